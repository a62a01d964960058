use core::fmt::{Display, Error as FmtError, Formatter};

use serde::{Deserialize, Serialize};

use super::amount::Amount;
use super::coin::Coin;
use super::denom::Denom;
use super::error::Error;
use crate::prelude::*;

/// A denomination with its trace and an amount, as carried by V2 packet data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub denom: Denom,
    /// Decimal string, kept verbatim so that packet data round-trips exactly.
    pub amount: String,
}

pub type Tokens = Vec<Token>;

impl Token {
    pub fn new(denom: Denom, amount: impl ToString) -> Self {
        Self {
            denom,
            amount: amount.to_string(),
        }
    }

    /// Parses the amount, rejecting anything but a strictly positive integer.
    pub fn amount(&self) -> Result<Amount, Error> {
        let amount: Amount = self.amount.parse()?;
        if amount.is_zero() {
            return Err(Error::non_positive_amount(self.amount.clone()));
        }
        Ok(amount)
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.amount()?;
        self.denom.validate()
    }

    /// The coin the bank moves for this token: the `ibc_denom` of the denomination.
    pub fn to_coin(&self) -> Result<Coin, Error> {
        Ok(Coin {
            denom: self.denom.ibc_denom(),
            amount: self.amount()?,
        })
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}{}", self.amount, self.denom)
    }
}
