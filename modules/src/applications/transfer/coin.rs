use core::fmt::{Display, Error as FmtError, Formatter};
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::amount::Amount;
use super::error::Error;
use crate::prelude::*;

/// A coin as the bank knows it: an amount of a ledger denomination.
///
/// For vouchers the denomination is `ibc/{hash}`; for native tokens it is the base denomination.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coin {
    /// Denomination
    pub denom: String,
    /// Amount
    pub amount: Amount,
}

impl Coin {
    pub fn new(denom: impl ToString, amount: impl Into<Amount>) -> Self {
        Self {
            denom: denom.to_string(),
            amount: amount.into(),
        }
    }

    /// Parses a comma separated list of coins, e.g. `10uatom,5ibc/27394...`.
    pub fn from_string_list(coin_str: &str) -> Result<Vec<Self>, Error> {
        coin_str.split(',').map(FromStr::from_str).collect()
    }
}

impl FromStr for Coin {
    type Err = Error;

    /// Parses `{amount}{denom}`, where the amount is a run of decimal digits and the denom
    /// starts with a letter.
    fn from_str(coin_str: &str) -> Result<Self, Error> {
        let coin_str = coin_str.trim();
        let split_at = coin_str
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| Error::invalid_coin(coin_str.to_string()))?;
        let (amount, denom) = coin_str.split_at(split_at);

        if amount.is_empty() || !denom.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(Error::invalid_coin(coin_str.to_string()));
        }

        Ok(Coin {
            amount: amount.parse()?,
            denom: denom.to_string(),
        })
    }
}

impl Display for Coin {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}{}", self.amount, self.denom)
    }
}
