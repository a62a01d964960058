use crate::prelude::*;
use core::fmt::Display;
use core::str::FromStr;

use flex_error::define_error;
use serde::{Deserialize, Serialize};

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    SignerError {
        EmptySigner
            | _ | { "signer cannot be empty" },
    }
}

/// An account identifier as it travels inside messages and packet data.
///
/// The transfer application does not interpret it: the host chain decides how it maps onto one
/// of its own accounts (see `TokenTransferReader::AccountId`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signer(String);

impl Signer {
    pub fn new(s: impl ToString) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for Signer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Signer {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Signer {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Signer {
    type Err = SignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_string();
        if s.trim().is_empty() {
            return Err(SignerError::empty_signer());
        }
        Ok(Self(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn parse_signer() {
        assert!("".parse::<Signer>().is_err());
        assert!("   ".parse::<Signer>().is_err());

        let signer: Signer = "cosmos1wxeyh7zgn4tctjzs0vtqpc6p5cxq5t2muzl7ng".parse().unwrap();
        assert_eq!(
            signer.as_str(),
            "cosmos1wxeyh7zgn4tctjzs0vtqpc6p5cxq5t2muzl7ng"
        );
        assert!(!signer.is_empty());
        assert!(Signer::new(" ").is_empty());
    }
}
