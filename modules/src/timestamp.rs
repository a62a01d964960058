use core::fmt::Display;

use serde::{Deserialize, Serialize};

/// A newtype wrapper over `Option<u64>` to keep track of IBC packet timeout.
///
/// In protocol buffer, the timestamp is represented as a `u64` Unix timestamp in nanoseconds,
/// with 0 representing the absence of timestamp. Our domain type uses `None` for that case.
#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Debug, Default, Deserialize, Serialize, Hash)]
pub struct Timestamp {
    nanoseconds: Option<u64>,
}

/// The expiry result when comparing two timestamps.
/// - If either timestamp is invalid (0), the result is `InvalidTimestamp`.
/// - If the left timestamp is strictly after the right timestamp, the result is `Expired`.
/// - Otherwise, the result is `NotExpired`.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Deserialize, Serialize, Hash)]
pub enum Expiry {
    Expired,
    NotExpired,
    InvalidTimestamp,
}

impl Timestamp {
    /// A protocol value of 0 indicates that the timestamp is not set.
    pub fn from_nanoseconds(nanoseconds: u64) -> Timestamp {
        if nanoseconds == 0 {
            Timestamp { nanoseconds: None }
        } else {
            Timestamp {
                nanoseconds: Some(nanoseconds),
            }
        }
    }

    /// Returns a `Timestamp` representation of a timestamp not being set.
    pub fn none() -> Self {
        Timestamp { nanoseconds: None }
    }

    /// Convert a `Timestamp` to `u64` value in nanoseconds. If no timestamp
    /// is set, the result is 0.
    pub fn nanoseconds(self) -> u64 {
        self.nanoseconds.unwrap_or_default()
    }

    pub fn is_set(&self) -> bool {
        self.nanoseconds.is_some()
    }

    /// Checks whether the timestamp has expired when compared to the
    /// `other` timestamp. Returns an [`Expiry`] result.
    pub fn check_expiry(&self, other: &Timestamp) -> Expiry {
        match (self.nanoseconds, other.nanoseconds) {
            (Some(time1), Some(time2)) => {
                if time1 > time2 {
                    Expiry::Expired
                } else {
                    Expiry::NotExpired
                }
            }
            _ => Expiry::InvalidTimestamp,
        }
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.nanoseconds {
            Some(ns) => write!(f, "Timestamp({})", ns),
            None => write!(f, "NoTimestamp"),
        }
    }
}

impl From<u64> for Timestamp {
    fn from(nanoseconds: u64) -> Self {
        Self::from_nanoseconds(nanoseconds)
    }
}

#[cfg(test)]
mod tests {
    use super::{Expiry, Timestamp};
    use test_log::test;

    #[test]
    fn zero_is_unset() {
        let ts = Timestamp::from_nanoseconds(0);
        assert!(!ts.is_set());
        assert_eq!(ts.nanoseconds(), 0);
        assert_eq!(ts, Timestamp::none());
    }

    #[test]
    fn expiry() {
        let early = Timestamp::from_nanoseconds(10);
        let late = Timestamp::from_nanoseconds(20);

        assert_eq!(late.check_expiry(&early), Expiry::Expired);
        assert_eq!(early.check_expiry(&late), Expiry::NotExpired);
        assert_eq!(early.check_expiry(&early), Expiry::NotExpired);
        assert_eq!(
            Timestamp::none().check_expiry(&early),
            Expiry::InvalidTimestamp
        );
    }
}
