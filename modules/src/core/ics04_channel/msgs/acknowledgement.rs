use crate::prelude::*;

use derive_more::Into;
use serde::{Deserialize, Serialize};

use crate::core::ics04_channel::error::Error;

/// A generic Acknowledgement type that modules may interpret as they like.
///
/// The channel layer only guarantees it is non-empty; the bytes are written by the receiving
/// application and handed back verbatim to the sending application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Into)]
pub struct Acknowledgement(Vec<u8>);

impl Acknowledgement {
    /// Wraps the encoding of an application acknowledgement, which is never empty.
    pub(crate) fn from_app_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl AsRef<[u8]> for Acknowledgement {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl TryFrom<Vec<u8>> for Acknowledgement {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.is_empty() {
            Err(Error::empty_acknowledgement())
        } else {
            Ok(Self(bytes))
        }
    }
}
