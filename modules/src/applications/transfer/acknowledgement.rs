use core::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use super::error::Error;
use crate::core::ics04_channel::msgs::acknowledgement::Acknowledgement as GenericAcknowledgement;
use crate::core::ics04_channel::packet::Packet;
use crate::prelude::*;

/// A string constant included in error acknowledgements.
/// NOTE: Changing this const is state machine breaking as acknowledgements are written into state
pub const ACK_ERR_STR: &str = "error handling packet on destination chain: see events for details";
/// Base64 encoding of the single byte `0x01`.
pub const ACK_SUCCESS_B64: &str = "AQ==";

/// The acknowledgement a transfer module writes for a received packet.
///
/// Encoded as JSON, `{"result":"AQ=="}` or `{"error":"..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenTransferAcknowledgement {
    #[serde(rename = "result")]
    Success(String),
    Error(String),
}

impl TokenTransferAcknowledgement {
    pub fn success() -> Self {
        Self::Success(ACK_SUCCESS_B64.to_string())
    }

    /// Only the error detail is written: the trace attached to `err` depends on the machine that
    /// produced it and must stay out of committed state.
    pub fn from_error(err: Error) -> Self {
        Self::Error(format!("{}: {}", ACK_ERR_STR, err.detail()))
    }

    /// The acknowledgement written back for an inbound packet whose forwarded leg failed.
    ///
    /// `forwarded` is the packet this chain sent onwards.
    pub fn forward_error(forwarded: &Packet, err: impl Display) -> Self {
        Self::Error(format!(
            "forwarding packet failed on {}/{}: {}",
            forwarded.source_port, forwarded.source_channel, err
        ))
    }

    /// The acknowledgement written back for an inbound packet whose forwarded leg timed out.
    pub fn forward_timeout(forwarded: &Packet) -> Self {
        Self::Error(format!(
            "forwarding packet timed out on {}/{}",
            forwarded.source_port, forwarded.source_channel
        ))
    }

    pub fn is_successful(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Success(result) => format!(r#"{{"result":"{}"}}"#, result).into_bytes(),
            Self::Error(err) => {
                // JSON string escaping of the error text
                let err = serde_json::Value::String(err.clone());
                format!(r#"{{"error":{}}}"#, err).into_bytes()
            }
        }
    }
}

impl Display for TokenTransferAcknowledgement {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Success(result) => write!(f, "{}", result),
            Self::Error(err_str) => write!(f, "{}", err_str),
        }
    }
}

impl From<TokenTransferAcknowledgement> for GenericAcknowledgement {
    fn from(ack: TokenTransferAcknowledgement) -> Self {
        GenericAcknowledgement::from_app_bytes(ack.to_bytes())
    }
}

impl TryFrom<&GenericAcknowledgement> for TokenTransferAcknowledgement {
    type Error = Error;

    fn try_from(ack: &GenericAcknowledgement) -> Result<Self, Error> {
        serde_json::from_slice(ack.as_bytes()).map_err(|_| Error::ack_deserialization())
    }
}
