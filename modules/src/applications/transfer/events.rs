//! Events emitted by the transfer application.

use super::acknowledgement::TokenTransferAcknowledgement;
use super::denom::{Denom, Hop};
use super::token::Tokens;
use super::MODULE_ID_STR;
use crate::events::ModuleEvent;
use crate::prelude::*;
use crate::signer::Signer;

const EVENT_TYPE_TRANSFER: &str = "ibc_transfer";
const EVENT_TYPE_PACKET: &str = "fungible_token_packet";
const EVENT_TYPE_TIMEOUT: &str = "timeout";
const EVENT_TYPE_DENOM: &str = "denomination";

const SENDER_ATTRIBUTE_KEY: &str = "sender";
const RECEIVER_ATTRIBUTE_KEY: &str = "receiver";
const TOKENS_ATTRIBUTE_KEY: &str = "tokens";
const MEMO_ATTRIBUTE_KEY: &str = "memo";
const FORWARDING_HOPS_ATTRIBUTE_KEY: &str = "forwarding_hops";
const SUCCESS_ATTRIBUTE_KEY: &str = "success";
const ERROR_ATTRIBUTE_KEY: &str = "error";
const ACK_ATTRIBUTE_KEY: &str = "acknowledgement";
const REFUND_RECEIVER_ATTRIBUTE_KEY: &str = "refund_receiver";
const REFUND_TOKENS_ATTRIBUTE_KEY: &str = "refund_tokens";
const DENOM_HASH_ATTRIBUTE_KEY: &str = "denom_hash";
const DENOM_ATTRIBUTE_KEY: &str = "denom";

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Emitted by `send_transfer`.
pub struct TransferEvent {
    pub sender: Signer,
    pub receiver: Signer,
    pub tokens: Tokens,
    pub memo: String,
    pub forwarding_hops: Vec<Hop>,
}

impl From<TransferEvent> for ModuleEvent {
    fn from(ev: TransferEvent) -> Self {
        ModuleEvent::new(EVENT_TYPE_TRANSFER, MODULE_ID_STR)
            .with_attribute((SENDER_ATTRIBUTE_KEY, ev.sender))
            .with_attribute((RECEIVER_ATTRIBUTE_KEY, ev.receiver))
            .with_attribute((TOKENS_ATTRIBUTE_KEY, to_json(&ev.tokens)))
            .with_attribute((MEMO_ATTRIBUTE_KEY, ev.memo))
            .with_attribute((FORWARDING_HOPS_ATTRIBUTE_KEY, to_json(&ev.forwarding_hops)))
    }
}

/// Emitted when a packet is received, whether or not it could be processed.
pub struct RecvEvent {
    pub sender: Signer,
    pub receiver: Signer,
    pub tokens: Tokens,
    pub memo: String,
    pub forwarding_hops: Vec<Hop>,
    pub success: bool,
    /// The reason the packet was rejected, if it was.
    pub error: Option<String>,
}

impl From<RecvEvent> for ModuleEvent {
    fn from(ev: RecvEvent) -> Self {
        let event = ModuleEvent::new(EVENT_TYPE_PACKET, MODULE_ID_STR)
            .with_attribute((SENDER_ATTRIBUTE_KEY, ev.sender))
            .with_attribute((RECEIVER_ATTRIBUTE_KEY, ev.receiver))
            .with_attribute((TOKENS_ATTRIBUTE_KEY, to_json(&ev.tokens)))
            .with_attribute((MEMO_ATTRIBUTE_KEY, ev.memo))
            .with_attribute((FORWARDING_HOPS_ATTRIBUTE_KEY, to_json(&ev.forwarding_hops)))
            .with_attribute((SUCCESS_ATTRIBUTE_KEY, ev.success));
        match ev.error {
            Some(error) => event.with_attribute((ERROR_ATTRIBUTE_KEY, error)),
            None => event,
        }
    }
}

/// Emitted when the acknowledgement of a sent packet is processed.
pub struct AckEvent {
    pub sender: Signer,
    pub receiver: Signer,
    pub tokens: Tokens,
    pub memo: String,
    pub forwarding_hops: Vec<Hop>,
    pub acknowledgement: TokenTransferAcknowledgement,
}

impl From<AckEvent> for ModuleEvent {
    fn from(ev: AckEvent) -> Self {
        ModuleEvent::new(EVENT_TYPE_PACKET, MODULE_ID_STR)
            .with_attribute((SENDER_ATTRIBUTE_KEY, ev.sender))
            .with_attribute((RECEIVER_ATTRIBUTE_KEY, ev.receiver))
            .with_attribute((TOKENS_ATTRIBUTE_KEY, to_json(&ev.tokens)))
            .with_attribute((MEMO_ATTRIBUTE_KEY, ev.memo))
            .with_attribute((FORWARDING_HOPS_ATTRIBUTE_KEY, to_json(&ev.forwarding_hops)))
            .with_attribute((ACK_ATTRIBUTE_KEY, ev.acknowledgement))
    }
}

/// Emitted alongside `AckEvent`, carrying either the result or the error of the
/// acknowledgement.
pub struct AckStatusEvent {
    pub acknowledgement: TokenTransferAcknowledgement,
}

impl From<AckStatusEvent> for ModuleEvent {
    fn from(ev: AckStatusEvent) -> Self {
        let event = ModuleEvent::new(EVENT_TYPE_PACKET, MODULE_ID_STR);
        match ev.acknowledgement {
            TokenTransferAcknowledgement::Success(result) => {
                event.with_attribute((SUCCESS_ATTRIBUTE_KEY, result))
            }
            TokenTransferAcknowledgement::Error(err) => {
                event.with_attribute((ERROR_ATTRIBUTE_KEY, err))
            }
        }
    }
}

/// Emitted when a sent packet timed out and its tokens were refunded.
pub struct TimeoutEvent {
    pub refund_receiver: Signer,
    pub refund_tokens: Tokens,
    pub memo: String,
    pub forwarding_hops: Vec<Hop>,
}

impl From<TimeoutEvent> for ModuleEvent {
    fn from(ev: TimeoutEvent) -> Self {
        ModuleEvent::new(EVENT_TYPE_TIMEOUT, MODULE_ID_STR)
            .with_attribute((REFUND_RECEIVER_ATTRIBUTE_KEY, ev.refund_receiver))
            .with_attribute((REFUND_TOKENS_ATTRIBUTE_KEY, to_json(&ev.refund_tokens)))
            .with_attribute((MEMO_ATTRIBUTE_KEY, ev.memo))
            .with_attribute((FORWARDING_HOPS_ATTRIBUTE_KEY, to_json(&ev.forwarding_hops)))
    }
}

/// Emitted when a voucher is minted, announcing the denomination behind its hash.
pub struct DenomEvent {
    pub denom: Denom,
}

impl From<DenomEvent> for ModuleEvent {
    fn from(ev: DenomEvent) -> Self {
        ModuleEvent::new(EVENT_TYPE_DENOM, MODULE_ID_STR)
            .with_attribute((DENOM_HASH_ATTRIBUTE_KEY, ev.denom.hash()))
            .with_attribute((DENOM_ATTRIBUTE_KEY, to_json(&ev.denom)))
    }
}
