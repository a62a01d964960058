use alloc::string::FromUtf8Error;

use flex_error::{define_error, DisplayOnly, TraceError};
use subtle_encoding::Error as EncodingError;
use uint::FromDecStrErr;

use crate::core::ics04_channel::error as channel_error;
use crate::core::ics04_channel::Version;
use crate::core::ics24_host::error::ValidationError;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::prelude::*;
use crate::signer::SignerError;

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    Error {
        Ics04Channel
            [ channel_error::Error ]
            | _ | { "ics04 channel error" },

        Identifier
            [ ValidationError ]
            | _ | { "identifier error" },

        Signer
            [ SignerError ]
            | _ | { "invalid signer" },

        SendDisabled
            | _ | { "fungible token transfers from this chain are disabled" },

        ReceiveDisabled
            | _ | { "fungible token transfers to this chain are disabled" },

        SendDisabledForDenom
            { denom: String }
            | e | { format_args!("sending {0} is disabled by the bank", e.denom) },

        UnauthorizedSend
            { sender: String }
            | e | { format_args!("unauthorized: {0} is not allowed to send funds", e.sender) },

        UnauthorizedReceive
            { receiver: String }
            | e | { format_args!("unauthorized: {0} is not allowed to receive funds", e.receiver) },

        ParseAccountFailure
            { account: String }
            | e | { format_args!("failed to parse account ID {0}", e.account) },

        InvalidAmount
            [ TraceError<FromDecStrErr> ]
            | _ | { "invalid amount" },

        EmptyAmount
            | _ | { "empty amount" },

        NonPositiveAmount
            { amount: String }
            | e | { format_args!("amount must be strictly positive: got {0}", e.amount) },

        InvalidCoin
            { coin: String }
            | e | { format_args!("invalid coin string: {}", e.coin) },

        EmptyBaseDenom
            | _ | { "base denomination cannot be empty" },

        InvalidDenomForTransfer
            { denom: String, reason: String }
            | e | { format_args!("invalid denomination for cross-chain transfer {0}: {1}", e.denom, e.reason) },

        InvalidHexHash
            { hash: String }
            [ DisplayOnly<EncodingError> ]
            | e | { format_args!("invalid hex hash {0}", e.hash) },

        InvalidHashLength
            { hash: String, length: usize }
            | e | { format_args!("invalid hash {0}: expected 32 bytes, got {1}", e.hash, e.length) },

        Utf8
            [ DisplayOnly<FromUtf8Error> ]
            | _ | { "utf8 decoding error" },

        DenomNotFound
            { hash: String }
            | e | { format_args!("denomination trace not found for hash {0}", e.hash) },

        InvalidRequest
            { reason: String }
            | e | { format_args!("invalid request: {0}", e.reason) },

        EmptyTokens
            | _ | { "packet data must contain at least one token" },

        EmptyReceiver
            | _ | { "receiver address cannot be blank" },

        ReceiverTooLong
            { length: usize, max: usize }
            | e | { format_args!("receiver address must not exceed {1} bytes, got {0}", e.length, e.max) },

        MemoTooLong
            { length: usize, max: usize }
            | e | { format_args!("memo must not exceed {1} bytes, got {0}", e.length, e.max) },

        InvalidForwarding
            { reason: String }
            | e | { format_args!("invalid forwarding: {0}", e.reason) },

        InvalidTimeout
            | _ | { "invalid packet timeout: timeout height and timeout timestamp cannot both be 0" },

        UnsupportedVersion
            { version: Version }
            | e | { format_args!("unsupported ics20 version {0}, expected one of ics20-1 or ics20-2", e.version) },

        DestinationChannelNotFound
            { port_id: PortId, channel_id: ChannelId }
            | e | { format_args!("destination channel not found in the counterparty of port_id {0} and channel_id {1}", e.port_id, e.channel_id) },

        PacketDataDeserialization
            | _ | { "failed to deserialize packet data" },

        PacketDataSerialization
            | _ | { "failed to serialize packet data" },

        AckDeserialization
            | _ | { "failed to deserialize acknowledgement" },

        InsufficientFunds
            { address: String, coin: String }
            | e | { format_args!("insufficient funds: {0} cannot spend {1}", e.address, e.coin) },

        EscrowTotalOverflow
            { denom: String }
            | e | { format_args!("total escrow for {0} overflows", e.denom) },

        ForwardedPacketNotFound
            { port_id: PortId, channel_id: ChannelId, sequence: u64 }
            | e | { format_args!("no forwarded packet recorded for {0}/{1}/{2}", e.port_id, e.channel_id, e.sequence) },

        BurnAfterModuleDeposit
            { coin: String, reason: String }
            | e | { format_args!("FATAL: cannot burn coins {0} after a successful send to a module account: {1}", e.coin, e.reason) },

        SendAfterModuleMint
            { coin: String, reason: String }
            | e | { format_args!("FATAL: unable to send coins {0} from module to account despite previously minting coins to module account: {1}", e.coin, e.reason) },

        EscrowInvariantViolation
            { coin: String, reason: String }
            | e | { format_args!("FATAL: unable to unescrow {0}, this may be caused by a malicious counterparty module or a bug: please open an issue on counterparty module: {1}", e.coin, e.reason) },
    }
}

impl Error {
    /// Returns `true` if the error signals that the escrowed value may no longer match the
    /// vouchers issued against it.
    ///
    /// Fatal errors must halt processing: hosts must not turn them into an error
    /// acknowledgement nor retry the operation.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.detail(),
            ErrorDetail::BurnAfterModuleDeposit(_)
                | ErrorDetail::SendAfterModuleMint(_)
                | ErrorDetail::EscrowInvariantViolation(_)
        )
    }
}
