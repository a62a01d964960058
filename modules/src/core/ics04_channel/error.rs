use super::packet::Sequence;
use crate::core::ics24_host::error::ValidationError;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::prelude::*;
use crate::timestamp::Timestamp;
use crate::Height;

use flex_error::define_error;

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    Error {
        Identifier
            [ ValidationError ]
            | _ | { "identifier error" },

        ChannelNotFound
            { port_id: PortId, channel_id: ChannelId }
            | e | {
                format_args!(
                    "the channel end ({0}, {1}) does not exist",
                    e.port_id, e.channel_id)
            },

        ChannelClosed
            { channel_id: ChannelId }
            | e | {
                format_args!(
                    "channel {0} is closed",
                    e.channel_id)
            },

        MissingCounterpartyChannel
            { port_id: PortId, channel_id: ChannelId }
            | e | {
                format_args!(
                    "the counterparty of channel end ({0}, {1}) has no channel identifier",
                    e.port_id, e.channel_id)
            },

        InvalidPacketCounterparty
            { port_id: PortId, channel_id: ChannelId }
            | e | {
                format_args!(
                    "packet destination port {} and channel {} doesn't match the counterparty's port/channel",
                    e.port_id, e.channel_id)
            },

        MissingNextSendSeq
            { port_id: PortId, channel_id: ChannelId }
            | e | {
                format_args!(
                    "Missing sequence number for sending packets on port {0} and channel {1}",
                    e.port_id, e.channel_id)
            },

        InvalidPacketSequence
            {
                given_sequence: Sequence,
                next_sequence: Sequence
            }
            | e | {
                format_args!(
                    "invalid packet sequence {0} ≠ next send sequence {1}",
                    e.given_sequence, e.next_sequence)
            },

        ZeroPacketData
            | _ | { "packet data bytes cannot be empty" },

        MissingTimeout
            | _ | { "packet timeout height and packet timeout timestamp cannot both be 0" },

        LowPacketHeight
            {
                chain_height: Height,
                timeout_height: Height
            }
            | e | {
                format_args!(
                    "receiving chain block height {0} >= packet timeout height {1}",
                    e.chain_height, e.timeout_height)
            },

        LowPacketTimestamp
            {
                host_timestamp: Timestamp,
                timeout_timestamp: Timestamp
            }
            | e | {
                format_args!(
                    "host timestamp {0} >= packet timeout timestamp {1}",
                    e.host_timestamp, e.timeout_timestamp)
            },

        EmptyAcknowledgement
            | _ | { "acknowledgement cannot be empty" },

        AcknowledgementExists
            { sequence: Sequence }
            | e | {
                format_args!(
                    "acknowledgement for the packet {0} already exists",
                    e.sequence)
            },

        ImplementationSpecific
            { reason: String }
            | e | { format_args!("implementation specific error: {}", e.reason) },
    }
}
