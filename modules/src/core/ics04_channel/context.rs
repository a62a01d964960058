//! ICS4 (channel) context. The two traits `ChannelReader` and `ChannelKeeper` define the
//! interface that the host chain exposes to applications for sending packets and writing
//! acknowledgements asynchronously.

use crate::core::ics04_channel::channel::ChannelEnd;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::handler::send_packet::SendPacketResult;
use crate::core::ics04_channel::handler::write_acknowledgement::WriteAckPacketResult;
use crate::core::ics04_channel::msgs::acknowledgement::Acknowledgement;
use crate::core::ics04_channel::packet::Sequence;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::timestamp::Timestamp;
use crate::Height;

/// A context supplying all the necessary read-only dependencies for processing any `ChannelMsg`.
pub trait ChannelReader {
    /// Returns the ChannelEnd for the given `port_id` and `chan_id`.
    fn channel_end(&self, port_id: &PortId, channel_id: &ChannelId) -> Result<ChannelEnd, Error>;

    fn get_next_sequence_send(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Sequence, Error>;

    fn get_packet_acknowledgement(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Option<Acknowledgement>;

    /// Returns the latest height of the counterparty as known through the light client of the
    /// channel, used to reject packets that would time out immediately.
    fn counterparty_latest_height(&self, port_id: &PortId, channel_id: &ChannelId) -> Height;

    /// Returns the timestamp of the counterparty at `counterparty_latest_height`.
    fn counterparty_latest_timestamp(&self, port_id: &PortId, channel_id: &ChannelId)
        -> Timestamp;
}

/// A context supplying all the necessary write-only dependencies (i.e., storage writing facility)
/// for processing any `ChannelMsg`.
pub trait ChannelKeeper {
    /// Commits an outbound packet and advances the next send sequence. The relay layer takes it
    /// from there.
    fn store_send_packet_result(&mut self, result: SendPacketResult) -> Result<(), Error>;

    /// Stores an acknowledgement written for a packet received earlier.
    fn store_write_ack_result(&mut self, result: WriteAckPacketResult) -> Result<(), Error>;
}
