use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::events::WriteAcknowledgement;
use crate::core::ics04_channel::msgs::acknowledgement::Acknowledgement;
use crate::core::ics04_channel::packet::{Packet, Sequence};
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::handler::{HandlerOutput, HandlerResult};
use crate::prelude::*;

#[derive(Clone, Debug)]
pub struct WriteAckPacketResult {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub seq: Sequence,
    pub ack: Acknowledgement,
}

/// Validates an acknowledgement written for `packet` after it was received, possibly long after
/// (asynchronous acknowledgements).
pub fn process(
    ctx: &impl ChannelReader,
    packet: Packet,
    ack: Acknowledgement,
) -> HandlerResult<WriteAckPacketResult, Error> {
    let mut output = HandlerOutput::builder();

    // The acknowledgement is stored on the receiving end, keyed by the destination port and
    // channel of the packet.
    ctx.channel_end(&packet.destination_port, &packet.destination_channel)?;

    if ctx
        .get_packet_acknowledgement(
            &packet.destination_port,
            &packet.destination_channel,
            packet.sequence,
        )
        .is_some()
    {
        return Err(Error::acknowledgement_exists(packet.sequence));
    }

    let result = WriteAckPacketResult {
        port_id: packet.destination_port.clone(),
        channel_id: packet.destination_channel.clone(),
        seq: packet.sequence,
        ack: ack.clone(),
    };

    output.log("success: packet write acknowledgement");

    output.emit(WriteAcknowledgement { packet, ack });

    Ok(output.with_result(result))
}
