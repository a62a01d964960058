use tracing::debug;

use crate::applications::transfer::context::TokenTransferContext;
use crate::applications::transfer::error::Error;
use crate::applications::transfer::packet::PacketDataV2;
use crate::applications::transfer::relay::refund_packet_tokens;
use crate::core::ics04_channel::packet::Packet;

pub fn process_timeout_packet(
    ctx: &mut impl TokenTransferContext,
    packet: &Packet,
    data: &PacketDataV2,
) -> Result<(), Error> {
    debug!(sequence = %packet.sequence, "transfer timed out, refunding");
    refund_packet_tokens(ctx, &packet.source_port, &packet.source_channel, data)
}
