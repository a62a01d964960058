use tracing::debug;

use crate::applications::transfer::acknowledgement::TokenTransferAcknowledgement;
use crate::applications::transfer::context::TokenTransferContext;
use crate::applications::transfer::error::Error;
use crate::applications::transfer::packet::PacketDataV2;
use crate::applications::transfer::relay::refund_packet_tokens;
use crate::core::ics04_channel::packet::Packet;

/// Refunds the sender if the counterparty could not process the packet. A successful
/// acknowledgement requires nothing more.
pub fn process_ack_packet(
    ctx: &mut impl TokenTransferContext,
    packet: &Packet,
    data: &PacketDataV2,
    ack: &TokenTransferAcknowledgement,
) -> Result<(), Error> {
    if let TokenTransferAcknowledgement::Error(err) = ack {
        debug!(sequence = %packet.sequence, error = %err, "transfer failed on the counterparty, refunding");
        refund_packet_tokens(ctx, &packet.source_port, &packet.source_channel, data)?;
    }

    Ok(())
}
