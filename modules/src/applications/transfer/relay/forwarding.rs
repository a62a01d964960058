//! Multi-hop transfers: a chain that receives a packet with forwarding hops sends the received
//! funds on right away, and acknowledges the inbound packet only once the outbound one is
//! settled.

use tracing::{debug, info};

use crate::applications::transfer::acknowledgement::TokenTransferAcknowledgement;
use crate::applications::transfer::coin::Coin;
use crate::applications::transfer::context::TokenTransferContext;
use crate::applications::transfer::error::Error;
use crate::applications::transfer::msgs::transfer::{Forwarding, MsgTransfer};
use crate::applications::transfer::packet::PacketDataV2;
use crate::applications::transfer::relay::escrow_coin;
use crate::applications::transfer::relay::send_transfer::send_transfer;
use crate::core::ics04_channel::handler::write_acknowledgement;
use crate::core::ics04_channel::packet::Packet;
use crate::handler::{HandlerOutput, ModuleOutputBuilder};
use crate::prelude::*;
use crate::signer::Signer;
use crate::Height;

/// Sends the coins received with `packet` on to the first of its forwarding hops, from the
/// module account to the original receiver. The inbound packet is remembered until the outbound
/// one is acknowledged or times out.
pub fn forward_packet<Ctx: TokenTransferContext>(
    ctx: &mut Ctx,
    output: &mut ModuleOutputBuilder,
    packet: &Packet,
    data: &PacketDataV2,
    received_coins: Vec<Coin>,
) -> Result<(), Error> {
    let (next_hop, remaining_hops) = data
        .forwarding
        .hops
        .split_first()
        .ok_or_else(|| Error::invalid_forwarding("no hop to forward to".to_string()))?;

    let forwarding = if remaining_hops.is_empty() {
        None
    } else {
        Some(Forwarding::new(false, remaining_hops.to_vec()))
    };

    let msg = MsgTransfer {
        source_port: next_hop.port_id.clone(),
        source_channel: next_hop.channel_id.clone(),
        tokens: received_coins,
        sender: Signer::new(ctx.get_module_account()),
        receiver: data.receiver.clone(),
        timeout_height: Height::zero(),
        timeout_timestamp: packet.timeout_timestamp,
        memo: data.forwarding.destination_memo.clone(),
        forwarding,
    };

    let sequence = send_transfer(ctx, output, msg)?;

    ctx.set_forwarded_packet(&next_hop.port_id, &next_hop.channel_id, sequence, packet.clone())?;

    info!(
        inbound_sequence = %packet.sequence,
        port_id = %next_hop.port_id,
        channel_id = %next_hop.channel_id,
        %sequence,
        "forwarded received tokens"
    );
    Ok(())
}

/// Undoes the receipt of `forwarded_packet`, whose funds came back to the module account through
/// the refund of the outbound packet described by `data`.
///
/// Each token carries the trace it had on this chain. If its most recent hop is the destination
/// of the inbound packet, it was minted on receipt and is burned. Otherwise it was released from
/// escrow and goes back in.
pub fn revert_forwarded_packet<Ctx: TokenTransferContext>(
    ctx: &mut Ctx,
    forwarded_packet: &Packet,
    data: &PacketDataV2,
) -> Result<(), Error> {
    let module_account = ctx.get_module_account();
    let escrow_address = ctx.get_channel_escrow_address(
        &forwarded_packet.destination_port,
        &forwarded_packet.destination_channel,
    )?;

    for token in data.tokens.iter() {
        let coin = token.to_coin()?;

        if token.denom.has_prefix(
            &forwarded_packet.destination_port,
            &forwarded_packet.destination_channel,
        ) {
            ctx.burn_coins(&module_account, &coin)?;
            debug!(%coin, "burned vouchers of a failed forward");
        } else {
            escrow_coin(ctx, &module_account, &escrow_address, &coin)?;
            debug!(%coin, "escrowed again tokens of a failed forward");
        }
    }

    Ok(())
}

/// Settles the inbound packet once the packet it was forwarded in is acknowledged.
pub fn handle_forwarded_packet_acknowledgement<Ctx: TokenTransferContext>(
    ctx: &mut Ctx,
    output: &mut ModuleOutputBuilder,
    packet: &Packet,
    forwarded_packet: &Packet,
    data: &PacketDataV2,
    ack: &TokenTransferAcknowledgement,
) -> Result<(), Error> {
    let forward_ack = match ack {
        TokenTransferAcknowledgement::Success(_) => TokenTransferAcknowledgement::success(),
        TokenTransferAcknowledgement::Error(err) => {
            // the funds have been refunded to the module account: undo the receipt before
            // propagating the error to the original sender
            revert_forwarded_packet(ctx, forwarded_packet, data)?;
            TokenTransferAcknowledgement::forward_error(packet, err)
        }
    };

    acknowledge_forwarded_packet(ctx, output, packet, forwarded_packet, forward_ack)
}

/// Undoes the receipt of the inbound packet once the packet it was forwarded in timed out, and
/// acknowledges it with an error.
pub fn handle_forwarded_packet_timeout<Ctx: TokenTransferContext>(
    ctx: &mut Ctx,
    output: &mut ModuleOutputBuilder,
    packet: &Packet,
    forwarded_packet: &Packet,
    data: &PacketDataV2,
) -> Result<(), Error> {
    revert_forwarded_packet(ctx, forwarded_packet, data)?;

    let forward_ack = TokenTransferAcknowledgement::forward_timeout(packet);
    acknowledge_forwarded_packet(ctx, output, packet, forwarded_packet, forward_ack)
}

/// Writes the acknowledgement of the inbound packet and forgets about the forward.
fn acknowledge_forwarded_packet<Ctx: TokenTransferContext>(
    ctx: &mut Ctx,
    output: &mut ModuleOutputBuilder,
    packet: &Packet,
    forwarded_packet: &Packet,
    ack: TokenTransferAcknowledgement,
) -> Result<(), Error> {
    info!(
        inbound_sequence = %forwarded_packet.sequence,
        success = ack.is_successful(),
        "acknowledging forwarded packet"
    );

    let HandlerOutput {
        result,
        log,
        events,
    } = write_acknowledgement::process(ctx, forwarded_packet.clone(), ack.into())
        .map_err(Error::ics04_channel)?;

    ctx.store_write_ack_result(result)
        .map_err(Error::ics04_channel)?;

    output.merge_output(
        HandlerOutput::builder()
            .with_log(log)
            .with_events(events)
            .with_result(()),
    );

    ctx.delete_forwarded_packet(&packet.source_port, &packet.source_channel, packet.sequence)
}
