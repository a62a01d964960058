use tracing::debug;

use crate::applications::transfer::coin::Coin;
use crate::applications::transfer::context::TokenTransferContext;
use crate::applications::transfer::error::Error;
use crate::applications::transfer::events::DenomEvent;
use crate::applications::transfer::packet::PacketDataV2;
use crate::applications::transfer::relay::{is_blocked, parse_account, unescrow_coin};
use crate::core::ics04_channel::packet::Packet;
use crate::handler::ModuleOutputBuilder;
use crate::prelude::*;

/// Credits the tokens of a received packet and returns the coins credited.
///
/// Tokens this chain sent out earlier come back over the hop they left on: their trace loses
/// that hop and they are released from escrow. All other tokens get the destination hop
/// prepended and are minted as vouchers.
///
/// When the packet is to be forwarded the module account receives the funds in place of the
/// receiver. A failure on any token fails the whole packet; the host discards what was written
/// so far along with the error acknowledgement.
pub fn process_recv_packet<Ctx: TokenTransferContext>(
    ctx: &mut Ctx,
    output: &mut ModuleOutputBuilder,
    packet: &Packet,
    data: &PacketDataV2,
) -> Result<Vec<Coin>, Error> {
    data.validate_basic()?;

    if !ctx.get_params().receive_enabled {
        return Err(Error::receive_disabled());
    }

    let receiver = if data.has_forwarding() {
        ctx.get_module_account()
    } else {
        parse_account::<Ctx>(&data.receiver)?
    };

    if is_blocked(ctx, &receiver) {
        return Err(Error::unauthorized_receive(receiver.to_string()));
    }

    let mut received_coins = Vec::with_capacity(data.tokens.len());
    for token in data.tokens.iter() {
        let amount = token.amount()?;
        let mut denom = token.denom.clone();

        // NOTE: the counterparty prefixed the token with its destination port and channel when
        // it received it from us, which are our source port and channel.
        if denom.has_prefix(&packet.source_port, &packet.source_channel) {
            // sender chain is not the source, unescrow tokens
            denom.remove_prefix();

            let coin = Coin::new(denom.ibc_denom(), amount);
            let escrow_address = ctx
                .get_channel_escrow_address(&packet.destination_port, &packet.destination_channel)?;
            unescrow_coin(ctx, &escrow_address, &receiver, &coin)?;

            debug!(%denom, %coin, %receiver, "received tokens back from a sink zone");
            received_coins.push(coin);
        } else {
            // sender chain is the source, mint vouchers
            denom.add_prefix(
                packet.destination_port.clone(),
                packet.destination_channel.clone(),
            );

            if !ctx.has_denom(&denom.hash()) {
                ctx.set_denom(denom.clone())?;
            }

            let voucher_denom = denom.ibc_denom();
            if !ctx.has_denom_metadata(&voucher_denom) {
                ctx.set_denom_metadata(&denom)?;
            }

            output.emit(DenomEvent {
                denom: denom.clone(),
            });

            let voucher = Coin::new(voucher_denom, amount);
            let module_account = ctx.get_module_account();
            ctx.mint_coins(&module_account, &voucher)?;
            ctx.send_coins(&module_account, &receiver, &voucher)?;

            debug!(%denom, %voucher, %receiver, "minted vouchers from a source zone");
            received_coins.push(voucher);
        }
    }

    Ok(received_coins)
}
