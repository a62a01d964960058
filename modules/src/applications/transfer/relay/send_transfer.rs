use tracing::{debug, error, info};

use crate::applications::transfer::context::TokenTransferContext;
use crate::applications::transfer::error::Error;
use crate::applications::transfer::events::TransferEvent;
use crate::applications::transfer::msgs::transfer::{Forwarding, MsgTransfer};
use crate::applications::transfer::packet::create_packet_data_bytes;
use crate::applications::transfer::relay::{
    escrow_coin, is_blocked, parse_account, token_from_coin,
};
use crate::applications::transfer::token::Tokens;
use crate::applications::transfer::V1;
use crate::core::ics04_channel::handler::send_packet::send_packet;
use crate::core::ics04_channel::packet::{Packet, Sequence};
use crate::events::ModuleEvent;
use crate::handler::{HandlerOutput, HandlerOutputBuilder};
use crate::prelude::*;

/// Sends the tokens of `msg` to the chain at the other end of its source channel and returns
/// the sequence of the packet carrying them.
///
/// Tokens whose most recent hop is the source channel go back where they came from: this chain
/// is the sink, the vouchers are burned. All other tokens move forward in their timeline: this
/// chain is the source, the tokens are escrowed.
///
/// Everything that can be rejected is checked before the first token moves.
pub fn send_transfer<Ctx>(
    ctx: &mut Ctx,
    output: &mut HandlerOutputBuilder<()>,
    msg: MsgTransfer,
) -> Result<Sequence, Error>
where
    Ctx: TokenTransferContext,
{
    msg.validate_basic()?;

    let params = ctx.get_params();
    if !params.send_enabled {
        return Err(Error::send_disabled());
    }

    let sender = parse_account::<Ctx>(&msg.sender)?;
    if is_blocked(ctx, &sender) {
        return Err(Error::unauthorized_send(msg.sender.to_string()));
    }

    let tokens = msg
        .tokens
        .iter()
        .map(|coin| token_from_coin(ctx, coin))
        .collect::<Result<Tokens, Error>>()?;

    let msg = if msg.should_unwind() {
        unwind(msg, &tokens)?
    } else {
        msg
    };

    let source_channel_end = ctx
        .channel_end(&msg.source_port, &msg.source_channel)
        .map_err(Error::ics04_channel)?;

    let version = source_channel_end.version().clone();
    if version.as_str() == V1 && msg.forwarding.is_some() {
        return Err(Error::invalid_request(format!(
            "cannot forward or unwind coins with {}",
            V1
        )));
    }

    let destination_port = source_channel_end.counterparty().port_id.clone();
    let destination_channel = source_channel_end
        .counterparty()
        .channel_id
        .clone()
        .ok_or_else(|| {
            Error::destination_channel_not_found(
                msg.source_port.clone(),
                msg.source_channel.clone(),
            )
        })?;

    // NOTE: the packet carries the denominations as they are on this chain. The receiving chain
    // prefixes them as necessary.
    let data = create_packet_data_bytes(
        &version,
        &msg.sender,
        &msg.receiver,
        &msg.memo,
        &tokens,
        msg.forwarding_hops(),
    )?;

    let sequence = ctx
        .get_next_sequence_send(&msg.source_port, &msg.source_channel)
        .map_err(Error::ics04_channel)?;

    let packet = Packet {
        sequence,
        source_port: msg.source_port.clone(),
        source_channel: msg.source_channel.clone(),
        destination_port,
        destination_channel,
        data,
        timeout_height: msg.timeout_height,
        timeout_timestamp: msg.timeout_timestamp,
    };

    let HandlerOutput {
        result,
        log,
        events,
    } = send_packet(ctx, packet).map_err(Error::ics04_channel)?;

    let coins = tokens
        .iter()
        .map(|token| token.to_coin())
        .collect::<Result<Vec<_>, Error>>()?;

    if let Some(coin) = coins.iter().find(|coin| !ctx.is_send_enabled_coin(coin)) {
        return Err(Error::send_disabled_for_denom(coin.denom.clone()));
    }

    let escrow_address = ctx.get_channel_escrow_address(&msg.source_port, &msg.source_channel)?;
    let module_account = ctx.get_module_account();

    for (token, coin) in tokens.iter().zip(coins.iter()) {
        // if the denom is prefixed by the port and channel on which we are sending
        // the token, then we must be returning the token back to the chain they originated from
        if token.denom.has_prefix(&msg.source_port, &msg.source_channel) {
            debug!(denom = %token.denom, "sink zone: burning vouchers");

            ctx.send_coins(&sender, &module_account, coin)?;

            if let Err(e) = ctx.burn_coins(&module_account, coin) {
                let err =
                    Error::burn_after_module_deposit(coin.to_string(), e.detail().to_string());
                error!(%sender, %coin, "{}", err);
                return Err(err);
            }
        } else {
            debug!(denom = %token.denom, "source zone: escrowing tokens");

            escrow_coin(ctx, &sender, &escrow_address, coin)?;
        }
    }

    ctx.store_send_packet_result(result)
        .map_err(Error::ics04_channel)?;

    output.merge_output(
        HandlerOutput::builder()
            .with_log(log)
            .with_events(events)
            .with_result(()),
    );

    let tokens_str = tokens
        .iter()
        .map(|token| token.to_string())
        .collect::<Vec<_>>()
        .join(",");
    info!(
        sender = %msg.sender,
        receiver = %msg.receiver,
        tokens = %tokens_str,
        %sequence,
        "sent fungible token transfer"
    );
    output.log(format!(
        "IBC fungible token transfer: {} --({})--> {}",
        msg.sender, tokens_str, msg.receiver
    ));

    let transfer_event = TransferEvent {
        sender: msg.sender,
        receiver: msg.receiver,
        tokens,
        memo: msg.memo,
        forwarding_hops: msg
            .forwarding
            .map(|forwarding| forwarding.hops)
            .unwrap_or_default(),
    };
    output.emit(ModuleEvent::from(transfer_event));

    Ok(sequence)
}

/// Rewrites an unwinding transfer so that it leaves over the most recent hop of the tokens'
/// trace and is forwarded back along the rest of it before the requested hops.
fn unwind(mut msg: MsgTransfer, tokens: &Tokens) -> Result<MsgTransfer, Error> {
    let trace = match tokens.first() {
        Some(token) => token.denom.trace.clone(),
        None => return Err(Error::empty_tokens()),
    };

    if trace.is_empty() {
        return Err(Error::invalid_forwarding(
            "cannot unwind a native token".to_string(),
        ));
    }

    if tokens.iter().any(|token| token.denom.trace != trace) {
        return Err(Error::invalid_forwarding(
            "cannot unwind tokens with different traces".to_string(),
        ));
    }

    let mut hops = trace.into_hops();
    let first_hop = hops.remove(0);
    hops.extend(
        msg.forwarding
            .take()
            .map(|forwarding| forwarding.hops)
            .unwrap_or_default(),
    );

    msg.source_port = first_hop.port_id;
    msg.source_channel = first_hop.channel_id;
    msg.forwarding = if hops.is_empty() {
        None
    } else {
        Some(Forwarding::new(false, hops))
    };

    msg.validate_basic()?;
    Ok(msg)
}
