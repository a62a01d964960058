//! This module implements the processing logic for ICS20 (token transfer) message.

use tracing::{debug, error};

use crate::applications::transfer::coin::Coin;
use crate::applications::transfer::context::TokenTransferContext;
use crate::applications::transfer::denom::{Denom, DenomHash};
use crate::applications::transfer::error::Error;
use crate::applications::transfer::packet::PacketDataV2;
use crate::applications::transfer::token::Token;
use crate::applications::transfer::DENOM_PREFIX;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::prelude::*;
use crate::signer::Signer;

pub mod forwarding;
pub mod on_ack_packet;
pub mod on_recv_packet;
pub mod on_timeout_packet;
pub mod send_transfer;

type AccountIdOf<Ctx> = <Ctx as TokenTransferContext>::AccountId;

pub(crate) fn parse_account<Ctx: TokenTransferContext>(
    signer: &Signer,
) -> Result<AccountIdOf<Ctx>, Error> {
    signer
        .clone()
        .try_into()
        .map_err(|_| Error::parse_account_failure(signer.to_string()))
}

/// Like `is_blocked_account`, except that the module account is never blocked: forwarded funds
/// are received, sent on and refunded through it.
pub(crate) fn is_blocked<Ctx: TokenTransferContext>(
    ctx: &Ctx,
    account: &AccountIdOf<Ctx>,
) -> bool {
    *account != ctx.get_module_account() && ctx.is_blocked_account(account)
}

/// Moves `coin` from `sender` into the escrow account and adds it to the escrow total of its
/// denomination. Nothing is written if the sender cannot cover the coin.
pub fn escrow_coin<Ctx: TokenTransferContext>(
    ctx: &mut Ctx,
    sender: &AccountIdOf<Ctx>,
    escrow_address: &AccountIdOf<Ctx>,
    coin: &Coin,
) -> Result<(), Error> {
    let new_total = ctx
        .get_total_escrow_for_denom(&coin.denom)
        .checked_add(coin.amount)
        .ok_or_else(|| Error::escrow_total_overflow(coin.denom.clone()))?;

    ctx.send_coins(sender, escrow_address, coin)?;
    ctx.set_total_escrow_for_denom(&coin.denom, new_total)?;

    debug!(%sender, %escrow_address, %coin, total = %new_total, "escrowed coin");
    Ok(())
}

/// Releases `coin` from the escrow account to `receiver` and deducts it from the escrow total.
///
/// Escrow accounts can only be drained by this module, so any failure here means more is being
/// released than was ever escrowed: it is reported as the fatal `EscrowInvariantViolation`.
///
/// The amount released on receive comes from a counterparty's packet. A counterparty that
/// returns more than it was sent can therefore halt this chain; hosts relying on the escrow
/// account must trust the light client of every channel it backs.
pub fn unescrow_coin<Ctx: TokenTransferContext>(
    ctx: &mut Ctx,
    escrow_address: &AccountIdOf<Ctx>,
    receiver: &AccountIdOf<Ctx>,
    coin: &Coin,
) -> Result<(), Error> {
    let new_total = match ctx
        .get_total_escrow_for_denom(&coin.denom)
        .checked_sub(coin.amount)
    {
        Some(total) => total,
        None => {
            let err = Error::escrow_invariant_violation(
                coin.to_string(),
                "amount exceeds the total in escrow".to_string(),
            );
            error!(%escrow_address, %coin, "{}", err);
            return Err(err);
        }
    };

    if let Err(e) = ctx.send_coins(escrow_address, receiver, coin) {
        let err = Error::escrow_invariant_violation(coin.to_string(), e.detail().to_string());
        error!(%escrow_address, %receiver, %coin, "{}", err);
        return Err(err);
    }
    ctx.set_total_escrow_for_denom(&coin.denom, new_total)?;

    debug!(%escrow_address, %receiver, %coin, total = %new_total, "unescrowed coin");
    Ok(())
}

/// Gives the tokens of a packet that failed back to its sender: vouchers that were burned on
/// send are minted again, escrowed tokens are released.
pub fn refund_packet_tokens<Ctx: TokenTransferContext>(
    ctx: &mut Ctx,
    source_port: &PortId,
    source_channel: &ChannelId,
    data: &PacketDataV2,
) -> Result<(), Error> {
    let sender = parse_account::<Ctx>(&data.sender)?;
    if is_blocked(ctx, &sender) {
        return Err(Error::unauthorized_receive(data.sender.to_string()));
    }

    let escrow_address = ctx.get_channel_escrow_address(source_port, source_channel)?;
    let module_account = ctx.get_module_account();

    for token in data.tokens.iter() {
        let coin = token.to_coin()?;

        // the tokens were burnt when the packet was sent
        if token.denom.has_prefix(source_port, source_channel) {
            ctx.mint_coins(&module_account, &coin)?;

            if let Err(e) = ctx.send_coins(&module_account, &sender, &coin) {
                let err =
                    Error::send_after_module_mint(coin.to_string(), e.detail().to_string());
                error!(%sender, %coin, "{}", err);
                return Err(err);
            }

            debug!(%sender, %coin, "refunded burnt voucher by minting");
        } else {
            unescrow_coin(ctx, &escrow_address, &sender, &coin)?;

            debug!(%sender, %coin, "refunded escrowed coin");
        }
    }

    Ok(())
}

/// Resolves the token a ledger coin stands for. `ibc/{hash}` denominations are looked up in the
/// denomination registry, anything else is native to this chain.
pub fn token_from_coin(ctx: &impl TokenTransferContext, coin: &Coin) -> Result<Token, Error> {
    let hex_hash = match coin
        .denom
        .strip_prefix(DENOM_PREFIX)
        .and_then(|rest| rest.strip_prefix('/'))
    {
        Some(hex_hash) => hex_hash,
        None => return Ok(Token::new(Denom::native(&coin.denom), coin.amount)),
    };

    let hash: DenomHash = hex_hash.parse().map_err(|e: Error| {
        Error::invalid_denom_for_transfer(coin.denom.clone(), e.detail().to_string())
    })?;

    let denom = ctx
        .get_denom(&hash)
        .ok_or_else(|| Error::denom_not_found(hex_hash.to_string()))?;

    Ok(Token::new(denom, coin.amount))
}
