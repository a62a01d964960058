//! The capabilities the transfer application needs from its host: a bank, an address policy,
//! the channel layer and a few stores of its own.

use core::fmt::Display;
use core::str::FromStr;

use sha2::{Digest, Sha256};

use super::amount::Amount;
use super::coin::Coin;
use super::denom::{Denom, DenomHash};
use super::error::Error;
use super::params::Params;
use super::{DENOM_PREFIX, VERSION};
use crate::core::ics04_channel::context::{ChannelKeeper, ChannelReader};
use crate::core::ics04_channel::packet::{Packet, Sequence};
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::prelude::*;
use crate::signer::Signer;

pub trait BankKeeper {
    type AccountId;

    /// Moves `amt` from one account to another. Fails if `from` cannot cover it.
    fn send_coins(
        &mut self,
        from: &Self::AccountId,
        to: &Self::AccountId,
        amt: &Coin,
    ) -> Result<(), Error>;

    /// Creates `amt` in `account`.
    fn mint_coins(&mut self, account: &Self::AccountId, amt: &Coin) -> Result<(), Error>;

    /// Destroys `amt` held by `account`.
    fn burn_coins(&mut self, account: &Self::AccountId, amt: &Coin) -> Result<(), Error>;

    /// Returns false if the bank disabled sends of this coin's denomination.
    fn is_send_enabled_coin(&self, coin: &Coin) -> bool;

    fn has_denom_metadata(&self, denom: &str) -> bool;

    /// Registers bank metadata for a voucher denomination minted for the first time.
    fn set_denom_metadata(&mut self, denom: &Denom) -> Result<(), Error>;
}

pub trait TokenTransferReader: ChannelReader {
    type AccountId: TryFrom<Signer> + Clone + Display;

    fn get_params(&self) -> Params;

    /// The account of the transfer module itself. Vouchers are minted into and burned from it,
    /// and forwarded funds pass through it.
    fn get_module_account(&self) -> <Self as TokenTransferReader>::AccountId;

    /// Returns the escrow account id for a port and channel combination
    fn get_channel_escrow_address(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<<Self as TokenTransferReader>::AccountId, Error>;

    /// Returns true for accounts that must neither send nor receive transfers, e.g. module
    /// accounts. The transfer module account is exempt whatever this returns for it, as
    /// forwarded funds pass through it.
    fn is_blocked_account(&self, account: &<Self as TokenTransferReader>::AccountId) -> bool;

    /// Looks a denomination up in the registry of vouchers minted by this chain.
    fn get_denom(&self, hash: &DenomHash) -> Option<Denom>;

    fn has_denom(&self, hash: &DenomHash) -> bool {
        self.get_denom(hash).is_some()
    }

    /// The amount of `denom` currently held in escrow, across all channels.
    fn get_total_escrow_for_denom(&self, denom: &str) -> Amount;

    /// Returns the inbound packet whose funds were forwarded in the outbound packet
    /// `(port_id, channel_id, sequence)`.
    fn get_forwarded_packet(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Option<Packet>;
}

pub trait TokenTransferKeeper:
    ChannelKeeper + BankKeeper<AccountId = <Self as TokenTransferKeeper>::AccountId>
{
    type AccountId;

    fn set_denom(&mut self, denom: Denom) -> Result<(), Error>;

    fn set_total_escrow_for_denom(&mut self, denom: &str, amount: Amount) -> Result<(), Error>;

    fn set_forwarded_packet(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
        packet: Packet,
    ) -> Result<(), Error>;

    fn delete_forwarded_packet(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Result<(), Error>;
}

/// Captures all the dependencies which the ICS20 module requires to be able to dispatch and
/// process IBC messages.
pub trait TokenTransferContext:
    TokenTransferKeeper<AccountId = <Self as TokenTransferContext>::AccountId>
    + TokenTransferReader<AccountId = <Self as TokenTransferContext>::AccountId>
{
    type AccountId: TryFrom<Signer> + Clone + Display + PartialEq;
}

// https://github.com/cosmos/cosmos-sdk/blob/master/docs/architecture/adr-028-public-key-addresses.md
pub fn cosmos_adr028_escrow_address(port_id: &PortId, channel_id: &ChannelId) -> Vec<u8> {
    let contents = format!("{}/{}", port_id, channel_id);

    let mut hasher = Sha256::new();
    hasher.update(VERSION.as_bytes());
    hasher.update([0]);
    hasher.update(contents.as_bytes());

    let mut hash = hasher.finalize().to_vec();
    hash.truncate(20);
    hash
}

/// The address of a module account as derived by the Cosmos SDK: the first 20 bytes of the
/// SHA-256 hash of the module name.
pub fn cosmos_module_address(module_name: &str) -> Vec<u8> {
    let mut hash = Sha256::digest(module_name.as_bytes()).to_vec();
    hash.truncate(20);
    hash
}

/// The total amount of `denom` held in escrow by this chain.
pub fn total_escrow_for_denom(ctx: &impl TokenTransferReader, denom: &str) -> Coin {
    Coin::new(denom, ctx.get_total_escrow_for_denom(denom))
}

/// Resolves a voucher denomination from its hash, given either as `{hash}` or `ibc/{hash}`.
pub fn denom_by_hash(ctx: &impl TokenTransferReader, hash: &str) -> Result<Denom, Error> {
    let hex_hash = hash
        .strip_prefix(DENOM_PREFIX)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(hash);

    let denom_hash = DenomHash::from_str(hex_hash)?;

    ctx.get_denom(&denom_hash)
        .ok_or_else(|| Error::denom_not_found(hex_hash.to_string()))
}
