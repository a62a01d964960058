//! Implementation of a host chain mock. Used in testing the transfer application against a bank
//! and a channel layer.

use alloc::collections::{BTreeMap, BTreeSet};

use subtle_encoding::bech32;

use crate::applications::transfer::amount::Amount;
use crate::applications::transfer::coin::Coin;
use crate::applications::transfer::context::{
    cosmos_adr028_escrow_address, cosmos_module_address, BankKeeper, TokenTransferContext,
    TokenTransferKeeper, TokenTransferReader,
};
use crate::applications::transfer::denom::{Denom, DenomHash};
use crate::applications::transfer::error::Error as TokenTransferError;
use crate::applications::transfer::params::Params;
use crate::applications::transfer::MODULE_ID_STR;
use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, State};
use crate::core::ics04_channel::context::{ChannelKeeper, ChannelReader};
use crate::core::ics04_channel::error::Error as ChannelError;
use crate::core::ics04_channel::handler::send_packet::SendPacketResult;
use crate::core::ics04_channel::handler::write_acknowledgement::WriteAckPacketResult;
use crate::core::ics04_channel::msgs::acknowledgement::Acknowledgement;
use crate::core::ics04_channel::packet::{Packet, Sequence};
use crate::core::ics04_channel::Version;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::prelude::*;
use crate::signer::Signer;
use crate::timestamp::Timestamp;
use crate::Height;

/// Human readable part of the addresses of the mock chain.
const ACCOUNT_PREFIX: &str = "cosmos";

type PacketKey = (PortId, ChannelId, Sequence);

/// A context implementing the dependencies of the transfer application: a bank with balances
/// and supply per denomination, the channel ends and packet stores of the channel layer, and the
/// stores of the transfer module.
#[derive(Clone, Debug, PartialEq)]
pub struct MockContext {
    /// Module parameters.
    params: Params,

    /// Account balances, indexed by account and ledger denomination.
    balances: BTreeMap<(Signer, String), Amount>,

    /// Total amount in circulation of each ledger denomination.
    supply: BTreeMap<String, Amount>,

    /// Accounts which may neither send nor receive transfers.
    blocked_accounts: BTreeSet<Signer>,

    /// Ledger denominations the bank refuses to send.
    send_disabled_denoms: BTreeSet<String>,

    /// Makes every burn fail, to exercise the fatal path of the sink zone.
    fail_burns: bool,

    /// Bank metadata of the vouchers minted so far.
    denom_metadata: BTreeMap<String, Denom>,

    /// The denomination registry of the transfer module.
    denoms: BTreeMap<DenomHash, Denom>,

    /// The total amount held in escrow of each ledger denomination.
    total_escrow: BTreeMap<String, Amount>,

    /// Inbound packets waiting on the outbound packet their funds were forwarded in.
    forwarded_packets: BTreeMap<PacketKey, Packet>,

    /// All the channels in the store.
    channels: BTreeMap<(PortId, ChannelId), ChannelEnd>,

    /// Tracks the sequence number for the next packet to be sent.
    next_sequence_send: BTreeMap<(PortId, ChannelId), Sequence>,

    /// The packets committed by `send_packet`.
    sent_packets: BTreeMap<PacketKey, Packet>,

    /// The acknowledgements written for received packets.
    acknowledgements: BTreeMap<PacketKey, Acknowledgement>,

    /// Latest height of the counterparty chains, as seen by their light clients.
    counterparty_height: Height,

    /// Timestamp of the counterparty chains at `counterparty_height`.
    counterparty_timestamp: Timestamp,
}

/// Returns a MockContext with bare minimum initialization: no channels, no accounts and
/// transfers enabled in both directions.
impl Default for MockContext {
    fn default() -> Self {
        Self {
            params: Params::default(),
            balances: BTreeMap::new(),
            supply: BTreeMap::new(),
            blocked_accounts: BTreeSet::new(),
            send_disabled_denoms: BTreeSet::new(),
            fail_burns: false,
            denom_metadata: BTreeMap::new(),
            denoms: BTreeMap::new(),
            total_escrow: BTreeMap::new(),
            forwarded_packets: BTreeMap::new(),
            channels: BTreeMap::new(),
            next_sequence_send: BTreeMap::new(),
            sent_packets: BTreeMap::new(),
            acknowledgements: BTreeMap::new(),
            counterparty_height: Height::zero(),
            counterparty_timestamp: Timestamp::none(),
        }
    }
}

/// Implementation of internal interface for use in testing. The methods in this interface should
/// _not_ be accessible to any handler.
impl MockContext {
    /// Associates an open channel end to this context, ready to send its first packet.
    pub fn with_channel(
        mut self,
        port_id: PortId,
        channel_id: ChannelId,
        counterparty_port_id: PortId,
        counterparty_channel_id: ChannelId,
        version: &str,
    ) -> Self {
        let channel_end = ChannelEnd::new(
            State::Open,
            Counterparty::new(counterparty_port_id, Some(counterparty_channel_id)),
            Version::new(version),
        );
        self.channels
            .insert((port_id.clone(), channel_id.clone()), channel_end);
        self.next_sequence_send
            .insert((port_id, channel_id), Sequence::from(1));
        self
    }

    pub fn with_counterparty_height(mut self, height: Height) -> Self {
        self.counterparty_height = height;
        self
    }

    pub fn with_counterparty_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.counterparty_timestamp = timestamp;
        self
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Credits `coin` to `account`, as if it had been minted there.
    pub fn with_balance(mut self, account: &Signer, coin: Coin) -> Self {
        self.credit(account, &coin);
        let supply = self.supply(&coin.denom) + coin.amount;
        self.supply.insert(coin.denom, supply);
        self
    }

    pub fn with_blocked_account(mut self, account: &Signer) -> Self {
        self.blocked_accounts.insert(account.clone());
        self
    }

    pub fn with_send_disabled_denom(mut self, denom: &str) -> Self {
        self.send_disabled_denoms.insert(denom.to_string());
        self
    }

    pub fn with_failing_burns(mut self) -> Self {
        self.fail_burns = true;
        self
    }

    /// The balance of `account` in the ledger denomination `denom`.
    pub fn balance(&self, account: &Signer, denom: &str) -> Amount {
        self.balances
            .get(&(account.clone(), denom.to_string()))
            .copied()
            .unwrap_or_default()
    }

    /// The amount of `denom` in circulation.
    pub fn supply(&self, denom: &str) -> Amount {
        self.supply.get(denom).copied().unwrap_or_default()
    }

    /// The packet committed on `(port_id, channel_id)` with `sequence`, if any.
    pub fn sent_packet(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Option<Packet> {
        self.sent_packets
            .get(&(port_id.clone(), channel_id.clone(), sequence))
            .cloned()
    }

    /// All the packets committed so far.
    pub fn sent_packets(&self) -> impl Iterator<Item = &Packet> {
        self.sent_packets.values()
    }

    /// The most recent packet committed on `(port_id, channel_id)`.
    pub fn last_sent_packet(&self, port_id: &PortId, channel_id: &ChannelId) -> Option<Packet> {
        self.sent_packets
            .iter()
            .rev()
            .find(|((port, channel, _), _)| port == port_id && channel == channel_id)
            .map(|(_, packet)| packet.clone())
    }

    fn credit(&mut self, account: &Signer, coin: &Coin) {
        let balance = self.balance(account, &coin.denom) + coin.amount;
        self.balances
            .insert((account.clone(), coin.denom.clone()), balance);
    }

    fn debit(&mut self, account: &Signer, coin: &Coin) -> Result<(), TokenTransferError> {
        let key = (account.clone(), coin.denom.clone());
        let balance = self.balances.get(&key).copied().unwrap_or_default();
        let remaining = balance.checked_sub(coin.amount).ok_or_else(|| {
            TokenTransferError::insufficient_funds(account.to_string(), coin.to_string())
        })?;

        if remaining.is_zero() {
            self.balances.remove(&key);
        } else {
            self.balances.insert(key, remaining);
        }
        Ok(())
    }

    fn address(bytes: Vec<u8>) -> Signer {
        Signer::new(bech32::encode(ACCOUNT_PREFIX, bytes))
    }
}

impl ChannelReader for MockContext {
    fn channel_end(&self, port_id: &PortId, channel_id: &ChannelId) -> Result<ChannelEnd, ChannelError> {
        self.channels
            .get(&(port_id.clone(), channel_id.clone()))
            .cloned()
            .ok_or_else(|| ChannelError::channel_not_found(port_id.clone(), channel_id.clone()))
    }

    fn get_next_sequence_send(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Sequence, ChannelError> {
        self.next_sequence_send
            .get(&(port_id.clone(), channel_id.clone()))
            .copied()
            .ok_or_else(|| ChannelError::missing_next_send_seq(port_id.clone(), channel_id.clone()))
    }

    fn get_packet_acknowledgement(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Option<Acknowledgement> {
        self.acknowledgements
            .get(&(port_id.clone(), channel_id.clone(), sequence))
            .cloned()
    }

    fn counterparty_latest_height(&self, _port_id: &PortId, _channel_id: &ChannelId) -> Height {
        self.counterparty_height
    }

    fn counterparty_latest_timestamp(
        &self,
        _port_id: &PortId,
        _channel_id: &ChannelId,
    ) -> Timestamp {
        self.counterparty_timestamp
    }
}

impl ChannelKeeper for MockContext {
    fn store_send_packet_result(&mut self, result: SendPacketResult) -> Result<(), ChannelError> {
        self.next_sequence_send.insert(
            (result.port_id.clone(), result.channel_id.clone()),
            result.seq_number,
        );
        self.sent_packets
            .insert((result.port_id, result.channel_id, result.seq), result.packet);
        Ok(())
    }

    fn store_write_ack_result(&mut self, result: WriteAckPacketResult) -> Result<(), ChannelError> {
        self.acknowledgements
            .insert((result.port_id, result.channel_id, result.seq), result.ack);
        Ok(())
    }
}

impl BankKeeper for MockContext {
    type AccountId = Signer;

    fn send_coins(
        &mut self,
        from: &Self::AccountId,
        to: &Self::AccountId,
        amt: &Coin,
    ) -> Result<(), TokenTransferError> {
        self.debit(from, amt)?;
        self.credit(to, amt);
        Ok(())
    }

    fn mint_coins(&mut self, account: &Self::AccountId, amt: &Coin) -> Result<(), TokenTransferError> {
        let supply = self.supply(&amt.denom) + amt.amount;
        self.supply.insert(amt.denom.clone(), supply);
        self.credit(account, amt);
        Ok(())
    }

    fn burn_coins(&mut self, account: &Self::AccountId, amt: &Coin) -> Result<(), TokenTransferError> {
        if self.fail_burns {
            return Err(TokenTransferError::insufficient_funds(
                account.to_string(),
                amt.to_string(),
            ));
        }

        self.debit(account, amt)?;
        let supply = self.supply(&amt.denom) - amt.amount;
        if supply.is_zero() {
            self.supply.remove(&amt.denom);
        } else {
            self.supply.insert(amt.denom.clone(), supply);
        }
        Ok(())
    }

    fn is_send_enabled_coin(&self, coin: &Coin) -> bool {
        !self.send_disabled_denoms.contains(&coin.denom)
    }

    fn has_denom_metadata(&self, denom: &str) -> bool {
        self.denom_metadata.contains_key(denom)
    }

    fn set_denom_metadata(&mut self, denom: &Denom) -> Result<(), TokenTransferError> {
        self.denom_metadata.insert(denom.ibc_denom(), denom.clone());
        Ok(())
    }
}

impl TokenTransferReader for MockContext {
    type AccountId = Signer;

    fn get_params(&self) -> Params {
        self.params
    }

    fn get_module_account(&self) -> Signer {
        Self::address(cosmos_module_address(MODULE_ID_STR))
    }

    fn get_channel_escrow_address(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Signer, TokenTransferError> {
        Ok(Self::address(cosmos_adr028_escrow_address(
            port_id, channel_id,
        )))
    }

    fn is_blocked_account(&self, account: &Signer) -> bool {
        self.blocked_accounts.contains(account)
    }

    fn get_denom(&self, hash: &DenomHash) -> Option<Denom> {
        self.denoms.get(hash).cloned()
    }

    fn get_total_escrow_for_denom(&self, denom: &str) -> Amount {
        self.total_escrow.get(denom).copied().unwrap_or_default()
    }

    fn get_forwarded_packet(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Option<Packet> {
        self.forwarded_packets
            .get(&(port_id.clone(), channel_id.clone(), sequence))
            .cloned()
    }
}

impl TokenTransferKeeper for MockContext {
    type AccountId = Signer;

    fn set_denom(&mut self, denom: Denom) -> Result<(), TokenTransferError> {
        self.denoms.insert(denom.hash(), denom);
        Ok(())
    }

    fn set_total_escrow_for_denom(
        &mut self,
        denom: &str,
        amount: Amount,
    ) -> Result<(), TokenTransferError> {
        if amount.is_zero() {
            self.total_escrow.remove(denom);
        } else {
            self.total_escrow.insert(denom.to_string(), amount);
        }
        Ok(())
    }

    fn set_forwarded_packet(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
        packet: Packet,
    ) -> Result<(), TokenTransferError> {
        self.forwarded_packets
            .insert((port_id.clone(), channel_id.clone(), sequence), packet);
        Ok(())
    }

    fn delete_forwarded_packet(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Result<(), TokenTransferError> {
        self.forwarded_packets
            .remove(&(port_id.clone(), channel_id.clone(), sequence))
            .map(|_| ())
            .ok_or_else(|| {
                TokenTransferError::forwarded_packet_not_found(
                    port_id.clone(),
                    channel_id.clone(),
                    sequence.value(),
                )
            })
    }
}

impl TokenTransferContext for MockContext {
    type AccountId = Signer;
}
