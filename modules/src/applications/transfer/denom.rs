//! Denominations and the route they travelled.

use core::fmt::{Display, Error as FmtError, Formatter};
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle_encoding::hex;

use super::error::Error;
use super::DENOM_PREFIX;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::prelude::*;

/// One `(port, channel)` edge crossed by a token, as seen from the chain that received it.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hop {
    pub port_id: PortId,
    pub channel_id: ChannelId,
}

impl Hop {
    pub fn new(port_id: PortId, channel_id: ChannelId) -> Self {
        Self {
            port_id,
            channel_id,
        }
    }
}

impl Display for Hop {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}/{}", self.port_id, self.channel_id)
    }
}

/// The hops a token travelled, most recent first.
///
/// A trace only grows at the front (the token moves forwards to a new chain) or shrinks by its
/// front element (the token moves back over the hop it arrived on).
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace(Vec<Hop>);

impl Trace {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn new(hops: Vec<Hop>) -> Self {
        Self(hops)
    }

    pub fn hops(&self) -> &[Hop] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The most recent hop, the one the token would travel back over.
    pub fn first(&self) -> Option<&Hop> {
        self.0.first()
    }

    pub fn starts_with(&self, hop: &Hop) -> bool {
        self.0.first() == Some(hop)
    }

    pub fn add_prefix(&mut self, hop: Hop) {
        self.0.insert(0, hop)
    }

    /// Drops the most recent hop, if any.
    pub fn remove_prefix(&mut self) -> Option<Hop> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.remove(0))
        }
    }

    pub fn into_hops(self) -> Vec<Hop> {
        self.0
    }
}

impl From<Vec<Hop>> for Trace {
    fn from(hops: Vec<Hop>) -> Self {
        Self(hops)
    }
}

impl Display for Trace {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        let path = self
            .0
            .iter()
            .map(|hop| hop.to_string())
            .collect::<Vec<_>>()
            .join("/");
        write!(f, "{}", path)
    }
}

/// The SHA-256 of a denomination's full path, used as its on-chain identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DenomHash([u8; 32]);

impl DenomHash {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Display for DenomHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        for byte in self.0.iter() {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for DenomHash {
    type Err = Error;

    /// Parses a hex encoded hash, in either case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode_upper(s.to_ascii_uppercase())
            .map_err(|e| Error::invalid_hex_hash(s.to_string(), e))?;
        let hash: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| Error::invalid_hash_length(s.to_string(), bytes.len()))?;
        Ok(Self(hash))
    }
}

/// A denomination: the base denomination on its issuing chain and the route it travelled.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Denom {
    pub base: String,
    pub trace: Trace,
}

impl Denom {
    /// A denomination native to the chain holding it, i.e. with an empty trace.
    pub fn native(base: impl ToString) -> Self {
        Self {
            base: base.to_string(),
            trace: Trace::empty(),
        }
    }

    pub fn new(base: impl ToString, trace: Vec<Hop>) -> Self {
        Self {
            base: base.to_string(),
            trace: Trace::new(trace),
        }
    }

    /// Splits a full denomination path (`port/channel/.../base`) into its trace and base.
    ///
    /// Leading `port/channel` pairs are consumed while the channel part has the `channel-{N}`
    /// form and at least one element is left for the base denomination. The counterparty may
    /// use another channel identifier format, in which case the remainder ends up in the base
    /// denomination: the token is still handled correctly since its full path, and therefore
    /// its hash, is unchanged.
    pub fn from_path(full_path: &str) -> Self {
        let parts: Vec<&str> = full_path.split('/').collect();
        if parts.len() == 1 {
            return Self::native(full_path);
        }

        let length = parts.len();
        let mut trace = Vec::new();
        let mut base_start = 0;
        let mut i = 0;
        while i < length {
            let is_hop = i + 1 < length
                && length > 2
                && ChannelId::is_channel_format(parts[i + 1]);
            if !is_hop {
                base_start = i;
                break;
            }
            match (parts[i].parse::<PortId>(), parts[i + 1].parse::<ChannelId>()) {
                (Ok(port_id), Ok(channel_id)) => trace.push(Hop::new(port_id, channel_id)),
                _ => {
                    base_start = i;
                    break;
                }
            }
            i += 2;
            base_start = i;
        }

        Self {
            base: parts[base_start..].join("/"),
            trace: Trace::new(trace),
        }
    }

    /// `true` iff the token has never left its issuing chain.
    pub fn is_native(&self) -> bool {
        self.trace.is_empty()
    }

    /// The full path: the hops, most recent first, followed by the base denomination.
    pub fn path(&self) -> String {
        if self.trace.is_empty() {
            self.base.clone()
        } else {
            format!("{}/{}", self.trace, self.base)
        }
    }

    pub fn hash(&self) -> DenomHash {
        let digest = Sha256::digest(self.path().as_bytes());
        let mut hash = [0u8; 32];
        hash.copy_from_slice(digest.as_slice());
        DenomHash(hash)
    }

    /// The denomination the bank knows this token under: the base denomination for native
    /// tokens, `ibc/{HASH}` for vouchers.
    pub fn ibc_denom(&self) -> String {
        if self.is_native() {
            self.base.clone()
        } else {
            format!("{}/{}", DENOM_PREFIX, self.hash())
        }
    }

    /// Returns `true` iff the most recent hop of the trace is `(port_id, channel_id)`.
    ///
    /// On send, this tells whether the token goes back over the hop it arrived on (sink zone).
    /// On receive, checked against the packet's source port and channel, it tells whether the
    /// token returns to the chain it was escrowed on.
    pub fn has_prefix(&self, port_id: &PortId, channel_id: &ChannelId) -> bool {
        self.trace
            .first()
            .map(|hop| &hop.port_id == port_id && &hop.channel_id == channel_id)
            .unwrap_or(false)
    }

    pub fn add_prefix(&mut self, port_id: PortId, channel_id: ChannelId) {
        self.trace.add_prefix(Hop::new(port_id, channel_id))
    }

    pub fn remove_prefix(&mut self) -> Option<Hop> {
        self.trace.remove_prefix()
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.base.trim().is_empty() {
            return Err(Error::empty_base_denom());
        }
        Ok(())
    }
}

impl Display for Denom {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.path())
    }
}

/// Whether `(port_id, channel_id)` would be stripped from `denom` when sent back over it.
///
/// This is the sole predicate deciding between the source and sink roles.
pub fn is_sender_chain_source(port_id: &PortId, channel_id: &ChannelId, denom: &Denom) -> bool {
    !denom.has_prefix(port_id, channel_id)
}

/// Whether the receiving chain issued `denom`, i.e. the token comes back over the hop it left.
pub fn is_receiver_chain_source(
    source_port: &PortId,
    source_channel: &ChannelId,
    denom: &Denom,
) -> bool {
    denom.has_prefix(source_port, source_channel)
}

/// Validates a full denomination path as found in V1 packet data or coin denominations.
///
/// `ibc/{hash}` denominations must carry a valid hash; traced paths must have a non-empty base.
pub fn validate_prefixed_denom(denom: &str) -> Result<(), Error> {
    if denom.trim().is_empty() {
        return Err(Error::empty_base_denom());
    }

    let parts: Vec<&str> = denom.split('/').collect();
    if parts.len() == 2 && parts[0] == DENOM_PREFIX {
        parts[1].parse::<DenomHash>()?;
        return Ok(());
    }

    if parts.iter().any(|part| part.trim().is_empty()) {
        return Err(Error::invalid_denom_for_transfer(
            denom.to_string(),
            "denomination path contains an empty element".to_string(),
        ));
    }

    Denom::from_path(denom).validate()
}
