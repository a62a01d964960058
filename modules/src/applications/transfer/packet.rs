//! Wire payloads of transfer packets, in their two versions.

use core::fmt::{Display, Error as FmtError, Formatter};

use serde::{Deserialize, Serialize};

use super::denom::{validate_prefixed_denom, Denom, Hop};
use super::error::Error;
use super::token::{Token, Tokens};
use super::{
    MAXIMUM_MEMO_LENGTH, MAXIMUM_NUMBER_OF_FORWARDING_HOPS, MAXIMUM_RECEIVER_LENGTH, V1, V2,
};
use crate::core::ics04_channel::Version;
use crate::prelude::*;
use crate::signer::Signer;

/// V1 packet data: a single token whose denomination travels as a flat path string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketData {
    pub denom: String,
    pub amount: String,
    pub sender: Signer,
    pub receiver: Signer,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub memo: String,
}

impl PacketData {
    pub fn validate_basic(&self) -> Result<(), Error> {
        let amount: super::Amount = self.amount.parse()?;
        if amount.is_zero() {
            return Err(Error::non_positive_amount(self.amount.clone()));
        }
        validate_addresses_and_memo(&self.sender, &self.receiver, &self.memo)?;
        validate_prefixed_denom(&self.denom)
    }
}

/// The remaining route of a transfer that is forwarded after being received.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardingPacketData {
    /// The memo delivered with the transfer on the final hop.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub destination_memo: String,
    #[serde(default)]
    pub hops: Vec<Hop>,
}

impl ForwardingPacketData {
    pub fn new(destination_memo: impl ToString, hops: Vec<Hop>) -> Self {
        Self {
            destination_memo: destination_memo.to_string(),
            hops,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty() && self.destination_memo.is_empty()
    }

    pub fn validate(&self) -> Result<(), Error> {
        validate_hops(&self.hops)?;

        if self.destination_memo.len() > MAXIMUM_MEMO_LENGTH {
            return Err(Error::memo_too_long(
                self.destination_memo.len(),
                MAXIMUM_MEMO_LENGTH,
            ));
        }

        if self.hops.is_empty() && !self.destination_memo.is_empty() {
            return Err(Error::invalid_forwarding(
                "memo specified when forwarding hops is empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// V2 packet data: several tokens with structured denominations and an optional forwarding
/// route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketDataV2 {
    pub tokens: Tokens,
    pub sender: Signer,
    pub receiver: Signer,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub memo: String,
    #[serde(default, skip_serializing_if = "ForwardingPacketData::is_empty")]
    pub forwarding: ForwardingPacketData,
}

impl PacketDataV2 {
    pub fn has_forwarding(&self) -> bool {
        !self.forwarding.hops.is_empty()
    }

    pub fn validate_basic(&self) -> Result<(), Error> {
        if self.tokens.is_empty() {
            return Err(Error::empty_tokens());
        }

        for token in self.tokens.iter() {
            token.validate()?;
        }

        validate_addresses_and_memo(&self.sender, &self.receiver, &self.memo)?;

        self.forwarding.validate()?;

        // The memo of a forwarded transfer travels in the forwarding data until the last hop.
        if self.has_forwarding() && !self.memo.is_empty() {
            return Err(Error::invalid_forwarding(
                "memo must be empty if forwarding path hops is not empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl TryFrom<PacketData> for PacketDataV2 {
    type Error = Error;

    fn try_from(data: PacketData) -> Result<Self, Self::Error> {
        data.validate_basic()?;

        Ok(Self {
            tokens: vec![Token::new(Denom::from_path(&data.denom), data.amount)],
            sender: data.sender,
            receiver: data.receiver,
            memo: data.memo,
            forwarding: ForwardingPacketData::default(),
        })
    }
}

impl Display for PacketDataV2 {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        let tokens = self
            .tokens
            .iter()
            .map(|token| token.to_string())
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "{} --({})--> {}", self.sender, tokens, self.receiver)
    }
}

fn validate_addresses_and_memo(sender: &Signer, receiver: &Signer, memo: &str) -> Result<(), Error> {
    if sender.is_empty() {
        return Err(Error::invalid_request("sender address cannot be blank".to_string()));
    }

    if receiver.is_empty() {
        return Err(Error::empty_receiver());
    }

    if receiver.as_str().len() > MAXIMUM_RECEIVER_LENGTH {
        return Err(Error::receiver_too_long(
            receiver.as_str().len(),
            MAXIMUM_RECEIVER_LENGTH,
        ));
    }

    if memo.len() > MAXIMUM_MEMO_LENGTH {
        return Err(Error::memo_too_long(memo.len(), MAXIMUM_MEMO_LENGTH));
    }

    Ok(())
}

pub(crate) fn validate_hops(hops: &[Hop]) -> Result<(), Error> {
    if hops.len() > MAXIMUM_NUMBER_OF_FORWARDING_HOPS {
        return Err(Error::invalid_forwarding(format!(
            "number of hops in forwarding path cannot exceed {}",
            MAXIMUM_NUMBER_OF_FORWARDING_HOPS
        )));
    }
    Ok(())
}

/// Decodes packet data according to the version negotiated on the channel, normalizing V1
/// payloads to the V2 shape.
pub fn decode_packet_data(version: &Version, bytes: &[u8]) -> Result<PacketDataV2, Error> {
    match version.as_str() {
        V1 => {
            let data = serde_json::from_slice::<PacketData>(bytes)
                .map_err(|_| Error::packet_data_deserialization())?;
            PacketDataV2::try_from(data)
        }
        V2 => serde_json::from_slice::<PacketDataV2>(bytes)
            .map_err(|_| Error::packet_data_deserialization()),
        _ => Err(Error::unsupported_version(version.clone())),
    }
}

/// Creates the bytes of an outbound packet for the version negotiated on the channel.
///
/// V1 can only carry one token and no forwarding route. With V2, if forwarding hops are given,
/// the memo is moved into the forwarding data and the top level memo is left empty.
pub fn create_packet_data_bytes(
    version: &Version,
    sender: &Signer,
    receiver: &Signer,
    memo: &str,
    tokens: &[Token],
    hops: &[Hop],
) -> Result<Vec<u8>, Error> {
    match version.as_str() {
        V1 => {
            if tokens.len() != 1 {
                return Err(Error::invalid_request(format!(
                    "cannot transfer multiple coins with {}",
                    V1
                )));
            }

            if !hops.is_empty() {
                return Err(Error::invalid_request(format!(
                    "cannot forward coins with {}",
                    V1
                )));
            }

            let token = &tokens[0];
            let data = PacketData {
                denom: token.denom.path(),
                amount: token.amount.clone(),
                sender: sender.clone(),
                receiver: receiver.clone(),
                memo: memo.to_string(),
            };
            data.validate_basic()?;

            serde_json::to_vec(&data).map_err(|_| Error::packet_data_serialization())
        }
        V2 => {
            let (memo, forwarding) = if hops.is_empty() {
                (memo.to_string(), ForwardingPacketData::default())
            } else {
                (String::new(), ForwardingPacketData::new(memo, hops.to_vec()))
            };

            let data = PacketDataV2 {
                tokens: tokens.to_vec(),
                sender: sender.clone(),
                receiver: receiver.clone(),
                memo,
                forwarding,
            };
            data.validate_basic()?;

            serde_json::to_vec(&data).map_err(|_| Error::packet_data_serialization())
        }
        _ => Err(Error::unsupported_version(version.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applications::transfer::error::ErrorDetail;
    use crate::core::ics24_host::identifier::{ChannelId, PortId};
    use test_log::test;

    fn sender() -> Signer {
        Signer::new("cosmos1wxeyh7zgn4tctjzs0vtqpc6p5cxq5t2muzl7ng")
    }

    fn receiver() -> Signer {
        Signer::new("cosmos1x54ltnyg88k0ejmk8ytwrhd3ltm84xehrnlslf")
    }

    fn hop(n: u64) -> Hop {
        Hop::new(PortId::transfer(), ChannelId::new(n))
    }

    fn tokens(n: usize) -> Tokens {
        (0..n)
            .map(|i| Token::new(Denom::native(format!("denom{}", i)), "100"))
            .collect()
    }

    #[test]
    fn v1_rejects_multiple_tokens() {
        let version = Version::new(V1);
        let err = create_packet_data_bytes(&version, &sender(), &receiver(), "", &tokens(2), &[])
            .unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::InvalidRequest(_)));

        let err =
            create_packet_data_bytes(&version, &sender(), &receiver(), "", &tokens(1), &[hop(1)])
                .unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::InvalidRequest(_)));
    }

    #[test]
    fn v1_encodes_full_path() {
        let version = Version::new(V1);
        let token = Token::new(Denom::from_path("transfer/channel-0/uatom"), "7");
        let bytes =
            create_packet_data_bytes(&version, &sender(), &receiver(), "hi", &[token], &[])
                .unwrap();
        let data: PacketData = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(data.denom, "transfer/channel-0/uatom");
        assert_eq!(data.amount, "7");
        assert_eq!(data.memo, "hi");

        let decoded = decode_packet_data(&version, &bytes).unwrap();
        assert_eq!(decoded.tokens.len(), 1);
        assert_eq!(
            decoded.tokens[0].denom,
            Denom::from_path("transfer/channel-0/uatom")
        );
        assert!(!decoded.has_forwarding());
    }

    #[test]
    fn v2_moves_memo_into_forwarding() {
        let version = Version::new(V2);
        let bytes = create_packet_data_bytes(
            &version,
            &sender(),
            &receiver(),
            "final memo",
            &tokens(3),
            &[hop(1), hop(2)],
        )
        .unwrap();
        let data = decode_packet_data(&version, &bytes).unwrap();
        assert_eq!(data.tokens.len(), 3);
        assert!(data.memo.is_empty());
        assert_eq!(data.forwarding.destination_memo, "final memo");
        assert_eq!(data.forwarding.hops, vec![hop(1), hop(2)]);

        let bytes =
            create_packet_data_bytes(&version, &sender(), &receiver(), "memo", &tokens(1), &[])
                .unwrap();
        let data = decode_packet_data(&version, &bytes).unwrap();
        assert_eq!(data.memo, "memo");
        assert!(data.forwarding.is_empty());
    }

    #[test]
    fn v2_validation() {
        struct Test {
            name: &'static str,
            data: PacketDataV2,
            want_pass: bool,
        }

        let valid = PacketDataV2 {
            tokens: tokens(1),
            sender: sender(),
            receiver: receiver(),
            memo: String::new(),
            forwarding: ForwardingPacketData::default(),
        };

        let tests = vec![
            Test {
                name: "valid",
                data: valid.clone(),
                want_pass: true,
            },
            Test {
                name: "no tokens",
                data: PacketDataV2 {
                    tokens: vec![],
                    ..valid.clone()
                },
                want_pass: false,
            },
            Test {
                name: "zero amount",
                data: PacketDataV2 {
                    tokens: vec![Token::new(Denom::native("uatom"), "0")],
                    ..valid.clone()
                },
                want_pass: false,
            },
            Test {
                name: "blank sender",
                data: PacketDataV2 {
                    sender: Signer::new(" "),
                    ..valid.clone()
                },
                want_pass: false,
            },
            Test {
                name: "blank receiver",
                data: PacketDataV2 {
                    receiver: Signer::new(""),
                    ..valid.clone()
                },
                want_pass: false,
            },
            Test {
                name: "receiver too long",
                data: PacketDataV2 {
                    receiver: Signer::new("a".repeat(MAXIMUM_RECEIVER_LENGTH + 1)),
                    ..valid.clone()
                },
                want_pass: false,
            },
            Test {
                name: "memo too long",
                data: PacketDataV2 {
                    memo: "m".repeat(MAXIMUM_MEMO_LENGTH + 1),
                    ..valid.clone()
                },
                want_pass: false,
            },
            Test {
                name: "memo alongside hops",
                data: PacketDataV2 {
                    memo: "memo".to_string(),
                    forwarding: ForwardingPacketData::new("", vec![hop(1)]),
                    ..valid.clone()
                },
                want_pass: false,
            },
            Test {
                name: "destination memo without hops",
                data: PacketDataV2 {
                    forwarding: ForwardingPacketData::new("memo", vec![]),
                    ..valid.clone()
                },
                want_pass: false,
            },
            Test {
                name: "too many hops",
                data: PacketDataV2 {
                    forwarding: ForwardingPacketData::new(
                        "",
                        (0..=MAXIMUM_NUMBER_OF_FORWARDING_HOPS as u64).map(hop).collect(),
                    ),
                    ..valid.clone()
                },
                want_pass: false,
            },
            Test {
                name: "maximum hops",
                data: PacketDataV2 {
                    forwarding: ForwardingPacketData::new(
                        "memo",
                        (0..MAXIMUM_NUMBER_OF_FORWARDING_HOPS as u64).map(hop).collect(),
                    ),
                    ..valid
                },
                want_pass: true,
            },
        ];

        for test in tests {
            assert_eq!(
                test.data.validate_basic().is_ok(),
                test.want_pass,
                "{}",
                test.name
            );
        }
    }

    #[test]
    fn unknown_version() {
        let version = Version::new("ics20-3");
        let err = decode_packet_data(&version, b"{}").unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::UnsupportedVersion(_)));
    }

    #[test]
    fn garbage_is_rejected() {
        let err = decode_packet_data(&Version::new(V2), b"not json").unwrap_err();
        assert!(matches!(
            err.detail(),
            ErrorDetail::PacketDataDeserialization(_)
        ));
    }
}
