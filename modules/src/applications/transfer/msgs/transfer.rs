//! This is the definition of a transfer message that an application can submit to this chain.

use serde::{Deserialize, Serialize};

use crate::applications::transfer::coin::Coin;
use crate::applications::transfer::denom::{validate_prefixed_denom, Hop};
use crate::applications::transfer::error::Error;
use crate::applications::transfer::packet::validate_hops;
use crate::applications::transfer::{DENOM_PREFIX, MAXIMUM_MEMO_LENGTH, MAXIMUM_RECEIVER_LENGTH};
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::prelude::*;
use crate::signer::Signer;
use crate::timestamp::Timestamp;
use crate::Height;

/// Where a transfer goes after it reaches the chain at the other end of the source channel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forwarding {
    /// Send the tokens back to the chain they were issued on first, along their trace.
    #[serde(default)]
    pub unwind: bool,
    /// Further hops, in order.
    #[serde(default)]
    pub hops: Vec<Hop>,
}

impl Forwarding {
    pub fn new(unwind: bool, hops: Vec<Hop>) -> Self {
        Self { unwind, hops }
    }

    pub fn validate(&self) -> Result<(), Error> {
        validate_hops(&self.hops)
    }
}

/// Message used to build an ICS20 token transfer packet.
///
/// When `forwarding.unwind` is set, `source_port` and `source_channel` are ignored: the tokens
/// leave over the most recent hop of their trace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgTransfer {
    /// the port on which the packet will be sent
    pub source_port: PortId,
    /// the channel by which the packet will be sent
    pub source_channel: ChannelId,
    /// the tokens to be transferred
    pub tokens: Vec<Coin>,
    /// the sender address
    pub sender: Signer,
    /// the recipient address on the destination chain
    pub receiver: Signer,
    /// Timeout height relative to the current block height.
    /// The timeout is disabled when set to 0.
    pub timeout_height: Height,
    /// Timeout timestamp relative to the current block timestamp.
    /// The timeout is disabled when set to 0.
    pub timeout_timestamp: Timestamp,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub forwarding: Option<Forwarding>,
}

impl MsgTransfer {
    pub fn should_unwind(&self) -> bool {
        self.forwarding
            .as_ref()
            .map(|forwarding| forwarding.unwind)
            .unwrap_or(false)
    }

    pub fn forwarding_hops(&self) -> &[Hop] {
        self.forwarding
            .as_ref()
            .map(|forwarding| forwarding.hops.as_slice())
            .unwrap_or(&[])
    }

    pub fn validate_basic(&self) -> Result<(), Error> {
        if self.tokens.is_empty() {
            return Err(Error::empty_tokens());
        }

        for coin in self.tokens.iter() {
            if coin.amount.is_zero() {
                return Err(Error::non_positive_amount(coin.amount.to_string()));
            }
            validate_prefixed_denom(&coin.denom)?;
        }

        if self.sender.is_empty() {
            return Err(Error::invalid_request(
                "sender address cannot be blank".to_string(),
            ));
        }

        if self.receiver.is_empty() {
            return Err(Error::empty_receiver());
        }

        if self.receiver.as_str().len() > MAXIMUM_RECEIVER_LENGTH {
            return Err(Error::receiver_too_long(
                self.receiver.as_str().len(),
                MAXIMUM_RECEIVER_LENGTH,
            ));
        }

        if self.memo.len() > MAXIMUM_MEMO_LENGTH {
            return Err(Error::memo_too_long(self.memo.len(), MAXIMUM_MEMO_LENGTH));
        }

        if self.timeout_height.is_zero() && !self.timeout_timestamp.is_set() {
            return Err(Error::invalid_timeout());
        }

        if let Some(forwarding) = &self.forwarding {
            forwarding.validate()?;

            if forwarding.unwind || !forwarding.hops.is_empty() {
                // Intermediate chains cannot translate a timeout height of this chain's
                // counterparty into one of their own.
                if !self.timeout_height.is_zero() {
                    return Err(Error::invalid_forwarding(
                        "timeout height must be zero if forwarding path hops is not empty or unwind is true"
                            .to_string(),
                    ));
                }
            }

            if forwarding.unwind {
                let prefix = format!("{}/", DENOM_PREFIX);
                if let Some(coin) = self
                    .tokens
                    .iter()
                    .find(|coin| !coin.denom.starts_with(&prefix))
                {
                    return Err(Error::invalid_forwarding(format!(
                        "cannot unwind native denomination {}",
                        coin.denom
                    )));
                }
            }
        }

        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use test_log::test;

    use super::test_util::get_dummy_msg_transfer;
    use super::*;

    #[test]
    fn msg_transfer_validation() {
        struct Test {
            name: &'static str,
            msg: MsgTransfer,
            want_pass: bool,
        }

        let default = get_dummy_msg_transfer("uatom", 10);
        let voucher = "ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2";
        let hop = Hop::new(PortId::transfer(), ChannelId::new(5));

        let tests: Vec<Test> = vec![
            Test {
                name: "Good parameters",
                msg: default.clone(),
                want_pass: true,
            },
            Test {
                name: "No tokens",
                msg: MsgTransfer {
                    tokens: vec![],
                    ..default.clone()
                },
                want_pass: false,
            },
            Test {
                name: "Zero amount",
                msg: get_dummy_msg_transfer("uatom", 0),
                want_pass: false,
            },
            Test {
                name: "Malformed voucher hash",
                msg: get_dummy_msg_transfer("ibc/NOTHEX", 1),
                want_pass: false,
            },
            Test {
                name: "Blank receiver",
                msg: MsgTransfer {
                    receiver: Signer::new("  "),
                    ..default.clone()
                },
                want_pass: false,
            },
            Test {
                name: "No timeout",
                msg: MsgTransfer {
                    timeout_height: Height::zero(),
                    ..default.clone()
                },
                want_pass: false,
            },
            Test {
                name: "Timestamp only",
                msg: MsgTransfer {
                    timeout_height: Height::zero(),
                    timeout_timestamp: Timestamp::from_nanoseconds(1_000),
                    ..default.clone()
                },
                want_pass: true,
            },
            Test {
                name: "Forwarding with a timeout height",
                msg: MsgTransfer {
                    forwarding: Some(Forwarding::new(false, vec![hop.clone()])),
                    ..default.clone()
                },
                want_pass: false,
            },
            Test {
                name: "Forwarding with a timeout timestamp",
                msg: MsgTransfer {
                    timeout_height: Height::zero(),
                    timeout_timestamp: Timestamp::from_nanoseconds(1_000),
                    forwarding: Some(Forwarding::new(false, vec![hop.clone()])),
                    ..default.clone()
                },
                want_pass: true,
            },
            Test {
                name: "Unwinding a native token",
                msg: MsgTransfer {
                    timeout_height: Height::zero(),
                    timeout_timestamp: Timestamp::from_nanoseconds(1_000),
                    forwarding: Some(Forwarding::new(true, vec![])),
                    ..default.clone()
                },
                want_pass: false,
            },
            Test {
                name: "Unwinding a voucher",
                msg: MsgTransfer {
                    tokens: vec![Coin::new(voucher, 3u64)],
                    timeout_height: Height::zero(),
                    timeout_timestamp: Timestamp::from_nanoseconds(1_000),
                    forwarding: Some(Forwarding::new(true, vec![])),
                    ..default.clone()
                },
                want_pass: true,
            },
            Test {
                name: "Too many hops",
                msg: MsgTransfer {
                    timeout_height: Height::zero(),
                    timeout_timestamp: Timestamp::from_nanoseconds(1_000),
                    forwarding: Some(Forwarding::new(false, vec![hop; 9])),
                    ..default
                },
                want_pass: false,
            },
        ];

        for test in tests {
            let res = test.msg.validate_basic();

            assert_eq!(
                test.want_pass,
                res.is_ok(),
                "MsgTransfer::validate_basic() failed for test {}, \nmsg {:?} with error {:?}",
                test.name,
                test.msg,
                res.err(),
            );
        }
    }
}
