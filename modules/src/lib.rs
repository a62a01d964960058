#![no_std]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_casts, trivial_numeric_casts, unused_import_braces)]
#![forbid(unsafe_code)]

//! Implementation of the ICS 20 fungible token transfer application.
//!
//! The crate moves fungible value between independent chains which only talk to each other
//! through ordered, acknowledged and timeout-bounded IBC packets. It covers the application
//! half of the protocol:
//!
//! - building outbound transfer packets (escrow on the source zone, burn on the sink zone),
//! - processing inbound transfers (unescrow when a token returns home, mint a voucher otherwise),
//! - refunding senders on error acknowledgements and timeouts,
//! - forwarding received tokens over further hops and unwinding that forward when it fails.
//!
//! The layout mirrors the [Interchain Standards][ics-standards]. `Core` holds the channel layer
//! types the application is handed by its host (packets, acknowledgements, identifiers).
//! `Applications` holds the transfer application itself. Everything the application needs from
//! the host chain (bank, address policy, channel layer, storage) is reached through the traits in
//! [`applications::transfer::context`].
//!
//! [ics-standards]: https://github.com/cosmos/ibc#interchain-standards

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod prelude;

pub mod applications;
pub mod bigint;
pub mod core;
pub mod events;
pub mod handler;
pub mod signer;
pub mod timestamp;

/// Re-export of ICS 002 Height domain type
pub type Height = crate::core::ics02_client::height::Height;

#[cfg(any(test, feature = "mocks"))]
pub mod test_utils;

#[cfg(any(test, feature = "mocks"))]
pub mod mock; // Context mock, the underlying host chain: for testing all handlers.
