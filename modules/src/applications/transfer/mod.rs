//! ICS 20: Fungible token transfer.
//!
//! Tokens remember the route they travelled as a [`Trace`](denom::Trace) of `(port, channel)`
//! hops. Every send away from a chain the token was not just received from is a move *forwards*
//! in the token's timeline: the sending chain is the source zone, escrows the funds and the
//! receiving chain prefixes its own hop and mints a voucher. Sending a token back over the hop it
//! arrived on is a move *backwards*: the sending chain is the sink zone, burns the voucher and the
//! receiving chain strips the hop and unescrows the original funds.
//!
//! ```text
//! A -> B : A is source zone. Denom upon receiving: 'B/denom'
//! B -> C : B is source zone. Denom upon receiving: 'C/B/denom'
//! C -> A : C is source zone. Denom upon receiving: 'A/C/B/denom'
//! A -> C : A is sink zone.   Denom upon receiving: 'C/B/denom'
//! C -> B : C is sink zone.   Denom upon receiving: 'B/denom'
//! B -> A : B is sink zone.   Denom upon receiving: 'denom'
//! ```

pub mod acknowledgement;
pub mod amount;
pub mod coin;
pub mod context;
pub mod denom;
pub mod error;
pub mod events;
pub mod module;
pub mod msgs;
pub mod packet;
pub mod params;
pub mod relay;
pub mod token;


pub use amount::Amount;
pub use coin::Coin;
pub use denom::{Denom, DenomHash, Hop, Trace};
pub use token::{Token, Tokens};

/// Module identifier for the ICS20 application.
pub const MODULE_ID_STR: &str = "transfer";

/// The port identifier that the ICS20 applications
/// typically bind with.
pub const PORT_ID_STR: &str = "transfer";

/// ICS20 application current version.
pub const VERSION: &str = V1;

/// Legacy version, single token packets with a flat denomination path.
pub const V1: &str = "ics20-1";

/// Multi-token packets with structured denominations and forwarding.
pub const V2: &str = "ics20-2";

/// The versions this implementation negotiates, most preferred first.
pub const SUPPORTED_VERSIONS: [&str; 2] = [V2, V1];

/// Prefix of the ledger denomination of vouchers, `ibc/{hash}`.
pub const DENOM_PREFIX: &str = "ibc";

/// Maximum length in bytes of the receiver field of packet data.
pub const MAXIMUM_RECEIVER_LENGTH: usize = 2048;

/// Maximum length in bytes of the memo fields of packet data.
pub const MAXIMUM_MEMO_LENGTH: usize = 32768;

/// Maximum number of hops a transfer may be forwarded over.
pub const MAXIMUM_NUMBER_OF_FORWARDING_HOPS: usize = 8;
