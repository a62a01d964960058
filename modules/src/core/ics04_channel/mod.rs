//! ICS 04: Channel implementation, restricted to what applications see of packets.

pub mod channel;
pub mod context;
pub mod error;
pub mod events;
pub mod handler;
pub mod msgs;
pub mod packet;
pub mod version;

pub use version::Version;
