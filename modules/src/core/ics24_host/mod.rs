//! ICS 24: Host defines the identifier formats the transfer application relies on.

pub mod error;
pub mod identifier;
pub mod validate;
