//! ICS 02: Client types used by the packet layer.

pub mod height;
