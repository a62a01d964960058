//! Channel layer handlers applications invoke directly.

pub mod send_packet;
pub mod write_acknowledgement;
