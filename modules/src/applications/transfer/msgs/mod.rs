//! Messages accepted by the transfer application.

pub mod transfer;
