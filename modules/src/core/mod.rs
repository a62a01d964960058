//! The slice of the IBC core layer (ICS 02, 04, 24) that the transfer application is handed by
//! its host: identifiers, packets, channel ends and acknowledgements.
//!
//! Naming follows the `ibc` crate convention for packet transfers: "chain A" runs `SendPacket`,
//! `Acknowledgement` and timeouts, "chain B" runs `RecvPacket` and `WriteAcknowledgement`.

pub mod ics02_client;
pub mod ics04_channel;
pub mod ics24_host;
