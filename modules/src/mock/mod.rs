//! A mock host chain for the transfer application.

pub mod context;
