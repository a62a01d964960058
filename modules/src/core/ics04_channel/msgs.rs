//! Message types the channel layer hands to applications.

pub mod acknowledgement;
