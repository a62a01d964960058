use serde::{Deserialize, Serialize};

/// Module parameters of the transfer application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Whether tokens can be sent from this chain.
    #[serde(default = "enabled")]
    pub send_enabled: bool,
    /// Whether tokens can be received on this chain.
    #[serde(default = "enabled")]
    pub receive_enabled: bool,
}

fn enabled() -> bool {
    true
}

impl Params {
    pub fn new(send_enabled: bool, receive_enabled: bool) -> Self {
        Self {
            send_enabled,
            receive_enabled,
        }
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::new(true, true)
    }
}
