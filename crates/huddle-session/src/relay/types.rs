//! Configuration and commands for the WebSocket relay client.

use crate::protocol::RelayOutbound;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Connection settings for [`super::WsRelayClient`].
#[derive(Debug, Clone)]
pub struct WsRelayConfig {
    /// `ws://` or `wss://` endpoint of the relay.
    pub url: String,
    pub connect_timeout_secs: u64,
    /// Reconnect base delay in seconds.
    pub reconnect_delay_secs: u64,
    /// Maximum reconnect delay in seconds.
    pub max_reconnect_delay_secs: u64,
}

impl Default for WsRelayConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:8080/ws".to_string(),
            connect_timeout_secs: 15,
            reconnect_delay_secs: 1,
            max_reconnect_delay_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Commands sent from the client handle to the connection task.
#[derive(Debug)]
pub(crate) enum RelayCommand {
    Send(RelayOutbound),
    Disconnect,
}
