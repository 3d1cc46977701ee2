use serde::{Deserialize, Serialize};

/// Connection settings for the shared relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// WebSocket URL of the relay server.
    pub url: String,
    /// Seconds to wait for the WebSocket handshake.
    pub connect_timeout_secs: u32,
    /// Reconnect base delay in seconds.
    pub reconnect_delay_secs: u32,
    /// Maximum reconnect delay in seconds.
    pub max_reconnect_delay_secs: u32,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:8080/ws".into(),
            connect_timeout_secs: 15,
            reconnect_delay_secs: 1,
            max_reconnect_delay_secs: 30,
        }
    }
}
