//! Public handle for the relay WebSocket connection.

use std::sync::Arc;

use async_trait::async_trait;
use huddle_common::RelayError;
use tokio::sync::{mpsc, RwLock};

use super::connection::connection_loop;
use super::link::RelayLink;
use super::types::{RelayCommand, WsRelayConfig};
use crate::protocol::{RelayInbound, RelayOutbound};

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Handle for the relay connection.
///
/// All methods are non-blocking and send commands to the background
/// connection task.
pub struct WsRelayClient {
    command_tx: mpsc::Sender<RelayCommand>,
    connected: Arc<RwLock<bool>>,
}

impl WsRelayClient {
    /// Create a new client and start the background connection.
    /// Returns `(client, event_receiver)`.
    pub fn connect(config: WsRelayConfig) -> (Self, mpsc::Receiver<RelayInbound>) {
        let (event_tx, event_rx) = mpsc::channel(256);
        let (command_tx, command_rx) = mpsc::channel(64);
        let connected = Arc::new(RwLock::new(false));

        let client = Self {
            command_tx,
            connected: Arc::clone(&connected),
        };

        tokio::spawn(connection_loop(config, connected, event_tx, command_rx));

        (client, event_rx)
    }

    /// Check if connected.
    pub async fn is_connected(&self) -> bool {
        *self.connected.read().await
    }
}

#[async_trait]
impl RelayLink for WsRelayClient {
    async fn send(&self, event: RelayOutbound) -> Result<(), RelayError> {
        // A join is kept and replayed on reconnect, so it may be queued
        // while offline. Everything else needs a live connection.
        let is_join = matches!(event, RelayOutbound::Join { .. });
        if !is_join && !self.is_connected().await {
            return Err(RelayError::Closed);
        }
        self.command_tx
            .send(RelayCommand::Send(event))
            .await
            .map_err(|_| RelayError::Closed)
    }

    async fn disconnect(&self) {
        let _ = self.command_tx.send(RelayCommand::Disconnect).await;
    }
}
