//! Background WebSocket connection loop with auto-reconnect.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use huddle_common::RelayError;
use tokio::sync::{mpsc, RwLock};
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tracing::{debug, error, info, warn};

use super::types::{RelayCommand, WsRelayConfig};
use crate::protocol::{decode_inbound, encode_outbound, RelayInbound, RelayOutbound};

enum SessionResult {
    /// Disconnect requested, or every handle dropped.
    Shutdown,
    Disconnected(String),
}

// ---------------------------------------------------------------------------
// Connection Loop
// ---------------------------------------------------------------------------

/// Background task managing the WebSocket connection with auto-reconnect.
pub(crate) async fn connection_loop(
    config: WsRelayConfig,
    connected: Arc<RwLock<bool>>,
    event_tx: mpsc::Sender<RelayInbound>,
    mut command_rx: mpsc::Receiver<RelayCommand>,
) {
    // Replayed after every reconnect.
    let mut last_join: Option<RelayOutbound> = None;
    let mut reconnect_delay = config.reconnect_delay_secs;
    let connect_timeout = Duration::from_secs(config.connect_timeout_secs);

    loop {
        info!(url = %config.url, "Connecting to relay");

        match tokio::time::timeout(
            connect_timeout,
            tokio_tungstenite::connect_async(config.url.as_str()),
        )
        .await
        {
            Ok(Ok((ws_stream, _))) => {
                reconnect_delay = config.reconnect_delay_secs;
                *connected.write().await = true;

                let (mut sink, mut stream) = ws_stream.split();
                let result = relay_session(
                    &mut sink,
                    &mut stream,
                    &event_tx,
                    &mut command_rx,
                    &mut last_join,
                )
                .await;

                *connected.write().await = false;
                let _ = event_tx.send(RelayInbound::Disconnected).await;

                match result {
                    SessionResult::Shutdown => {
                        let _ = sink.send(WsMessage::Close(None)).await;
                        info!("Relay client shutting down");
                        return;
                    }
                    SessionResult::Disconnected(reason) => {
                        warn!(reason = %reason, "Relay connection lost");
                    }
                }
            }
            Ok(Err(e)) => {
                error!(error = %e, "Failed to connect to relay");
                report_connect_failure(&event_tx, RelayError::Connect(e.to_string())).await;
            }
            Err(_elapsed) => {
                error!(
                    timeout_secs = config.connect_timeout_secs,
                    "Relay connection timed out"
                );
                let err = RelayError::Connect(format!(
                    "timed out after {}s",
                    config.connect_timeout_secs
                ));
                report_connect_failure(&event_tx, err).await;
            }
        }

        // Exponential backoff reconnect.
        info!(
            delay = reconnect_delay,
            "Reconnecting in {} seconds", reconnect_delay
        );
        if !wait_for_reconnect(
            Duration::from_secs(reconnect_delay),
            &mut command_rx,
            &mut last_join,
        )
        .await
        {
            info!("Relay client shutting down");
            return;
        }
        reconnect_delay = (reconnect_delay * 2).min(config.max_reconnect_delay_secs);
    }
}

async fn report_connect_failure(event_tx: &mpsc::Sender<RelayInbound>, err: RelayError) {
    let _ = event_tx
        .send(RelayInbound::ConnectFailed {
            reason: err.to_string(),
        })
        .await;
}

/// Drive one live connection until it drops or a disconnect is requested.
async fn relay_session<W, R>(
    sink: &mut W,
    stream: &mut R,
    event_tx: &mpsc::Sender<RelayInbound>,
    command_rx: &mut mpsc::Receiver<RelayCommand>,
    last_join: &mut Option<RelayOutbound>,
) -> SessionResult
where
    W: Sink<WsMessage> + Unpin,
    W::Error: std::fmt::Display,
    R: Stream<Item = Result<WsMessage, WsError>> + Unpin,
{
    if let Some(join) = last_join.as_ref() {
        if let Err(e) = write_event(sink, join).await {
            return SessionResult::Disconnected(e.to_string());
        }
        debug!("Replayed join after reconnect");
    }

    loop {
        tokio::select! {
            frame = stream.next() => {
                match frame {
                    Some(Ok(WsMessage::Text(text))) => match decode_inbound(&text) {
                        Ok(event) => {
                            if event_tx.send(event).await.is_err() {
                                return SessionResult::Shutdown;
                            }
                        }
                        Err(e) => {
                            debug!(error = %e, text = %text.as_str(), "Unrecognized relay frame");
                        }
                    },
                    Some(Ok(WsMessage::Close(_))) | None => {
                        return SessionResult::Disconnected("closed by relay".into());
                    }
                    Some(Err(e)) => {
                        return SessionResult::Disconnected(e.to_string());
                    }
                    Some(Ok(_)) => {}
                }
            }

            command = command_rx.recv() => {
                match command {
                    Some(RelayCommand::Send(event)) => {
                        if matches!(event, RelayOutbound::Join { .. }) {
                            *last_join = Some(event.clone());
                        }
                        if let Err(e) = write_event(sink, &event).await {
                            return SessionResult::Disconnected(e.to_string());
                        }
                    }
                    Some(RelayCommand::Disconnect) | None => return SessionResult::Shutdown,
                }
            }
        }
    }
}

/// Sleep out the backoff delay while still servicing commands.
///
/// A join sent while offline replaces the one to replay; other events are
/// dropped. Returns `false` when the client should stop.
async fn wait_for_reconnect(
    delay: Duration,
    command_rx: &mut mpsc::Receiver<RelayCommand>,
    last_join: &mut Option<RelayOutbound>,
) -> bool {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            _ = &mut sleep => return true,
            command = command_rx.recv() => match command {
                Some(RelayCommand::Send(event @ RelayOutbound::Join { .. })) => {
                    debug!("Relay offline, join queued for reconnect");
                    *last_join = Some(event);
                }
                Some(RelayCommand::Send(event)) => {
                    warn!(?event, "Relay offline, dropping event");
                }
                Some(RelayCommand::Disconnect) | None => return false,
            },
        }
    }
}

async fn write_event<W>(sink: &mut W, event: &RelayOutbound) -> Result<(), RelayError>
where
    W: Sink<WsMessage> + Unpin,
    W::Error: std::fmt::Display,
{
    let json = encode_outbound(event)?;
    sink.send(WsMessage::Text(json.into()))
        .await
        .map_err(|e| RelayError::Transport(e.to_string()))
}
