//! Local user intents.

use std::sync::Arc;

use huddle_common::{CallError, HuddleError, SessionError};
use tokio::sync::mpsc::error::SendError;
use tracing::{info, warn};

use crate::protocol::RelayOutbound;
use crate::transport::Generation;

use super::core::SessionCoordinator;
use super::types::{CallEndReason, Intent, Internal, SessionEvent};

impl SessionCoordinator {
    /// Apply one intent. Refusals are reported as events, not returned.
    /// Returns `false` after a shutdown.
    pub async fn handle_intent(&mut self, intent: Intent) -> bool {
        let result = match intent {
            Intent::Join(name) => self.join(&name).await,
            Intent::SendMessage(text) => self.send_message(&text).await,
            Intent::Call(target) => self.call(&target).await,
            Intent::Answer => self.answer().await,
            Intent::Decline => self.decline().await,
            Intent::Hangup => {
                self.hangup().await;
                Ok(())
            }
            Intent::Shutdown => {
                self.shutdown().await;
                return false;
            }
        };
        if let Err(e) = result {
            self.report(e).await;
        }
        true
    }

    /// Announce ourselves to the relay under `display_name`, then start
    /// acquiring the local media stream in the background.
    pub async fn join(&mut self, display_name: &str) -> Result<(), HuddleError> {
        let name = display_name.trim();
        if name.is_empty() {
            return Err(SessionError::BlankDisplayName.into());
        }
        if let Some(existing) = &self.display_name {
            return Err(SessionError::AlreadyJoined(existing.clone()).into());
        }

        self.relay
            .send(RelayOutbound::Join {
                display_name: name.to_string(),
            })
            .await?;
        self.display_name = Some(name.to_string());
        info!(display_name = name, "Joined");
        self.emit(SessionEvent::Joined {
            display_name: name.to_string(),
        })
        .await;

        self.request_media();
        Ok(())
    }

    /// Send a chat message. It shows up in the log when the relay echoes it.
    pub async fn send_message(&mut self, text: &str) -> Result<(), HuddleError> {
        let display_name = self.require_joined()?;
        if text.trim().is_empty() {
            return Ok(());
        }
        self.relay
            .send(RelayOutbound::ChatSend {
                display_name,
                text: text.to_string(),
            })
            .await?;
        Ok(())
    }

    /// Start a call to the participant with connection id `target_id`.
    pub async fn call(&mut self, target_id: &str) -> Result<(), HuddleError> {
        self.require_joined()?;
        if self.local_id.as_deref() == Some(target_id) {
            return Err(SessionError::SelfCall.into());
        }
        if !self.presence.contains(target_id) {
            return Err(SessionError::UnknownPeer(target_id.to_string()).into());
        }

        let result = self
            .calls
            .initiate_call(target_id, self.local_stream.as_ref());
        self.sync_call_state().await;
        let generation = result?;
        self.schedule_ring_timeout(generation);
        Ok(())
    }

    pub async fn answer(&mut self) -> Result<(), HuddleError> {
        let result = self.calls.answer_call(self.local_stream.as_ref());
        self.sync_call_state().await;
        result?;
        Ok(())
    }

    pub async fn decline(&mut self) -> Result<(), HuddleError> {
        self.calls.decline_call()?;
        self.sync_call_state().await;
        self.emit(SessionEvent::CallEnded {
            reason: CallEndReason::Declined,
        })
        .await;
        Ok(())
    }

    /// End the current call, if any. Safe to repeat.
    pub async fn hangup(&mut self) {
        if self.calls.teardown() {
            self.sync_call_state().await;
            self.emit(SessionEvent::CallEnded {
                reason: CallEndReason::HungUp,
            })
            .await;
        }
    }

    /// Hang up, release the local stream, and close the relay link.
    pub async fn shutdown(&mut self) {
        self.hangup().await;
        if let Some(stream) = self.local_stream.take() {
            info!(stream = stream.id(), "Releasing local media");
            self.capture.release(stream);
        }
        self.shut_down = true;
        self.relay.disconnect().await;
        info!("Session shut down");
    }

    // -- helpers --------------------------------------------------------

    fn require_joined(&self) -> Result<String, SessionError> {
        self.display_name.clone().ok_or(SessionError::NotJoined)
    }

    fn request_media(&mut self) {
        if self.media_requested || self.local_stream.is_some() {
            return;
        }
        self.media_requested = true;

        let capture = Arc::clone(&self.capture);
        let constraints = self.config.media;
        let tx = self.internal_tx.clone();
        tokio::spawn(async move {
            let result = capture.request_stream(constraints).await;
            if let Err(SendError(Internal::MediaReady(Ok(stream)))) =
                tx.send(Internal::MediaReady(result))
            {
                capture.release(stream);
            }
        });
    }

    pub(super) fn schedule_ring_timeout(&self, generation: Generation) {
        let Some(timeout) = self.config.ring_timeout else {
            return;
        };
        let tx = self.internal_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let _ = tx.send(Internal::RingTimeout(generation));
        });
    }

    /// Surface a refused intent to the front-end.
    async fn report(&mut self, err: HuddleError) {
        match err {
            HuddleError::Call(CallError::InvalidStateTransition { op, state }) => {
                warn!(op, state, "Ignoring intent");
            }
            HuddleError::Call(CallError::MediaUnavailable(e)) => {
                warn!(error = %e, "Call needs local media");
                self.emit(SessionEvent::MediaUnavailable {
                    reason: e.to_string(),
                })
                .await;
            }
            HuddleError::Call(CallError::SignalingFailed(reason)) => {
                warn!(reason = %reason, "Call failed");
                self.emit(SessionEvent::CallEnded {
                    reason: CallEndReason::Failed(reason),
                })
                .await;
            }
            other => {
                warn!(error = %other, "Intent rejected");
                self.emit(SessionEvent::Rejected(other)).await;
            }
        }
    }
}
