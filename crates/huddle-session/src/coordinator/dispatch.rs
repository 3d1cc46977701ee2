//! Relay events, transport reports, and background completions.

use huddle_common::{CallError, MediaError};
use tracing::{debug, info, warn};

use crate::call::{CallEffect, IncomingOffer};
use crate::chat::{ChatMessage, MessageLog};
use crate::media::MediaStream;
use crate::protocol::{RelayInbound, RelayOutbound};
use crate::transport::TransportEvent;

use super::core::SessionCoordinator;
use super::types::{CallEndReason, Internal, SessionEvent};

impl SessionCoordinator {
    // -- relay ----------------------------------------------------------

    /// Apply one event delivered by the relay.
    pub async fn handle_relay_event(&mut self, event: RelayInbound) {
        match event {
            RelayInbound::Connected { id } => {
                info!(id = %id, "Connected to relay");
                self.presence.set_local_id(id.clone());
                self.local_id = Some(id.clone());
                self.emit(SessionEvent::Connected { id }).await;
            }
            RelayInbound::Disconnected => {
                info!("Relay disconnected");
                self.presence.clear();
                self.local_id = None;
                self.emit(SessionEvent::RelayDisconnected).await;
            }
            RelayInbound::ConnectFailed { reason } => {
                warn!(reason = %reason, "Relay unreachable");
                self.presence.clear();
                self.local_id = None;
                self.emit(SessionEvent::RelayUnreachable { reason }).await;
            }
            RelayInbound::PresenceSnapshot { participants } => {
                let kept = self.presence.apply_snapshot(&participants);
                debug!(received = participants.len(), kept, "Presence snapshot");
                let peers = self.peers();
                self.emit(SessionEvent::PresenceChanged { peers }).await;
            }
            RelayInbound::ChatReceived { display_name, text } => {
                self.on_chat(ChatMessage::new(display_name, text)).await;
            }
            RelayInbound::CallOfferReceived {
                from,
                signal,
                display_name,
            } => {
                let offer = IncomingOffer {
                    from: from.clone(),
                    signal,
                    display_name: display_name.clone(),
                };
                match self.calls.on_incoming_offer(offer) {
                    Ok(_) => {
                        self.sync_call_state().await;
                        self.emit(SessionEvent::IncomingCall { from, display_name })
                            .await;
                    }
                    Err(e) => debug!(from = %from, error = %e, "Busy, ignoring call offer"),
                }
            }
            RelayInbound::CallAnswerReceived { signal } => {
                match self.calls.on_call_answered(signal) {
                    Ok(()) => self.sync_call_state().await,
                    Err(e) => warn!(error = %e, "Ignoring call answer"),
                }
            }
        }
    }

    async fn on_chat(&mut self, message: ChatMessage) {
        let remote = match self.display_name.as_deref() {
            Some(local) => MessageLog::notify_if_remote(&message, local),
            None => true,
        };
        self.messages.append(message.clone());

        if remote && self.config.sound_cue {
            if let Err(e) = self.cue.play_cue() {
                warn!(error = %e, "Notification cue failed");
            }
        }
        self.emit(SessionEvent::MessageReceived { message, remote })
            .await;
    }

    // -- transport ------------------------------------------------------

    /// Route a peer-media transport report through the call controller.
    pub async fn handle_transport_event(&mut self, event: TransportEvent) {
        match self.calls.on_transport_event(event) {
            Ok(Some(effect)) => self.apply_effect(effect).await,
            Ok(None) => {}
            Err(CallError::Stale(generation)) => {
                debug!(generation, "Dropping stale transport event");
            }
            Err(e) => warn!(error = %e, "Transport event rejected"),
        }
    }

    async fn apply_effect(&mut self, effect: CallEffect) {
        match effect {
            CallEffect::SendOffer { to, signal } => {
                let display_name = self.display_name.clone().unwrap_or_default();
                self.send_signal(RelayOutbound::CallOffer {
                    to,
                    signal,
                    display_name,
                })
                .await;
            }
            CallEffect::SendAnswer { to, signal } => {
                self.send_signal(RelayOutbound::CallAnswer { to, signal })
                    .await;
            }
            CallEffect::RemoteStream(stream) => {
                self.emit(SessionEvent::RemoteStream(stream)).await;
            }
            CallEffect::Failed { reason } => {
                self.sync_call_state().await;
                self.emit(SessionEvent::CallEnded {
                    reason: CallEndReason::Failed(reason),
                })
                .await;
            }
        }
    }

    /// Relay a negotiation payload; a call whose signal cannot be delivered
    /// is ended.
    async fn send_signal(&mut self, event: RelayOutbound) {
        if let Err(e) = self.relay.send(event).await {
            warn!(error = %e, "Could not relay call signal, ending call");
            if self.calls.teardown() {
                self.sync_call_state().await;
                self.emit(SessionEvent::CallEnded {
                    reason: CallEndReason::Failed(e.to_string()),
                })
                .await;
            }
        }
    }

    // -- internal -------------------------------------------------------

    pub(super) async fn handle_internal(&mut self, internal: Internal) {
        match internal {
            Internal::MediaReady(result) => self.on_media_ready(result).await,
            Internal::RingTimeout(generation) => {
                if self.calls.on_ring_timeout(generation) {
                    self.sync_call_state().await;
                    self.emit(SessionEvent::CallEnded {
                        reason: CallEndReason::TimedOut,
                    })
                    .await;
                }
            }
        }
    }

    async fn on_media_ready(&mut self, result: Result<MediaStream, MediaError>) {
        self.media_requested = false;
        match result {
            Ok(stream) => {
                if self.shut_down || self.local_stream.is_some() {
                    self.capture.release(stream);
                    return;
                }
                info!(
                    stream = stream.id(),
                    video = stream.has_video(),
                    audio = stream.has_audio(),
                    "Local media ready"
                );
                let event = SessionEvent::LocalMediaReady {
                    has_video: stream.has_video(),
                    has_audio: stream.has_audio(),
                };
                self.local_stream = Some(stream);
                self.emit(event).await;
            }
            Err(e) => {
                warn!(error = %e, "Local media unavailable");
                self.emit(SessionEvent::MediaUnavailable {
                    reason: e.to_string(),
                })
                .await;
            }
        }
    }
}
