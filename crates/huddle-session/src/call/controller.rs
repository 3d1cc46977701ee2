//! The call controller: guarded transitions over at most one call session.

use std::sync::Arc;

use huddle_common::{CallError, MediaError};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::media::MediaStream;
use crate::protocol::Signal;
use crate::transport::{
    Generation, PeerRole, PeerTransport, TransportEvent, TransportEventKind, TransportEventSink,
};

use super::types::{CallEffect, CallRole, CallSession, CallState, IncomingOffer};

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Owns the lifecycle of one peer-media session at a time.
pub struct CallSignalingController {
    transport: Arc<dyn PeerTransport>,
    /// Cloned into every sink handed to the transport.
    events_tx: mpsc::UnboundedSender<TransportEvent>,
    /// Last generation handed out.
    last_generation: Generation,
    session: Option<CallSession>,
}

impl CallSignalingController {
    /// Create an idle controller. Transport reports arrive on the returned
    /// receiver and must be fed back through [`Self::on_transport_event`].
    pub fn new(transport: Arc<dyn PeerTransport>) -> (Self, mpsc::UnboundedReceiver<TransportEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let controller = Self {
            transport,
            events_tx,
            last_generation: Generation::default(),
            session: None,
        };
        (controller, events_rx)
    }

    pub fn state(&self) -> CallState {
        self.session
            .as_ref()
            .map(|s| s.state)
            .unwrap_or(CallState::Idle)
    }

    pub fn role(&self) -> Option<CallRole> {
        self.session.as_ref().map(|s| s.role)
    }

    pub fn remote_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.remote_id.as_str())
    }

    pub fn remote_display_name(&self) -> Option<&str> {
        self.session
            .as_ref()
            .and_then(|s| s.remote_display_name.as_deref())
    }

    /// Generation of the current call, if any.
    pub fn generation(&self) -> Option<Generation> {
        self.session.as_ref().map(|s| s.generation)
    }

    /// Start an outbound call to `target_id`.
    ///
    /// The offer itself is produced later by the transport and comes back
    /// as [`CallEffect::SendOffer`].
    pub fn initiate_call(
        &mut self,
        target_id: &str,
        local_stream: Option<&MediaStream>,
    ) -> Result<Generation, CallError> {
        self.expect_state("start a call", CallState::Idle)?;
        let stream = local_stream
            .ok_or_else(|| MediaError::Unavailable("no local stream to call with".into()))?;

        let generation = self.next_generation();
        let peer = self
            .transport
            .open(PeerRole::Initiator, stream, self.sink(generation))?;

        self.session = Some(CallSession {
            generation,
            role: CallRole::Caller,
            state: CallState::Calling,
            remote_id: target_id.to_string(),
            remote_display_name: None,
            pending_signal: None,
            peer: Some(peer),
            local_signal_sent: false,
        });
        info!(%generation, remote = target_id, "Calling");
        Ok(generation)
    }

    /// Record an inbound offer. Ignored (with an error) unless idle.
    pub fn on_incoming_offer(&mut self, offer: IncomingOffer) -> Result<Generation, CallError> {
        self.expect_state("take an incoming call", CallState::Idle)?;

        let generation = self.next_generation();
        info!(%generation, from = %offer.from, "Incoming call");
        self.session = Some(CallSession {
            generation,
            role: CallRole::Callee,
            state: CallState::Ringing,
            remote_id: offer.from,
            remote_display_name: Some(offer.display_name),
            pending_signal: Some(offer.signal),
            peer: None,
            local_signal_sent: false,
        });
        Ok(generation)
    }

    /// Accept the ringing call. Opens the responder session and feeds it the
    /// caller's offer; the answer comes back as [`CallEffect::SendAnswer`].
    pub fn answer_call(&mut self, local_stream: Option<&MediaStream>) -> Result<(), CallError> {
        self.expect_state("answer", CallState::Ringing)?;
        let stream = local_stream
            .ok_or_else(|| MediaError::Unavailable("no local stream to answer with".into()))?;

        let Some(generation) = self.generation() else {
            return Err(self.invalid("answer"));
        };
        let opened = self
            .transport
            .open(PeerRole::Responder, stream, self.sink(generation));
        let mut peer = match opened {
            Ok(peer) => peer,
            Err(e) => {
                self.teardown();
                return Err(e.into());
            }
        };

        let Some(session) = self.session.as_mut() else {
            return Err(self.invalid("answer"));
        };
        if let Some(signal) = session.pending_signal.take() {
            peer.feed_signal(signal);
        }
        session.peer = Some(peer);
        session.state = CallState::Connected;
        info!(%generation, remote = %session.remote_id, "Answered call");
        Ok(())
    }

    /// Refuse the ringing call. No transport session exists yet.
    pub fn decline_call(&mut self) -> Result<(), CallError> {
        self.expect_state("decline", CallState::Ringing)?;
        if let Some(session) = self.session.take() {
            info!(generation = %session.generation, remote = %session.remote_id, "Declined call");
        }
        Ok(())
    }

    /// Apply the callee's answer to our outbound call.
    ///
    /// Only valid while calling and after our offer went out; anything else
    /// is a duplicate or out-of-order relay delivery and changes nothing.
    pub fn on_call_answered(&mut self, signal: Signal) -> Result<(), CallError> {
        let state = self.state();
        let Some(session) = self
            .session
            .as_mut()
            .filter(|s| s.state == CallState::Calling)
        else {
            return Err(CallError::InvalidStateTransition {
                op: "apply an answer",
                state: state.as_str(),
            });
        };
        if !session.local_signal_sent {
            return Err(CallError::InvalidStateTransition {
                op: "apply an answer before the offer was sent",
                state: state.as_str(),
            });
        }

        if let Some(peer) = session.peer.as_mut() {
            peer.feed_signal(signal);
        }
        session.state = CallState::Connected;
        info!(generation = %session.generation, remote = %session.remote_id, "Call connected");
        Ok(())
    }

    /// Route a transport report. Reports from any generation other than the
    /// current call's are rejected as stale.
    pub fn on_transport_event(
        &mut self,
        event: TransportEvent,
    ) -> Result<Option<CallEffect>, CallError> {
        if self.generation() != Some(event.generation) {
            return Err(CallError::Stale(event.generation.value()));
        }

        if let TransportEventKind::Failed(reason) = event.kind {
            warn!(generation = %event.generation, reason = %reason, "Peer negotiation failed");
            self.teardown();
            return Ok(Some(CallEffect::Failed { reason }));
        }

        let Some(session) = self.session.as_mut() else {
            return Err(CallError::Stale(event.generation.value()));
        };

        match event.kind {
            TransportEventKind::NegotiationPayload(signal) => {
                if session.local_signal_sent {
                    debug!(generation = %session.generation, "Ignoring second negotiation payload");
                    return Ok(None);
                }
                match (session.role, session.state) {
                    (CallRole::Caller, CallState::Calling) => {
                        session.local_signal_sent = true;
                        Ok(Some(CallEffect::SendOffer {
                            to: session.remote_id.clone(),
                            signal,
                        }))
                    }
                    (CallRole::Callee, CallState::Connected) => {
                        session.local_signal_sent = true;
                        Ok(Some(CallEffect::SendAnswer {
                            to: session.remote_id.clone(),
                            signal,
                        }))
                    }
                    (role, state) => {
                        debug!(?role, %state, "Negotiation payload with nothing to send");
                        Ok(None)
                    }
                }
            }
            TransportEventKind::RemoteStream(stream) => {
                debug!(generation = %session.generation, stream = stream.id(), "Remote stream");
                Ok(Some(CallEffect::RemoteStream(stream)))
            }
            TransportEventKind::Failed(_) => Ok(None),
        }
    }

    /// End the call if `generation` is still waiting for an answer.
    pub fn on_ring_timeout(&mut self, generation: Generation) -> bool {
        let expired = self
            .session
            .as_ref()
            .is_some_and(|s| s.generation == generation && s.state == CallState::Calling);
        if expired {
            info!(%generation, "Outbound call unanswered, giving up");
            self.teardown();
        }
        expired
    }

    /// Release the current call, if any, and return to idle.
    ///
    /// Returns `false` when already idle; the transport is not touched again.
    pub fn teardown(&mut self) -> bool {
        let Some(mut session) = self.session.take() else {
            return false;
        };
        if let Some(mut peer) = session.peer.take() {
            peer.close();
        }
        info!(generation = %session.generation, remote = %session.remote_id, "Call torn down");
        true
    }

    // -- helpers --------------------------------------------------------

    fn next_generation(&mut self) -> Generation {
        self.last_generation = self.last_generation.next();
        self.last_generation
    }

    fn sink(&self, generation: Generation) -> TransportEventSink {
        TransportEventSink::new(generation, self.events_tx.clone())
    }

    fn expect_state(&self, op: &'static str, expected: CallState) -> Result<(), CallError> {
        if self.state() == expected {
            Ok(())
        } else {
            Err(self.invalid(op))
        }
    }

    fn invalid(&self, op: &'static str) -> CallError {
        CallError::InvalidStateTransition {
            op,
            state: self.state().as_str(),
        }
    }
}

impl std::fmt::Debug for CallSignalingController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallSignalingController")
            .field("last_generation", &self.last_generation)
            .field("session", &self.session)
            .finish()
    }
}
