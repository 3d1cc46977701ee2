//! The coordinator struct, its accessors, and the event loop.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::call::{CallSignalingController, CallState};
use crate::chat::MessageLog;
use crate::identity::Identity;
use crate::media::{MediaCapture, MediaStream, NotificationCue};
use crate::presence::{PeerRecord, PresenceRegistry};
use crate::protocol::RelayInbound;
use crate::relay::RelayLink;
use crate::transport::TransportEvent;

use super::types::{Collaborators, Intent, Internal, SessionConfig, SessionEvent};

/// What the event loop picked up next.
enum Next {
    Relay(RelayInbound),
    RelayClosed,
    Intent(Intent),
    Transport(TransportEvent),
    Internal(Internal),
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

pub struct SessionCoordinator {
    pub(super) config: SessionConfig,
    pub(super) relay: Arc<dyn RelayLink>,
    pub(super) capture: Arc<dyn MediaCapture>,
    pub(super) cue: Arc<dyn NotificationCue>,

    /// Relay-assigned connection id, while connected.
    pub(super) local_id: Option<String>,
    /// Set by a successful join; never cleared.
    pub(super) display_name: Option<String>,

    pub(super) presence: PresenceRegistry,
    pub(super) messages: MessageLog,
    pub(super) calls: CallSignalingController,
    /// Last call state reported to the front-end.
    pub(super) reported_state: CallState,

    /// Owned here and lent to the transport for the duration of a call.
    pub(super) local_stream: Option<MediaStream>,
    pub(super) media_requested: bool,
    pub(super) shut_down: bool,

    pub(super) transport_rx: mpsc::UnboundedReceiver<TransportEvent>,
    pub(super) internal_tx: mpsc::UnboundedSender<Internal>,
    internal_rx: mpsc::UnboundedReceiver<Internal>,
    event_tx: mpsc::Sender<SessionEvent>,
}

impl SessionCoordinator {
    /// Create a coordinator. Returns `(coordinator, event_receiver)`.
    pub fn new(
        config: SessionConfig,
        collaborators: Collaborators,
    ) -> (Self, mpsc::Receiver<SessionEvent>) {
        let (event_tx, event_rx) = mpsc::channel(256);
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();
        let (calls, transport_rx) = CallSignalingController::new(collaborators.transport);

        let coordinator = Self {
            config,
            relay: collaborators.relay,
            capture: collaborators.capture,
            cue: collaborators.cue,
            local_id: None,
            display_name: None,
            presence: PresenceRegistry::new(),
            messages: MessageLog::new(),
            calls,
            reported_state: CallState::Idle,
            local_stream: None,
            media_requested: false,
            shut_down: false,
            transport_rx,
            internal_tx,
            internal_rx,
            event_tx,
        };
        (coordinator, event_rx)
    }

    // -- accessors ------------------------------------------------------

    pub fn local_id(&self) -> Option<&str> {
        self.local_id.as_deref()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Our identity, once both connected and joined.
    pub fn identity(&self) -> Option<Identity> {
        match (&self.local_id, &self.display_name) {
            (Some(id), Some(name)) => Some(Identity::new(id.clone(), name.clone())),
            _ => None,
        }
    }

    /// Connected participants other than ourselves.
    pub fn peers(&self) -> Vec<PeerRecord> {
        self.presence.list(self.local_id.as_deref().unwrap_or_default())
    }

    pub fn presence(&self) -> &PresenceRegistry {
        &self.presence
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn call_state(&self) -> CallState {
        self.calls.state()
    }

    pub fn calls(&self) -> &CallSignalingController {
        &self.calls
    }

    pub fn has_local_stream(&self) -> bool {
        self.local_stream.is_some()
    }

    // -- event loop -----------------------------------------------------

    /// Run until a shutdown intent arrives or the intent channel closes.
    pub async fn run(
        mut self,
        mut relay_rx: mpsc::Receiver<RelayInbound>,
        mut intent_rx: mpsc::Receiver<Intent>,
    ) {
        let mut relay_open = true;
        info!("Session coordinator started");

        loop {
            let next = tokio::select! {
                event = relay_rx.recv(), if relay_open => match event {
                    Some(event) => Next::Relay(event),
                    None => Next::RelayClosed,
                },
                intent = intent_rx.recv() => match intent {
                    Some(intent) => Next::Intent(intent),
                    None => Next::Intent(Intent::Shutdown),
                },
                Some(event) = self.transport_rx.recv() => Next::Transport(event),
                Some(internal) = self.internal_rx.recv() => Next::Internal(internal),
            };

            match next {
                Next::Relay(event) => self.handle_relay_event(event).await,
                Next::RelayClosed => {
                    debug!("Relay event stream ended");
                    relay_open = false;
                    self.handle_relay_event(RelayInbound::Disconnected).await;
                }
                Next::Intent(intent) => {
                    if !self.handle_intent(intent).await {
                        break;
                    }
                }
                Next::Transport(event) => self.handle_transport_event(event).await,
                Next::Internal(internal) => self.handle_internal(internal).await,
            }
        }

        info!("Session coordinator stopped");
    }

    /// Wait for and handle one transport report or background completion.
    ///
    /// For driving the coordinator from an external loop instead of
    /// [`Self::run`].
    pub async fn process_next(&mut self) {
        let next = tokio::select! {
            biased;
            Some(event) = self.transport_rx.recv() => Next::Transport(event),
            Some(internal) = self.internal_rx.recv() => Next::Internal(internal),
        };
        match next {
            Next::Transport(event) => self.handle_transport_event(event).await,
            Next::Internal(internal) => self.handle_internal(internal).await,
            Next::Relay(_) | Next::RelayClosed | Next::Intent(_) => {}
        }
    }

    /// Queue an update for the front-end.
    ///
    /// The returned future owns its sender, so awaiting it holds no borrow
    /// of the coordinator; the coordinator is `Send` but not `Sync`.
    pub(super) fn emit(&self, event: SessionEvent) -> impl Future<Output = ()> + Send + 'static {
        let tx = self.event_tx.clone();
        async move {
            let _ = tx.send(event).await;
        }
    }

    /// Report the controller's state if it moved since the last report.
    pub(super) async fn sync_call_state(&mut self) {
        let state = self.calls.state();
        if state == self.reported_state {
            return;
        }
        self.reported_state = state;
        let remote_id = self.calls.remote_id().map(str::to_string);
        self.emit(SessionEvent::CallStateChanged { state, remote_id })
            .await;
    }
}
