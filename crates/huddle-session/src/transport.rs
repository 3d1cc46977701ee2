//! Peer-media transport contract.
//!
//! The transport owns the actual peer connection. It reports back through a
//! [`TransportEventSink`] bound to the generation of the call that opened
//! it, so events from a torn-down call can be told apart from live ones.

use std::fmt;

use huddle_common::TransportError;
use tokio::sync::mpsc;

use crate::media::MediaStream;
use crate::protocol::Signal;

/// Token identifying one call session. Strictly increasing per controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether this side creates the offer or answers one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerRole {
    Initiator,
    Responder,
}

/// Factory for peer-media sessions.
pub trait PeerTransport: Send + Sync {
    /// Open a session using the borrowed local stream.
    ///
    /// The session must deliver exactly one negotiation payload through
    /// `events`, followed by any number of remote streams, or a failure.
    fn open(
        &self,
        role: PeerRole,
        local_stream: &MediaStream,
        events: TransportEventSink,
    ) -> Result<Box<dyn PeerSession>, TransportError>;
}

/// A live peer-media session.
pub trait PeerSession: Send {
    /// Apply the remote side's negotiation payload.
    fn feed_signal(&mut self, signal: Signal);

    /// Release the connection. Called at most once.
    fn close(&mut self);
}

/// What a transport reported.
#[derive(Debug)]
pub enum TransportEventKind {
    NegotiationPayload(Signal),
    RemoteStream(MediaStream),
    Failed(String),
}

/// A transport report tagged with the generation that produced it.
#[derive(Debug)]
pub struct TransportEvent {
    pub generation: Generation,
    pub kind: TransportEventKind,
}

/// Handle given to a transport session for reporting back to the controller.
#[derive(Debug, Clone)]
pub struct TransportEventSink {
    generation: Generation,
    tx: mpsc::UnboundedSender<TransportEvent>,
}

impl TransportEventSink {
    pub(crate) fn new(generation: Generation, tx: mpsc::UnboundedSender<TransportEvent>) -> Self {
        Self { generation, tx }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns `false` once the controller is gone.
    pub fn negotiation_payload(&self, signal: Signal) -> bool {
        self.send(TransportEventKind::NegotiationPayload(signal))
    }

    pub fn remote_stream(&self, stream: MediaStream) -> bool {
        self.send(TransportEventKind::RemoteStream(stream))
    }

    pub fn failed(&self, reason: impl Into<String>) -> bool {
        self.send(TransportEventKind::Failed(reason.into()))
    }

    fn send(&self, kind: TransportEventKind) -> bool {
        self.tx
            .send(TransportEvent {
                generation: self.generation,
                kind,
            })
            .is_ok()
    }
}
