//! States, roles, and effects for the call controller.

use std::fmt;

use serde::Serialize;

use crate::media::MediaStream;
use crate::protocol::Signal;
use crate::transport::{Generation, PeerSession};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallState {
    #[default]
    Idle,
    /// Outbound offer created, waiting for the answer.
    Calling,
    /// Inbound offer received, waiting for the local user.
    Ringing,
    Connected,
}

impl CallState {
    pub fn as_str(self) -> &'static str {
        match self {
            CallState::Idle => "idle",
            CallState::Calling => "calling",
            CallState::Ringing => "ringing",
            CallState::Connected => "connected",
        }
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallRole {
    Caller,
    Callee,
}

/// An offer relayed from another participant.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingOffer {
    pub from: String,
    pub signal: Signal,
    pub display_name: String,
}

/// Work the controller asks its owner to carry out.
#[derive(Debug)]
pub enum CallEffect {
    /// Relay our offer to the callee.
    SendOffer { to: String, signal: Signal },
    /// Relay our answer to the caller.
    SendAnswer { to: String, signal: Signal },
    /// The transport produced a remote stream for presentation.
    RemoteStream(MediaStream),
    /// Negotiation failed; the controller is already back to idle.
    Failed { reason: String },
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The single in-flight or active call.
pub(crate) struct CallSession {
    pub(crate) generation: Generation,
    pub(crate) role: CallRole,
    pub(crate) state: CallState,
    pub(crate) remote_id: String,
    pub(crate) remote_display_name: Option<String>,
    /// Offer waiting for the local user to answer.
    pub(crate) pending_signal: Option<Signal>,
    /// Created lazily for the callee, at answer time.
    pub(crate) peer: Option<Box<dyn PeerSession>>,
    /// Our negotiation payload has been handed to the relay.
    pub(crate) local_signal_sent: bool,
}

impl fmt::Debug for CallSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallSession")
            .field("generation", &self.generation)
            .field("role", &self.role)
            .field("state", &self.state)
            .field("remote_id", &self.remote_id)
            .field("remote_display_name", &self.remote_display_name)
            .field("has_pending_signal", &self.pending_signal.is_some())
            .field("has_peer", &self.peer.is_some())
            .field("local_signal_sent", &self.local_signal_sent)
            .finish()
    }
}
