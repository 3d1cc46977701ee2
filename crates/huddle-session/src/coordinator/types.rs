//! Configuration, collaborators, and event/intent enums for the coordinator.

use std::sync::Arc;
use std::time::Duration;

use huddle_common::{HuddleError, MediaError};

use crate::call::CallState;
use crate::chat::ChatMessage;
use crate::media::{MediaCapture, MediaConstraints, MediaStream, NotificationCue};
use crate::presence::PeerRecord;
use crate::relay::RelayLink;
use crate::transport::{Generation, PeerTransport};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Tracks requested for the local stream.
    pub media: MediaConstraints,
    /// Play the notification cue for chat written by others.
    pub sound_cue: bool,
    /// Give up on an unanswered outbound call after this long.
    /// `None` waits indefinitely.
    pub ring_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            media: MediaConstraints::default(),
            sound_cue: true,
            ring_timeout: None,
        }
    }
}

/// External services the coordinator drives.
#[derive(Clone)]
pub struct Collaborators {
    pub relay: Arc<dyn RelayLink>,
    pub capture: Arc<dyn MediaCapture>,
    pub transport: Arc<dyn PeerTransport>,
    pub cue: Arc<dyn NotificationCue>,
}

// ---------------------------------------------------------------------------
// Events & Intents
// ---------------------------------------------------------------------------

/// Why a call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallEndReason {
    HungUp,
    Declined,
    /// Nobody answered within the ring timeout.
    TimedOut,
    Failed(String),
}

/// Updates for the front-end.
#[derive(Debug)]
pub enum SessionEvent {
    /// The relay assigned us an id.
    Connected { id: String },
    /// The relay connection dropped; presence has been cleared.
    RelayDisconnected,
    /// A connection attempt failed; the relay link will retry.
    RelayUnreachable { reason: String },
    Joined { display_name: String },
    LocalMediaReady { has_video: bool, has_audio: bool },
    /// Capture failed. Joining and chat keep working; calls do not.
    MediaUnavailable { reason: String },
    PresenceChanged { peers: Vec<PeerRecord> },
    MessageReceived { message: ChatMessage, remote: bool },
    IncomingCall { from: String, display_name: String },
    CallStateChanged {
        state: CallState,
        remote_id: Option<String>,
    },
    /// The peer's media arrived and should be presented.
    RemoteStream(MediaStream),
    CallEnded { reason: CallEndReason },
    /// An intent was refused.
    Rejected(HuddleError),
}

/// Requests from the local user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Join(String),
    SendMessage(String),
    /// Call the participant with this connection id.
    Call(String),
    Answer,
    Decline,
    Hangup,
    Shutdown,
}

/// Completions posted back by tasks the coordinator spawned.
#[derive(Debug)]
pub(crate) enum Internal {
    MediaReady(Result<MediaStream, MediaError>),
    RingTimeout(Generation),
}
