//! Session coordination core for Huddle.
//!
//! Tracks presence and the chat log, and drives the two-party call
//! signaling handshake over a shared relay. Media capture, the peer-media
//! transport, and audio cues are external collaborators reached through
//! the traits in [`media`] and [`transport`].

pub mod call;
pub mod chat;
pub mod coordinator;
pub mod identity;
pub mod media;
pub mod presence;
pub mod protocol;
pub mod relay;
pub mod transport;

pub use call::{CallEffect, CallRole, CallSignalingController, CallState, IncomingOffer};
pub use chat::{ChatMessage, MessageLog};
pub use coordinator::{
    CallEndReason, Collaborators, Intent, SessionConfig, SessionCoordinator, SessionEvent,
};
pub use identity::Identity;
pub use media::{MediaCapture, MediaConstraints, MediaStream, NotificationCue};
pub use presence::{PeerRecord, PresenceRegistry};
pub use protocol::{PresenceSnapshot, RelayInbound, RelayOutbound, Signal};
pub use relay::{RelayLink, WsRelayClient, WsRelayConfig};
pub use transport::{
    Generation, PeerRole, PeerSession, PeerTransport, TransportEvent, TransportEventKind,
    TransportEventSink,
};
