//! Collaborators for running a session from a terminal.
//!
//! A terminal has no camera and cannot render video, so calls here carry
//! signaling only: the "stream" is a placeholder and the negotiation
//! payload just names it. Two terminals can still walk the whole call
//! handshake through the relay.

use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use huddle_common::{CueError, MediaError, TransportError};
use huddle_session::{
    MediaCapture, MediaConstraints, MediaStream, NotificationCue, PeerRole, PeerSession,
    PeerTransport, Signal, TransportEventSink,
};
use serde_json::json;
use tracing::debug;

// ---------------------------------------------------------------------------
// Capture
// ---------------------------------------------------------------------------

/// Hands out placeholder streams with the requested track flags.
#[derive(Default)]
pub struct PlaceholderCapture {
    counter: AtomicU64,
}

#[async_trait]
impl MediaCapture for PlaceholderCapture {
    async fn request_stream(
        &self,
        constraints: MediaConstraints,
    ) -> Result<MediaStream, MediaError> {
        if !constraints.video && !constraints.audio {
            return Err(MediaError::Unavailable(
                "both video and audio are disabled".into(),
            ));
        }
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        Ok(MediaStream::new(
            format!("terminal-{n}"),
            constraints.video,
            constraints.audio,
        ))
    }

    fn release(&self, stream: MediaStream) {
        debug!(stream = stream.id(), "Released placeholder stream");
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Peer transport that exchanges stream descriptions and nothing else.
pub struct SignalingOnlyTransport;

struct SignalingOnlySession {
    role: PeerRole,
    events: TransportEventSink,
}

impl PeerTransport for SignalingOnlyTransport {
    fn open(
        &self,
        role: PeerRole,
        local_stream: &MediaStream,
        events: TransportEventSink,
    ) -> Result<Box<dyn PeerSession>, TransportError> {
        let kind = match role {
            PeerRole::Initiator => "offer",
            PeerRole::Responder => "answer",
        };
        let payload = Signal::new(json!({
            "kind": kind,
            "stream": local_stream.id(),
            "video": local_stream.has_video(),
            "audio": local_stream.has_audio(),
        }));
        if !events.negotiation_payload(payload) {
            return Err(TransportError::Open("session is gone".into()));
        }
        Ok(Box::new(SignalingOnlySession { role, events }))
    }
}

impl PeerSession for SignalingOnlySession {
    fn feed_signal(&mut self, signal: Signal) {
        let value = signal.as_value();
        let Some(stream) = value.get("stream").and_then(|s| s.as_str()) else {
            self.events.failed("remote description has no stream");
            return;
        };
        let flag = |key: &str| value.get(key).and_then(|v| v.as_bool()).unwrap_or(false);
        debug!(role = ?self.role, stream, "Remote description applied");
        self.events
            .remote_stream(MediaStream::new(stream, flag("video"), flag("audio")));
    }

    fn close(&mut self) {
        debug!(generation = %self.events.generation(), "Signaling-only session closed");
    }
}

// ---------------------------------------------------------------------------
// Cue
// ---------------------------------------------------------------------------

/// Rings the terminal bell.
pub struct TerminalBell;

impl NotificationCue for TerminalBell {
    fn play_cue(&self) -> Result<(), CueError> {
        let mut stderr = std::io::stderr();
        stderr
            .write_all(b"\x07")
            .and_then(|_| stderr.flush())
            .map_err(|e| CueError::Playback(e.to_string()))
    }
}
