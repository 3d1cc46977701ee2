//! Media capture and notification-cue collaborator contracts.

use async_trait::async_trait;
use huddle_common::{CueError, MediaError};

/// Opaque handle to a captured or remote media stream.
///
/// Deliberately not `Clone`: the local stream is owned by the session
/// coordinator and lent to the peer-media transport by reference.
#[derive(Debug, PartialEq, Eq)]
pub struct MediaStream {
    id: String,
    video: bool,
    audio: bool,
}

impl MediaStream {
    pub fn new(id: impl Into<String>, video: bool, audio: bool) -> Self {
        Self {
            id: id.into(),
            video,
            audio,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn has_video(&self) -> bool {
        self.video
    }

    pub fn has_audio(&self) -> bool {
        self.audio
    }
}

/// Which tracks to request from the capture device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    pub video: bool,
    pub audio: bool,
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self {
            video: true,
            audio: true,
        }
    }
}

/// Camera/microphone capture.
#[async_trait]
pub trait MediaCapture: Send + Sync {
    /// Request a local stream. Resolves exactly once.
    async fn request_stream(&self, constraints: MediaConstraints)
        -> Result<MediaStream, MediaError>;

    /// Stop the tracks of a stream previously returned by `request_stream`.
    fn release(&self, stream: MediaStream);
}

/// Audible cue for incoming chat. Fire-and-forget: the caller logs and
/// swallows any error.
pub trait NotificationCue: Send + Sync {
    fn play_cue(&self) -> Result<(), CueError>;
}
