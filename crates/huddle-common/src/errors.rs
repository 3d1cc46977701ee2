use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("no per-user config directory on this platform")]
    NoConfigDir,

    #[error("could not write {}: {reason}", path.display())]
    WriteFailed { path: PathBuf, reason: String },
}

/// Capture permission denied or no device present.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaError {
    #[error("media unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("peer transport could not be opened: {0}")]
    Open(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CueError {
    #[error("cue playback failed: {0}")]
    Playback(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallError {
    #[error("cannot {op} while {state}")]
    InvalidStateTransition {
        op: &'static str,
        state: &'static str,
    },

    #[error("stale signaling event (generation {0})")]
    Stale(u64),

    #[error(transparent)]
    MediaUnavailable(#[from] MediaError),

    #[error("signaling failed: {0}")]
    SignalingFailed(String),
}

impl From<TransportError> for CallError {
    fn from(err: TransportError) -> Self {
        CallError::SignalingFailed(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelayError {
    #[error("relay link closed")]
    Closed,

    #[error("relay connect error: {0}")]
    Connect(String),

    #[error("relay encode error: {0}")]
    Encode(String),

    #[error("relay transport error: {0}")]
    Transport(String),
}

/// Intents rejected by the session coordinator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("display name must not be blank")]
    BlankDisplayName,

    #[error("already joined as {0}")]
    AlreadyJoined(String),

    #[error("not joined")]
    NotJoined,

    #[error("unknown participant: {0}")]
    UnknownPeer(String),

    #[error("cannot call yourself")]
    SelfCall,
}

#[derive(Debug, thiserror::Error)]
pub enum HuddleError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Call(#[from] CallError),

    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
