pub mod errors;

pub use errors::{
    CallError, ConfigError, CueError, HuddleError, MediaError, RelayError, SessionError,
    TransportError,
};

pub type Result<T> = std::result::Result<T, HuddleError>;
