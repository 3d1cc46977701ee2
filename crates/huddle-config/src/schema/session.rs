//! Profile, call, chat, and media configuration types.

use serde::{Deserialize, Serialize};

/// Local participant profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Display name used to join automatically. Unset means prompt.
    pub display_name: Option<String>,
}

/// Call negotiation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CallConfig {
    /// Give up on an unanswered outbound call after this many seconds.
    /// Unset waits indefinitely.
    pub ring_timeout_secs: Option<u32>,
}

/// Chat behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Trigger the notification cue for messages from other participants.
    pub sound_cue: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self { sound_cue: true }
    }
}

/// Local media capture request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub video: bool,
    pub audio: bool,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            video: true,
            audio: true,
        }
    }
}
