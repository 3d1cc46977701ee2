//! Configuration schema types for Huddle.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod relay;
mod session;
mod system;

pub use relay::*;
pub use session::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Huddle.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HuddleConfig {
    pub relay: RelayConfig,
    pub profile: ProfileConfig,
    pub call: CallConfig,
    pub chat: ChatConfig,
    pub media: MediaConfig,
    pub logging: LoggingConfig,
}
