//! Session coordinator: the single owner of presence, chat, and call state.
//!
//! Relay events, user intents, transport reports, and background
//! completions all funnel into one task and are applied one at a time
//! through `&mut self`, so no state is shared across threads.

mod core;
mod dispatch;
mod intents;
mod types;


pub use self::core::SessionCoordinator;
pub use types::{CallEndReason, Collaborators, Intent, SessionConfig, SessionEvent};
