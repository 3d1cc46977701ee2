//! Call signaling state machine.
//!
//! Drives one two-party call at a time through `Idle -> Calling -> Connected`
//! (outbound) or `Idle -> Ringing -> Connected` (inbound). The controller
//! owns the peer-media session for the current call and hands outbound
//! relay traffic back to its caller as [`CallEffect`]s; it never touches the
//! relay itself.

mod controller;
mod types;


pub use controller::CallSignalingController;
pub use types::{CallEffect, CallRole, CallState, IncomingOffer};
