//! Relay link: the contract the coordinator talks to, and a WebSocket
//! client implementing it.
//!
//! The client runs a background connection task that reconnects with
//! exponential backoff and replays the last `join` on every new
//! connection, so the relay re-announces us after a drop.

mod client;
mod connection;
mod link;
mod types;

#[cfg(test)]
mod tests;

pub use client::WsRelayClient;
pub use link::RelayLink;
pub use types::WsRelayConfig;
