use async_trait::async_trait;
use huddle_common::RelayError;

use crate::protocol::RelayOutbound;

/// Outbound half of a relay connection.
///
/// Inbound events arrive on a channel handed out when the link is created;
/// the link itself only sends.
#[async_trait]
pub trait RelayLink: Send + Sync {
    /// Queue an event for the relay. Fails with [`RelayError::Closed`] when
    /// the link is down or shut down.
    async fn send(&self, event: RelayOutbound) -> Result<(), RelayError>;

    /// Close the connection and stop reconnecting.
    async fn disconnect(&self);
}
