//! Relay event contract.
//!
//! Every event travels as one JSON text frame, internally tagged with a
//! snake_case `type` field. Payload shapes are the contract; the transport
//! carrying them is handled by the `relay` module.

use std::collections::HashMap;

use huddle_common::RelayError;
use serde::{Deserialize, Serialize};

/// Opaque negotiation payload produced by the peer-media transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signal(pub serde_json::Value);

impl Signal {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Full participant listing: connection id to display name.
///
/// Values are kept as raw JSON so that malformed entries can be dropped
/// one by one instead of failing the whole snapshot.
pub type PresenceSnapshot = HashMap<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Events this client sends to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayOutbound {
    Join {
        display_name: String,
    },
    ChatSend {
        display_name: String,
        text: String,
    },
    CallOffer {
        to: String,
        signal: Signal,
        display_name: String,
    },
    CallAnswer {
        to: String,
        signal: Signal,
    },
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// Events the relay delivers to this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayInbound {
    /// Connection established; carries the id the relay assigned to us.
    Connected { id: String },
    /// Connection lost. Synthesized by the link, never sent by the relay.
    #[serde(skip)]
    Disconnected,
    /// A connection attempt failed or timed out; the link keeps retrying.
    /// Synthesized by the link.
    #[serde(skip)]
    ConnectFailed { reason: String },
    PresenceSnapshot {
        participants: PresenceSnapshot,
    },
    ChatReceived {
        display_name: String,
        text: String,
    },
    CallOfferReceived {
        from: String,
        signal: Signal,
        display_name: String,
    },
    CallAnswerReceived {
        signal: Signal,
    },
}

/// Serialize an outbound event into a text frame.
pub fn encode_outbound(event: &RelayOutbound) -> Result<String, RelayError> {
    serde_json::to_string(event).map_err(|e| RelayError::Encode(e.to_string()))
}

/// Parse a text frame received from the relay.
pub fn decode_inbound(text: &str) -> Result<RelayInbound, serde_json::Error> {
    serde_json::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outbound_events_are_tagged_snake_case() {
        let join = encode_outbound(&RelayOutbound::Join {
            display_name: "alice".into(),
        })
        .unwrap();
        assert_eq!(join, r#"{"type":"join","display_name":"alice"}"#);

        let offer = RelayOutbound::CallOffer {
            to: "b-1".into(),
            signal: Signal::new(json!({"sdp": "v=0"})),
            display_name: "alice".into(),
        };
        let value: serde_json::Value =
            serde_json::from_str(&encode_outbound(&offer).unwrap()).unwrap();
        assert_eq!(value["type"], "call_offer");
        assert_eq!(value["to"], "b-1");
        assert_eq!(value["signal"]["sdp"], "v=0");
    }

    #[test]
    fn decodes_presence_snapshot_with_malformed_entries() {
        let event = decode_inbound(
            r#"{"type":"presence_snapshot","participants":{"a":"Alice","b":null,"c":7}}"#,
        )
        .unwrap();
        match event {
            RelayInbound::PresenceSnapshot { participants } => {
                assert_eq!(participants.len(), 3);
                assert_eq!(participants["a"], json!("Alice"));
                assert!(participants["b"].is_null());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn decodes_call_events() {
        let offer = decode_inbound(
            r#"{"type":"call_offer_received","from":"a","signal":{"type":"offer"},"display_name":"Alice"}"#,
        )
        .unwrap();
        assert_eq!(
            offer,
            RelayInbound::CallOfferReceived {
                from: "a".into(),
                signal: Signal::new(json!({"type": "offer"})),
                display_name: "Alice".into(),
            }
        );

        let answer =
            decode_inbound(r#"{"type":"call_answer_received","signal":"opaque"}"#).unwrap();
        assert_eq!(
            answer,
            RelayInbound::CallAnswerReceived {
                signal: Signal::new(json!("opaque")),
            }
        );
    }

    #[test]
    fn relay_cannot_forge_link_events() {
        assert!(decode_inbound(r#"{"type":"disconnected"}"#).is_err());
        assert!(decode_inbound(r#"{"type":"connect_failed","reason":"x"}"#).is_err());
    }

    #[test]
    fn unknown_event_is_an_error() {
        assert!(decode_inbound(r#"{"type":"poke","target":"x"}"#).is_err());
        assert!(decode_inbound("not json").is_err());
    }
}
