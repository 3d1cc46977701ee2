use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use huddle_common::RelayError;
use serde_json::json;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{accept_async, WebSocketStream};

use super::*;
use crate::protocol::{RelayInbound, RelayOutbound, Signal};

const WAIT: Duration = Duration::from_secs(5);

async fn listen() -> (TcpListener, WsRelayConfig) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let config = WsRelayConfig {
        url: format!("ws://{addr}"),
        connect_timeout_secs: 5,
        reconnect_delay_secs: 1,
        max_reconnect_delay_secs: 1,
    };
    (listener, config)
}

async fn accept(listener: &TcpListener, id: &str) -> WebSocketStream<TcpStream> {
    let (tcp, _) = tokio::time::timeout(WAIT, listener.accept())
        .await
        .unwrap()
        .unwrap();
    let mut ws = accept_async(tcp).await.unwrap();
    let hello = json!({"type": "connected", "id": id}).to_string();
    ws.send(WsMessage::Text(hello.into())).await.unwrap();
    ws
}

async fn next_frame(ws: &mut WebSocketStream<TcpStream>) -> serde_json::Value {
    loop {
        let frame = tokio::time::timeout(WAIT, ws.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        if let WsMessage::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

async fn next_event(rx: &mut mpsc::Receiver<RelayInbound>) -> RelayInbound {
    tokio::time::timeout(WAIT, rx.recv()).await.unwrap().unwrap()
}

#[tokio::test]
async fn exchanges_events_with_relay() {
    let (listener, config) = listen().await;
    let (client, mut events) = WsRelayClient::connect(config);
    let mut server = accept(&listener, "abc").await;

    assert_eq!(
        next_event(&mut events).await,
        RelayInbound::Connected { id: "abc".into() }
    );
    assert!(client.is_connected().await);

    client
        .send(RelayOutbound::Join {
            display_name: "alice".into(),
        })
        .await
        .unwrap();
    client
        .send(RelayOutbound::ChatSend {
            display_name: "alice".into(),
            text: "hi".into(),
        })
        .await
        .unwrap();

    assert_eq!(
        next_frame(&mut server).await,
        json!({"type": "join", "display_name": "alice"})
    );
    assert_eq!(
        next_frame(&mut server).await,
        json!({"type": "chat_send", "display_name": "alice", "text": "hi"})
    );

    let answer = json!({"type": "call_answer_received", "signal": {"sdp": "a"}}).to_string();
    server.send(WsMessage::Text(answer.into())).await.unwrap();
    assert_eq!(
        next_event(&mut events).await,
        RelayInbound::CallAnswerReceived {
            signal: Signal::new(json!({"sdp": "a"})),
        }
    );
}

#[tokio::test]
async fn skips_unrecognized_frames() {
    let (listener, config) = listen().await;
    let (_client, mut events) = WsRelayClient::connect(config);
    let mut server = accept(&listener, "abc").await;
    next_event(&mut events).await;

    server
        .send(WsMessage::Text("{\"type\":\"poke\"}".to_string().into()))
        .await
        .unwrap();
    let chat = json!({"type": "chat_received", "display_name": "bob", "text": "yo"}).to_string();
    server.send(WsMessage::Text(chat.into())).await.unwrap();

    assert_eq!(
        next_event(&mut events).await,
        RelayInbound::ChatReceived {
            display_name: "bob".into(),
            text: "yo".into(),
        }
    );
}

#[tokio::test]
async fn reconnects_and_replays_join() {
    let (listener, config) = listen().await;
    let (client, mut events) = WsRelayClient::connect(config);

    let mut server = accept(&listener, "first").await;
    next_event(&mut events).await;
    client
        .send(RelayOutbound::Join {
            display_name: "alice".into(),
        })
        .await
        .unwrap();
    next_frame(&mut server).await;
    drop(server);

    assert_eq!(next_event(&mut events).await, RelayInbound::Disconnected);

    let mut server = accept(&listener, "second").await;
    assert_eq!(
        next_frame(&mut server).await,
        json!({"type": "join", "display_name": "alice"})
    );
    assert_eq!(
        next_event(&mut events).await,
        RelayInbound::Connected {
            id: "second".into()
        }
    );
}

#[tokio::test]
async fn send_after_disconnect_fails() {
    let (listener, config) = listen().await;
    let (client, mut events) = WsRelayClient::connect(config);
    let _server = accept(&listener, "abc").await;
    next_event(&mut events).await;

    client.disconnect().await;
    assert_eq!(next_event(&mut events).await, RelayInbound::Disconnected);
    assert!(!client.is_connected().await);

    let err = client
        .send(RelayOutbound::ChatSend {
            display_name: "alice".into(),
            text: "late".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err, RelayError::Closed);
}

#[tokio::test]
async fn reports_unreachable_relay_and_keeps_retrying() {
    let (listener, config) = listen().await;
    drop(listener);
    let (client, mut events) = WsRelayClient::connect(config);

    for _ in 0..2 {
        match next_event(&mut events).await {
            RelayInbound::ConnectFailed { reason } => {
                assert!(reason.starts_with("relay connect error"), "{reason}");
            }
            other => panic!("expected ConnectFailed, got {other:?}"),
        }
    }
    assert!(!client.is_connected().await);
}
