//! Integration tests for the chat relay gateway
//!
//! Runs a throwaway websocket relay on a local port and drives the gateway
//! against the paper account.

mod common;

use futures_util::{SinkExt, Stream, StreamExt};
use pretty_assertions::assert_eq;
use serde_json::json;
use signal_bridge::chat::messages::{ChatOutbound, ChatReply};
use signal_bridge::config::types::{AppConfig, ChatConfig};
use signal_bridge::{ChatGateway, DispatchCoordinator, OrderTypeCode};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::protocol::Message;

use common::{paper_broker, GOLD_SIGNAL};

async fn next_outbound<S>(ws: &mut S) -> ChatOutbound
where
    S: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => match serde_json::from_str(&text).unwrap() {
                ChatOutbound::Ping | ChatOutbound::Pong => continue,
                frame => return frame,
            },
            Some(Ok(_)) => continue,
            other => panic!("Relay stream ended: {:?}", other),
        }
    }
}

#[test_log::test(tokio::test)]
async fn test_gateway_acknowledges_signals_in_line_order() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let relay = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();

        assert_eq!(
            next_outbound(&mut ws).await,
            ChatOutbound::Identify {
                token: Some("relay-token".to_string())
            }
        );

        let frames = [
            json!({ "type": "ready", "user_id": "bot-1" }),
            json!({
                "type": "message",
                "id": "m-1",
                "channel_id": "signals",
                "author_id": "bot-1",
                "content": GOLD_SIGNAL
            }),
            json!({
                "type": "message",
                "id": "m-2",
                "channel_id": "general",
                "author_id": "trader",
                "content": GOLD_SIGNAL
            }),
            json!({
                "type": "message",
                "id": "m-3",
                "channel_id": "signals",
                "author_id": "trader",
                "content": format!("{}\ngood luck all\nSELL LIMIT GBPJPY 1% 191.3 191.8 189.1", GOLD_SIGNAL)
            }),
        ];
        for frame in frames {
            ws.send(Message::Text(frame.to_string())).await.unwrap();
        }

        let first = next_outbound(&mut ws).await;
        let second = next_outbound(&mut ws).await;
        ws.close(None).await.unwrap();
        (first, second)
    });

    let broker = paper_broker().await;
    let coordinator = DispatchCoordinator::from_config(broker.clone(), &AppConfig::default());
    let gateway = ChatGateway::new(&ChatConfig {
        gateway_url: format!("ws://{}", addr),
        token: Some("relay-token".to_string()),
        bot_user_id: None,
        channels: vec!["signals".to_string()],
    });

    tokio::time::timeout(Duration::from_secs(10), gateway.run(&coordinator))
        .await
        .expect("gateway should stop when the relay closes")
        .unwrap();
    assert!(!gateway.is_connected());

    let (first, second) = relay.await.unwrap();
    assert_eq!(
        first,
        ChatOutbound::Reply(ChatReply {
            channel_id: "signals".to_string(),
            content: format!("Trade placed successfully for: {}", GOLD_SIGNAL),
        })
    );
    assert_eq!(
        second,
        ChatOutbound::Reply(ChatReply {
            channel_id: "signals".to_string(),
            content: "Failed to place trade for: SELL LIMIT GBPJPY 1% 191.3 191.8 189.1. Check logs for details."
                .to_string(),
        })
    );

    // Only the trader's message in the allowed channel produced an order
    let orders = broker.submitted_orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].order_type, OrderTypeCode::BuyLimit);
}

#[tokio::test]
async fn test_gateway_connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let broker = paper_broker().await;
    let coordinator = DispatchCoordinator::from_config(broker, &AppConfig::default());
    let gateway = ChatGateway::new(&ChatConfig {
        gateway_url: format!("ws://{}", addr),
        ..ChatConfig::default()
    });

    assert!(gateway.run(&coordinator).await.is_err());
    assert!(!gateway.is_connected());
}
