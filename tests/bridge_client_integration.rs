//! Integration tests for the MT5 bridge client
//!
//! Uses wiremock to stand in for the bridge's HTTP endpoints.

mod common;

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::json;
use signal_bridge::config::types::{ApiCredentials, AppConfig, EquitySource};
use signal_bridge::{
    BridgeBrokerClient, BridgeError, BrokerSession, DispatchCoordinator, TradeResult,
};
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::bridge_responses::{ACCOUNT, ORDER_DONE, ORDER_INVALID_STOPS, XAUUSD};
use common::GOLD_SIGNAL;

fn json_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/json")
}

fn client_for(server: &MockServer) -> BridgeBrokerClient {
    BridgeBrokerClient::new(&server.uri()).unwrap()
}

async fn mount_gold(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/symbols/XAUUSD/select"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "selected": true })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/symbols/XAUUSD"))
        .respond_with(json_response(XAUUSD))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/account"))
        .respond_with(json_response(ACCOUNT))
        .mount(server)
        .await;
}

// ============================================================================
// Session lifecycle
// ============================================================================

#[tokio::test]
async fn test_initialize_and_shutdown() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/initialize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/shutdown"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.initialize().await.unwrap();
    assert!(client.is_initialized());

    client.shutdown().await.unwrap();
    assert!(!client.is_initialized());
}

#[tokio::test]
async fn test_initialize_failure_is_session_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/initialize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": false,
            "error": "terminal not running"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    match client.initialize().await {
        Err(BridgeError::Session(reason)) => assert_eq!(reason, "terminal not running"),
        other => panic!("Expected session error, got {:?}", other),
    }
    assert!(!client.is_initialized());
}

// ============================================================================
// Queries
// ============================================================================

#[tokio::test]
async fn test_account_balance_or_equity() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/account"))
        .respond_with(json_response(ACCOUNT))
        .mount(&server)
        .await;

    let by_balance = client_for(&server);
    assert_eq!(by_balance.account_equity().await.unwrap(), dec!(10000.00));

    let by_equity = client_for(&server).with_equity_source(EquitySource::Equity);
    assert_eq!(by_equity.account_equity().await.unwrap(), dec!(10250.50));
}

#[tokio::test]
async fn test_instrument_spec_found_and_missing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/symbols/XAUUSD"))
        .respond_with(json_response(XAUUSD))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/symbols/NOPE"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let spec = client.instrument_spec("XAUUSD").await.unwrap().unwrap();
    assert_eq!(spec, common::gold_spec());

    assert_eq!(client.instrument_spec("NOPE").await.unwrap(), None);
}

#[tokio::test]
async fn test_select_unknown_symbol() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/symbols/NOPE/select"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(!client.select_instrument("NOPE").await.unwrap());
}

#[tokio::test]
async fn test_unauthorized_is_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/account"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad signature"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(matches!(
        client.account_equity().await,
        Err(BridgeError::Authentication(_))
    ));
}

#[tokio::test]
async fn test_server_error_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/account"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(matches!(
        client.account_equity().await,
        Err(BridgeError::InvalidResponse(_))
    ));
}

// ============================================================================
// Full dispatch through the bridge
// ============================================================================

#[test_log::test(tokio::test)]
async fn test_signed_order_is_sent_with_mt5_fields() {
    let server = MockServer::start().await;
    mount_gold(&server).await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(header_exists("X-BRIDGE-KEY"))
        .and(header_exists("X-BRIDGE-SIGNATURE"))
        .and(header_exists("X-BRIDGE-TIMESTAMP"))
        .and(body_partial_json(json!({
            "action": 5,
            "symbol": "XAUUSD",
            "volume": 1.5,
            "type": 2,
            "price": 2750.0,
            "sl": 2751.0,
            "tp": 2749.0,
            "deviation": 20,
            "magic": 234000,
            "comment": "Discord signal trade",
            "type_time": 0,
            "type_filling": 2
        })))
        .respond_with(json_response(ORDER_DONE))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).with_credentials(ApiCredentials::new(
        "bridge-key".to_string(),
        "c2VjcmV0LWtleS1mb3ItdGVzdGluZw==".to_string(),
    ));
    let coordinator = DispatchCoordinator::from_config(Arc::new(client), &AppConfig::default());

    let outcomes = coordinator.handle(GOLD_SIGNAL).await;

    assert_eq!(
        outcomes[0].trade_result,
        Some(TradeResult::Success {
            volume: dec!(1.5),
            order_ticket: Some(987654)
        })
    );
}

#[tokio::test]
async fn test_rejected_order_reports_retcode() {
    let server = MockServer::start().await;
    mount_gold(&server).await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(json_response(ORDER_INVALID_STOPS))
        .mount(&server)
        .await;

    let coordinator =
        DispatchCoordinator::from_config(Arc::new(client_for(&server)), &AppConfig::default());

    let outcomes = coordinator.handle(GOLD_SIGNAL).await;

    assert_eq!(
        outcomes[0].trade_result,
        Some(TradeResult::BrokerFailure {
            retcode: Some(10016),
            reason: "Invalid stops".to_string()
        })
    );
    assert!(outcomes[0]
        .acknowledgment()
        .unwrap()
        .starts_with("Failed to place trade for: BUY LIMIT XAUUSD"));
}
