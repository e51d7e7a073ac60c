//! Common test utilities and fixtures

#![allow(dead_code)]

use rust_decimal_macros::dec;
use signal_bridge::{BrokerSession, InstrumentSpec, PaperBroker};
use std::sync::Arc;

/// The reference gold signal
pub const GOLD_SIGNAL: &str = "BUY LIMIT XAUUSD 1.5% 2750.00 2751.00 2749.00";

/// Gold: 0.01 point worth 1.0 per lot
pub fn gold_spec() -> InstrumentSpec {
    InstrumentSpec {
        contract_size: dec!(100),
        tick_size: dec!(0.01),
        tick_value: dec!(1),
        volume_min: dec!(0.01),
        volume_max: dec!(100),
        volume_step: dec!(0.01),
    }
}

/// EURUSD: 5-digit pricing, 1.0 per point per lot
pub fn eurusd_spec() -> InstrumentSpec {
    InstrumentSpec {
        contract_size: dec!(100000),
        tick_size: dec!(0.00001),
        tick_value: dec!(1),
        volume_min: dec!(0.01),
        volume_max: dec!(50),
        volume_step: dec!(0.01),
    }
}

/// Initialized paper account with 10k equity, gold and EURUSD
pub async fn paper_broker() -> Arc<PaperBroker> {
    let broker = Arc::new(
        PaperBroker::new(dec!(10000))
            .with_instrument("XAUUSD", gold_spec())
            .with_instrument("EURUSD", eurusd_spec()),
    );
    broker
        .initialize()
        .await
        .expect("paper broker should initialize");
    broker
}

/// Sample MT5 bridge responses
pub mod bridge_responses {
    pub const ACCOUNT: &str = r#"{
        "login": 5012345,
        "currency": "USD",
        "balance": "10000.00",
        "equity": "10250.50"
    }"#;

    pub const XAUUSD: &str = r#"{
        "name": "XAUUSD",
        "trade_contract_size": 100.0,
        "point": 0.01,
        "trade_tick_value": 1.0,
        "volume_min": 0.01,
        "volume_max": 100.0,
        "volume_step": 0.01
    }"#;

    pub const ORDER_DONE: &str = r#"{
        "retcode": 10009,
        "comment": "Request executed",
        "order": 987654,
        "deal": 0
    }"#;

    pub const ORDER_INVALID_STOPS: &str = r#"{
        "retcode": 10016,
        "comment": "Invalid stops",
        "order": 0
    }"#;
}
