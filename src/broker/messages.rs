//! MT5 bridge wire types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::types::InstrumentSpec;
use crate::order::OrderRequest;

/// Generic acknowledgement for lifecycle calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Result of `POST /symbols/{symbol}/select`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectResponse {
    pub selected: bool,
}

/// `GET /account`, mirrors `mt5.account_info()`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfoResponse {
    #[serde(default)]
    pub login: Option<u64>,
    #[serde(default)]
    pub currency: Option<String>,
    pub balance: Decimal,
    pub equity: Decimal,
}

/// `GET /symbols/{symbol}`, mirrors `mt5.symbol_info()`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolInfoResponse {
    #[serde(default)]
    pub name: Option<String>,
    pub trade_contract_size: Decimal,
    /// Minimum price change
    pub point: Decimal,
    pub trade_tick_value: Decimal,
    pub volume_min: Decimal,
    pub volume_max: Decimal,
    pub volume_step: Decimal,
}

impl From<SymbolInfoResponse> for InstrumentSpec {
    fn from(info: SymbolInfoResponse) -> Self {
        Self {
            contract_size: info.trade_contract_size,
            tick_size: info.point,
            tick_value: info.trade_tick_value,
            volume_min: info.volume_min,
            volume_max: info.volume_max,
            volume_step: info.volume_step,
        }
    }
}

/// `POST /orders` body, field names and codes as `mt5.order_send()` expects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSendRequest {
    pub action: u8,
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub volume: Decimal,
    #[serde(rename = "type")]
    pub order_type: u8,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub sl: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tp: Decimal,
    pub deviation: u32,
    pub magic: u64,
    pub comment: String,
    pub type_time: u8,
    pub type_filling: u8,
}

impl From<&OrderRequest> for OrderSendRequest {
    fn from(request: &OrderRequest) -> Self {
        Self {
            action: request.action.code(),
            symbol: request.symbol.clone(),
            volume: request.volume,
            order_type: request.order_type.code(),
            price: request.price,
            sl: request.stop_loss,
            tp: request.take_profit,
            deviation: request.deviation,
            magic: request.magic,
            comment: request.comment.clone(),
            type_time: request.time_in_force.code(),
            type_filling: request.fill_policy.code(),
        }
    }
}

/// `POST /orders` reply, mirrors `OrderSendResult`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSendResponse {
    pub retcode: u32,
    #[serde(default)]
    pub comment: String,
    /// Ticket of the placed order, zero when nothing was placed
    #[serde(default)]
    pub order: Option<u64>,
    #[serde(default)]
    pub deal: Option<u64>,
}
