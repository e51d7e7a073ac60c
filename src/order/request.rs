use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Venue order type, numbered as MetaTrader 5 `ORDER_TYPE_*`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderTypeCode {
    Buy,
    Sell,
    BuyLimit,
    SellLimit,
    BuyStop,
    SellStop,
}

impl OrderTypeCode {
    pub fn code(&self) -> u8 {
        match self {
            OrderTypeCode::Buy => 0,
            OrderTypeCode::Sell => 1,
            OrderTypeCode::BuyLimit => 2,
            OrderTypeCode::SellLimit => 3,
            OrderTypeCode::BuyStop => 4,
            OrderTypeCode::SellStop => 5,
        }
    }
}

impl fmt::Display for OrderTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderTypeCode::Buy => "BUY",
            OrderTypeCode::Sell => "SELL",
            OrderTypeCode::BuyLimit => "BUY_LIMIT",
            OrderTypeCode::SellLimit => "SELL_LIMIT",
            OrderTypeCode::BuyStop => "BUY_STOP",
            OrderTypeCode::SellStop => "SELL_STOP",
        };
        write!(f, "{}", name)
    }
}

/// Trade operation (`TRADE_ACTION_*`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeAction {
    /// Immediate execution
    Deal,
    /// Resting order
    Pending,
}

impl TradeAction {
    pub fn code(&self) -> u8 {
        match self {
            TradeAction::Deal => 1,
            TradeAction::Pending => 5,
        }
    }
}

/// Order lifetime (`ORDER_TIME_*`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    GoodTillCancelled,
}

impl TimeInForce {
    pub fn code(&self) -> u8 {
        match self {
            TimeInForce::GoodTillCancelled => 0,
        }
    }
}

/// Fill policy (`ORDER_FILLING_*`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillPolicy {
    /// Fill what is available, keep the remainder working
    Return,
}

impl FillPolicy {
    pub fn code(&self) -> u8 {
        match self {
            FillPolicy::Return => 2,
        }
    }
}

/// A complete venue order submission
///
/// Built once per accepted intent and never changed after it is sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub action: TradeAction,
    pub symbol: String,
    pub order_type: OrderTypeCode,
    pub volume: Decimal,
    pub price: Decimal,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    /// Maximum slippage in points
    pub deviation: u32,
    /// Expert advisor id tagging orders from this bridge
    pub magic: u64,
    pub comment: String,
    pub time_in_force: TimeInForce,
    pub fill_policy: FillPolicy,
}

/// Success retcode (`TRADE_RETCODE_DONE`)
pub const RETCODE_DONE: u32 = 10009;

/// Broker response to an order submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderResult {
    pub retcode: u32,
    pub detail: String,
    pub order_ticket: Option<u64>,
}

impl OrderResult {
    pub fn is_done(&self) -> bool {
        self.retcode == RETCODE_DONE
    }
}
