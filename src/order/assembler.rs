use rust_decimal::Decimal;

use super::request::{FillPolicy, OrderRequest, OrderTypeCode, TimeInForce, TradeAction};
use crate::common::types::{Direction, OrderKind, TradeIntent};
use crate::config::types::OrderConfig;

/// Builds venue order requests from sized intents
///
/// Every request carries the configured deviation, magic number and comment,
/// is good-till-cancelled and uses the return fill policy.
#[derive(Debug, Clone)]
pub struct OrderAssembler {
    deviation: u32,
    magic: u64,
    comment: String,
}

impl OrderAssembler {
    pub fn new(config: &OrderConfig) -> Self {
        Self {
            deviation: config.deviation,
            magic: config.magic,
            comment: config.comment.clone(),
        }
    }

    /// Venue order type for a direction and kind
    pub fn order_type(direction: Direction, kind: OrderKind) -> OrderTypeCode {
        match (direction, kind) {
            (Direction::Buy, OrderKind::Limit) => OrderTypeCode::BuyLimit,
            (Direction::Sell, OrderKind::Limit) => OrderTypeCode::SellLimit,
            (Direction::Buy, OrderKind::Stop) => OrderTypeCode::BuyStop,
            (Direction::Sell, OrderKind::Stop) => OrderTypeCode::SellStop,
            (Direction::Buy, OrderKind::Market) => OrderTypeCode::Buy,
            (Direction::Sell, OrderKind::Market) => OrderTypeCode::Sell,
        }
    }

    pub fn assemble(&self, intent: &TradeIntent, volume: Decimal) -> OrderRequest {
        let action = if intent.kind().is_pending() {
            TradeAction::Pending
        } else {
            TradeAction::Deal
        };

        OrderRequest {
            action,
            symbol: intent.symbol().to_string(),
            order_type: Self::order_type(intent.direction(), intent.kind()),
            volume,
            price: intent.entry_price(),
            stop_loss: intent.stop_loss(),
            take_profit: intent.take_profit(),
            deviation: self.deviation,
            magic: self.magic,
            comment: self.comment.clone(),
            time_in_force: TimeInForce::GoodTillCancelled,
            fill_policy: FillPolicy::Return,
        }
    }
}

impl Default for OrderAssembler {
    fn default() -> Self {
        Self::new(&OrderConfig::default())
    }
}
