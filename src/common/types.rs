//! Domain types shared by the parser, sizer, assembler and dispatcher

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Buy,
    Sell,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => write!(f, "BUY"),
            Direction::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("BUY") {
            Ok(Direction::Buy)
        } else if s.eq_ignore_ascii_case("SELL") {
            Ok(Direction::Sell)
        } else {
            Err(())
        }
    }
}

/// How the order should enter the market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderKind {
    /// Execute immediately at the current price
    Market,
    /// Pending order at a better price than current
    Limit,
    /// Pending order at a worse price than current (breakout)
    Stop,
}

impl OrderKind {
    /// Whether the order rests on the book until triggered
    pub fn is_pending(&self) -> bool {
        !matches!(self, OrderKind::Market)
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKind::Market => write!(f, "MARKET"),
            OrderKind::Limit => write!(f, "LIMIT"),
            OrderKind::Stop => write!(f, "STOP"),
        }
    }
}

impl FromStr for OrderKind {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MARKET" => Ok(OrderKind::Market),
            "LIMIT" => Ok(OrderKind::Limit),
            "STOP" => Ok(OrderKind::Stop),
            _ => Err(()),
        }
    }
}

/// A fully parsed trade signal
///
/// Only the signal parser builds these, so every field is present and
/// syntactically valid. No semantic checks (SL/TP side vs. direction) are
/// applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeIntent {
    direction: Direction,
    kind: OrderKind,
    symbol: String,
    risk_percent: Decimal,
    entry_price: Decimal,
    stop_loss: Decimal,
    take_profit: Decimal,
}

impl TradeIntent {
    pub(crate) fn new(
        direction: Direction,
        kind: OrderKind,
        symbol: impl Into<String>,
        risk_percent: Decimal,
        entry_price: Decimal,
        stop_loss: Decimal,
        take_profit: Decimal,
    ) -> Self {
        Self {
            direction,
            kind,
            symbol: symbol.into(),
            risk_percent,
            entry_price,
            stop_loss,
            take_profit,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn kind(&self) -> OrderKind {
        self.kind
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn risk_percent(&self) -> Decimal {
        self.risk_percent
    }

    pub fn entry_price(&self) -> Decimal {
        self.entry_price
    }

    pub fn stop_loss(&self) -> Decimal {
        self.stop_loss
    }

    pub fn take_profit(&self) -> Decimal {
        self.take_profit
    }
}

/// Renders the intent back in signal grammar
impl fmt::Display for TradeIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}% {} {} {}",
            self.direction,
            self.kind,
            self.symbol,
            self.risk_percent,
            self.entry_price,
            self.stop_loss,
            self.take_profit
        )
    }
}

/// Instrument tick economics and volume limits as reported by the broker
///
/// A snapshot for a single calculation, refetched for every trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSpec {
    /// Units of the underlying per lot
    pub contract_size: Decimal,
    /// Minimum price movement (MT5 `point`)
    pub tick_size: Decimal,
    /// Account currency per tick per lot
    pub tick_value: Decimal,
    pub volume_min: Decimal,
    pub volume_max: Decimal,
    pub volume_step: Decimal,
}
