//! SignalBridge Library
//!
//! Turns free-text trade signals posted in a chat channel into risk-sized
//! MetaTrader 5 orders.
//!
//! ```text
//! chat message -> lines -> parse_signal -> PositionSizer -> OrderAssembler
//!              -> BrokerSession::submit_order -> per-line acknowledgment
//! ```

pub mod broker;
pub mod chat;
pub mod common;
pub mod config;
pub mod dispatch;
pub mod order;
pub mod signal;
pub mod sizing;

// Re-export commonly used types
pub use broker::{BridgeBrokerClient, PaperBroker};
pub use chat::ChatGateway;
pub use common::errors::{BridgeError, ParseError, Result, SizingError};
pub use common::traits::{BrokerSession, SharedBrokerSession};
pub use common::types::{Direction, InstrumentSpec, OrderKind, TradeIntent};
pub use config::types::AppConfig;
pub use dispatch::{DispatchCoordinator, LineOutcome, LineStatus, TradeResult};
pub use order::{OrderAssembler, OrderRequest, OrderResult, OrderTypeCode};
pub use signal::parse_signal;
pub use sizing::{PositionSizer, SizedVolume, SizingResult};
