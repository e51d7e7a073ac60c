//! Trait definitions for the broker collaborator

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::errors::Result;
use super::types::InstrumentSpec;
use crate::order::{OrderRequest, OrderResult};

/// Session with the trading venue
///
/// The caller creates the session, calls `initialize` before dispatching any
/// signal and `shutdown` once the chat session ends. Implementations are
/// responsible for their own thread safety; the dispatcher only ever has one
/// call in flight.
#[async_trait]
pub trait BrokerSession: Send + Sync {
    /// Open the terminal connection
    async fn initialize(&self) -> Result<()>;

    /// Close the terminal connection
    async fn shutdown(&self) -> Result<()>;

    /// Make the symbol available for trading (MT5 market watch)
    ///
    /// Returns `false` when the venue does not know the symbol.
    async fn select_instrument(&self, symbol: &str) -> Result<bool>;

    /// Account figure that risk percentages are measured against
    async fn account_equity(&self) -> Result<Decimal>;

    /// Live tick economics for a symbol, `None` if unknown
    async fn instrument_spec(&self, symbol: &str) -> Result<Option<InstrumentSpec>>;

    /// Send an order and wait for the venue's terminal answer
    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderResult>;

    /// Name used in logs
    fn venue_name(&self) -> &'static str;
}

/// Shared broker session for dynamic dispatch
pub type SharedBrokerSession = std::sync::Arc<dyn BrokerSession>;
