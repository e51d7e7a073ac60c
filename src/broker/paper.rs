//! In-memory broker session for dry runs

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::info;

use crate::common::errors::{BridgeError, Result};
use crate::common::traits::BrokerSession;
use crate::common::types::InstrumentSpec;
use crate::config::types::PaperConfig;
use crate::order::{OrderRequest, OrderResult, RETCODE_DONE};

/// Simulated account that accepts every well-formed order
///
/// Holds a fixed equity and a static instrument table. Submitted requests
/// are recorded so a dry run can show what would have been sent.
pub struct PaperBroker {
    equity: Decimal,
    instruments: HashMap<String, InstrumentSpec>,
    submitted: Mutex<Vec<OrderRequest>>,
    next_ticket: AtomicU64,
    initialized: AtomicBool,
}

impl PaperBroker {
    pub fn new(equity: Decimal) -> Self {
        Self {
            equity,
            instruments: HashMap::new(),
            submitted: Mutex::new(Vec::new()),
            next_ticket: AtomicU64::new(1),
            initialized: AtomicBool::new(false),
        }
    }

    pub fn from_config(config: &PaperConfig) -> Self {
        let mut broker = Self::new(config.equity);
        broker.instruments = config.instruments.clone();
        broker
    }

    /// Register or replace an instrument
    pub fn with_instrument(mut self, symbol: impl Into<String>, spec: InstrumentSpec) -> Self {
        self.instruments.insert(symbol.into(), spec);
        self
    }

    /// Requests submitted so far, in order
    pub fn submitted_orders(&self) -> Vec<OrderRequest> {
        self.submitted
            .lock()
            .map(|orders| orders.clone())
            .unwrap_or_default()
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(BridgeError::Session("paper session not initialized".to_string()))
        }
    }
}

#[async_trait]
impl BrokerSession for PaperBroker {
    async fn initialize(&self) -> Result<()> {
        self.initialized.store(true, Ordering::SeqCst);
        info!(
            "Paper session initialized with equity {} and {} instruments",
            self.equity,
            self.instruments.len()
        );
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        self.initialized.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn select_instrument(&self, symbol: &str) -> Result<bool> {
        self.ensure_initialized()?;
        Ok(self.instruments.contains_key(symbol))
    }

    async fn account_equity(&self) -> Result<Decimal> {
        self.ensure_initialized()?;
        Ok(self.equity)
    }

    async fn instrument_spec(&self, symbol: &str) -> Result<Option<InstrumentSpec>> {
        self.ensure_initialized()?;
        Ok(self.instruments.get(symbol).cloned())
    }

    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderResult> {
        self.ensure_initialized()?;

        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst);
        self.submitted
            .lock()
            .map_err(|_| BridgeError::Internal("paper order log poisoned".to_string()))?
            .push(request.clone());

        info!(
            "Paper order #{}: {} {} {} @ {}",
            ticket, request.order_type, request.volume, request.symbol, request.price
        );

        Ok(OrderResult {
            retcode: RETCODE_DONE,
            detail: "Request executed (paper)".to_string(),
            order_ticket: Some(ticket),
        })
    }

    fn venue_name(&self) -> &'static str {
        "paper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn spec() -> InstrumentSpec {
        InstrumentSpec {
            contract_size: dec!(100000),
            tick_size: dec!(0.00001),
            tick_value: dec!(1),
            volume_min: dec!(0.01),
            volume_max: dec!(50),
            volume_step: dec!(0.01),
        }
    }

    #[test]
    fn test_requires_initialize() {
        let broker = PaperBroker::new(dec!(1000)).with_instrument("EURUSD", spec());

        let result = tokio_test::block_on(broker.account_equity());
        assert!(matches!(result, Err(BridgeError::Session(_))));

        tokio_test::block_on(broker.initialize()).unwrap();
        assert_eq!(tokio_test::block_on(broker.account_equity()).unwrap(), dec!(1000));
        assert!(tokio_test::block_on(broker.select_instrument("EURUSD")).unwrap());
        assert!(!tokio_test::block_on(broker.select_instrument("GBPUSD")).unwrap());
    }

    #[tokio::test]
    async fn test_from_config_loads_instruments() {
        let mut config = PaperConfig::default();
        config.instruments.insert("EURUSD".to_string(), spec());

        let broker = PaperBroker::from_config(&config);
        broker.initialize().await.unwrap();

        assert_eq!(broker.account_equity().await.unwrap(), dec!(10000));
        assert_eq!(broker.instrument_spec("EURUSD").await.unwrap(), Some(spec()));
        assert_eq!(broker.instrument_spec("USDJPY").await.unwrap(), None);
    }
}
