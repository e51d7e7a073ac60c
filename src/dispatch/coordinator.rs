use rust_decimal::Decimal;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::common::errors::{BridgeError, ParseError, Result, SizingError};
use crate::common::traits::SharedBrokerSession;
use crate::common::types::TradeIntent;
use crate::config::types::AppConfig;
use crate::order::OrderAssembler;
use crate::signal::parse_signal;
use crate::sizing::PositionSizer;

/// Whether a line matched the signal grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineStatus {
    Parsed,
    Rejected(ParseError),
}

/// Terminal result for a parsed line
#[derive(Debug, Clone, PartialEq)]
pub enum TradeResult {
    /// The venue accepted the order
    Success {
        volume: Decimal,
        order_ticket: Option<u64>,
    },
    /// Sizing refused the trade, nothing was sent
    SizingFailure(SizingError),
    /// The venue or the transport failed the request
    BrokerFailure {
        retcode: Option<u32>,
        reason: String,
    },
}

/// What happened to one line of an inbound message
#[derive(Debug, Clone, PartialEq)]
pub struct LineOutcome {
    pub line: String,
    pub status: LineStatus,
    /// `None` when the line was rejected by the parser
    pub trade_result: Option<TradeResult>,
}

impl LineOutcome {
    fn rejected(line: &str, error: ParseError) -> Self {
        Self {
            line: line.to_string(),
            status: LineStatus::Rejected(error),
            trade_result: None,
        }
    }

    fn parsed(line: &str, result: TradeResult) -> Self {
        Self {
            line: line.to_string(),
            status: LineStatus::Parsed,
            trade_result: Some(result),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.trade_result, Some(TradeResult::Success { .. }))
    }

    /// Reply to post back to the channel; rejected lines get none
    pub fn acknowledgment(&self) -> Option<String> {
        match &self.trade_result {
            None => None,
            Some(TradeResult::Success { .. }) => {
                Some(format!("Trade placed successfully for: {}", self.line))
            }
            Some(_) => Some(format!(
                "Failed to place trade for: {}. Check logs for details.",
                self.line
            )),
        }
    }
}

/// Drives each line of a message through parse, size, assemble and submit
///
/// Lines are processed strictly in order and each broker call completes
/// before the next one starts. A failing line never stops the lines after it.
pub struct DispatchCoordinator {
    session: SharedBrokerSession,
    sizer: PositionSizer,
    assembler: OrderAssembler,
    call_timeout: Option<Duration>,
}

impl DispatchCoordinator {
    pub fn new(session: SharedBrokerSession, sizer: PositionSizer, assembler: OrderAssembler) -> Self {
        Self {
            session,
            sizer,
            assembler,
            call_timeout: None,
        }
    }

    pub fn from_config(session: SharedBrokerSession, config: &AppConfig) -> Self {
        let coordinator = Self::new(
            session,
            PositionSizer::new().with_max_risk_percent(config.risk.max_risk_percent),
            OrderAssembler::new(&config.order),
        );

        match config.settings.broker_call_timeout_ms {
            Some(ms) => coordinator.with_call_timeout(Duration::from_millis(ms)),
            None => coordinator,
        }
    }

    /// Bound every individual broker call
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Process every line of a raw chat message
    pub async fn handle(&self, raw_message: &str) -> Vec<LineOutcome> {
        let mut outcomes = Vec::new();
        for line in raw_message.trim().lines() {
            outcomes.push(self.handle_line(line).await);
        }
        outcomes
    }

    #[instrument(skip(self))]
    async fn handle_line(&self, line: &str) -> LineOutcome {
        let intent = match parse_signal(line) {
            Ok(intent) => intent,
            Err(e) => {
                warn!("Invalid signal format: {}", e);
                return LineOutcome::rejected(line, e);
            }
        };
        debug!(?intent, "Parsed trade signal");

        let result = match self.place_trade(&intent).await {
            Ok(result) => result,
            Err(BridgeError::Sizing(e)) => {
                warn!("Sizing failed: {}", e);
                TradeResult::SizingFailure(e)
            }
            Err(BridgeError::Broker { retcode, detail }) => {
                warn!("Order failed: {} - {}", retcode, detail);
                TradeResult::BrokerFailure {
                    retcode: Some(retcode),
                    reason: detail,
                }
            }
            Err(e) => {
                warn!("Broker call failed: {}", e);
                TradeResult::BrokerFailure {
                    retcode: None,
                    reason: e.to_string(),
                }
            }
        };

        LineOutcome::parsed(line, result)
    }

    async fn place_trade(&self, intent: &TradeIntent) -> Result<TradeResult> {
        let symbol = intent.symbol();

        if !self.call("select instrument", self.session.select_instrument(symbol)).await? {
            return Err(SizingError::UnknownInstrument(symbol.to_string()).into());
        }

        let equity = self.call("account equity", self.session.account_equity()).await?;

        let spec = self
            .call("instrument spec", self.session.instrument_spec(symbol))
            .await?
            .ok_or_else(|| SizingError::UnknownInstrument(symbol.to_string()))?;

        let sized = self.sizer.size(
            equity,
            intent.risk_percent(),
            &spec,
            intent.entry_price(),
            intent.stop_loss(),
        )?;

        let request = self.assembler.assemble(intent, sized.volume);
        info!(
            "Placing trade: {} {} Volume: {} Entry: {} SL: {} TP: {}",
            request.order_type,
            request.symbol,
            request.volume,
            request.price,
            request.stop_loss,
            request.take_profit
        );

        let result = self.call("submit order", self.session.submit_order(&request)).await?;
        if !result.is_done() {
            return Err(BridgeError::Broker {
                retcode: result.retcode,
                detail: result.detail,
            });
        }

        info!(
            "Order placed on {}: retcode {} ticket {:?}",
            self.session.venue_name(),
            result.retcode,
            result.order_ticket
        );

        Ok(TradeResult::Success {
            volume: sized.volume,
            order_ticket: result.order_ticket,
        })
    }

    async fn call<T>(&self, operation: &str, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match self.call_timeout {
            Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| {
                BridgeError::Timeout(format!("{} did not complete within {:?}", operation, limit))
            })?,
            None => fut.await,
        }
    }
}

/// Replies for a processed message, in line order
pub fn acknowledgments(outcomes: &[LineOutcome]) -> Vec<String> {
    outcomes.iter().filter_map(LineOutcome::acknowledgment).collect()
}
