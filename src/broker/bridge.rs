//! REST client for an MT5 terminal bridge
//!
//! MetaTrader 5 only exposes its trading API inside the terminal process, so
//! the bridge is a small service running next to the terminal that forwards
//! these endpoints to `mt5.initialize`, `symbol_select`, `account_info`,
//! `symbol_info` and `order_send`.

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::auth::AuthHeaders;
use super::messages::*;
use crate::common::errors::{BridgeError, Result};
use crate::common::traits::BrokerSession;
use crate::common::types::InstrumentSpec;
use crate::config::types::{ApiCredentials, BrokerConfig, EquitySource};
use crate::order::{OrderRequest, OrderResult};

/// Broker session backed by the MT5 bridge service
#[derive(Debug)]
pub struct BridgeBrokerClient {
    /// HTTP client
    client: Client,
    /// Bridge base URL without trailing slash
    base_url: String,
    /// Optional credentials for signed requests
    credentials: Option<ApiCredentials>,
    /// Account figure reported as equity
    equity_source: EquitySource,
    /// Set between initialize and shutdown
    initialized: AtomicBool,
}

impl BridgeBrokerClient {
    /// Create a new bridge client with the default 30s timeout
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Create a new bridge client with custom timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        Url::parse(base_url)
            .map_err(|e| BridgeError::Configuration(format!("Invalid bridge URL '{}': {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BridgeError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials: None,
            equity_source: EquitySource::default(),
            initialized: AtomicBool::new(false),
        })
    }

    /// Build a client from the broker section of the config
    pub fn from_config(config: &BrokerConfig, equity_source: EquitySource) -> Result<Self> {
        let client = Self::with_timeout(
            &config.bridge_url,
            Duration::from_secs(config.request_timeout_seconds),
        )?
        .with_equity_source(equity_source);

        Ok(match config.credentials() {
            Some(creds) => client.with_credentials(creds),
            None => client,
        })
    }

    /// Sign every request with these credentials
    pub fn with_credentials(mut self, credentials: ApiCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_equity_source(mut self, equity_source: EquitySource) -> Self {
        self.equity_source = equity_source;
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Send a request, signing it when credentials are set
    async fn send(&self, method: Method, path: &str, body: Option<String>) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), &url);

        if let Some(creds) = &self.credentials {
            let headers =
                AuthHeaders::generate(creds, method.as_str(), path, body.as_deref().unwrap_or(""))?;
            request = headers.apply_to_request(request);
        }

        if let Some(body) = body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        Ok(request.send().await?)
    }

    /// Read a JSON body, turning non-success statuses into errors
    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(BridgeError::Authentication(format!(
                "Bridge returned status {}: {}",
                status, body
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BridgeError::InvalidResponse(format!(
                "Bridge returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    async fn lifecycle_call(&self, path: &str) -> Result<()> {
        let response = self.send(Method::POST, path, None).await?;
        let status: StatusResponse = Self::read_json(response).await?;

        if !status.ok {
            return Err(BridgeError::Session(
                status.error.unwrap_or_else(|| format!("{} failed", path)),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl BrokerSession for BridgeBrokerClient {
    #[instrument(skip(self))]
    async fn initialize(&self) -> Result<()> {
        self.lifecycle_call("/initialize").await?;
        self.initialized.store(true, Ordering::SeqCst);
        info!("MT5 bridge session initialized at {}", self.base_url);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn shutdown(&self) -> Result<()> {
        self.lifecycle_call("/shutdown").await?;
        self.initialized.store(false, Ordering::SeqCst);
        info!("MT5 bridge session shut down");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn select_instrument(&self, symbol: &str) -> Result<bool> {
        let path = format!("/symbols/{}/select", symbol);
        let response = self.send(Method::POST, &path, None).await?;

        if response.status() == StatusCode::NOT_FOUND {
            warn!("Bridge does not know symbol {}", symbol);
            return Ok(false);
        }

        let select: SelectResponse = Self::read_json(response).await?;
        Ok(select.selected)
    }

    #[instrument(skip(self))]
    async fn account_equity(&self) -> Result<Decimal> {
        let response = self.send(Method::GET, "/account", None).await?;
        let account: AccountInfoResponse = Self::read_json(response).await?;

        debug!(
            login = ?account.login,
            balance = %account.balance,
            equity = %account.equity,
            "Account info"
        );

        Ok(match self.equity_source {
            EquitySource::Balance => account.balance,
            EquitySource::Equity => account.equity,
        })
    }

    #[instrument(skip(self))]
    async fn instrument_spec(&self, symbol: &str) -> Result<Option<InstrumentSpec>> {
        let path = format!("/symbols/{}", symbol);
        let response = self.send(Method::GET, &path, None).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let info: SymbolInfoResponse = Self::read_json(response).await?;
        Ok(Some(info.into()))
    }

    #[instrument(skip(self, request), fields(symbol = %request.symbol, order_type = %request.order_type))]
    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderResult> {
        let body = serde_json::to_string(&OrderSendRequest::from(request))?;
        let response = self.send(Method::POST, "/orders", Some(body)).await?;
        let reply: OrderSendResponse = Self::read_json(response).await?;

        Ok(OrderResult {
            retcode: reply.retcode,
            detail: reply.comment,
            order_ticket: reply.order.filter(|ticket| *ticket != 0),
        })
    }

    fn venue_name(&self) -> &'static str {
        "MT5 bridge"
    }
}
