//! Configuration types

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::common::types::InstrumentSpec;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// MetaTrader 5 bridge connection
    #[serde(default)]
    pub broker: BrokerConfig,
    /// Chat relay connection
    #[serde(default)]
    pub chat: ChatConfig,
    /// Fixed fields stamped on every order
    #[serde(default)]
    pub order: OrderConfig,
    /// Risk policy
    #[serde(default)]
    pub risk: RiskConfig,
    /// Simulated account used in dry-run mode
    #[serde(default)]
    pub paper: PaperConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// Broker bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Base URL of the MT5 bridge REST service
    #[serde(default = "default_bridge_url")]
    pub bridge_url: String,
    /// API key for signed requests
    #[serde(default)]
    pub api_key: Option<String>,
    /// API secret (base64) for signing requests
    #[serde(default)]
    pub api_secret: Option<String>,
    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl BrokerConfig {
    /// Signing credentials, if both halves are configured
    pub fn credentials(&self) -> Option<ApiCredentials> {
        match (&self.api_key, &self.api_secret) {
            (Some(key), Some(secret)) => Some(ApiCredentials::new(key.clone(), secret.clone())),
            _ => None,
        }
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            bridge_url: default_bridge_url(),
            api_key: None,
            api_secret: None,
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_bridge_url() -> String {
    "http://127.0.0.1:8787".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

/// Chat relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// WebSocket URL of the chat relay gateway
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
    /// Bot token sent in the identify frame
    #[serde(default)]
    pub token: Option<String>,
    /// The bot's own user id; its messages are ignored
    #[serde(default)]
    pub bot_user_id: Option<String>,
    /// Channels to accept signals from (empty = all)
    #[serde(default)]
    pub channels: Vec<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            gateway_url: default_gateway_url(),
            token: None,
            bot_user_id: None,
            channels: Vec::new(),
        }
    }
}

fn default_gateway_url() -> String {
    "ws://127.0.0.1:8788/gateway".to_string()
}

/// Fixed order fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderConfig {
    /// Maximum price deviation in points
    #[serde(default = "default_deviation")]
    pub deviation: u32,
    /// Magic number identifying orders placed by this bridge
    #[serde(default = "default_magic")]
    pub magic: u64,
    /// Order comment
    #[serde(default = "default_comment")]
    pub comment: String,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            deviation: default_deviation(),
            magic: default_magic(),
            comment: default_comment(),
        }
    }
}

fn default_deviation() -> u32 {
    20
}

fn default_magic() -> u64 {
    234000
}

fn default_comment() -> String {
    "Discord signal trade".to_string()
}

/// Which account figure risk is measured against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquitySource {
    /// Realised balance
    #[default]
    Balance,
    /// Balance plus floating profit
    Equity,
}

/// Risk policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Signals asking for more than this percentage are refused
    #[serde(default = "default_max_risk_percent")]
    pub max_risk_percent: Decimal,
    #[serde(default)]
    pub equity_source: EquitySource,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_risk_percent: default_max_risk_percent(),
            equity_source: EquitySource::default(),
        }
    }
}

fn default_max_risk_percent() -> Decimal {
    dec!(100)
}

/// Simulated account for dry runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperConfig {
    #[serde(default = "default_paper_equity")]
    pub equity: Decimal,
    /// Instrument specs keyed by symbol
    #[serde(default)]
    pub instruments: HashMap<String, InstrumentSpec>,
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            equity: default_paper_equity(),
            instruments: HashMap::new(),
        }
    }
}

fn default_paper_equity() -> Decimal {
    dec!(10000)
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Delay between chat reconnection attempts in milliseconds
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: u64,
    /// Consecutive failed chat connections before giving up (0 = infinite)
    #[serde(default)]
    pub max_reconnect_attempts: u32,
    /// Chat heartbeat/ping interval in seconds
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_seconds: u64,
    /// Upper bound on a single broker call (none = wait indefinitely)
    #[serde(default)]
    pub broker_call_timeout_ms: Option<u64>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            reconnect_delay_ms: default_reconnect_delay(),
            max_reconnect_attempts: 0,
            heartbeat_interval_seconds: default_heartbeat_interval(),
            broker_call_timeout_ms: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_reconnect_delay() -> u64 {
    5000
}

fn default_heartbeat_interval() -> u64 {
    30
}

/// API credentials for signed bridge requests
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl ApiCredentials {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            api_key,
            api_secret,
        }
    }
}
