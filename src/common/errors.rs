//! Error types for the application

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias using our BridgeError
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Why a signal line was rejected by the parser
///
/// Carries no partial intent, only the token that broke the grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty line")]
    Empty,

    #[error("expected BUY or SELL, found '{0}'")]
    Direction(String),

    #[error("expected LIMIT, STOP or MARKET, found '{0}'")]
    Kind(String),

    #[error("invalid symbol '{0}'")]
    Symbol(String),

    #[error("invalid risk percentage '{0}'")]
    Risk(String),

    #[error("invalid {field} price '{value}'")]
    Price { field: &'static str, value: String },

    #[error("missing {0}")]
    MissingField(&'static str),

    #[error("unexpected trailing input '{0}'")]
    TrailingInput(String),
}

/// Failures of the position sizing stage
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SizingError {
    /// The broker does not know the symbol
    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),

    /// Stop distance converts to zero loss per lot
    #[error("loss per lot is zero for entry {entry} and stop loss {stop_loss}")]
    DegenerateStop { entry: Decimal, stop_loss: Decimal },

    /// Numeric input outside the domain the sizer accepts
    #[error("invalid sizing input: {0}")]
    InvalidInput(String),
}

/// Main error type for bridge operations
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Malformed signal line
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Sizing stage failures
    #[error("Sizing error: {0}")]
    Sizing(#[from] SizingError),

    /// Broker rejected the request
    #[error("Broker rejected request: retcode {retcode} - {detail}")]
    Broker { retcode: u32, detail: String },

    /// Broker session lifecycle errors
    #[error("Broker session error: {0}")]
    Session(String),

    /// Timeout errors
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// WebSocket connection errors
    #[error("WebSocket connection error: {0}")]
    WebSocketConnection(String),

    /// WebSocket send/receive errors
    #[error("WebSocket communication error: {0}")]
    WebSocketCommunication(String),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Invalid API response
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for BridgeError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        BridgeError::WebSocketCommunication(err.to_string())
    }
}
