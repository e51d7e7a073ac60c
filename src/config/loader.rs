//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;

use super::types::{AppConfig, BrokerConfig, ChatConfig};
use crate::common::errors::{BridgeError, Result};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with APP__)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("APP")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| BridgeError::Configuration(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| BridgeError::Configuration(e.to_string()))
}

/// Load configuration from plain environment variables only
pub fn load_from_env() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let broker = BrokerConfig {
        bridge_url: std::env::var("BROKER_BRIDGE_URL")
            .unwrap_or_else(|_| BrokerConfig::default().bridge_url),
        api_key: std::env::var("BROKER_API_KEY").ok(),
        api_secret: std::env::var("BROKER_API_SECRET").ok(),
        ..BrokerConfig::default()
    };

    let chat = ChatConfig {
        gateway_url: std::env::var("CHAT_GATEWAY_URL")
            .unwrap_or_else(|_| ChatConfig::default().gateway_url),
        token: std::env::var("CHAT_TOKEN").ok(),
        bot_user_id: std::env::var("CHAT_BOT_USER_ID").ok(),
        channels: std::env::var("CHAT_CHANNELS")
            .map(|s| {
                s.split(',')
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
    };

    Ok(AppConfig {
        broker,
        chat,
        ..AppConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load_config(Some("does-not-exist.toml")).unwrap();
        assert_eq!(config.order.magic, 234000);
        assert_eq!(config.settings.log_level, "info");
    }

    #[test]
    fn test_channels_from_env() {
        std::env::set_var("CHAT_CHANNELS", "signals, vip ,,");
        let config = load_from_env().unwrap();
        std::env::remove_var("CHAT_CHANNELS");

        assert_eq!(config.chat.channels, vec!["signals".to_string(), "vip".to_string()]);
        assert_eq!(config.risk.max_risk_percent, rust_decimal_macros::dec!(100));
    }
}
