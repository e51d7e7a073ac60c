//! Request signing for the MT5 bridge

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::common::errors::{BridgeError, Result};
use crate::config::types::ApiCredentials;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 over `timestamp + METHOD + path + body`, base64 encoded
///
/// `secret` is the base64 encoded shared key.
pub fn sign_request(
    secret: &str,
    timestamp: i64,
    method: &str,
    request_path: &str,
    body: &str,
) -> Result<String> {
    let secret_bytes = BASE64
        .decode(secret)
        .map_err(|e| BridgeError::Authentication(format!("Failed to decode secret: {}", e)))?;

    let message = format!("{}{}{}{}", timestamp, method.to_uppercase(), request_path, body);

    let mut mac = HmacSha256::new_from_slice(&secret_bytes)
        .map_err(|e| BridgeError::Authentication(format!("Failed to create HMAC: {}", e)))?;
    mac.update(message.as_bytes());

    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Signed headers for one bridge request
#[derive(Debug, Clone)]
pub struct AuthHeaders {
    pub api_key: String,
    pub signature: String,
    pub timestamp: i64,
}

impl AuthHeaders {
    pub fn generate(
        credentials: &ApiCredentials,
        method: &str,
        request_path: &str,
        body: &str,
    ) -> Result<Self> {
        let timestamp = chrono::Utc::now().timestamp();
        let signature = sign_request(&credentials.api_secret, timestamp, method, request_path, body)?;

        Ok(Self {
            api_key: credentials.api_key.clone(),
            signature,
            timestamp,
        })
    }

    pub fn apply_to_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("X-BRIDGE-KEY", &self.api_key)
            .header("X-BRIDGE-SIGNATURE", &self.signature)
            .header("X-BRIDGE-TIMESTAMP", self.timestamp.to_string())
    }
}
