//! Stronghold Authentication and REST Client
//!
//! Provides the route table, request signer, response envelope, error mapper
//! and HTTP client shared by the Stronghold adapter.
//!
//! # Authentication
//!
//! Stronghold uses HMAC-SHA256 signing keyed with the base64-decoded secret:
//! - Sign string: nonce + method + requestPath + body
//! - requestPath excludes the query string
//! - Headers: SH-CRED-ID, SH-CRED-SIG, SH-CRED-TIME, SH-CRED-PASS

use super::config::StrongholdConfig;
use crate::error::{ExchangeError, Result};
use crate::transport::{HttpMethod, HttpRequest, HttpTransport};
use crate::utils::now_seconds;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::{Map, Value};
use sha2::Sha256;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

pub const EXCHANGE_ID: &str = "stronghold";

/// Request parameters; placeholders are taken from here, the rest is sent
pub type Params = Map<String, Value>;

// =============================================================================
// API Endpoints
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Api {
    Public,
    Private,
}

pub mod routes {
    // Public
    pub const UTILITIES_TIME: &str = "utilities/time";
    pub const VENUE_ASSETS: &str = "venues/{venueId}/assets";
    pub const VENUE_MARKETS: &str = "venues/{venueId}/markets";
    pub const MARKET_ORDER_BOOK: &str = "venues/{venueId}/markets/{marketId}/orderbook";
    pub const MARKET_TRADES: &str = "venues/{venueId}/markets/{marketId}/trades";

    // Private
    pub const ACCOUNTS: &str = "venues/{venueId}/accounts";
    pub const ACCOUNT: &str = "venues/{venueId}/accounts/{accountId}";
    pub const ACCOUNT_ORDERS: &str = "venues/{venueId}/accounts/{accountId}/orders";
    pub const ACCOUNT_ORDER: &str = "venues/{venueId}/accounts/{accountId}/orders/{orderId}";
    pub const ACCOUNT_TRADES: &str = "venues/{venueId}/accounts/{accountId}/trades";
    pub const ACCOUNT_TRANSACTIONS: &str = "venues/{venueId}/accounts/{accountId}/transactions";
    pub const ACCOUNT_DEPOSIT: &str = "venues/{venueId}/accounts/{accountId}/deposit";
    pub const ACCOUNT_WITHDRAWAL: &str = "venues/{venueId}/accounts/{accountId}/withdrawal";
}

// =============================================================================
// Authentication
// =============================================================================

/// Stronghold API credentials
#[derive(Clone)]
pub struct StrongholdAuth {
    pub api_key: String,
    /// Base64-encoded signing secret
    pub api_secret: String,
    pub passphrase: String,
}

impl StrongholdAuth {
    pub fn new(api_key: String, api_secret: String, passphrase: String) -> Self {
        Self {
            api_key,
            api_secret,
            passphrase,
        }
    }

    /// Reads `STRONGHOLD_API_KEY`, `STRONGHOLD_API_SECRET` and `STRONGHOLD_API_PASSPHRASE`
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("STRONGHOLD_API_KEY").ok()?;
        let api_secret = std::env::var("STRONGHOLD_API_SECRET").ok()?;
        let passphrase = std::env::var("STRONGHOLD_API_PASSPHRASE").ok()?;
        Some(Self::new(api_key, api_secret, passphrase))
    }

    fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty() && !self.passphrase.is_empty()
    }

    /// Signs a request using HMAC-SHA256
    ///
    /// Sign string format: nonce + method + requestPath + body
    pub fn sign(&self, nonce: &str, method: &str, request_path: &str, body: Option<&str>) -> Result<String> {
        let key = base64::engine::general_purpose::STANDARD
            .decode(self.api_secret.trim())
            .map_err(|e| {
                ExchangeError::Authentication(format!("{} secret is not valid base64: {}", EXCHANGE_ID, e))
            })?;

        let mut payload = format!("{}{}{}", nonce, method, request_path);
        if let Some(body) = body {
            payload.push_str(body);
        }

        let mut mac = Hmac::<Sha256>::new_from_slice(&key)
            .map_err(|e| ExchangeError::Authentication(format!("{} {}", EXCHANGE_ID, e)))?;
        mac.update(payload.as_bytes());

        Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
    }
}

// =============================================================================
// Request Building
// =============================================================================

fn param_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Substitutes `{placeholder}` segments, returning the path and unused params
pub fn implode_params(path: &str, mut params: Params) -> Result<(String, Params)> {
    let mut resolved = String::with_capacity(path.len());
    let mut rest = path;

    while let Some(start) = rest.find('{') {
        let end = rest[start..]
            .find('}')
            .map(|offset| start + offset)
            .ok_or_else(|| ExchangeError::BadResponse(format!("{} malformed route '{}'", EXCHANGE_ID, path)))?;
        let name = &rest[start + 1..end];

        let value = params.remove(name).ok_or_else(|| {
            ExchangeError::ArgumentsRequired(format!("{} {} requires '{}'", EXCHANGE_ID, path, name))
        })?;

        resolved.push_str(&rest[..start]);
        resolved.push_str(&param_to_string(&value));
        rest = &rest[end + 1..];
    }
    resolved.push_str(rest);

    Ok((resolved, params))
}

/// Builds the wire request for a logical route
///
/// Pure apart from the caller-supplied nonce, so signatures are reproducible.
pub fn build_request(
    config: &StrongholdConfig,
    auth: Option<&StrongholdAuth>,
    api: Api,
    method: HttpMethod,
    path: &str,
    params: Params,
    nonce: u64,
) -> Result<HttpRequest> {
    let (resolved, query) = implode_params(path, params)?;
    let request_path = format!("/{}/{}", config.version, resolved);
    let mut url = format!("{}{}", config.base_url, request_path);
    let mut body = None;

    if !query.is_empty() {
        if method == HttpMethod::Get {
            let pairs: Vec<(String, String)> = query
                .iter()
                .map(|(k, v)| (k.clone(), param_to_string(v)))
                .collect();
            let encoded = serde_urlencoded::to_string(&pairs)
                .map_err(|e| ExchangeError::Other(anyhow::anyhow!("Failed to encode query: {}", e)))?;
            url.push('?');
            url.push_str(&encoded);
        } else {
            let json = serde_json::to_string(&Value::Object(query))
                .map_err(|e| ExchangeError::Other(anyhow::anyhow!("Failed to encode body: {}", e)))?;
            body = Some(json);
        }
    }

    let mut headers = Vec::new();
    if api == Api::Private {
        let auth = auth.filter(|a| a.is_complete()).ok_or_else(|| {
            ExchangeError::Authentication(format!(
                "{} requires apiKey, secret and password credentials",
                EXCHANGE_ID
            ))
        })?;

        let timestamp = nonce.to_string();
        let signature = auth.sign(&timestamp, method.as_str(), &request_path, body.as_deref())?;

        headers.push(("SH-CRED-ID".to_string(), auth.api_key.clone()));
        headers.push(("SH-CRED-SIG".to_string(), signature));
        headers.push(("SH-CRED-TIME".to_string(), timestamp));
        headers.push(("SH-CRED-PASS".to_string(), auth.passphrase.clone()));
        headers.push(("Content-Type".to_string(), "application/json".to_string()));
    }

    Ok(HttpRequest {
        method,
        url,
        headers,
        body,
    })
}

// =============================================================================
// Response Envelope & Error Mapping
// =============================================================================

/// Envelope wrapping every Stronghold response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrongholdResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    /// ISO-8601 string on most endpoints, integer microseconds on some
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error_code: Option<String>,
}

impl StrongholdResponse {
    pub fn into_result(self) -> Value {
        self.result
    }
}

/// Classifies a venue `errorCode`
pub fn error_for_code(code: &str, message: String) -> Option<ExchangeError> {
    let err = match code {
        "CREDENTIAL_MISSING"
        | "CREDENTIAL_INVALID"
        | "CREDENTIAL_NO_IDENTITY"
        | "PASSPHRASE_INVALID"
        | "SIGNATURE_INVALID"
        | "BYPASS_INVALID" => ExchangeError::Authentication(message),
        "CREDENTIAL_REVOKED" => ExchangeError::AccountSuspended(message),
        "TIME_INVALID" => ExchangeError::InvalidNonce(message),
        "INSUFFICIENT_FUNDS" => ExchangeError::InsufficientFunds(message),
        _ => return None,
    };
    Some(err)
}

/// Inspects a parsed envelope; `None` defers to the caller's default handling
pub fn handle_errors(body: &str, response: Option<&Value>) -> Result<()> {
    let Some(response) = response else {
        return Ok(());
    };

    if let Some(code) = response.get("errorCode").and_then(Value::as_str) {
        if let Some(err) = error_for_code(code, format!("{} {}", EXCHANGE_ID, body)) {
            return Err(err);
        }
    }

    let success = response.get("success").and_then(Value::as_bool).unwrap_or(false);
    if !success {
        return Err(ExchangeError::Exchange(format!("{} {}", EXCHANGE_ID, body)));
    }

    Ok(())
}

// =============================================================================
// REST Client
// =============================================================================

/// HTTP client for the Stronghold REST API
#[derive(Clone)]
pub struct StrongholdRestClient {
    transport: Arc<dyn HttpTransport>,
    auth: Option<StrongholdAuth>,
    last_nonce: Arc<AtomicU64>,
}

impl StrongholdRestClient {
    pub fn new(transport: Arc<dyn HttpTransport>, auth: Option<StrongholdAuth>) -> Self {
        Self {
            transport,
            auth,
            last_nonce: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.auth.as_ref().map_or(false, StrongholdAuth::is_complete)
    }

    /// Wall-clock seconds; a repeat within the same second is only flagged
    fn next_nonce(&self) -> u64 {
        let nonce = now_seconds();
        let previous = self.last_nonce.swap(nonce, Ordering::SeqCst);
        if previous == nonce {
            warn!(nonce, "Stronghold nonce reused within the same second, venue may reject as replay");
        }
        nonce
    }

    /// Issues one call and returns the validated envelope
    pub async fn request(
        &self,
        config: &StrongholdConfig,
        api: Api,
        method: HttpMethod,
        path: &str,
        params: Params,
    ) -> Result<StrongholdResponse> {
        let nonce = if api == Api::Private { self.next_nonce() } else { 0 };
        let request = build_request(config, self.auth.as_ref(), api, method, path, params, nonce)?;

        debug!("Calling Stronghold {:?} endpoint: {} {}", api, method.as_str(), request.url);

        let response = self.transport.execute(request).await?;
        let parsed: Option<Value> = if response.body.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&response.body).ok()
        };

        handle_errors(&response.body, parsed.as_ref())?;

        if !response.is_success() {
            return Err(ExchangeError::Exchange(format!(
                "{} HTTP {} {}",
                EXCHANGE_ID, response.status, response.body
            )));
        }

        let parsed = parsed.ok_or_else(|| {
            ExchangeError::BadResponse(format!("{} returned a non-JSON body: {}", EXCHANGE_ID, response.body))
        })?;

        serde_json::from_value(parsed)
            .map_err(|e| ExchangeError::BadResponse(format!("{} unexpected envelope: {}", EXCHANGE_ID, e)))
    }
}

// =============================================================================
// Type Converters
// =============================================================================

pub mod converters {
    use crate::traits::{OrderType, Side};

    pub fn from_stronghold_side(side: &str) -> Option<Side> {
        match side.to_lowercase().as_str() {
            "buy" => Some(Side::Buy),
            "sell" => Some(Side::Sell),
            _ => None,
        }
    }

    pub fn to_stronghold_order_type(order_type: OrderType) -> &'static str {
        order_type.as_str()
    }
}
