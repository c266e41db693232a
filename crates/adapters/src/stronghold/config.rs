//! Stronghold adapter configuration
//!
//! Loaded from TOML with environment variable overrides:
//!
//! ```toml
//! venue_id = "trade-public"
//! account_id = "34080200-b25a-483d-a734-255d30ba324d"
//!
//! [payment_methods]
//! BTC = "bitcoin"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

pub const STRONGHOLD_REST_URL: &str = "https://api.stronghold.co";
pub const STRONGHOLD_API_VERSION: &str = "v1";
pub const TRADE_VENUE: &str = "trade-public";
pub const SANDBOX_VENUE: &str = "sandbox-public";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Venues {
    pub trade: String,
    pub sandbox: String,
}

impl Default for Venues {
    fn default() -> Self {
        Self {
            trade: TRADE_VENUE.to_string(),
            sandbox: SANDBOX_VENUE.to_string(),
        }
    }
}

/// Per-instance adapter options
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StrongholdConfig {
    pub base_url: String,
    pub version: String,
    /// Active venue every request is routed to
    pub venue_id: String,
    pub venues: Venues,
    /// Fixed account; when absent the first listed account is used
    pub account_id: Option<String>,
    /// Currency code → payment method accepted for deposits and withdrawals
    pub payment_methods: BTreeMap<String, String>,
    pub timeout_secs: u64,
}

impl Default for StrongholdConfig {
    fn default() -> Self {
        let payment_methods = [
            ("ETH", "ethereum"),
            ("BTC", "bitcoin"),
            ("XLM", "stellar"),
            ("XRP", "ripple"),
            ("LTC", "litecoin"),
            ("SHX", "stellar"),
        ]
        .into_iter()
        .map(|(code, method)| (code.to_string(), method.to_string()))
        .collect();

        Self {
            base_url: STRONGHOLD_REST_URL.to_string(),
            version: STRONGHOLD_API_VERSION.to_string(),
            venue_id: TRADE_VENUE.to_string(),
            venues: Venues::default(),
            account_id: None,
            payment_methods,
            timeout_secs: 30,
        }
    }
}

impl StrongholdConfig {
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn with_sandbox(mut self, enabled: bool) -> Self {
        self.set_sandbox_mode(enabled);
        self
    }

    /// Switches the active venue between production and sandbox
    pub fn set_sandbox_mode(&mut self, enabled: bool) {
        self.venue_id = if enabled {
            self.venues.sandbox.clone()
        } else {
            self.venues.trade.clone()
        };
    }

    pub fn payment_method(&self, code: &str) -> Option<&str> {
        self.payment_methods.get(code).map(String::as_str)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse Stronghold config")
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Applies `STRONGHOLD_SANDBOX`, `STRONGHOLD_VENUE_ID` and `STRONGHOLD_ACCOUNT_ID`
    pub fn apply_env_overrides(mut self) -> Self {
        if let Ok(sandbox) = std::env::var("STRONGHOLD_SANDBOX") {
            let enabled = sandbox == "1" || sandbox.eq_ignore_ascii_case("true");
            self.set_sandbox_mode(enabled);
        }

        if let Ok(venue_id) = std::env::var("STRONGHOLD_VENUE_ID") {
            if !venue_id.is_empty() {
                self.venue_id = venue_id;
            }
        }

        if let Ok(account_id) = std::env::var("STRONGHOLD_ACCOUNT_ID") {
            if !account_id.is_empty() {
                self.account_id = Some(account_id);
            }
        }

        self
    }
}

/// Loads configuration from a file with environment overrides
pub fn load_stronghold_config<P: AsRef<Path>>(path: P) -> Result<StrongholdConfig> {
    let config = StrongholdConfig::from_file(path)?.apply_env_overrides();

    info!(
        venue_id = %config.venue_id,
        account_id = ?config.account_id,
        payment_methods = config.payment_methods.len(),
        "Stronghold configuration loaded"
    );

    Ok(config)
}
