//! Stronghold connectivity probe
//!
//! Loads `config/stronghold.toml` (override with `STRONGHOLD_CONFIG`), prints
//! server time, market count and the top of one order book, then the account
//! balance when credentials are present in the environment.
//!
//! Usage:
//!   RUST_LOG=info cargo run --bin stronghold_probe -- SHX/USD

use adapters::stronghold::{load_stronghold_config, StrongholdAdapter, StrongholdAuth};
use adapters::traits::UnifiedRest;
use adapters::utils::iso8601;
use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config_path = std::env::var("STRONGHOLD_CONFIG").unwrap_or_else(|_| "config/stronghold.toml".to_string());
    let config = load_stronghold_config(&config_path)?;
    let symbol = std::env::args().nth(1).unwrap_or_else(|| "SHX/USD".to_string());

    let adapter = match StrongholdAuth::from_env() {
        Some(auth) => StrongholdAdapter::new(auth, config),
        None => StrongholdAdapter::public(config),
    };

    let server_time = adapter.fetch_time().await?;
    info!(server_time, iso = ?iso8601(server_time), "Stronghold server time");

    let markets = adapter.load_markets(false).await?;
    info!(
        markets = markets.markets.len(),
        currencies = markets.currencies.len(),
        "Markets loaded"
    );

    let book = adapter.fetch_order_book(&symbol).await?;
    info!(
        symbol = %book.symbol,
        best_bid = ?book.bids.first(),
        best_ask = ?book.asks.first(),
        "Order book"
    );

    if !adapter.has_credentials() {
        warn!("No Stronghold credentials in environment, skipping private calls");
        return Ok(());
    }

    let balances = adapter.fetch_balance().await?;
    for (code, balance) in balances.iter() {
        info!(
            %code,
            free = %balance.free,
            used = %balance.used,
            total = %balance.total,
            "Balance"
        );
    }

    Ok(())
}
