//! Stronghold Spot Trading Adapter
//!
//! Implements [`UnifiedRest`] for the Stronghold venue. Each operation issues a
//! single request and feeds the envelope's `result` through the normalizers in
//! [`super::parse`].
//!
//! # Example
//!
//! ```ignore
//! use adapters::stronghold::{StrongholdAdapter, StrongholdAuth, StrongholdConfig};
//! use adapters::traits::UnifiedRest;
//!
//! let adapter = StrongholdAdapter::new(
//!     StrongholdAuth::from_env().expect("credentials"),
//!     StrongholdConfig::default().with_sandbox(true),
//! );
//! let balances = adapter.fetch_balance().await?;
//! ```

use super::account::{
    converters, routes, Api, Params, StrongholdAuth, StrongholdResponse, StrongholdRestClient, EXCHANGE_ID,
};
use super::config::StrongholdConfig;
use super::parse::{self, MarketsById};
use crate::error::{ExchangeError, Result};
use crate::traits::*;
use crate::transport::{HttpMethod, HttpTransport, ReqwestTransport};
use crate::utils::{amount_to_precision, filter_by_since_limit, parse8601, price_to_precision, safe_string};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Markets and currencies loaded for the active venue
#[derive(Debug, Default)]
pub struct MarketCache {
    pub markets: BTreeMap<String, Market>,
    pub markets_by_id: MarketsById,
    pub currencies: BTreeMap<String, Currency>,
}

impl MarketCache {
    fn build(markets: Vec<Market>, currencies: Vec<Currency>) -> Self {
        let mut cache = MarketCache::default();
        for market in markets {
            cache.markets_by_id.insert(market.id.clone(), market.clone());
            cache.markets.insert(market.symbol.clone(), market);
        }
        for currency in currencies {
            cache.currencies.insert(currency.code.clone(), currency);
        }
        cache
    }

    pub fn market(&self, symbol: &str) -> Result<&Market> {
        self.markets
            .get(symbol)
            .ok_or_else(|| ExchangeError::BadSymbol(format!("{} does not have market symbol {}", EXCHANGE_ID, symbol)))
    }

    pub fn currency(&self, code: &str) -> Result<&Currency> {
        self.currencies
            .get(code)
            .ok_or_else(|| ExchangeError::BadSymbol(format!("{} does not have currency code {}", EXCHANGE_ID, code)))
    }

    /// Venue asset id for a currency code, falling back to the code itself
    pub fn currency_id(&self, code: &str) -> String {
        self.currencies
            .get(code)
            .map(|c| c.id.clone())
            .unwrap_or_else(|| code.to_string())
    }
}

fn into_params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        _ => Params::new(),
    }
}

/// Stronghold spot trading adapter
#[derive(Clone)]
pub struct StrongholdAdapter {
    client: StrongholdRestClient,
    config: StrongholdConfig,
    markets: Arc<RwLock<Option<Arc<MarketCache>>>>,
    accounts: Arc<RwLock<Option<Vec<Account>>>>,
}

impl StrongholdAdapter {
    pub fn new(auth: StrongholdAuth, config: StrongholdConfig) -> Self {
        let transport = ReqwestTransport::new(Duration::from_secs(config.timeout_secs));
        Self::with_transport(Arc::new(transport), Some(auth), config)
    }

    pub fn public(config: StrongholdConfig) -> Self {
        let transport = ReqwestTransport::new(Duration::from_secs(config.timeout_secs));
        Self::with_transport(Arc::new(transport), None, config)
    }

    pub fn with_transport(
        transport: Arc<dyn HttpTransport>,
        auth: Option<StrongholdAuth>,
        config: StrongholdConfig,
    ) -> Self {
        Self {
            client: StrongholdRestClient::new(transport, auth),
            config,
            markets: Arc::new(RwLock::new(None)),
            accounts: Arc::new(RwLock::new(None)),
        }
    }

    pub fn config(&self) -> &StrongholdConfig {
        &self.config
    }

    pub fn has_credentials(&self) -> bool {
        self.client.has_credentials()
    }

    /// Switches venue; cached markets and accounts belong to the old venue
    pub fn set_sandbox_mode(&mut self, enabled: bool) {
        self.config.set_sandbox_mode(enabled);
        self.markets = Arc::new(RwLock::new(None));
        self.accounts = Arc::new(RwLock::new(None));
    }

    async fn call(&self, api: Api, method: HttpMethod, path: &str, params: Params) -> Result<StrongholdResponse> {
        self.client.request(&self.config, api, method, path, params).await
    }

    fn venue_params(&self) -> Params {
        into_params(json!({ "venueId": self.config.venue_id }))
    }

    async fn account_params(&self) -> Result<Params> {
        let mut params = self.venue_params();
        params.insert("accountId".to_string(), Value::String(self.active_account().await?));
        Ok(params)
    }

    /// Loads markets and currencies once per venue; `reload` forces a refetch
    pub async fn load_markets(&self, reload: bool) -> Result<Arc<MarketCache>> {
        if !reload {
            if let Some(cache) = self.markets.read().await.as_ref() {
                return Ok(cache.clone());
            }
        }

        let markets = self.fetch_markets().await?;
        let currencies = self.fetch_currencies().await?;
        let cache = Arc::new(MarketCache::build(markets, currencies));

        info!(
            venue_id = %self.config.venue_id,
            markets = cache.markets.len(),
            currencies = cache.currencies.len(),
            "Loaded Stronghold markets"
        );

        *self.markets.write().await = Some(cache.clone());
        Ok(cache)
    }

    /// Accounts are fetched once and reused
    pub async fn load_accounts(&self, reload: bool) -> Result<Vec<Account>> {
        if !reload {
            if let Some(accounts) = self.accounts.read().await.as_ref() {
                return Ok(accounts.clone());
            }
        }

        let accounts = self.fetch_accounts().await?;
        debug!(count = accounts.len(), "Loaded Stronghold accounts");
        *self.accounts.write().await = Some(accounts.clone());
        Ok(accounts)
    }

    /// Configured account id, else the first account listed by the venue
    pub async fn active_account(&self) -> Result<String> {
        if let Some(account_id) = self.config.account_id.as_ref().filter(|id| !id.is_empty()) {
            return Ok(account_id.clone());
        }

        self.load_accounts(false)
            .await?
            .into_iter()
            .next()
            .map(|account| account.id)
            .ok_or_else(|| {
                ExchangeError::ArgumentsRequired(format!(
                    "{} requires an accountId: set StrongholdConfig::account_id or create an account",
                    EXCHANGE_ID
                ))
            })
    }

    fn payment_method(&self, code: &str, operation: &str) -> Result<String> {
        self.config
            .payment_method(code)
            .map(str::to_string)
            .ok_or_else(|| {
                let supported: Vec<&str> = self.config.payment_methods.keys().map(String::as_str).collect();
                ExchangeError::NotSupported(format!(
                    "{} {} requires code to be one of {}",
                    EXCHANGE_ID,
                    operation,
                    supported.join(", ")
                ))
            })
    }
}

#[async_trait::async_trait]
impl UnifiedRest for StrongholdAdapter {
    async fn fetch_markets(&self) -> Result<Vec<Market>> {
        let response = self
            .call(Api::Public, HttpMethod::Get, routes::VENUE_MARKETS, self.venue_params())
            .await?;
        Ok(parse::parse_markets(&response.into_result()))
    }

    async fn fetch_currencies(&self) -> Result<Vec<Currency>> {
        let response = self
            .call(Api::Public, HttpMethod::Get, routes::VENUE_ASSETS, self.venue_params())
            .await?;
        Ok(parse::parse_currencies(&response.into_result()))
    }

    async fn fetch_order_book(&self, symbol: &str) -> Result<OrderBook> {
        let cache = self.load_markets(false).await?;
        let market = cache.market(symbol)?;

        let mut params = self.venue_params();
        params.insert("marketId".to_string(), Value::String(market.id.clone()));

        let response = self
            .call(Api::Public, HttpMethod::Get, routes::MARKET_ORDER_BOOK, params)
            .await?;
        let timestamp = parse::parse_envelope_timestamp(response.timestamp.as_ref());

        Ok(parse::parse_order_book(&market.symbol, &response.result, timestamp))
    }

    async fn fetch_trades(
        &self,
        symbol: &str,
        since: Option<UnixMillis>,
        limit: Option<usize>,
    ) -> Result<Vec<Trade>> {
        let cache = self.load_markets(false).await?;
        let market = cache.market(symbol)?;

        let mut params = self.venue_params();
        params.insert("marketId".to_string(), Value::String(market.id.clone()));

        let response = self
            .call(Api::Public, HttpMethod::Get, routes::MARKET_TRADES, params)
            .await?;

        let trades = response
            .result
            .get("trades")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|t| parse::parse_trade(t, Some(market), &cache.markets_by_id))
                    .collect()
            })
            .unwrap_or_default();

        Ok(filter_by_since_limit(trades, since, limit, |t: &Trade| t.timestamp))
    }

    async fn fetch_time(&self) -> Result<UnixMillis> {
        let response = self
            .call(Api::Public, HttpMethod::Get, routes::UTILITIES_TIME, Params::new())
            .await?;

        safe_string(&response.result, "timestamp")
            .as_deref()
            .and_then(parse8601)
            .ok_or_else(|| ExchangeError::BadResponse(format!("{} fetchTime returned no timestamp", EXCHANGE_ID)))
    }

    async fn fetch_accounts(&self) -> Result<Vec<Account>> {
        let response = self
            .call(Api::Private, HttpMethod::Get, routes::ACCOUNTS, self.venue_params())
            .await?;
        Ok(parse::parse_accounts(&response.into_result()))
    }

    async fn fetch_balance(&self) -> Result<Balances> {
        let params = self.account_params().await?;
        let response = self.call(Api::Private, HttpMethod::Get, routes::ACCOUNT, params).await?;
        Ok(parse::parse_balance(&response.into_result()))
    }

    async fn create_order(&self, new: NewOrder) -> Result<Order> {
        let cache = self.load_markets(false).await?;
        let market = cache.market(&new.symbol)?;

        let mut params = self.account_params().await?;
        params.insert("marketID".to_string(), Value::String(market.id.clone()));
        params.insert(
            "type".to_string(),
            Value::String(converters::to_stronghold_order_type(new.ord_type).to_string()),
        );
        params.insert("side".to_string(), Value::String(new.side.as_str().to_string()));
        params.insert(
            "size".to_string(),
            Value::String(amount_to_precision(new.amount, market.precision.amount)),
        );
        if let Some(price) = new.price {
            params.insert(
                "price".to_string(),
                Value::String(price_to_precision(price, market.precision.price)),
            );
        }

        let response = self
            .call(Api::Private, HttpMethod::Post, routes::ACCOUNT_ORDERS, params)
            .await?;

        Ok(parse::parse_order(&response.result, Some(market), &cache.markets_by_id))
    }

    async fn cancel_order(&self, id: &str) -> Result<Order> {
        let cache = self.load_markets(false).await?;

        let mut params = self.account_params().await?;
        params.insert("orderId".to_string(), Value::String(id.to_string()));

        let response = self
            .call(Api::Private, HttpMethod::Delete, routes::ACCOUNT_ORDER, params)
            .await?;

        Ok(parse::parse_order(&response.result, None, &cache.markets_by_id))
    }

    async fn fetch_open_orders(
        &self,
        symbol: Option<&str>,
        since: Option<UnixMillis>,
        limit: Option<usize>,
    ) -> Result<Vec<Order>> {
        let cache = self.load_markets(false).await?;
        let market = symbol.map(|s| cache.market(s)).transpose()?;

        let params = self.account_params().await?;
        let response = self
            .call(Api::Private, HttpMethod::Get, routes::ACCOUNT_ORDERS, params)
            .await?;

        let orders: Vec<Order> = response
            .result
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .map(|o| parse::parse_order(o, None, &cache.markets_by_id))
                    .filter(|o| market.map_or(true, |m| o.symbol.as_deref() == Some(m.symbol.as_str())))
                    .collect()
            })
            .unwrap_or_default();

        Ok(filter_by_since_limit(orders, since, limit, |o: &Order| o.timestamp))
    }

    async fn fetch_my_trades(
        &self,
        symbol: Option<&str>,
        since: Option<UnixMillis>,
        limit: Option<usize>,
    ) -> Result<Vec<Trade>> {
        let cache = self.load_markets(false).await?;
        let market = symbol.map(|s| cache.market(s)).transpose()?;

        let params = self.account_params().await?;
        let response = self
            .call(Api::Private, HttpMethod::Get, routes::ACCOUNT_TRADES, params)
            .await?;

        let trades: Vec<Trade> = response
            .result
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .map(|t| parse::parse_trade(t, None, &cache.markets_by_id))
                    .filter(|t| market.map_or(true, |m| t.symbol.as_deref() == Some(m.symbol.as_str())))
                    .collect()
            })
            .unwrap_or_default();

        Ok(filter_by_since_limit(trades, since, limit, |t: &Trade| t.timestamp))
    }

    async fn fetch_transactions(
        &self,
        code: Option<&str>,
        since: Option<UnixMillis>,
        limit: Option<usize>,
    ) -> Result<Vec<Transaction>> {
        let cache = self.load_markets(false).await?;
        let currency = code.map(|c| cache.currency(c)).transpose()?;

        let params = self.account_params().await?;
        let response = self
            .call(Api::Private, HttpMethod::Get, routes::ACCOUNT_TRANSACTIONS, params)
            .await?;

        let transactions: Vec<Transaction> = response
            .result
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .map(|t| parse::parse_transaction(t, currency))
                    .filter(|t| code.map_or(true, |c| t.currency.as_deref() == Some(c)))
                    .collect()
            })
            .unwrap_or_default();

        Ok(filter_by_since_limit(transactions, since, limit, |t: &Transaction| t.timestamp))
    }

    async fn create_deposit_address(&self, code: &str) -> Result<DepositAddress> {
        let payment_method = self.payment_method(code, "createDepositAddress")?;
        let cache = self.load_markets(false).await?;

        let mut params = self.account_params().await?;
        params.insert("assetId".to_string(), Value::String(cache.currency_id(code)));
        params.insert("paymentMethod".to_string(), Value::String(payment_method));

        let response = self
            .call(Api::Private, HttpMethod::Post, routes::ACCOUNT_DEPOSIT, params)
            .await?;

        parse::parse_deposit_address(code, &response.result)
    }

    async fn withdraw(
        &self,
        code: &str,
        amount: Quantity,
        address: &str,
        tag: Option<&str>,
    ) -> Result<Transaction> {
        let payment_method = self.payment_method(code, "withdraw")?;
        let cache = self.load_markets(false).await?;

        let mut details = json!({ "withdrawal_address": address });
        if let Some(tag) = tag {
            details["reference"] = Value::String(tag.to_string());
        }

        let mut params = self.account_params().await?;
        params.insert("assetId".to_string(), Value::String(cache.currency_id(code)));
        params.insert("amount".to_string(), Value::String(amount.normalize().to_string()));
        params.insert("paymentMethod".to_string(), Value::String(payment_method));
        params.insert("paymentMethodDetails".to_string(), details);

        let response = self
            .call(Api::Private, HttpMethod::Post, routes::ACCOUNT_WITHDRAWAL, params)
            .await?;

        Ok(parse::parse_transaction(&response.result, cache.currencies.get(code)))
    }
}
