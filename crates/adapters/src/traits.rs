use crate::error::Result;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;

pub type Price = Decimal;
pub type Quantity = Decimal;
pub type UnixMillis = i64;

// ============================================================================
// Markets & Currencies
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Precision {
    /// Decimal places for prices
    pub price: Option<u32>,
    /// Decimal places for amounts
    pub amount: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MinMax {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarketLimits {
    pub amount: MinMax,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Market {
    /// Unified symbol, `BASE/QUOTE`
    pub symbol: String,
    /// Venue-native market id
    pub id: String,
    pub base: String,
    pub quote: String,
    /// Full venue asset id of the base, e.g. `SHX/stronghold.co`
    pub base_id: String,
    pub quote_id: String,
    pub precision: Precision,
    pub limits: MarketLimits,
    pub info: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Currency {
    pub code: String,
    /// Venue asset id, e.g. `XLM/native`
    pub id: String,
    pub precision: Option<u32>,
    pub info: Value,
}

// ============================================================================
// Order Book & Trades
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct OrderBook {
    pub symbol: String,
    pub timestamp: Option<UnixMillis>,
    /// Descending by price
    pub bids: Vec<(Price, Quantity)>,
    /// Ascending by price
    pub asks: Vec<(Price, Quantity)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderType {
    Limit,
    Market,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Limit => "limit",
            OrderType::Market => "market",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TakerOrMaker {
    Taker,
    Maker,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Trade {
    /// Absent on the public trade feed
    pub id: Option<String>,
    pub timestamp: Option<UnixMillis>,
    pub symbol: Option<String>,
    pub side: Option<Side>,
    pub price: Option<Price>,
    pub amount: Option<Quantity>,
    pub cost: Option<Decimal>,
    pub taker_or_maker: Option<TakerOrMaker>,
    pub order_id: Option<String>,
    pub info: Value,
}

// ============================================================================
// Orders
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderStatus {
    Open,
    Closed,
    Canceled,
}

#[derive(Clone, Debug)]
pub struct NewOrder {
    pub symbol: String,
    pub side: Side,
    pub ord_type: OrderType,
    pub amount: Quantity,
    pub price: Option<Price>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub id: Option<String>,
    pub symbol: Option<String>,
    pub side: Option<Side>,
    pub ord_type: Option<OrderType>,
    pub status: Option<OrderStatus>,
    pub amount: Option<Quantity>,
    pub filled: Option<Quantity>,
    pub remaining: Option<Quantity>,
    pub price: Option<Price>,
    pub average: Option<Price>,
    pub cost: Option<Decimal>,
    pub timestamp: Option<UnixMillis>,
    pub info: Value,
}

// ============================================================================
// Funding
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionType {
    Deposit,
    Withdrawal,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactionFee {
    pub cost: Option<Decimal>,
    pub rate: Option<Decimal>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    pub id: Option<String>,
    pub currency: Option<String>,
    pub amount: Option<Quantity>,
    pub tx_type: Option<TransactionType>,
    pub status: Option<String>,
    pub fee: TransactionFee,
    /// When the transaction was requested
    pub timestamp: Option<UnixMillis>,
    pub updated: Option<UnixMillis>,
    pub info: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DepositAddress {
    pub currency: String,
    pub address: String,
    pub tag: Option<String>,
    pub info: Value,
}

// ============================================================================
// Balance & Account
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Balance {
    pub free: Decimal,
    pub used: Decimal,
    pub total: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Balances {
    pub currencies: BTreeMap<String, Balance>,
    pub info: Value,
}

impl Balances {
    pub fn get(&self, code: &str) -> Option<&Balance> {
        self.currencies.get(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Balance)> {
        self.currencies.iter()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub venue_specific_id: Option<String>,
}

// ============================================================================
// Unified REST surface
// ============================================================================

#[async_trait::async_trait]
pub trait UnifiedRest: Send + Sync {
    // Market Data
    async fn fetch_markets(&self) -> Result<Vec<Market>>;
    async fn fetch_currencies(&self) -> Result<Vec<Currency>>;
    async fn fetch_order_book(&self, symbol: &str) -> Result<OrderBook>;
    async fn fetch_trades(
        &self,
        symbol: &str,
        since: Option<UnixMillis>,
        limit: Option<usize>,
    ) -> Result<Vec<Trade>>;
    async fn fetch_time(&self) -> Result<UnixMillis>;

    // Account & Balance
    async fn fetch_accounts(&self) -> Result<Vec<Account>>;
    async fn fetch_balance(&self) -> Result<Balances>;

    // Order Management
    async fn create_order(&self, new: NewOrder) -> Result<Order>;
    async fn cancel_order(&self, id: &str) -> Result<Order>;
    async fn fetch_open_orders(
        &self,
        symbol: Option<&str>,
        since: Option<UnixMillis>,
        limit: Option<usize>,
    ) -> Result<Vec<Order>>;
    async fn fetch_my_trades(
        &self,
        symbol: Option<&str>,
        since: Option<UnixMillis>,
        limit: Option<usize>,
    ) -> Result<Vec<Trade>>;

    // Funding
    async fn fetch_transactions(
        &self,
        code: Option<&str>,
        since: Option<UnixMillis>,
        limit: Option<usize>,
    ) -> Result<Vec<Transaction>>;
    async fn create_deposit_address(&self, code: &str) -> Result<DepositAddress>;
    async fn withdraw(
        &self,
        code: &str,
        amount: Quantity,
        address: &str,
        tag: Option<&str>,
    ) -> Result<Transaction>;
}
