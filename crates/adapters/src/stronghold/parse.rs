//! Normalizers from Stronghold payloads to the unified model
//!
//! Every function here is pure and total over missing fields: absent or
//! unparsable values become `None` rather than errors, except where a record
//! cannot be identified at all. Derived amounts use checked arithmetic; an
//! overflow leaves the derived field unset and logs a warning.

use super::account::{converters, EXCHANGE_ID};
use crate::error::{ExchangeError, Result};
use crate::traits::*;
use crate::utils::{asset_code, parse8601, safe_bool, safe_decimal, safe_integer, safe_string, to_decimal};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Market lookup by venue-native id
pub type MarketsById = HashMap<String, Market>;

static NULL: Value = Value::Null;

/// Applies a checked operation when both operands are present
fn derive(
    field: &str,
    lhs: Option<Decimal>,
    rhs: Option<Decimal>,
    op: fn(Decimal, Decimal) -> Option<Decimal>,
) -> Option<Decimal> {
    let (lhs, rhs) = (lhs?, rhs?);
    let result = op(lhs, rhs);
    if result.is_none() {
        warn!(field, %lhs, %rhs, "Decimal overflow deriving field, leaving it unset");
    }
    result
}

// ============================================================================
// Markets & Currencies
// ============================================================================

/// ```text
/// { id: 'SHXUSD', baseAssetId: 'SHX/stronghold.co', counterAssetId: 'USD/stronghold.co',
///   minimumOrderSize: '1.0000000', displayDecimalsPrice: 4, displayDecimalsAmount: 0 }
/// ```
pub fn parse_market(entry: &Value) -> Option<Market> {
    let id = safe_string(entry, "id")?;
    let base_id = safe_string(entry, "baseAssetId")?;
    let quote_id = safe_string(entry, "counterAssetId")?;
    let base = asset_code(&base_id);
    let quote = asset_code(&quote_id);

    Some(Market {
        symbol: format!("{}/{}", base, quote),
        id,
        base,
        quote,
        base_id,
        quote_id,
        precision: Precision {
            price: safe_integer(entry, "displayDecimalsPrice"),
            amount: safe_integer(entry, "displayDecimalsAmount"),
        },
        limits: MarketLimits {
            amount: MinMax {
                min: safe_decimal(entry, "minimumOrderSize"),
                max: None,
            },
        },
        info: entry.clone(),
    })
}

pub fn parse_markets(data: &Value) -> Vec<Market> {
    as_list(data).iter().filter_map(parse_market).collect()
}

/// ```text
/// { id: 'XLM/native', code: 'XLM', displayDecimalsFull: 7, displayDecimalsSignificant: 2 }
/// ```
pub fn parse_currency(entry: &Value) -> Option<Currency> {
    let id = safe_string(entry, "id")?;
    let code = safe_string(entry, "code")
        .map(|c| asset_code(&c))
        .unwrap_or_else(|| asset_code(&id));

    Some(Currency {
        code,
        id,
        precision: safe_integer(entry, "displayDecimalsFull"),
        info: entry.clone(),
    })
}

pub fn parse_currencies(data: &Value) -> Vec<Currency> {
    as_list(data).iter().filter_map(parse_currency).collect()
}

// ============================================================================
// Order Book
// ============================================================================

/// Envelope timestamps are ISO-8601 strings, or integer microseconds
pub fn parse_envelope_timestamp(timestamp: Option<&Value>) -> Option<UnixMillis> {
    match timestamp? {
        Value::String(s) => parse8601(s),
        Value::Number(n) => n.as_i64().map(|micros| micros / 1_000),
        _ => None,
    }
}

fn parse_levels(levels: Option<&Value>) -> Vec<(Price, Quantity)> {
    as_list(levels.unwrap_or(&NULL))
        .iter()
        .filter_map(|level| {
            let level = level.as_array()?;
            let price = to_decimal(level.first()?, "price")?;
            let size = to_decimal(level.get(1)?, "size")?;
            Some((price, size))
        })
        .collect()
}

pub fn parse_order_book(symbol: &str, data: &Value, timestamp: Option<UnixMillis>) -> OrderBook {
    let mut bids = parse_levels(data.get("bids"));
    let mut asks = parse_levels(data.get("asks"));
    bids.sort_by(|a, b| b.0.cmp(&a.0));
    asks.sort_by(|a, b| a.0.cmp(&b.0));

    OrderBook {
        symbol: symbol.to_string(),
        timestamp,
        bids,
        asks,
    }
}

// ============================================================================
// Trades
// ============================================================================

/// The two trade shapes the venue emits
#[derive(Debug)]
pub enum RawTrade<'a> {
    /// Public feed: `[price, amount, side, executedAt]`
    Positional(&'a [Value]),
    /// Private history: keyed object with id, orderId, marketId, maker
    Keyed(&'a Value),
}

impl<'a> RawTrade<'a> {
    pub fn classify(value: &'a Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(RawTrade::Positional(items)),
            Value::Object(_) => Some(RawTrade::Keyed(value)),
            _ => None,
        }
    }
}

pub fn parse_trade(trade: &Value, market: Option<&Market>, markets_by_id: &MarketsById) -> Trade {
    let mut parsed = Trade {
        id: None,
        timestamp: None,
        symbol: None,
        side: None,
        price: None,
        amount: None,
        cost: None,
        taker_or_maker: None,
        order_id: None,
        info: trade.clone(),
    };
    let mut market = market;

    match RawTrade::classify(trade) {
        Some(RawTrade::Positional(items)) => {
            parsed.price = items.first().and_then(|v| to_decimal(v, "price"));
            parsed.amount = items.get(1).and_then(|v| to_decimal(v, "amount"));
            parsed.side = items.get(2).and_then(Value::as_str).and_then(converters::from_stronghold_side);
            parsed.timestamp = items.get(3).and_then(Value::as_str).and_then(parse8601);
        }
        Some(RawTrade::Keyed(obj)) => {
            parsed.id = safe_string(obj, "id");
            parsed.price = safe_decimal(obj, "price");
            parsed.amount = safe_decimal(obj, "size");
            parsed.side = safe_string(obj, "side").as_deref().and_then(converters::from_stronghold_side);
            parsed.timestamp = safe_string(obj, "executedAt").as_deref().and_then(parse8601);
            parsed.order_id = safe_string(obj, "orderId");
            if let Some(found) = safe_string(obj, "marketId").and_then(|id| markets_by_id.get(&id)) {
                market = Some(found);
            }
            parsed.taker_or_maker = Some(if safe_bool(obj, "maker").unwrap_or(false) {
                TakerOrMaker::Maker
            } else {
                TakerOrMaker::Taker
            });
        }
        None => {}
    }

    parsed.cost = derive("cost", parsed.price, parsed.amount, Decimal::checked_mul);
    parsed.symbol = market.map(|m| m.symbol.clone());
    parsed
}

// ============================================================================
// Orders
// ============================================================================

/// ```text
/// { id: '178596', marketId: 'XLMUSD', side: 'buy', size: '1.0000000',
///   sizeFilled: '0', price: '0.10000000', placedAt: '2019-02-01T19:47:52Z' }
/// ```
///
/// Status, type and average price are not reported by the venue.
pub fn parse_order(order: &Value, market: Option<&Market>, markets_by_id: &MarketsById) -> Order {
    let market = safe_string(order, "marketId")
        .and_then(|id| markets_by_id.get(&id))
        .or(market);

    let amount = safe_decimal(order, "size");
    let filled = safe_decimal(order, "sizeFilled");
    let price = safe_decimal(order, "price");

    let remaining = derive("remaining", amount, filled, Decimal::checked_sub);
    let cost = derive("cost", amount, price, Decimal::checked_mul);

    Order {
        id: safe_string(order, "id"),
        symbol: market.map(|m| m.symbol.clone()),
        side: safe_string(order, "side").as_deref().and_then(converters::from_stronghold_side),
        ord_type: None,
        status: None,
        amount,
        filled,
        remaining,
        price,
        average: None,
        cost,
        timestamp: safe_string(order, "placedAt").as_deref().and_then(parse8601),
        info: order.clone(),
    }
}

// ============================================================================
// Transactions
// ============================================================================

pub fn parse_transaction_status(status: &str) -> String {
    match status {
        "queued" | "settling" => "pending".to_string(),
        other => other.to_string(),
    }
}

pub fn parse_transaction_type(direction: &str) -> TransactionType {
    match direction {
        "incoming" | "deposit" => TransactionType::Deposit,
        _ => TransactionType::Withdrawal,
    }
}

/// ```text
/// { id, status: 'queued', direction: 'outgoing', amount: '98.95000000',
///   assetId: 'XLM/native', feeAmount?, requestedAt?, updatedAt? }
/// ```
pub fn parse_transaction(transaction: &Value, currency: Option<&Currency>) -> Transaction {
    let code = safe_string(transaction, "assetId")
        .map(|asset_id| asset_code(&asset_id))
        .or_else(|| currency.map(|c| c.code.clone()));

    let amount = safe_decimal(transaction, "amount");
    let fee_cost = safe_decimal(transaction, "feeAmount");
    let fee_rate = derive(
        "fee.rate",
        fee_cost,
        amount.filter(|a| !a.is_zero()),
        Decimal::checked_div,
    );

    Transaction {
        id: safe_string(transaction, "id"),
        currency: code,
        amount,
        tx_type: safe_string(transaction, "direction")
            .as_deref()
            .map(parse_transaction_type),
        status: safe_string(transaction, "status")
            .as_deref()
            .map(parse_transaction_status),
        fee: TransactionFee {
            cost: fee_cost,
            rate: fee_rate,
        },
        timestamp: safe_string(transaction, "requestedAt").as_deref().and_then(parse8601),
        updated: safe_string(transaction, "updatedAt").as_deref().and_then(parse8601),
        info: transaction.clone(),
    }
}

// ============================================================================
// Balance & Accounts
// ============================================================================

/// Groups the flat per-asset list by currency code; same-code assets from
/// different issuers are summed
///
/// A row whose sum overflows is skipped, as is a currency whose `used` cannot
/// be derived.
pub fn parse_balance(result: &Value) -> Balances {
    let mut currencies: BTreeMap<String, Balance> = BTreeMap::new();

    for entry in as_list(result.get("balances").unwrap_or(&NULL)) {
        let Some(asset_id) = safe_string(entry, "assetId") else {
            continue;
        };
        let total = safe_decimal(entry, "amount").unwrap_or(Decimal::ZERO);
        let free = safe_decimal(entry, "availableForTrade").unwrap_or(Decimal::ZERO);

        let balance = currencies.entry(asset_code(&asset_id)).or_default();
        match (balance.total.checked_add(total), balance.free.checked_add(free)) {
            (Some(sum_total), Some(sum_free)) => {
                balance.total = sum_total;
                balance.free = sum_free;
            }
            _ => warn!(%asset_id, "Decimal overflow summing balance, row skipped"),
        }
    }

    currencies.retain(|code, balance| match balance.total.checked_sub(balance.free) {
        Some(used) => {
            balance.used = used;
            true
        }
        None => {
            warn!(%code, "Decimal overflow deriving used balance, currency skipped");
            false
        }
    });

    Balances {
        currencies,
        info: result.clone(),
    }
}

pub fn parse_account(entry: &Value) -> Option<Account> {
    Some(Account {
        id: safe_string(entry, "id")?,
        venue_specific_id: safe_string(entry, "venueSpecificId").filter(|s| !s.is_empty()),
    })
}

pub fn parse_accounts(data: &Value) -> Vec<Account> {
    as_list(data).iter().filter_map(parse_account).collect()
}

// ============================================================================
// Deposit Addresses
// ============================================================================

fn check_address(address: Option<String>) -> Result<String> {
    match address {
        Some(a) if !a.is_empty() && !a.chars().any(char::is_whitespace) => Ok(a),
        other => Err(ExchangeError::InvalidAddress(format!(
            "{} address is invalid or has not been generated yet: {}",
            EXCHANGE_ID,
            other.unwrap_or_default()
        ))),
    }
}

/// ```text
/// { assetId: 'BTC/stronghold.co', paymentMethod: 'bitcoin',
///   paymentMethodInstructions: { deposit_address, reference? }, direction: 'deposit' }
/// ```
pub fn parse_deposit_address(code: &str, result: &Value) -> Result<DepositAddress> {
    let instructions = result.get("paymentMethodInstructions").unwrap_or(&NULL);
    let address = check_address(safe_string(instructions, "deposit_address"))?;

    Ok(DepositAddress {
        currency: code.to_string(),
        address,
        tag: safe_string(instructions, "reference"),
        info: result.clone(),
    })
}

fn as_list(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or(&[])
}
