//! Shared helpers for exchange adapters
//!
//! - Lenient JSON field access
//! - ISO-8601 timestamps
//! - Currency-code normalization
//! - Price/amount precision formatting
//! - Since/limit list filtering

pub mod currency;
pub mod filter;
pub mod json;
pub mod precision;
pub mod time;

pub use currency::{asset_code, common_currency_code};
pub use filter::filter_by_since_limit;
pub use json::{safe_bool, safe_decimal, safe_integer, safe_string, to_decimal};
pub use precision::{amount_to_precision, price_to_precision};
pub use time::{iso8601, now_seconds, parse8601};
