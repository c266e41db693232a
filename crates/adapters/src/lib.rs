//! Exchange Adapters
//!
//! Normalizes venue REST APIs into one data model:
//!
//! - **Unified model**: markets, currencies, order books, trades, orders,
//!   transactions, balances ([`traits`])
//! - **Error taxonomy**: venue error codes classified into [`ExchangeError`]
//! - **Transport seam**: requests built by adapters, executed by an
//!   [`transport::HttpTransport`]
//!
//! # Example
//!
//! ```ignore
//! use adapters::stronghold::{StrongholdAdapter, StrongholdConfig};
//! use adapters::traits::UnifiedRest;
//!
//! let adapter = StrongholdAdapter::public(StrongholdConfig::default());
//! let book = adapter.fetch_order_book("SHX/USD").await?;
//! ```

pub mod error;
pub mod stronghold;
pub mod traits;
pub mod transport;
pub mod utils;

pub use error::{ExchangeError, Result};
