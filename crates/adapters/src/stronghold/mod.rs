//! Stronghold Exchange Adapter
//!
//! Provides a unified adapter for the Stronghold spot venue.
//!
//! # Available Adapters
//!
//! - [`StrongholdAdapter`] - Spot trading, funding and account data
//!
//! # Authentication
//!
//! Stronghold uses HMAC-SHA256 signing with Base64 encoding:
//! - Requires API key, base64 secret, and passphrase
//! - Signature: Base64(HMAC-SHA256(base64decode(secret), nonce + method + path + body))
//! - Nonce is the Unix time in seconds
//! - Headers: SH-CRED-ID, SH-CRED-SIG, SH-CRED-TIME, SH-CRED-PASS
//!
//! # Venues
//!
//! - `trade-public` - production (default)
//! - `sandbox-public` - sandbox, see [`StrongholdConfig::set_sandbox_mode`]
//!
//! # API Documentation
//!
//! - REST: <https://docs.stronghold.co>

pub mod account;
pub mod config;
pub mod parse;
pub mod spot;

pub use account::{StrongholdAuth, StrongholdRestClient, EXCHANGE_ID};
pub use config::{load_stronghold_config, StrongholdConfig};
pub use spot::{MarketCache, StrongholdAdapter};
