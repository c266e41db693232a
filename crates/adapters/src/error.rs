//! Error taxonomy shared by exchange adapters
//!
//! Venue-specific failure codes are classified into these variants so callers
//! can react to, say, an expired credential without parsing messages. Every
//! message is prefixed with the adapter id.

/// Error types for exchange operations
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// Missing, invalid or revoked credential, bad passphrase or signature
    #[error("{0}")]
    Authentication(String),

    /// Request timestamp rejected (clock skew or replay)
    #[error("{0}")]
    InvalidNonce(String),

    #[error("{0}")]
    AccountSuspended(String),

    #[error("{0}")]
    InsufficientFunds(String),

    /// Operation or currency not supported by the venue
    #[error("{0}")]
    NotSupported(String),

    /// A required argument (such as the account id) could not be resolved
    #[error("{0}")]
    ArgumentsRequired(String),

    #[error("{0}")]
    BadSymbol(String),

    #[error("{0}")]
    InvalidAddress(String),

    /// Unclassified failure envelope
    #[error("{0}")]
    Exchange(String),

    /// Response body could not be interpreted
    #[error("{0}")]
    BadResponse(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ExchangeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_is_passed_through() {
        let err = ExchangeError::InsufficientFunds("stronghold {\"errorCode\":\"INSUFFICIENT_FUNDS\"}".into());
        assert_eq!(err.to_string(), "stronghold {\"errorCode\":\"INSUFFICIENT_FUNDS\"}");
    }

    #[test]
    fn test_transport_errors_convert() {
        let err: ExchangeError = anyhow::anyhow!("connection reset").into();
        assert!(matches!(err, ExchangeError::Other(_)));
        assert_eq!(err.to_string(), "connection reset");
    }
}
