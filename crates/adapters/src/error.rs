//! Error taxonomy shared by every exchange adapter.
//!
//! Transport failures and malformed bodies are raised before an adapter's
//! response handlers run. Everything an exchange itself reports comes back
//! as [`ExchangeError::Api`], with the message pulled out of that venue's
//! error envelope.

/// Error types for exchange operations
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// Connection, DNS, TLS or body-read failure. No envelope was parsed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body was not valid JSON.
    #[error("Malformed response body: {0}")]
    Decode(String),

    /// The exchange rejected the request and said why.
    #[error("{exchange}: {message}")]
    Api { exchange: String, message: String },

    /// A success status whose body did not match the expected envelope.
    #[error("{exchange}: unexpected response: {detail}")]
    UnexpectedResponse { exchange: String, detail: String },

    /// Rejected locally before any network call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The venue adapter does not implement this operation.
    #[error("{exchange} does not support {operation}")]
    Unsupported {
        exchange: String,
        operation: &'static str,
    },

    /// A response dispatch was run without a handler for the branch it took.
    #[error("{exchange}: no {branch} handler registered for response")]
    MissingHandler {
        exchange: String,
        branch: &'static str,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ExchangeError {
    pub fn api(exchange: &str, message: impl Into<String>) -> Self {
        Self::Api {
            exchange: exchange.to_string(),
            message: message.into(),
        }
    }

    /// Generic failure for a success-status body with no usable payload.
    pub fn unknown(exchange: &str) -> Self {
        Self::UnexpectedResponse {
            exchange: exchange.to_string(),
            detail: "unknown".to_string(),
        }
    }

    pub fn unsupported(exchange: &str, operation: &'static str) -> Self {
        Self::Unsupported {
            exchange: exchange.to_string(),
            operation,
        }
    }

    /// True when the exchange itself reported the failure.
    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

pub type Result<T> = std::result::Result<T, ExchangeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ExchangeError::api("huobi", "invalid symbol");
        assert_eq!(err.to_string(), "huobi: invalid symbol");
        assert!(err.is_api());
    }

    #[test]
    fn test_unsupported_display() {
        let err = ExchangeError::unsupported("kraken", "new_order");
        assert_eq!(err.to_string(), "kraken does not support new_order");
        assert!(!err.is_api());
    }

    #[test]
    fn test_unknown_is_unexpected_response() {
        let err = ExchangeError::unknown("gate");
        assert!(matches!(
            err,
            ExchangeError::UnexpectedResponse { ref detail, .. } if detail == "unknown"
        ));
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: ExchangeError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, ExchangeError::Other(_)));
    }
}
