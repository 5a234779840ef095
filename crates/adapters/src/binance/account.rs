//! Binance Exchange Authentication and Type Converters
//!
//! # Authentication
//!
//! Binance uses HMAC-SHA256 signatures for request authentication:
//! 1. Add `recvWindow` and a millisecond `timestamp` to the parameters
//! 2. Form-encode the parameters with keys in ascending order
//! 3. Sign the encoded string with the API secret, hex-encoded
//! 4. Append it as the `signature` parameter and send the key in `X-MBX-APIKEY`
//!
//! # API Documentation
//!
//! - Binance API: <https://github.com/binance-exchange/binance-official-api-docs/blob/master/rest-api.md>

use crate::rest::Params;
use crate::sign::{encode_params, hmac_sha256_hex, now_millis};
use crate::transport::Request;

// ============================================================================
// API Endpoint Constants
// ============================================================================

/// Binance Spot REST API base URL
pub const BINANCE_REST_URL: &str = "https://api.binance.com";

/// Zero as Binance formats it in account balances.
pub const BINANCE_ZERO_BALANCE: &str = "0.00000000";

/// Milliseconds a signed request stays valid after its timestamp.
pub const BINANCE_RECV_WINDOW: &str = "5000";

// ============================================================================
// Authentication
// ============================================================================

/// Binance API authentication credentials
#[derive(Clone)]
pub struct BinanceAuth {
    /// API key string (public identifier)
    pub api_key: String,

    /// API secret (private signing key)
    pub api_secret: String,
}

impl BinanceAuth {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self { api_key, api_secret }
    }

    /// Generates the hex HMAC-SHA256 signature of an encoded query string
    pub fn sign(&self, query_string: &str) -> String {
        hmac_sha256_hex(&self.api_secret, query_string)
    }

    /// Stamps, encodes and signs `params` onto `request`.
    pub fn sign_request(&self, request: Request, mut params: Params) -> Request {
        params.insert("recvWindow".to_string(), BINANCE_RECV_WINDOW.to_string());
        params.insert("timestamp".to_string(), now_millis().to_string());
        self.sign_with(request, &params)
    }

    /// Signs `params` exactly as given.
    pub fn sign_with(&self, request: Request, params: &Params) -> Request {
        let query = encode_params(params);
        let signature = self.sign(&query);
        request
            .with_query(format!("{}&signature={}", query, signature))
            .with_header("X-MBX-APIKEY", self.api_key.clone())
    }
}

// ============================================================================
// Type Converters
// ============================================================================

/// Utility functions for converting between Binance API types and internal trait types
pub mod converters {
    use crate::traits::{OrderState, Side};

    /// Converts internal Side enum to Binance API string format
    pub fn to_binance_side(side: Side) -> &'static str {
        match side {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }

    /// Converts Binance API side string to internal Side enum
    pub fn from_binance_side(side: &str) -> Side {
        match side.to_uppercase().as_str() {
            "SELL" => Side::Sell,
            _ => Side::Buy,
        }
    }

    /// Converts Binance API order status string to canonical state
    pub fn from_binance_order_status(status: &str) -> OrderState {
        match status {
            "NEW" | "PARTIALLY_FILLED" => OrderState::Alive,
            "CANCELED" => OrderState::Cancelled,
            other => OrderState::Other(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::params;
    use crate::traits::{OrderState, Side};
    use crate::transport::Method;

    // ------------------------------------------------------------------------
    // Authentication
    // ------------------------------------------------------------------------

    #[test]
    fn test_auth_sign_deterministic() {
        let auth = BinanceAuth::new("key".into(), "secret".into());
        assert_eq!(
            auth.sign("symbol=BTCUSDT&timestamp=1"),
            "ef9d3d77a34d9a13a21a4c2d7f3e8cb091888a74ca62b5b62f430e78eded95ba"
        );
    }

    #[test]
    fn test_sign_with_appends_signature_and_header() {
        let auth = BinanceAuth::new("key".into(), "secret".into());
        let p = params([
            ("timestamp", "1".to_string()),
            ("symbol", "BTCUSDT".to_string()),
        ]);
        let req = auth.sign_with(Request::new(Method::Get, BINANCE_REST_URL, "/api/v3/order"), &p);
        assert_eq!(
            req.query,
            "symbol=BTCUSDT&timestamp=1&signature=ef9d3d77a34d9a13a21a4c2d7f3e8cb091888a74ca62b5b62f430e78eded95ba"
        );
        assert_eq!(req.header("X-MBX-APIKEY"), Some("key"));
    }

    #[test]
    fn test_sign_request_stamps_params() {
        let auth = BinanceAuth::new("key".into(), "secret".into());
        let req = auth.sign_request(
            Request::new(Method::Get, BINANCE_REST_URL, "/api/v3/account"),
            Params::new(),
        );
        assert!(req.query.starts_with("recvWindow=5000&timestamp="));
        assert!(req.query.contains("&signature="));
    }

    // ------------------------------------------------------------------------
    // Converters
    // ------------------------------------------------------------------------

    #[test]
    fn test_side_conversion() {
        assert_eq!(converters::to_binance_side(Side::Buy), "BUY");
        assert_eq!(converters::to_binance_side(Side::Sell), "SELL");
        assert!(matches!(converters::from_binance_side("SELL"), Side::Sell));
        assert!(matches!(converters::from_binance_side("buy"), Side::Buy));
    }

    #[test]
    fn test_status_conversion() {
        assert_eq!(converters::from_binance_order_status("NEW"), OrderState::Alive);
        assert_eq!(
            converters::from_binance_order_status("PARTIALLY_FILLED"),
            OrderState::Alive
        );
        assert_eq!(
            converters::from_binance_order_status("CANCELED"),
            OrderState::Cancelled
        );
        assert_eq!(
            converters::from_binance_order_status("FILLED"),
            OrderState::Other("FILLED".into())
        );
    }
}
