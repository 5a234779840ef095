//! OtcBTC authentication and type converters.
//!
//! # Authentication
//!
//! 1. Add `access_key` to the call parameters
//! 2. Form-encode them with keys in ascending order
//! 3. HMAC-SHA256 `METHOD|PATH|<encoded>` with the secret, hex-encoded
//! 4. Append it as the `signature` query parameter
//!
//! Parameters travel in the query string for every method, POST included.

use crate::rest::Params;
use crate::sign::{encode_params, hmac_sha256_hex};
use crate::transport::Request;

// ============================================================================
// API Endpoint Constants
// ============================================================================

pub const OTCBTC_REST_URL: &str = "https://bb.otcbtc.com";

/// Zero as OtcBTC formats it in `accounts[].balance`.
pub const OTCBTC_ZERO_BALANCE: &str = "0.0";

// ============================================================================
// Authentication
// ============================================================================

#[derive(Clone)]
pub struct OtcBtcAuth {
    pub api_key: String,
    pub api_secret: String,
}

impl OtcBtcAuth {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self { api_key, api_secret }
    }

    pub fn sign(&self, method: &str, path: &str, query: &str) -> String {
        hmac_sha256_hex(&self.api_secret, &format!("{}|{}|{}", method, path, query))
    }

    pub fn sign_request(&self, request: Request, mut fields: Params) -> Request {
        fields.insert("access_key".to_string(), self.api_key.clone());
        let query = encode_params(&fields);
        let signature = self.sign(request.method.as_str(), &request.path, &query);
        request.with_query(format!("{}&signature={}", query, signature))
    }
}

// ============================================================================
// Type Converters
// ============================================================================

pub mod converters {
    use crate::traits::{OrderState, Side};

    pub fn from_otcbtc_state(state: &str) -> OrderState {
        match state {
            "wait" => OrderState::Alive,
            "cancel" => OrderState::Cancelled,
            other => OrderState::Other(other.to_string()),
        }
    }

    /// OtcBTC already speaks `buy`/`sell`.
    pub fn from_otcbtc_side(side: &str) -> Side {
        side.parse().unwrap_or(Side::Buy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Method;
    use crate::traits::{OrderState, Side};

    #[test]
    fn test_sign_request_known_vector() {
        let auth = OtcBtcAuth::new("ak".into(), "sk".into());
        let request = Request::new(Method::Get, OTCBTC_REST_URL, "/api/v2/users/me");
        let signed = auth.sign_request(request, Params::new());
        assert_eq!(
            signed.query,
            "access_key=ak&signature=829a0c4287bed0532eab9b88cec7dcfaf66b27c1f5aab171022f6fc2452f9385"
        );
    }

    #[test]
    fn test_state_conversion() {
        assert_eq!(converters::from_otcbtc_state("wait"), OrderState::Alive);
        assert_eq!(converters::from_otcbtc_state("cancel"), OrderState::Cancelled);
        assert_eq!(converters::from_otcbtc_state("done"), OrderState::Other("done".into()));
    }

    #[test]
    fn test_side_passthrough() {
        assert_eq!(converters::from_otcbtc_side("sell"), Side::Sell);
        assert_eq!(converters::from_otcbtc_side("buy"), Side::Buy);
    }
}
