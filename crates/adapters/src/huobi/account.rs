//! Huobi Authentication and Type Converters
//!
//! # Authentication
//!
//! Huobi signs a canonical request description, not just the parameters:
//! 1. Add `AccessKeyId`, `SignatureMethod=HmacSHA256`, `SignatureVersion=2`
//!    and a UTC `Timestamp` (`YYYY-MM-DDTHH:MM:SS`) to the parameters
//! 2. Form-encode them with keys in ascending order
//! 3. HMAC-SHA256 `METHOD\nHOST\nPATH\nQUERY` with the API secret, base64-encoded
//! 4. Append it as the `Signature` parameter
//!
//! # API Documentation
//!
//! - Huobi API: <https://github.com/huobiapi/API_Docs/wiki>

use crate::rest::{params, Params};
use crate::sign::{encode_params, hmac_sha256_base64};
use crate::transport::Request;

pub const HUOBI_REST_URL: &str = "https://api.huobi.pro";

/// Host part of the signed canonical string.
pub const HUOBI_HOST: &str = "api.huobi.pro";

/// Zero as Huobi formats it in account balances.
pub const HUOBI_ZERO_BALANCE: &str = "0.000000000000000000";

#[derive(Clone)]
pub struct HuobiAuth {
    pub api_key: String,
    pub api_secret: String,
}

impl HuobiAuth {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self { api_key, api_secret }
    }

    /// UTC timestamp in the format the signature expects.
    pub fn get_timestamp() -> String {
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string()
    }

    /// Base64 HMAC-SHA256 of the canonical request string.
    pub fn sign(&self, method: &str, path: &str, query: &str) -> String {
        let payload = format!("{}\n{}\n{}\n{}", method, HUOBI_HOST, path, query);
        hmac_sha256_base64(&self.api_secret, &payload)
    }

    pub fn sign_request(&self, request: Request, fields: Params) -> Request {
        self.sign_with(request, fields, &Self::get_timestamp())
    }

    /// Signs with an explicit timestamp.
    pub fn sign_with(&self, request: Request, mut fields: Params, timestamp: &str) -> Request {
        fields.insert("AccessKeyId".to_string(), self.api_key.clone());
        fields.insert("SignatureMethod".to_string(), "HmacSHA256".to_string());
        fields.insert("SignatureVersion".to_string(), "2".to_string());
        fields.insert("Timestamp".to_string(), timestamp.to_string());

        let query = encode_params(&fields);
        let signature = self.sign(request.method.as_str(), &request.path, &query);
        let signature = encode_params(&params([("Signature", signature)]));
        request.with_query(format!("{}&{}", query, signature))
    }
}

pub mod converters {
    use crate::traits::{OrderState, Side};

    /// Huobi order types read `buy-limit`, `sell-market`, ...
    pub fn to_huobi_order_type(side: Side) -> String {
        format!("{}-limit", side.as_str())
    }

    pub fn from_huobi_order_type(order_type: &str) -> Side {
        match order_type.split('-').next() {
            Some("sell") => Side::Sell,
            _ => Side::Buy,
        }
    }

    pub fn from_huobi_state(state: &str) -> OrderState {
        match state {
            "submitted" | "partial-filled" => OrderState::Alive,
            "canceled" => OrderState::Cancelled,
            other => OrderState::Other(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{OrderState, Side};
    use crate::transport::Method;

    #[test]
    fn test_sign_with_known_vector() {
        let auth = HuobiAuth::new("ak".into(), "sk".into());
        let req = auth.sign_with(
            Request::new(Method::Get, HUOBI_REST_URL, "/v1/account/accounts"),
            Params::new(),
            "2018-01-01T00:00:00",
        );
        assert_eq!(
            req.query,
            "AccessKeyId=ak&SignatureMethod=HmacSHA256&SignatureVersion=2\
             &Timestamp=2018-01-01T00%3A00%3A00\
             &Signature=CiFYyiCYsG3Yud1%2FNwr%2Bj7mwCN%2BogTYwb3Iam9t4ne8%3D"
        );
    }

    #[test]
    fn test_signature_covers_method_and_path() {
        let auth = HuobiAuth::new("ak".into(), "sk".into());
        let q = "AccessKeyId=ak";
        let get = auth.sign("GET", "/v1/order/orders/1", q);
        assert_ne!(get, auth.sign("POST", "/v1/order/orders/1", q));
        assert_ne!(get, auth.sign("GET", "/v1/order/orders/2", q));
    }

    #[test]
    fn test_timestamp_format() {
        let ts = HuobiAuth::get_timestamp();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[10..11], "T");
    }

    #[test]
    fn test_converters() {
        assert_eq!(converters::to_huobi_order_type(Side::Sell), "sell-limit");
        assert!(matches!(converters::from_huobi_order_type("buy-limit"), Side::Buy));
        assert!(matches!(converters::from_huobi_order_type("sell-market"), Side::Sell));
        assert_eq!(converters::from_huobi_state("submitted"), OrderState::Alive);
        assert_eq!(converters::from_huobi_state("partial-filled"), OrderState::Alive);
        assert_eq!(converters::from_huobi_state("canceled"), OrderState::Cancelled);
        assert_eq!(
            converters::from_huobi_state("filled"),
            OrderState::Other("filled".into())
        );
    }
}
