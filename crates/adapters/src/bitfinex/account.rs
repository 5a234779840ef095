//! Bitfinex v1 Authentication and Type Converters
//!
//! # Authentication
//!
//! Private v1 endpoints sign a payload rather than a query string:
//! 1. Build a JSON object with `request` (the path), `nonce` and any call fields
//! 2. Base64-encode the JSON text; this is `X-BFX-PAYLOAD`
//! 3. HMAC-SHA384 the base64 text with the API secret, hex-encoded; this is
//!    `X-BFX-SIGNATURE`
//! 4. Send the API key in `X-BFX-APIKEY`
//!
//! # API Documentation
//!
//! - Bitfinex v1: <https://docs.bitfinex.com/v1/docs>

use base64::{engine::general_purpose, Engine as _};
use serde_json::{Map, Value};

use crate::sign::{hmac_sha384_hex, next_nonce};
use crate::transport::Request;

pub const BITFINEX_REST_URL: &str = "https://api.bitfinex.com";

/// Zero as Bitfinex formats it in wallet balances.
pub const BITFINEX_ZERO_BALANCE: &str = "0.0";

#[derive(Clone)]
pub struct BitfinexAuth {
    pub api_key: String,
    pub api_secret: String,
}

impl BitfinexAuth {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self { api_key, api_secret }
    }

    /// JSON text of the payload for `path` with the given nonce and extra fields.
    pub fn payload_json(path: &str, nonce: u64, fields: Map<String, Value>) -> String {
        let mut body = fields;
        body.insert("request".to_string(), Value::String(path.to_string()));
        body.insert("nonce".to_string(), Value::String(nonce.to_string()));
        Value::Object(body).to_string()
    }

    /// Base64 payload as carried in `X-BFX-PAYLOAD`.
    pub fn payload(path: &str, nonce: u64, fields: Map<String, Value>) -> String {
        general_purpose::STANDARD.encode(Self::payload_json(path, nonce, fields))
    }

    pub fn sign(&self, payload: &str) -> String {
        hmac_sha384_hex(&self.api_secret, payload)
    }

    /// Signs a call to `request.path` carrying `fields`.
    pub fn sign_request(&self, request: Request, fields: Map<String, Value>) -> Request {
        let body = Self::payload_json(&request.path, next_nonce(), fields);
        let payload = general_purpose::STANDARD.encode(&body);
        let signature = self.sign(&payload);
        request
            .with_header("Content-Type", "application/json")
            .with_header("Accept", "application/json")
            .with_header("X-BFX-APIKEY", self.api_key.clone())
            .with_header("X-BFX-PAYLOAD", payload)
            .with_header("X-BFX-SIGNATURE", signature)
            .with_body(body)
    }
}

pub mod converters {
    use serde_json::Value;

    use crate::traits::{OrderState, Side};

    pub fn to_bitfinex_side(side: Side) -> &'static str {
        side.as_str()
    }

    pub fn from_bitfinex_side(side: &str) -> Side {
        match side {
            "sell" => Side::Sell,
            _ => Side::Buy,
        }
    }

    /// `is_live` is a boolean. Anything but `true` passes through as text.
    pub fn from_bitfinex_live(value: &Value) -> OrderState {
        match value {
            Value::Bool(true) => OrderState::Alive,
            other => OrderState::Other(crate::lenient::text(other)),
        }
    }
}
