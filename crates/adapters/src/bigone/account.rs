//! BigOne authentication and type converters.
//!
//! # Authentication
//!
//! BigOne is a token-style venue. Private calls carry:
//! - `Authorization: Bearer <access key>`
//! - `Big-Device-Id: <uuid>`: random per adapter instance, never persisted
//!
//! # API Documentation
//!
//! - BigOne API: <https://developer.big.one>

use crate::transport::Request;

// ============================================================================
// API Endpoint Constants
// ============================================================================

pub const BIGONE_REST_URL: &str = "https://api.big.one";

/// Zero as BigOne formats it in account balances.
pub const BIGONE_ZERO_BALANCE: &str = "0.00000000";

// ============================================================================
// Authentication
// ============================================================================

#[derive(Clone)]
pub struct BigOneAuth {
    pub api_key: String,
    pub device_id: String,
}

impl BigOneAuth {
    pub fn new(api_key: String, device_id: String) -> Self {
        Self { api_key, device_id }
    }

    /// Attaches the bearer token and device id.
    pub fn sign(&self, request: Request) -> Request {
        request
            .with_header("Authorization", format!("Bearer {}", self.api_key))
            .with_header("Big-Device-Id", self.device_id.clone())
    }
}

// ============================================================================
// Type Converters
// ============================================================================

pub mod converters {
    use crate::traits::{OrderState, Side};

    /// BigOne calls sells asks and buys bids.
    pub fn to_bigone_side(side: Side) -> &'static str {
        match side {
            Side::Sell => "ASK",
            Side::Buy => "BID",
        }
    }

    pub fn from_bigone_side(side: &str) -> Side {
        match side {
            "ASK" => Side::Sell,
            _ => Side::Buy,
        }
    }

    pub fn from_bigone_state(state: &str) -> OrderState {
        match state {
            "open" => OrderState::Alive,
            "canceled" => OrderState::Cancelled,
            other => OrderState::Other(other.to_string()),
        }
    }
}
