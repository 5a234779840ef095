use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::currency::CurrencyPair;
use crate::error::{ExchangeError, Result};

// ============================================================================
// Balance & Market Data
// ============================================================================

/// One non-zero holding. The amount is kept exactly as the venue sent it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Balance {
    pub currency: String,
    pub balance: String,
}

impl Balance {
    pub fn new(currency: impl Into<String>, balance: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            balance: balance.into(),
        }
    }

    /// Parses the vendor decimal string for callers that need arithmetic.
    pub fn amount(&self) -> Result<Decimal> {
        self.balance.trim().parse::<Decimal>().map_err(|e| {
            ExchangeError::Validation(format!(
                "balance {} for {} is not a decimal: {}",
                self.balance, self.currency, e
            ))
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Price {
    pub price: f64,
}

/// One order-book level.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Unit {
    pub price: f64,
    pub amount: f64,
}

impl Unit {
    pub fn new(price: f64, amount: f64) -> Self {
        Self { price, amount }
    }
}

/// Order book snapshot.
///
/// Canonical order: asks sorted by descending price so the best (lowest)
/// ask is the last element; bids sorted by descending price so the best
/// (highest) bid is the first element. See [`Depth::normalize`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Depth {
    pub asks: Vec<Unit>,
    pub bids: Vec<Unit>,
}

// ============================================================================
// Orders
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Side {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(ExchangeError::Validation(format!(
                "side must be buy or sell, got {other}"
            ))),
        }
    }
}

/// Canonical order state.
///
/// Venues map their own status values onto `Alive` and `Cancelled`. Values
/// with no clean mapping are kept verbatim in `Other`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum OrderState {
    Alive,
    Cancelled,
    #[default]
    Unknown,
    Other(String),
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderState::Alive => f.write_str("Alive"),
            OrderState::Cancelled => f.write_str("Cancelled"),
            OrderState::Unknown => f.write_str("Unknown"),
            OrderState::Other(s) => f.write_str(s),
        }
    }
}

/// A snapshot of a limit order. Never a live handle: refresh it with
/// [`Exchange::query_order`].
#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    /// Empty until the venue assigns one.
    pub id: String,
    pub pair: CurrencyPair,
    pub side: Side,
    pub price: f64,
    pub amount: f64,
    pub executed: f64,
    pub remain: f64,
    pub state: OrderState,
}

impl Order {
    /// A new limit order that has not been submitted yet.
    pub fn limit(pair: CurrencyPair, side: Side, price: f64, amount: f64) -> Self {
        Self {
            id: String::new(),
            pair,
            side,
            price,
            amount,
            executed: 0.0,
            remain: amount,
            state: OrderState::Unknown,
        }
    }

    /// Reference to an already-submitted order, for cancel and query calls.
    pub fn with_id(id: impl Into<String>, pair: CurrencyPair) -> Self {
        Self {
            id: id.into(),
            ..Self::limit(pair, Side::Buy, 0.0, 0.0)
        }
    }
}

// ============================================================================
// Credentials
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeKey {
    #[serde(rename = "AccessKeyId")]
    pub access_key_id: String,
    #[serde(rename = "SecretKeyId")]
    pub secret_key_id: String,
}

impl ExchangeKey {
    pub fn new(access_key_id: impl Into<String>, secret_key_id: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_key_id: secret_key_id.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.access_key_id.trim().is_empty() {
            return Err(ExchangeError::Validation("access key id is empty".into()));
        }
        if self.secret_key_id.trim().is_empty() {
            return Err(ExchangeError::Validation("secret key id is empty".into()));
        }
        Ok(())
    }
}

// ============================================================================
// Exchange Capability Interface
// ============================================================================

/// The contract every venue adapter implements.
///
/// All calls block until the venue answers. An instance is meant for a
/// single owner: adapters hold credentials and may cache derived state
/// (an account id, for example) without internal locking.
pub trait Exchange: Send {
    /// Registry name of this venue.
    fn name(&self) -> &'static str;

    /// Renders a pair the way this venue spells market symbols.
    fn to_symbol(&self, pair: &CurrencyPair) -> String;

    /// Maps a venue symbol back to a pair. Never fails; malformed input
    /// yields a best guess or [`CurrencyPair::unknown`].
    fn norm_symbol(&self, symbol: &str) -> CurrencyPair;

    /// Stores credentials for signed calls. May be called again to rotate them.
    fn set_key(&mut self, access: &str, secret: &str);

    /// Non-zero balances only.
    fn get_balance(&mut self) -> Result<Vec<Balance>>;

    fn get_price(&self, pair: &CurrencyPair) -> Result<Price>;

    fn get_symbols(&self) -> Result<Vec<String>>;

    /// Order book in canonical order.
    fn get_depth(&self, pair: &CurrencyPair) -> Result<Depth>;

    /// Submits a limit order and returns the venue order id.
    fn new_order(&mut self, order: &Order) -> Result<String>;

    /// Venue errors (already cancelled, already filled) are returned as is.
    fn cancel_order(&self, order: &Order) -> Result<()>;

    /// Fetches a fresh snapshot with `remain` recomputed.
    fn query_order(&self, order: &Order) -> Result<Order>;

    /// Maps a venue status value (string, integer or boolean) to a canonical
    /// state. Pure; unmapped values pass through as [`OrderState::Other`].
    fn order_state(&self, value: &Value) -> OrderState;

    /// Maps a venue side encoding to buy or sell.
    fn order_side(&self, value: &str) -> Side;
}
