//! Reference adapter.
//!
//! Implements the whole [`Exchange`] contract without touching the network:
//! symbol mapping and credential storage work, every data operation returns
//! [`ExchangeError::Unsupported`]. It is the template new venues start from
//! and the subject of the conformance tests. It registers without a factory,
//! so [`Registry::get`] never hands it out.

use serde_json::Value;

use crate::currency::CurrencyPair;
use crate::error::{ExchangeError, Result};
use crate::lenient;
use crate::registry::Registry;
use crate::traits::*;

pub const EXCHANGE: &str = "ex";

#[derive(Default)]
pub struct ExAdapter {
    key: Option<ExchangeKey>,
}

impl ExAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&self) -> Option<&ExchangeKey> {
        self.key.as_ref()
    }
}

impl Exchange for ExAdapter {
    fn name(&self) -> &'static str {
        EXCHANGE
    }

    fn to_symbol(&self, pair: &CurrencyPair) -> String {
        pair.to_symbol("_")
    }

    fn norm_symbol(&self, symbol: &str) -> CurrencyPair {
        CurrencyPair::from_symbol(symbol)
    }

    fn set_key(&mut self, access: &str, secret: &str) {
        self.key = Some(ExchangeKey::new(access, secret));
    }

    fn get_balance(&mut self) -> Result<Vec<Balance>> {
        Err(ExchangeError::unsupported(EXCHANGE, "get_balance"))
    }

    fn get_price(&self, _pair: &CurrencyPair) -> Result<Price> {
        Err(ExchangeError::unsupported(EXCHANGE, "get_price"))
    }

    fn get_symbols(&self) -> Result<Vec<String>> {
        Err(ExchangeError::unsupported(EXCHANGE, "get_symbols"))
    }

    fn get_depth(&self, _pair: &CurrencyPair) -> Result<Depth> {
        Err(ExchangeError::unsupported(EXCHANGE, "get_depth"))
    }

    fn new_order(&mut self, _order: &Order) -> Result<String> {
        Err(ExchangeError::unsupported(EXCHANGE, "new_order"))
    }

    fn cancel_order(&self, _order: &Order) -> Result<()> {
        Err(ExchangeError::unsupported(EXCHANGE, "cancel_order"))
    }

    fn query_order(&self, _order: &Order) -> Result<Order> {
        Err(ExchangeError::unsupported(EXCHANGE, "query_order"))
    }

    fn order_state(&self, value: &Value) -> OrderState {
        OrderState::Other(lenient::text(value))
    }

    fn order_side(&self, value: &str) -> Side {
        value.parse().unwrap_or(Side::Buy)
    }
}

pub fn register(registry: &mut Registry) {
    registry.register(EXCHANGE, None);
}
