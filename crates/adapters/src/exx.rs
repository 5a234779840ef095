//! EXX Exchange Adapter (public market data only)
//!
//! EXX reports failures as an `error` key inside an HTTP 200 body.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::currency::CurrencyPair;
use crate::error::{ExchangeError, Result};
use crate::lenient;
use crate::registry::{factory, Registry};
use crate::response::message_at;
use crate::rest::{params, Params, RestClient};
use crate::traits::*;
use crate::transport::Transport;

pub const EXCHANGE: &str = "exx";
pub const EXX_REST_URL: &str = "https://api.exx.com";

fn resp_err(js: &Value) -> ExchangeError {
    message_at(EXCHANGE, js, "/error")
}

fn reject_error_key(js: Value) -> Result<Value> {
    if js.get("error").is_some() {
        Err(resp_err(&js))
    } else {
        Ok(js)
    }
}

pub struct ExxAdapter {
    rest: RestClient,
    key: Option<ExchangeKey>,
}

impl ExxAdapter {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            rest: RestClient::new(EXCHANGE, EXX_REST_URL, transport),
            key: None,
        }
    }

    /// Credentials from `set_key`. No endpoint wired here is signed.
    pub fn key(&self) -> Option<&ExchangeKey> {
        self.key.as_ref()
    }
}

impl Exchange for ExxAdapter {
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
        debug!(exchange = EXCHANGE, "credentials stored, public endpoints only");
        self.key = Some(ExchangeKey::new(access, secret));
    }

    fn get_balance(&mut self) -> Result<Vec<Balance>> {
        Err(ExchangeError::unsupported(EXCHANGE, "get_balance"))
    }

    fn get_price(&self, pair: &CurrencyPair) -> Result<Price> {
        self.rest
            .get_public("/data/v1/ticker", &params([("currency", self.to_symbol(pair))]))?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = reject_error_key(js)?;
                Ok(Price {
                    price: lenient::number(&js["ticker"]["last"], "last"),
                })
            })
            .on_error(resp_err)
            .run()
    }

    fn get_symbols(&self) -> Result<Vec<String>> {
        self.rest
            .get_public("/data/v1/markets", &Params::new())?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = reject_error_key(js)?;
                Ok(js
                    .as_object()
                    .map(|markets| markets.keys().cloned().collect())
                    .unwrap_or_default())
            })
            .on_error(resp_err)
            .run()
    }

    fn get_depth(&self, pair: &CurrencyPair) -> Result<Depth> {
        self.rest
            .get_public("/data/v1/depth", &params([("currency", self.to_symbol(pair))]))?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = reject_error_key(js)?;
                Ok(Depth::from_levels(
                    lenient::units(&js["asks"], "price", "amount"),
                    lenient::units(&js["bids"], "price", "amount"),
                ))
            })
            .on_error(resp_err)
            .run()
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

pub fn register(registry: &mut Registry, transport: Arc<dyn Transport>) {
    registry.register(EXCHANGE, factory(move || ExxAdapter::new(transport.clone())));
}
