//! Poloniex Exchange Adapter (public market data only)
//!
//! Pairs are spelled quote first in upper case (`BTC_ETH`). Failures come
//! back as an `error` key inside an HTTP 200 body.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::currency::CurrencyPair;
use crate::error::{ExchangeError, Result};
use crate::lenient;
use crate::registry::{factory, Registry};
use crate::response::message_at;
use crate::rest::{params, RestClient};
use crate::traits::*;
use crate::transport::Transport;

pub const EXCHANGE: &str = "poloniex";
pub const POLONIEX_REST_URL: &str = "https://poloniex.com";

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

pub struct PoloniexAdapter {
    rest: RestClient,
    key: Option<ExchangeKey>,
}

impl PoloniexAdapter {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            rest: RestClient::new(EXCHANGE, POLONIEX_REST_URL, transport),
            key: None,
        }
    }

    /// Credentials from `set_key`. No endpoint wired here is signed.
    pub fn key(&self) -> Option<&ExchangeKey> {
        self.key.as_ref()
    }
}

impl Exchange for PoloniexAdapter {
    fn name(&self) -> &'static str {
        EXCHANGE
    }

    fn to_symbol(&self, pair: &CurrencyPair) -> String {
        pair.to_symbol_reversed("_").to_uppercase()
    }

    fn norm_symbol(&self, symbol: &str) -> CurrencyPair {
        let reversed = CurrencyPair::from_symbol(symbol);
        if reversed.is_unknown() {
            return reversed;
        }
        CurrencyPair::new(reversed.b, reversed.a)
    }

    fn set_key(&mut self, access: &str, secret: &str) {
        debug!(exchange = EXCHANGE, "credentials stored, public endpoints only");
        self.key = Some(ExchangeKey::new(access, secret));
    }

    fn get_balance(&mut self) -> Result<Vec<Balance>> {
        Err(ExchangeError::unsupported(EXCHANGE, "get_balance"))
    }

    fn get_price(&self, pair: &CurrencyPair) -> Result<Price> {
        let symbol = self.to_symbol(pair);
        self.rest
            .get_public("/public", &params([("command", "returnTicker".to_string())]))?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = reject_error_key(js)?;
                js.get(&symbol)
                    .map(|ticker| Price {
                        price: lenient::number(&ticker["last"], "last"),
                    })
                    .ok_or_else(|| ExchangeError::UnexpectedResponse {
                        exchange: EXCHANGE.to_string(),
                        detail: format!("no ticker for {}", symbol),
                    })
            })
            .on_error(resp_err)
            .run()
    }

    fn get_symbols(&self) -> Result<Vec<String>> {
        self.rest
            .get_public("/public", &params([("command", "returnTicker".to_string())]))?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = reject_error_key(js)?;
                Ok(js
                    .as_object()
                    .map(|tickers| {
                        tickers
                            .keys()
                            .map(|key| self.norm_symbol(key).to_symbol("_").to_lowercase())
                            .collect()
                    })
                    .unwrap_or_default())
            })
            .on_error(resp_err)
            .run()
    }

    fn get_depth(&self, pair: &CurrencyPair) -> Result<Depth> {
        let p = params([
            ("command", "returnOrderBook".to_string()),
            ("currencyPair", self.to_symbol(pair)),
        ]);
        self.rest
            .get_public("/public", &p)?
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
    registry.register(EXCHANGE, factory(move || PoloniexAdapter::new(transport.clone())));
}
