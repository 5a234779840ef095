//! Gate.io Exchange Adapter (public api2 market data only)

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::currency::CurrencyPair;
use crate::error::{ExchangeError, Result};
use crate::lenient;
use crate::registry::{factory, Registry};
use crate::response::message_at;
use crate::rest::{Params, RestClient};
use crate::traits::*;
use crate::transport::Transport;

pub const EXCHANGE: &str = "gate";
pub const GATE_REST_URL: &str = "http://data.gate.io";

fn resp_err(js: &Value) -> ExchangeError {
    message_at(EXCHANGE, js, "/message")
}

/// Gate answers `{"result": "false", "message": ...}` with status 200.
fn check_result(js: Value) -> Result<Value> {
    if lenient::text(&js["result"]) == "false" {
        Err(resp_err(&js))
    } else {
        Ok(js)
    }
}

pub struct GateAdapter {
    rest: RestClient,
    key: Option<ExchangeKey>,
}

impl GateAdapter {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            rest: RestClient::new(EXCHANGE, GATE_REST_URL, transport),
            key: None,
        }
    }

    /// Credentials from `set_key`. No endpoint wired here is signed.
    pub fn key(&self) -> Option<&ExchangeKey> {
        self.key.as_ref()
    }
}

impl Exchange for GateAdapter {
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
        let path = format!("/api2/1/ticker/{}", self.to_symbol(pair));
        self.rest
            .get_public(&path, &Params::new())?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = check_result(js)?;
                Ok(Price {
                    price: lenient::number(&js["last"], "last"),
                })
            })
            .on_error(resp_err)
            .run()
    }

    fn get_symbols(&self) -> Result<Vec<String>> {
        self.rest
            .get_public("/api2/1/pairs", &Params::new())?
            .dispatch(EXCHANGE)
            .on_success(|js| Ok(lenient::array(&js).iter().map(lenient::text).collect()))
            .on_error(resp_err)
            .run()
    }

    fn get_depth(&self, pair: &CurrencyPair) -> Result<Depth> {
        let path = format!("/api2/1/orderBook/{}", self.to_symbol(pair));
        self.rest
            .get_public(&path, &Params::new())?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = check_result(js)?;
                // levels mix strings and numbers
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
    registry.register(EXCHANGE, factory(move || GateAdapter::new(transport.clone())));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_false_string() {
        let err = check_result(json!({"result": "false", "message": "Error: invalid pair"})).unwrap_err();
        assert_eq!(err.to_string(), "gate: Error: invalid pair");
        assert!(check_result(json!({"result": "true", "last": "1.5"})).is_ok());
    }
}
