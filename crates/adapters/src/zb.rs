//! ZB Exchange Adapter (public market data only)

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::currency::CurrencyPair;
use crate::error::{ExchangeError, Result};
use crate::lenient;
use crate::registry::{factory, Registry};
use crate::rest::{params, Params, RestClient};
use crate::traits::*;
use crate::transport::Transport;

pub const EXCHANGE: &str = "zb";
pub const ZB_REST_URL: &str = "http://api.zb.com";

/// Depth levels requested per side.
const ZB_DEPTH_SIZE: &str = "10";

// `{"error": "..."}` on the data API, `{"code": N, "message": "..."}` elsewhere.
fn resp_err(js: &Value) -> ExchangeError {
    let reason = [&js["error"], &js["message"]]
        .into_iter()
        .map(lenient::text)
        .find(|s| !s.is_empty());
    match reason {
        Some(reason) => ExchangeError::api(EXCHANGE, reason),
        None => ExchangeError::api(EXCHANGE, "unknown"),
    }
}

fn check(js: Value) -> Result<Value> {
    let failed_code = js["code"].as_i64().map_or(false, |code| code != 1000);
    if js.get("error").is_some() || failed_code {
        Err(resp_err(&js))
    } else {
        Ok(js)
    }
}

pub struct ZbAdapter {
    rest: RestClient,
    key: Option<ExchangeKey>,
}

impl ZbAdapter {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            rest: RestClient::new(EXCHANGE, ZB_REST_URL, transport),
            key: None,
        }
    }

    /// Credentials from `set_key`. No endpoint wired here is signed.
    pub fn key(&self) -> Option<&ExchangeKey> {
        self.key.as_ref()
    }
}

impl Exchange for ZbAdapter {
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
            .get_public("/data/v1/ticker", &params([("market", self.to_symbol(pair))]))?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = check(js)?;
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
                let js = check(js)?;
                Ok(js
                    .as_object()
                    .map(|markets| markets.keys().cloned().collect())
                    .unwrap_or_default())
            })
            .on_error(resp_err)
            .run()
    }

    fn get_depth(&self, pair: &CurrencyPair) -> Result<Depth> {
        let p = params([
            ("market", self.to_symbol(pair)),
            ("size", ZB_DEPTH_SIZE.to_string()),
        ]);
        self.rest
            .get_public("/data/v1/depth", &p)?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = check(js)?;
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
    registry.register(EXCHANGE, factory(move || ZbAdapter::new(transport.clone())));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_both_error_shapes() {
        let err = check(json!({"error": "market not exist"})).unwrap_err();
        assert_eq!(err.to_string(), "zb: market not exist");
        let err = check(json!({"code": 3001, "message": "order not found"})).unwrap_err();
        assert_eq!(err.to_string(), "zb: order not found");
        assert!(check(json!({"code": 1000, "ticker": {"last": "1"}})).is_ok());
        assert!(check(json!({"ticker": {"last": "1"}})).is_ok());
    }
}
