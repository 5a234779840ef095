//! Bitstamp Exchange Adapter (public market data only)
//!
//! Balances and orders are not wired for this venue and return
//! [`ExchangeError::Unsupported`].

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::currency::CurrencyPair;
use crate::error::{ExchangeError, Result};
use crate::lenient;
use crate::registry::{factory, Registry};
use crate::rest::{Params, RestClient};
use crate::traits::*;
use crate::transport::Transport;

pub const EXCHANGE: &str = "bitstamp";
pub const BITSTAMP_REST_URL: &str = "https://www.bitstamp.net";

fn resp_err(js: &Value) -> ExchangeError {
    let reason = ["reason", "error"]
        .iter()
        .find_map(|key| js[*key].as_str().filter(|s| !s.is_empty()));
    match reason {
        Some(reason) => ExchangeError::api(EXCHANGE, reason),
        None => ExchangeError::api(EXCHANGE, "unknown"),
    }
}

pub struct BitstampAdapter {
    rest: RestClient,
    key: Option<ExchangeKey>,
}

impl BitstampAdapter {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            rest: RestClient::new(EXCHANGE, BITSTAMP_REST_URL, transport),
            key: None,
        }
    }

    /// Credentials from `set_key`. No endpoint wired here is signed.
    pub fn key(&self) -> Option<&ExchangeKey> {
        self.key.as_ref()
    }
}

impl Exchange for BitstampAdapter {
    fn name(&self) -> &'static str {
        EXCHANGE
    }

    fn to_symbol(&self, pair: &CurrencyPair) -> String {
        pair.to_symbol("").to_lowercase()
    }

    fn norm_symbol(&self, symbol: &str) -> CurrencyPair {
        CurrencyPair::from_compact(symbol)
    }

    fn set_key(&mut self, access: &str, secret: &str) {
        debug!(exchange = EXCHANGE, "credentials stored, public endpoints only");
        self.key = Some(ExchangeKey::new(access, secret));
    }

    fn get_balance(&mut self) -> Result<Vec<Balance>> {
        Err(ExchangeError::unsupported(EXCHANGE, "get_balance"))
    }

    fn get_price(&self, pair: &CurrencyPair) -> Result<Price> {
        let path = format!("/api/v2/ticker/{}", self.to_symbol(pair));
        self.rest
            .get_public(&path, &Params::new())?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                Ok(Price {
                    price: lenient::number(&js["last"], "last"),
                })
            })
            .on_error(resp_err)
            .run()
    }

    fn get_symbols(&self) -> Result<Vec<String>> {
        self.rest
            .get_public("/api/v2/trading-pairs-info/", &Params::new())?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                Ok(lenient::array(&js)
                    .iter()
                    .map(|info| lenient::text(&info["name"]).to_lowercase().replacen('/', "_", 1))
                    .collect())
            })
            .on_error(resp_err)
            .run()
    }

    fn get_depth(&self, pair: &CurrencyPair) -> Result<Depth> {
        let path = format!("/api/v2/order_book/{}", self.to_symbol(pair));
        self.rest
            .get_public(&path, &Params::new())?
            .dispatch(EXCHANGE)
            .on_success(|js| {
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
    registry.register(EXCHANGE, factory(move || BitstampAdapter::new(transport.clone())));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::{btc, usd};
    use crate::transport::HttpTransport;
    use serde_json::json;

    #[test]
    fn test_symbol_mapping() {
        let ex = BitstampAdapter::new(Arc::new(HttpTransport::new()));
        assert_eq!(ex.to_symbol(&CurrencyPair::new(btc(), usd())), "btcusd");
        assert_eq!(ex.norm_symbol("btcusd").to_symbol("_"), "btc_usd");
    }

    #[test]
    fn test_resp_err_reason_then_error() {
        assert_eq!(resp_err(&json!({"reason": "Invalid pair"})).to_string(), "bitstamp: Invalid pair");
        assert_eq!(resp_err(&json!({"error": "Not found"})).to_string(), "bitstamp: Not found");
        assert_eq!(resp_err(&json!({"reason": {"__all__": []}})).to_string(), "bitstamp: unknown");
    }

    #[test]
    fn test_private_ops_unsupported() {
        let mut ex = BitstampAdapter::new(Arc::new(HttpTransport::new()));
        assert!(matches!(
            ex.get_balance(),
            Err(ExchangeError::Unsupported { operation: "get_balance", .. })
        ));
    }
}
