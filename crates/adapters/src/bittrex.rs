//! Bittrex Exchange Adapter (public v1.1 market data only)
//!
//! Markets are spelled quote first (`BTC-LTC` trades LTC against BTC).
//! Every reply is wrapped in `{success, message, result}`; a 200 with
//! `success: false` is still an API error.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::currency::{Currency, CurrencyPair};
use crate::error::{ExchangeError, Result};
use crate::lenient;
use crate::registry::{factory, Registry};
use crate::response::message_at;
use crate::rest::{params, Params, RestClient};
use crate::traits::*;
use crate::transport::Transport;

pub const EXCHANGE: &str = "bittrex";
pub const BITTREX_REST_URL: &str = "https://bittrex.com";

fn resp_err(js: &Value) -> ExchangeError {
    message_at(EXCHANGE, js, "/message")
}

fn success(js: Value) -> Result<Value> {
    if js["success"].as_bool() == Some(true) {
        Ok(js)
    } else {
        Err(resp_err(&js))
    }
}

pub struct BittrexAdapter {
    rest: RestClient,
    key: Option<ExchangeKey>,
}

impl BittrexAdapter {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            rest: RestClient::new(EXCHANGE, BITTREX_REST_URL, transport),
            key: None,
        }
    }

    /// Credentials from `set_key`. No endpoint wired here is signed.
    pub fn key(&self) -> Option<&ExchangeKey> {
        self.key.as_ref()
    }
}

impl Exchange for BittrexAdapter {
    fn name(&self) -> &'static str {
        EXCHANGE
    }

    fn to_symbol(&self, pair: &CurrencyPair) -> String {
        pair.to_symbol_reversed("-").to_uppercase()
    }

    fn norm_symbol(&self, symbol: &str) -> CurrencyPair {
        match symbol.split_once('-') {
            Some((quote, base)) if !quote.is_empty() && !base.is_empty() && !base.contains('-') => {
                CurrencyPair::new(Currency::new(base, ""), Currency::new(quote, ""))
            }
            _ => CurrencyPair::unknown(),
        }
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
            .get_public("/api/v1.1/public/getticker", &params([("market", self.to_symbol(pair))]))?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = success(js)?;
                Ok(Price {
                    price: lenient::number(&js["result"]["Last"], "Last"),
                })
            })
            .on_error(resp_err)
            .run()
    }

    fn get_symbols(&self) -> Result<Vec<String>> {
        self.rest
            .get_public("/api/v1.1/public/getmarkets", &Params::new())?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = success(js)?;
                Ok(lenient::array(&js["result"])
                    .iter()
                    .map(|m| {
                        format!(
                            "{}_{}",
                            lenient::text(&m["MarketCurrency"]).to_lowercase(),
                            lenient::text(&m["BaseCurrency"]).to_lowercase()
                        )
                    })
                    .collect())
            })
            .on_error(resp_err)
            .run()
    }

    fn get_depth(&self, pair: &CurrencyPair) -> Result<Depth> {
        let p = params([
            ("market", self.to_symbol(pair)),
            ("type", "both".to_string()),
        ]);
        self.rest
            .get_public("/api/v1.1/public/getorderbook", &p)?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = success(js)?;
                Ok(Depth::from_levels(
                    lenient::units(&js["result"]["sell"], "Rate", "Quantity"),
                    lenient::units(&js["result"]["buy"], "Rate", "Quantity"),
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
    registry.register(EXCHANGE, factory(move || BittrexAdapter::new(transport.clone())));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::{btc, ltc};
    use crate::transport::HttpTransport;
    use serde_json::json;

    #[test]
    fn test_symbol_is_quote_first() {
        let ex = BittrexAdapter::new(Arc::new(HttpTransport::new()));
        let pair = CurrencyPair::new(ltc(), btc());
        assert_eq!(ex.to_symbol(&pair), "BTC-LTC");
        assert_eq!(ex.norm_symbol("BTC-LTC"), pair);
        assert!(ex.norm_symbol("BTCLTC").is_unknown());
    }

    #[test]
    fn test_success_false_is_api_error() {
        let err = success(json!({"success": false, "message": "INVALID_MARKET", "result": null}))
            .unwrap_err();
        assert_eq!(err.to_string(), "bittrex: INVALID_MARKET");
        assert!(success(json!({"success": true, "result": []})).is_ok());
    }
}
