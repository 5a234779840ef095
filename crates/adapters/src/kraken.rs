//! Kraken Exchange Adapter (public market data only)
//!
//! Kraken names bitcoin `XBT` and prefixes legacy asset codes with `X`
//! (crypto) or `Z` (fiat), so `XXBTZUSD` is BTC/USD. Replies are wrapped
//! in `{error: [...], result: {...}}` and the result is keyed by the
//! venue's own pair name, which may differ from the one requested.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::currency::{Currency, CurrencyPair};
use crate::error::{ExchangeError, Result};
use crate::lenient;
use crate::registry::{factory, Registry};
use crate::rest::{params, Params, RestClient};
use crate::traits::*;
use crate::transport::Transport;

pub const EXCHANGE: &str = "kraken";
pub const KRAKEN_REST_URL: &str = "https://api.kraken.com";

fn resp_err(js: &Value) -> ExchangeError {
    let messages: Vec<String> = lenient::array(&js["error"]).iter().map(lenient::text).collect();
    if messages.is_empty() {
        ExchangeError::api(EXCHANGE, "unknown")
    } else {
        ExchangeError::api(EXCHANGE, messages.join(", "))
    }
}

fn result(js: Value) -> Result<Value> {
    if lenient::array(&js["error"]).is_empty() {
        Ok(js)
    } else {
        Err(resp_err(&js))
    }
}

/// First entry of `result`, whatever the venue keyed it under.
fn first_result(js: &Value) -> Result<&Value> {
    js["result"]
        .as_object()
        .and_then(|entries| entries.values().next())
        .ok_or_else(|| ExchangeError::unknown(EXCHANGE))
}

/// `XXBT` -> `BTC`, `ZUSD` -> `USD`, `ETH` -> `ETH`.
fn asset(code: &str) -> String {
    let upper = code.to_ascii_uppercase();
    let stripped = if upper.len() == 4 && (upper.starts_with('X') || upper.starts_with('Z')) {
        upper[1..].to_string()
    } else {
        upper
    };
    if stripped == "XBT" {
        "BTC".to_string()
    } else {
        stripped
    }
}

pub struct KrakenAdapter {
    rest: RestClient,
    key: Option<ExchangeKey>,
}

impl KrakenAdapter {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            rest: RestClient::new(EXCHANGE, KRAKEN_REST_URL, transport),
            key: None,
        }
    }

    /// Credentials from `set_key`. No endpoint wired here is signed.
    pub fn key(&self) -> Option<&ExchangeKey> {
        self.key.as_ref()
    }
}

impl Exchange for KrakenAdapter {
    fn name(&self) -> &'static str {
        EXCHANGE
    }

    fn to_symbol(&self, pair: &CurrencyPair) -> String {
        let render = |c: &Currency| match c.symbol.to_ascii_uppercase().as_str() {
            "BTC" => "XBT".to_string(),
            other => other.to_string(),
        };
        format!("{}{}", render(&pair.a), render(&pair.b))
    }

    fn norm_symbol(&self, symbol: &str) -> CurrencyPair {
        let upper = symbol.to_ascii_uppercase();
        let prefixed = |i: usize| matches!(upper.as_bytes().get(i), Some(b'X') | Some(b'Z'));
        if upper.len() == 8 && prefixed(0) && prefixed(4) {
            return CurrencyPair::new(
                Currency::new(asset(&upper[..4]), ""),
                Currency::new(asset(&upper[4..]), ""),
            );
        }
        let pair = CurrencyPair::from_compact(&upper);
        if pair.is_unknown() {
            return pair;
        }
        CurrencyPair::new(
            Currency::new(asset(&pair.a.symbol), ""),
            Currency::new(asset(&pair.b.symbol), ""),
        )
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
            .get_public("/0/public/Ticker", &params([("pair", self.to_symbol(pair))]))?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = result(js)?;
                let ticker = first_result(&js)?;
                Ok(Price {
                    price: lenient::number(&ticker["c"][0], "c"),
                })
            })
            .on_error(resp_err)
            .run()
    }

    fn get_symbols(&self) -> Result<Vec<String>> {
        self.rest
            .get_public("/0/public/AssetPairs", &Params::new())?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = result(js)?;
                Ok(js["result"]
                    .as_object()
                    .map(|pairs| {
                        pairs
                            .values()
                            .map(|p| {
                                format!(
                                    "{}_{}",
                                    asset(&lenient::text(&p["base"])),
                                    asset(&lenient::text(&p["quote"]))
                                )
                                .to_lowercase()
                            })
                            .collect()
                    })
                    .unwrap_or_default())
            })
            .on_error(resp_err)
            .run()
    }

    fn get_depth(&self, pair: &CurrencyPair) -> Result<Depth> {
        self.rest
            .get_public("/0/public/Depth", &params([("pair", self.to_symbol(pair))]))?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = result(js)?;
                let book = first_result(&js)?;
                Ok(Depth::from_levels(
                    lenient::units(&book["asks"], "price", "volume"),
                    lenient::units(&book["bids"], "price", "volume"),
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
    registry.register(EXCHANGE, factory(move || KrakenAdapter::new(transport.clone())));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::{btc, eth, usd};
    use crate::transport::HttpTransport;
    use serde_json::json;

    fn adapter() -> KrakenAdapter {
        KrakenAdapter::new(Arc::new(HttpTransport::new()))
    }

    #[test]
    fn test_btc_renders_as_xbt() {
        assert_eq!(adapter().to_symbol(&CurrencyPair::new(btc(), usd())), "XBTUSD");
        assert_eq!(adapter().to_symbol(&CurrencyPair::new(eth(), btc())), "ETHXBT");
    }

    #[test]
    fn test_norm_symbol_strips_prefixes() {
        let ex = adapter();
        assert_eq!(ex.norm_symbol("XXBTZUSD"), CurrencyPair::new(btc(), usd()));
        assert_eq!(ex.norm_symbol("XBTUSD"), CurrencyPair::new(btc(), usd()));
        assert_eq!(ex.norm_symbol("XETHZUSD"), CurrencyPair::new(eth(), usd()));
    }

    #[test]
    fn test_asset_codes() {
        assert_eq!(asset("XXBT"), "BTC");
        assert_eq!(asset("ZEUR"), "EUR");
        assert_eq!(asset("DASH"), "DASH");
        assert_eq!(asset("eth"), "ETH");
    }

    #[test]
    fn test_error_array() {
        let err = result(json!({"error": ["EQuery:Unknown asset pair"], "result": {}})).unwrap_err();
        assert_eq!(err.to_string(), "kraken: EQuery:Unknown asset pair");
        assert!(result(json!({"error": [], "result": {}})).is_ok());
    }
}
