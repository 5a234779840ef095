//! HitBTC Exchange Adapter (public api/2 market data only)

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

pub const EXCHANGE: &str = "hitbtc";
pub const HITBTC_REST_URL: &str = "https://api.hitbtc.com";

fn resp_err(js: &Value) -> ExchangeError {
    message_at(EXCHANGE, js, "/error/message")
}

/// `base_quote` in lower case. Older listings omit the currency fields, so
/// the id is split after its first three characters.
fn symbol_name(info: &Value) -> String {
    let base = lenient::text(&info["baseCurrency"]);
    let quote = lenient::text(&info["quoteCurrency"]);
    if !base.is_empty() && !quote.is_empty() {
        return format!("{}_{}", base, quote).to_lowercase();
    }
    let id = lenient::text(&info["id"]).to_lowercase();
    match (id.get(..3), id.get(3..)) {
        (Some(base), Some(quote)) if !quote.is_empty() => format!("{}_{}", base, quote),
        _ => id,
    }
}

pub struct HitBtcAdapter {
    rest: RestClient,
    key: Option<ExchangeKey>,
}

impl HitBtcAdapter {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            rest: RestClient::new(EXCHANGE, HITBTC_REST_URL, transport),
            key: None,
        }
    }

    /// Credentials from `set_key`. No endpoint wired here is signed.
    pub fn key(&self) -> Option<&ExchangeKey> {
        self.key.as_ref()
    }
}

impl Exchange for HitBtcAdapter {
    fn name(&self) -> &'static str {
        EXCHANGE
    }

    fn to_symbol(&self, pair: &CurrencyPair) -> String {
        pair.to_symbol("").to_uppercase()
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
        let path = format!("/api/2/public/ticker/{}", self.to_symbol(pair));
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
            .get_public("/api/2/public/symbol", &Params::new())?
            .dispatch(EXCHANGE)
            .on_success(|js| Ok(lenient::array(&js).iter().map(symbol_name).collect()))
            .on_error(resp_err)
            .run()
    }

    fn get_depth(&self, pair: &CurrencyPair) -> Result<Depth> {
        let path = format!("/api/2/public/orderbook/{}", self.to_symbol(pair));
        self.rest
            .get_public(&path, &Params::new())?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                Ok(Depth::from_levels(
                    lenient::units(&js["ask"], "price", "size"),
                    lenient::units(&js["bid"], "price", "size"),
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
    registry.register(EXCHANGE, factory(move || HitBtcAdapter::new(transport.clone())));
}
