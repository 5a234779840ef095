//! Bitfinex v1 Spot Adapter
//!
//! Public market data via GET; wallet and order calls via signed POST.
//! Errors carry a top-level `message`.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::bitfinex::account::{converters, BitfinexAuth, BITFINEX_REST_URL, BITFINEX_ZERO_BALANCE};
use crate::currency::CurrencyPair;
use crate::error::{ExchangeError, Result};
use crate::lenient;
use crate::normalize::non_zero_balances;
use crate::response::{message_at, Response};
use crate::rest::{credentials, Params, RestClient};
use crate::traits::*;
use crate::transport::{Method, Transport};

pub const EXCHANGE: &str = "bitfinex";

fn resp_err(js: &Value) -> ExchangeError {
    message_at(EXCHANGE, js, "/message")
}

pub struct BitfinexSpotAdapter {
    rest: RestClient,
    auth: Option<BitfinexAuth>,
}

impl BitfinexSpotAdapter {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            rest: RestClient::new(EXCHANGE, BITFINEX_REST_URL, transport),
            auth: None,
        }
    }

    fn post_private(&self, path: &str, fields: Map<String, Value>) -> Result<Response> {
        let auth = credentials(&self.auth, EXCHANGE)?;
        let request = auth.sign_request(self.rest.request(Method::Post, path), fields);
        self.rest.execute(request, true)
    }

    /// v1 order calls take the numeric id.
    fn order_id_fields(order: &Order) -> Result<Map<String, Value>> {
        let id: u64 = order.id.parse().map_err(|_| {
            ExchangeError::Validation(format!("bitfinex order id must be numeric: {}", order.id))
        })?;
        let mut fields = Map::new();
        fields.insert("order_id".to_string(), json!(id));
        Ok(fields)
    }
}

impl Exchange for BitfinexSpotAdapter {
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
        self.auth = Some(BitfinexAuth::new(access.to_string(), secret.to_string()));
    }

    fn get_balance(&mut self) -> Result<Vec<Balance>> {
        self.post_private("/v1/balances", Map::new())?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let all = lenient::array(&js)
                    .iter()
                    .map(|b| Balance::new(lenient::text(&b["currency"]), lenient::text(&b["amount"])));
                Ok(non_zero_balances(all, BITFINEX_ZERO_BALANCE))
            })
            .on_error(resp_err)
            .run()
    }

    fn get_price(&self, pair: &CurrencyPair) -> Result<Price> {
        let path = format!("/v1/pubticker/{}", self.to_symbol(pair));
        self.rest
            .get_public(&path, &Params::new())?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                Ok(Price {
                    price: lenient::number(&js["last_price"], "last_price"),
                })
            })
            .on_error(resp_err)
            .run()
    }

    fn get_symbols(&self) -> Result<Vec<String>> {
        self.rest
            .get_public("/v1/symbols", &Params::new())?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                Ok(lenient::array(&js)
                    .iter()
                    .map(|s| self.norm_symbol(&lenient::text(s)).to_symbol("_"))
                    .collect())
            })
            .on_error(resp_err)
            .run()
    }

    fn get_depth(&self, pair: &CurrencyPair) -> Result<Depth> {
        let path = format!("/v1/book/{}", self.to_symbol(pair));
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

    fn new_order(&mut self, order: &Order) -> Result<String> {
        let mut fields = Map::new();
        fields.insert("symbol".into(), json!(self.to_symbol(&order.pair)));
        fields.insert("amount".into(), json!(lenient::format_decimal(order.amount)));
        fields.insert("price".into(), json!(lenient::format_decimal(order.price)));
        fields.insert("side".into(), json!(converters::to_bitfinex_side(order.side)));
        fields.insert("type".into(), json!("exchange limit"));
        fields.insert("exchange".into(), json!("bitfinex"));

        self.post_private("/v1/order/new", fields)?
            .dispatch(EXCHANGE)
            .on_success(|js| Ok(lenient::text(&js["order_id"])))
            .on_error(resp_err)
            .run()
    }

    fn cancel_order(&self, order: &Order) -> Result<()> {
        self.post_private("/v1/order/cancel", Self::order_id_fields(order)?)?
            .dispatch(EXCHANGE)
            .on_success(|_| Ok(()))
            .on_error(resp_err)
            .run()
    }

    fn query_order(&self, order: &Order) -> Result<Order> {
        self.post_private("/v1/order/status", Self::order_id_fields(order)?)?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let state = if js["is_cancelled"].as_bool() == Some(true) {
                    OrderState::Cancelled
                } else {
                    self.order_state(&js["is_live"])
                };
                let mut snapshot = Order {
                    id: lenient::text(&js["id"]),
                    pair: self.norm_symbol(&lenient::text(&js["symbol"])),
                    side: self.order_side(&lenient::text(&js["side"])),
                    price: lenient::number(&js["price"], "price"),
                    amount: lenient::number(&js["original_amount"], "original_amount"),
                    executed: lenient::number(&js["executed_amount"], "executed_amount"),
                    remain: 0.0,
                    state,
                };
                snapshot.recompute_remain();
                Ok(snapshot)
            })
            .on_error(resp_err)
            .run()
    }

    fn order_state(&self, value: &Value) -> OrderState {
        converters::from_bitfinex_live(value)
    }

    fn order_side(&self, value: &str) -> Side {
        converters::from_bitfinex_side(value)
    }
}
