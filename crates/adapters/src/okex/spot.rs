//! OKEx v1 Spot Adapter
//!
//! Public endpoints are plain GETs. Private endpoints are POSTs with the
//! signed form as body. Envelopes report `{"result": false, "error_code": N}`
//! on failure, and the code is rendered through [`error_message`].

use std::sync::Arc;

use serde_json::Value;

use crate::currency::CurrencyPair;
use crate::error::{ExchangeError, Result};
use crate::lenient;
use crate::normalize::non_zero_balances;
use crate::okex::account::{converters, error_message, OkexAuth, OKEX_REST_URL, OKEX_ZERO_BALANCE};
use crate::response::Response;
use crate::rest::{credentials, params, Params, RestClient};
use crate::traits::*;
use crate::transport::{Method, Transport};

pub const EXCHANGE: &str = "okex";

fn resp_err(js: &Value) -> ExchangeError {
    match js["error_code"].as_i64() {
        Some(code) => ExchangeError::api(EXCHANGE, error_message(code)),
        None => ExchangeError::api(EXCHANGE, "unknown"),
    }
}

/// Rejects `{"result": false}` envelopes.
fn check_result(js: Value) -> Result<Value> {
    match js["result"].as_bool() {
        Some(false) => Err(resp_err(&js)),
        _ => Ok(js),
    }
}

pub struct OkexSpotAdapter {
    rest: RestClient,
    auth: Option<OkexAuth>,
}

impl OkexSpotAdapter {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            rest: RestClient::new(EXCHANGE, OKEX_REST_URL, transport),
            auth: None,
        }
    }

    fn post_private(&self, path: &str, fields: Params) -> Result<Response> {
        let auth = credentials(&self.auth, EXCHANGE)?;
        let request = self
            .rest
            .request(Method::Post, path)
            .with_header("Content-Type", "application/x-www-form-urlencoded")
            .with_body(auth.signed_form(fields));
        self.rest.execute(request, true)
    }

    fn order_fields(&self, order: &Order) -> Params {
        params([
            ("symbol", self.to_symbol(&order.pair)),
            ("order_id", order.id.clone()),
        ])
    }
}

impl Exchange for OkexSpotAdapter {
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
        self.auth = Some(OkexAuth::new(access.to_string(), secret.to_string()));
    }

    fn get_balance(&mut self) -> Result<Vec<Balance>> {
        self.post_private("/api/v1/userinfo.do", Params::new())?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = check_result(js)?;
                let free = js["info"]["funds"]["free"]
                    .as_object()
                    .map(|free| {
                        free.iter()
                            .map(|(currency, amount)| Balance::new(currency.clone(), lenient::text(amount)))
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default();
                Ok(non_zero_balances(free, OKEX_ZERO_BALANCE))
            })
            .on_error(resp_err)
            .run()
    }

    fn get_price(&self, pair: &CurrencyPair) -> Result<Price> {
        self.rest
            .get_public("/api/v1/ticker.do", &params([("symbol", self.to_symbol(pair))]))?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = check_result(js)?;
                Ok(Price {
                    price: lenient::number(&js["ticker"]["last"], "last"),
                })
            })
            .on_error(resp_err)
            .run()
    }

    fn get_symbols(&self) -> Result<Vec<String>> {
        self.rest
            .get_public("/v2/spot/markets/products", &Params::new())?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                Ok(lenient::array(&js["data"])
                    .iter()
                    .map(|p| lenient::text(&p["symbol"]))
                    .collect())
            })
            .on_error(resp_err)
            .run()
    }

    fn get_depth(&self, pair: &CurrencyPair) -> Result<Depth> {
        self.rest
            .get_public("/api/v1/depth.do", &params([("symbol", self.to_symbol(pair))]))?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = check_result(js)?;
                Ok(Depth::from_levels(
                    lenient::units(&js["asks"], "price", "amount"),
                    lenient::units(&js["bids"], "price", "amount"),
                ))
            })
            .on_error(resp_err)
            .run()
    }

    fn new_order(&mut self, order: &Order) -> Result<String> {
        let fields = params([
            ("symbol", self.to_symbol(&order.pair)),
            ("type", converters::to_okex_side(order.side).to_string()),
            ("price", lenient::format_decimal(order.price)),
            ("amount", lenient::format_decimal(order.amount)),
        ]);
        self.post_private("/api/v1/trade.do", fields)?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = check_result(js)?;
                Ok(lenient::text(&js["order_id"]))
            })
            .on_error(resp_err)
            .run()
    }

    fn cancel_order(&self, order: &Order) -> Result<()> {
        self.post_private("/api/v1/cancel_order.do", self.order_fields(order))?
            .dispatch(EXCHANGE)
            .on_success(|js| check_result(js).map(|_| ()))
            .on_error(resp_err)
            .run()
    }

    fn query_order(&self, order: &Order) -> Result<Order> {
        self.post_private("/api/v1/order_info.do", self.order_fields(order))?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = check_result(js)?;
                let info = lenient::array(&js["orders"])
                    .first()
                    .ok_or_else(|| ExchangeError::unknown(EXCHANGE))?;
                let mut snapshot = Order {
                    id: lenient::text(&info["order_id"]),
                    pair: self.norm_symbol(&lenient::text(&info["symbol"])),
                    side: self.order_side(&lenient::text(&info["type"])),
                    price: lenient::number(&info["price"], "price"),
                    amount: lenient::number(&info["amount"], "amount"),
                    executed: lenient::number(&info["deal_amount"], "deal_amount"),
                    remain: 0.0,
                    state: self.order_state(&info["status"]),
                };
                snapshot.recompute_remain();
                Ok(snapshot)
            })
            .on_error(resp_err)
            .run()
    }

    fn order_state(&self, value: &Value) -> OrderState {
        converters::from_okex_status(value)
    }

    fn order_side(&self, value: &str) -> Side {
        converters::from_okex_side(value)
    }
}
