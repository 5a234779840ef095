//! Binance Spot Market Adapter
//!
//! # API Documentation
//!
//! - Binance API: <https://github.com/binance-exchange/binance-official-api-docs/blob/master/rest-api.md>

use std::sync::Arc;

use serde_json::Value;

use crate::binance::account::{converters, BinanceAuth, BINANCE_REST_URL, BINANCE_ZERO_BALANCE};
use crate::currency::CurrencyPair;
use crate::error::{ExchangeError, Result};
use crate::lenient;
use crate::normalize::non_zero_balances;
use crate::response::{message_at, Response};
use crate::rest::{credentials, params, Params, RestClient};
use crate::traits::*;
use crate::transport::{Method, Transport};

pub const EXCHANGE: &str = "binance";

fn resp_err(js: &Value) -> ExchangeError {
    message_at(EXCHANGE, js, "/msg")
}

/// Binance Spot adapter
pub struct BinanceSpotAdapter {
    rest: RestClient,
    auth: Option<BinanceAuth>,
}

impl BinanceSpotAdapter {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            rest: RestClient::new(EXCHANGE, BINANCE_REST_URL, transport),
            auth: None,
        }
    }

    fn send_private(&self, method: Method, path: &str, params: Params) -> Result<Response> {
        let auth = credentials(&self.auth, EXCHANGE)?;
        let request = auth.sign_request(self.rest.request(method, path), params);
        self.rest.execute(request, true)
    }

    fn order_params(&self, order: &Order) -> Params {
        params([
            ("symbol", self.to_symbol(&order.pair)),
            ("orderId", order.id.clone()),
        ])
    }
}

impl Exchange for BinanceSpotAdapter {
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
        self.auth = Some(BinanceAuth::new(access.to_string(), secret.to_string()));
    }

    fn get_balance(&mut self) -> Result<Vec<Balance>> {
        self.send_private(Method::Get, "/api/v3/account", Params::new())?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let all = lenient::array(&js["balances"])
                    .iter()
                    .map(|b| Balance::new(lenient::text(&b["asset"]), lenient::text(&b["free"])));
                Ok(non_zero_balances(all, BINANCE_ZERO_BALANCE))
            })
            .on_error(resp_err)
            .run()
    }

    fn get_price(&self, pair: &CurrencyPair) -> Result<Price> {
        self.rest
            .get_public("/api/v3/ticker/price", &params([("symbol", self.to_symbol(pair))]))?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                Ok(Price {
                    price: lenient::number(&js["price"], "price"),
                })
            })
            .on_error(resp_err)
            .run()
    }

    fn get_symbols(&self) -> Result<Vec<String>> {
        self.rest
            .get_public("/api/v1/exchangeInfo", &Params::new())?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                Ok(lenient::array(&js["symbols"])
                    .iter()
                    .map(|s| {
                        format!(
                            "{}_{}",
                            lenient::text(&s["baseAsset"]).to_lowercase(),
                            lenient::text(&s["quoteAsset"]).to_lowercase()
                        )
                    })
                    .collect())
            })
            .on_error(resp_err)
            .run()
    }

    fn get_depth(&self, pair: &CurrencyPair) -> Result<Depth> {
        self.rest
            .get_public("/api/v1/depth", &params([("symbol", self.to_symbol(pair))]))?
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
        let p = params([
            ("symbol", self.to_symbol(&order.pair)),
            ("side", converters::to_binance_side(order.side).to_string()),
            ("type", "LIMIT".to_string()),
            ("timeInForce", "GTC".to_string()),
            ("quantity", lenient::format_decimal(order.amount)),
            ("price", lenient::format_decimal(order.price)),
        ]);
        self.send_private(Method::Post, "/api/v3/order", p)?
            .dispatch(EXCHANGE)
            .on_success(|js| Ok(lenient::text(&js["orderId"])))
            .on_error(resp_err)
            .run()
    }

    fn cancel_order(&self, order: &Order) -> Result<()> {
        self.send_private(Method::Delete, "/api/v3/order", self.order_params(order))?
            .dispatch(EXCHANGE)
            .on_success(|_| Ok(()))
            .on_error(resp_err)
            .run()
    }

    fn query_order(&self, order: &Order) -> Result<Order> {
        self.send_private(Method::Get, "/api/v3/order", self.order_params(order))?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let mut snapshot = Order {
                    id: lenient::text(&js["orderId"]),
                    pair: self.norm_symbol(&lenient::text(&js["symbol"])),
                    side: self.order_side(&lenient::text(&js["side"])),
                    price: lenient::number(&js["price"], "price"),
                    amount: lenient::number(&js["origQty"], "origQty"),
                    executed: lenient::number(&js["executedQty"], "executedQty"),
                    remain: 0.0,
                    state: self.order_state(&js["status"]),
                };
                snapshot.recompute_remain();
                Ok(snapshot)
            })
            .on_error(resp_err)
            .run()
    }

    fn order_state(&self, value: &Value) -> OrderState {
        converters::from_binance_order_status(&lenient::text(value))
    }

    fn order_side(&self, value: &str) -> Side {
        converters::from_binance_side(value)
    }
}
