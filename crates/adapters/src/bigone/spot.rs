//! BigOne Spot Adapter
//!
//! Balances, market data and limit orders over the BigOne REST API.
//! Every envelope wraps its payload in `data`. Failures carry
//! `error.description`.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::bigone::account::{converters, BigOneAuth, BIGONE_REST_URL, BIGONE_ZERO_BALANCE};
use crate::currency::CurrencyPair;
use crate::error::{ExchangeError, Result};
use crate::lenient;
use crate::normalize::non_zero_balances;
use crate::response::{message_at, Response};
use crate::rest::{credentials, Params, RestClient};
use crate::traits::*;
use crate::transport::{Method, Transport};

pub const EXCHANGE: &str = "bigone";

fn resp_err(js: &Value) -> ExchangeError {
    message_at(EXCHANGE, js, "/error/description")
}

pub struct BigOneSpotAdapter {
    rest: RestClient,
    auth: Option<BigOneAuth>,
    device_id: String,
}

impl BigOneSpotAdapter {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            rest: RestClient::new(EXCHANGE, BIGONE_REST_URL, transport),
            auth: None,
            device_id: crate::sign::device_id(),
        }
    }

    fn send_private(&self, method: Method, path: &str, body: Option<Value>) -> Result<Response> {
        let auth = credentials(&self.auth, EXCHANGE)?;
        let mut request = auth.sign(self.rest.request(method, path));
        if let Some(body) = body {
            request = request
                .with_header("Content-Type", "application/json")
                .with_body(body.to_string());
        }
        self.rest.execute(request, true)
    }

    fn market(&self, pair: &CurrencyPair) -> Result<Response> {
        let path = format!("/markets/{}", self.to_symbol(pair));
        self.rest.get_public(&path, &Params::new())
    }
}

impl Exchange for BigOneSpotAdapter {
    fn name(&self) -> &'static str {
        EXCHANGE
    }

    fn to_symbol(&self, pair: &CurrencyPair) -> String {
        pair.to_symbol("-").to_uppercase()
    }

    fn norm_symbol(&self, symbol: &str) -> CurrencyPair {
        CurrencyPair::from_symbol(&symbol.to_lowercase().replacen('-', "_", 1))
    }

    fn set_key(&mut self, access: &str, _secret: &str) {
        self.auth = Some(BigOneAuth::new(access.to_string(), self.device_id.clone()));
    }

    fn get_balance(&mut self) -> Result<Vec<Balance>> {
        self.send_private(Method::Get, "/accounts", None)?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let all = lenient::array(&js["data"]).iter().map(|b| {
                    Balance::new(
                        lenient::text(&b["account_type"]),
                        lenient::text(&b["active_balance"]),
                    )
                });
                Ok(non_zero_balances(all, BIGONE_ZERO_BALANCE))
            })
            .on_error(resp_err)
            .run()
    }

    fn get_price(&self, pair: &CurrencyPair) -> Result<Price> {
        self.market(pair)?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                Ok(Price {
                    price: lenient::number(&js["data"]["ticker"]["price"], "price"),
                })
            })
            .on_error(resp_err)
            .run()
    }

    fn get_symbols(&self) -> Result<Vec<String>> {
        self.rest
            .get_public("/markets", &Params::new())?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                // quote_base
                Ok(lenient::array(&js["data"])
                    .iter()
                    .map(|m| {
                        format!(
                            "{}_{}",
                            lenient::text(&m["quote"]).to_lowercase(),
                            lenient::text(&m["base"]).to_lowercase()
                        )
                    })
                    .collect())
            })
            .on_error(resp_err)
            .run()
    }

    fn get_depth(&self, pair: &CurrencyPair) -> Result<Depth> {
        self.market(pair)?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let book = &js["data"]["depth"];
                Ok(Depth::from_levels(
                    lenient::units(&book["asks"], "price", "amount"),
                    lenient::units(&book["bids"], "price", "amount"),
                ))
            })
            .on_error(resp_err)
            .run()
    }

    fn new_order(&mut self, order: &Order) -> Result<String> {
        let body = json!({
            "order_market": self.to_symbol(&order.pair),
            "order_side": converters::to_bigone_side(order.side),
            "amount": lenient::format_decimal(order.amount),
            "price": lenient::format_decimal(order.price),
        });
        self.send_private(Method::Post, "/orders", Some(body))?
            .dispatch(EXCHANGE)
            .on_success(|js| Ok(lenient::text(&js["data"]["order_id"])))
            .on_error(resp_err)
            .run()
    }

    fn cancel_order(&self, order: &Order) -> Result<()> {
        let path = format!("/orders/{}", order.id);
        self.send_private(Method::Delete, &path, None)?
            .dispatch(EXCHANGE)
            .on_success(|_| Ok(()))
            .on_error(resp_err)
            .run()
    }

    fn query_order(&self, order: &Order) -> Result<Order> {
        let path = format!("/orders/{}", order.id);
        self.send_private(Method::Get, &path, None)?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let data = &js["data"];
                let mut snapshot = Order {
                    id: lenient::text(&data["order_id"]),
                    pair: self.norm_symbol(&lenient::text(&data["order_market"])),
                    side: self.order_side(&lenient::text(&data["order_side"])),
                    price: lenient::number(&data["price"], "price"),
                    amount: lenient::number(&data["amount"], "amount"),
                    executed: lenient::number(&data["filled_amount"], "filled_amount"),
                    remain: 0.0,
                    state: self.order_state(&data["order_state"]),
                };
                snapshot.recompute_remain();
                Ok(snapshot)
            })
            .on_error(resp_err)
            .run()
    }

    fn order_state(&self, value: &Value) -> OrderState {
        converters::from_bigone_state(&lenient::text(value))
    }

    fn order_side(&self, value: &str) -> Side {
        converters::from_bigone_side(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::{btc, usdt};
    use serde_json::json;

    #[test]
    fn test_symbol_mapping() {
        let ex = BigOneSpotAdapter::new(Arc::new(crate::transport::HttpTransport::new()));
        let pair = CurrencyPair::new(btc(), usdt());
        assert_eq!(ex.to_symbol(&pair), "BTC-USDT");
        assert_eq!(ex.norm_symbol("BTC-USDT").to_symbol("_"), "btc_usdt");
        assert!(ex.norm_symbol("garbage").is_unknown());
    }

    #[test]
    fn test_resp_err_extracts_description() {
        let err = resp_err(&json!({"error": {"code": 10013, "description": "Unauthorized"}}));
        assert_eq!(err.to_string(), "bigone: Unauthorized");
    }
}
