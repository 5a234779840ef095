//! Huobi Spot Adapter
//!
//! Huobi answers HTTP 200 even for rejected calls; the envelope's
//! `status` field (`"ok"` or `"error"`) decides success, with the reason in
//! `err-msg`. Balance and order placement need the account id, which is
//! fetched on first use and cached on the instance.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::currency::CurrencyPair;
use crate::error::{ExchangeError, Result};
use crate::huobi::account::{converters, HuobiAuth, HUOBI_REST_URL, HUOBI_ZERO_BALANCE};
use crate::lenient;
use crate::normalize::non_zero_balances;
use crate::response::Response;
use crate::rest::{credentials, params, Params, RestClient};
use crate::traits::*;
use crate::transport::{Method, Transport};

pub const EXCHANGE: &str = "huobi";

fn resp_err(js: &Value) -> ExchangeError {
    match js["err-msg"].as_str() {
        Some(reason) => ExchangeError::api(EXCHANGE, reason),
        None => ExchangeError::api(EXCHANGE, "unknown"),
    }
}

/// Unwraps an `{"status": "ok", ...}` envelope.
fn ok_envelope(js: Value) -> Result<Value> {
    if js["status"].as_str() == Some("ok") {
        Ok(js)
    } else {
        Err(resp_err(&js))
    }
}

pub struct HuobiSpotAdapter {
    rest: RestClient,
    auth: Option<HuobiAuth>,
    account_id: Option<String>,
}

impl HuobiSpotAdapter {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            rest: RestClient::new(EXCHANGE, HUOBI_REST_URL, transport),
            auth: None,
            account_id: None,
        }
    }

    fn send_private(
        &self,
        method: Method,
        path: &str,
        params: Params,
        body: Option<Value>,
    ) -> Result<Response> {
        let auth = credentials(&self.auth, EXCHANGE)?;
        let mut request = auth
            .sign_request(self.rest.request(method, path), params)
            .with_header("Content-Type", "application/json")
            .with_header("Accept", "application/json");
        if let Some(body) = body {
            request = request.with_body(body.to_string());
        }
        self.rest.execute(request, true)
    }

    /// Spot account id, fetched once per instance.
    pub fn account_id(&mut self) -> Result<String> {
        if let Some(id) = &self.account_id {
            return Ok(id.clone());
        }
        let id = self
            .send_private(Method::Get, "/v1/account/accounts", Params::new(), None)?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = ok_envelope(js)?;
                lenient::array(&js["data"])
                    .first()
                    .map(|account| lenient::text(&account["id"]))
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| ExchangeError::unknown(EXCHANGE))
            })
            .on_error(resp_err)
            .run()?;
        self.account_id = Some(id.clone());
        Ok(id)
    }
}

impl Exchange for HuobiSpotAdapter {
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
        self.auth = Some(HuobiAuth::new(access.to_string(), secret.to_string()));
        self.account_id = None;
    }

    fn get_balance(&mut self) -> Result<Vec<Balance>> {
        let path = format!("/v1/account/accounts/{}/balance", self.account_id()?);
        self.send_private(Method::Get, &path, Params::new(), None)?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = ok_envelope(js)?;
                let all = lenient::array(&js["data"]["list"])
                    .iter()
                    .map(|b| Balance::new(lenient::text(&b["currency"]), lenient::text(&b["balance"])));
                Ok(non_zero_balances(all, HUOBI_ZERO_BALANCE))
            })
            .on_error(resp_err)
            .run()
    }

    fn get_price(&self, pair: &CurrencyPair) -> Result<Price> {
        self.rest
            .get_public("/market/trade", &params([("symbol", self.to_symbol(pair))]))?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = ok_envelope(js)?;
                lenient::array(&js["tick"]["data"])
                    .first()
                    .map(|trade| Price {
                        price: lenient::number(&trade["price"], "price"),
                    })
                    .ok_or_else(|| ExchangeError::unknown(EXCHANGE))
            })
            .on_error(resp_err)
            .run()
    }

    fn get_symbols(&self) -> Result<Vec<String>> {
        self.rest
            .get_public("/v1/common/symbols", &Params::new())?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = ok_envelope(js)?;
                Ok(lenient::array(&js["data"])
                    .iter()
                    .map(|s| {
                        format!(
                            "{}_{}",
                            lenient::text(&s["base-currency"]),
                            lenient::text(&s["quote-currency"])
                        )
                    })
                    .collect())
            })
            .on_error(resp_err)
            .run()
    }

    fn get_depth(&self, pair: &CurrencyPair) -> Result<Depth> {
        let p = params([
            ("symbol", self.to_symbol(pair)),
            ("type", "step0".to_string()),
        ]);
        self.rest
            .get_public("/market/depth", &p)?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = ok_envelope(js)?;
                Ok(Depth::from_levels(
                    lenient::units(&js["tick"]["asks"], "price", "amount"),
                    lenient::units(&js["tick"]["bids"], "price", "amount"),
                ))
            })
            .on_error(resp_err)
            .run()
    }

    fn new_order(&mut self, order: &Order) -> Result<String> {
        let body = json!({
            "account-id": self.account_id()?,
            "symbol": self.to_symbol(&order.pair),
            "type": converters::to_huobi_order_type(order.side),
            "amount": lenient::format_decimal(order.amount),
            "price": lenient::format_decimal(order.price),
        });
        self.send_private(Method::Post, "/v1/order/orders/place", Params::new(), Some(body))?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = ok_envelope(js)?;
                Ok(lenient::text(&js["data"]))
            })
            .on_error(resp_err)
            .run()
    }

    fn cancel_order(&self, order: &Order) -> Result<()> {
        let path = format!("/v1/order/orders/{}/submitcancel", order.id);
        self.send_private(Method::Post, &path, Params::new(), None)?
            .dispatch(EXCHANGE)
            .on_success(|js| ok_envelope(js).map(|_| ()))
            .on_error(resp_err)
            .run()
    }

    fn query_order(&self, order: &Order) -> Result<Order> {
        let path = format!("/v1/order/orders/{}", order.id);
        self.send_private(Method::Get, &path, Params::new(), None)?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let js = ok_envelope(js)?;
                let data = &js["data"];
                let mut snapshot = Order {
                    id: lenient::text(&data["id"]),
                    pair: self.norm_symbol(&lenient::text(&data["symbol"])),
                    side: self.order_side(&lenient::text(&data["type"])),
                    price: lenient::number(&data["price"], "price"),
                    amount: lenient::number(&data["amount"], "amount"),
                    executed: lenient::number(&data["field-amount"], "field-amount"),
                    remain: 0.0,
                    state: self.order_state(&data["state"]),
                };
                snapshot.recompute_remain();
                Ok(snapshot)
            })
            .on_error(resp_err)
            .run()
    }

    fn order_state(&self, value: &Value) -> OrderState {
        converters::from_huobi_state(&lenient::text(value))
    }

    fn order_side(&self, value: &str) -> Side {
        converters::from_huobi_order_type(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope() {
        assert!(ok_envelope(json!({"status": "ok", "data": []})).is_ok());
        let err = ok_envelope(json!({"status": "error", "err-msg": "invalid symbol"})).unwrap_err();
        assert_eq!(err.to_string(), "huobi: invalid symbol");
    }

    #[test]
    fn test_symbol_is_lower_case() {
        use crate::currency::{eth, usdt};
        use crate::transport::HttpTransport;
        let ex = HuobiSpotAdapter::new(Arc::new(HttpTransport::new()));
        let pair = CurrencyPair::new(eth(), usdt());
        assert_eq!(ex.to_symbol(&pair), "ethusdt");
        assert_eq!(ex.norm_symbol("ethusdt").to_symbol("_"), "eth_usdt");
    }

    #[test]
    fn test_resp_err_fallback() {
        assert_eq!(resp_err(&json!({})).to_string(), "huobi: unknown");
    }
}
