//! OtcBTC Spot Adapter

use std::sync::Arc;

use serde_json::Value;

use crate::currency::{Currency, CurrencyPair};
use crate::error::{ExchangeError, Result};
use crate::lenient;
use crate::normalize::non_zero_balances;
use crate::otcbtc::account::{converters, OtcBtcAuth, OTCBTC_REST_URL, OTCBTC_ZERO_BALANCE};
use crate::response::{message_at, Response};
use crate::rest::{credentials, params, Params, RestClient};
use crate::traits::*;
use crate::transport::{Method, Transport};

pub const EXCHANGE: &str = "otcbtc";

fn resp_err(js: &Value) -> ExchangeError {
    message_at(EXCHANGE, js, "/error/message")
}

pub struct OtcBtcSpotAdapter {
    rest: RestClient,
    auth: Option<OtcBtcAuth>,
}

impl OtcBtcSpotAdapter {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            rest: RestClient::new(EXCHANGE, OTCBTC_REST_URL, transport),
            auth: None,
        }
    }

    fn send_private(&self, method: Method, path: &str, fields: Params) -> Result<Response> {
        let auth = credentials(&self.auth, EXCHANGE)?;
        let request = auth
            .sign_request(self.rest.request(method, path), fields)
            .with_header("Content-Type", "application/x-www-form-urlencoded");
        self.rest.execute(request, true)
    }
}

impl Exchange for OtcBtcSpotAdapter {
    fn name(&self) -> &'static str {
        EXCHANGE
    }

    fn to_symbol(&self, pair: &CurrencyPair) -> String {
        pair.to_symbol("").to_lowercase()
    }

    // base is always three letters on this venue
    fn norm_symbol(&self, symbol: &str) -> CurrencyPair {
        let lower = symbol.to_lowercase();
        match (lower.get(..3), lower.get(3..)) {
            (Some(a), Some(b)) if !b.is_empty() => {
                CurrencyPair::new(Currency::new(a, ""), Currency::new(b, ""))
            }
            _ => CurrencyPair::unknown(),
        }
    }

    fn set_key(&mut self, access: &str, secret: &str) {
        self.auth = Some(OtcBtcAuth::new(access.to_string(), secret.to_string()));
    }

    fn get_balance(&mut self) -> Result<Vec<Balance>> {
        self.send_private(Method::Get, "/api/v2/users/me", Params::new())?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let all = lenient::array(&js["accounts"])
                    .iter()
                    .map(|b| Balance::new(lenient::text(&b["currency"]), lenient::text(&b["balance"])));
                Ok(non_zero_balances(all, OTCBTC_ZERO_BALANCE))
            })
            .on_error(resp_err)
            .run()
    }

    fn get_price(&self, pair: &CurrencyPair) -> Result<Price> {
        let path = format!("/api/v2/tickers/{}", self.to_symbol(pair));
        self.rest
            .get_public(&path, &Params::new())?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                Ok(Price {
                    price: lenient::number(&js["ticker"]["last"], "last"),
                })
            })
            .on_error(resp_err)
            .run()
    }

    fn get_symbols(&self) -> Result<Vec<String>> {
        self.rest
            .get_public("/api/v2/markets", &Params::new())?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                Ok(lenient::array(&js)
                    .iter()
                    .map(|m| lenient::text(&m["ticker_id"]).to_lowercase())
                    .collect())
            })
            .on_error(resp_err)
            .run()
    }

    fn get_depth(&self, pair: &CurrencyPair) -> Result<Depth> {
        self.rest
            .get_public("/api/v2/order_book", &params([("market", self.to_symbol(pair))]))?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                Ok(Depth::from_levels(
                    lenient::units(&js["asks"], "price", "volume"),
                    lenient::units(&js["bids"], "price", "volume"),
                ))
            })
            .on_error(resp_err)
            .run()
    }

    fn new_order(&mut self, order: &Order) -> Result<String> {
        let fields = params([
            ("market", self.to_symbol(&order.pair)),
            ("side", order.side.as_str().to_string()),
            ("volume", lenient::format_decimal(order.amount)),
            ("price", lenient::format_decimal(order.price)),
        ]);
        self.send_private(Method::Post, "/api/v2/orders", fields)?
            .dispatch(EXCHANGE)
            .on_success(|js| Ok(lenient::text(&js["id"])))
            .on_error(resp_err)
            .run()
    }

    fn cancel_order(&self, order: &Order) -> Result<()> {
        self.send_private(Method::Post, "/api/v2/order/delete", params([("id", order.id.clone())]))?
            .dispatch(EXCHANGE)
            .on_success(|_| Ok(()))
            .on_error(resp_err)
            .run()
    }

    fn query_order(&self, order: &Order) -> Result<Order> {
        self.send_private(Method::Get, "/api/v2/order", params([("id", order.id.clone())]))?
            .dispatch(EXCHANGE)
            .on_success(|js| {
                let mut snapshot = Order {
                    id: lenient::text(&js["id"]),
                    pair: self.norm_symbol(&lenient::text(&js["market"])),
                    side: self.order_side(&lenient::text(&js["side"])),
                    price: lenient::number(&js["price"], "price"),
                    amount: lenient::number(&js["volume"], "volume"),
                    executed: lenient::number(&js["executed_volume"], "executed_volume"),
                    remain: 0.0,
                    state: self.order_state(&js["state"]),
                };
                snapshot.recompute_remain();
                Ok(snapshot)
            })
            .on_error(resp_err)
            .run()
    }

    fn order_state(&self, value: &Value) -> OrderState {
        converters::from_otcbtc_state(&lenient::text(value))
    }

    fn order_side(&self, value: &str) -> Side {
        converters::from_otcbtc_side(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::{btc, eth};
    use crate::transport::HttpTransport;

    fn adapter() -> OtcBtcSpotAdapter {
        OtcBtcSpotAdapter::new(Arc::new(HttpTransport::new()))
    }

    #[test]
    fn test_symbol_round_trip() {
        let ex = adapter();
        let pair = CurrencyPair::new(eth(), btc());
        assert_eq!(ex.to_symbol(&pair), "ethbtc");
        let back = ex.norm_symbol("ETHBTC");
        assert_eq!(back.to_symbol("_"), "eth_btc");
        assert!(ex.norm_symbol("ab").is_unknown());
    }

    #[test]
    fn test_private_call_without_key() {
        let mut ex = adapter();
        assert!(matches!(ex.get_balance(), Err(ExchangeError::Validation(_))));
    }
}
