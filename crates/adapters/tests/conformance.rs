//! Contract checks every adapter must pass, run over the full registry plus
//! the reference adapter.
//!
//! Run with: cargo test --package adapters --test conformance

mod common;

use std::sync::Arc;

use adapters::currency::{btc, eth, usdt};
use adapters::ex::ExAdapter;
use adapters::{
    register_all, CurrencyPair, Exchange, ExchangeError, Order, OrderState, Registry, Side,
    Transport,
};
use common::MockTransport;
use serde_json::json;

const PUBLIC_ONLY: &[&str] = &[
    "bitstamp", "bittrex", "exx", "gate", "hitbtc", "kraken", "poloniex", "zb",
];

fn every_adapter(mock: &Arc<MockTransport>) -> Vec<Box<dyn Exchange>> {
    let mut registry = Registry::new();
    register_all(&mut registry, mock.clone() as Arc<dyn Transport>);
    let mut names = registry.list();
    names.sort();
    let mut adapters: Vec<Box<dyn Exchange>> = names
        .iter()
        .filter_map(|name| registry.get(name))
        .collect();
    adapters.push(Box::new(ExAdapter::new()));
    adapters
}

fn canonical(pair: &CurrencyPair) -> String {
    pair.to_symbol("_").to_uppercase()
}

// =============================================================================
// Identity and symbols
// =============================================================================

#[test]
fn names_match_registration() {
    let mock = MockTransport::new();
    let mut registry = Registry::new();
    register_all(&mut registry, mock.clone() as Arc<dyn Transport>);
    for name in registry.list() {
        let adapter = registry.get(&name).expect("listed names resolve");
        assert_eq!(adapter.name(), name);
    }
}

#[test]
fn symbols_round_trip_through_venue_spelling() {
    let mock = MockTransport::new();
    for pair in [CurrencyPair::new(btc(), usdt()), CurrencyPair::new(eth(), btc())] {
        for adapter in every_adapter(&mock) {
            let venue = adapter.to_symbol(&pair);
            let back = adapter.norm_symbol(&venue);
            assert_eq!(
                canonical(&back),
                canonical(&pair),
                "{} spelled {} as {}",
                adapter.name(),
                pair,
                venue
            );
        }
    }
}

#[test]
fn norm_symbol_never_panics_on_garbage() {
    let mock = MockTransport::new();
    for adapter in every_adapter(&mock) {
        for junk in ["", "_", "-", "a", "ab", "___", "BTC-USD-EUR", "ü_ö"] {
            let _ = adapter.norm_symbol(junk);
        }
    }
}

// =============================================================================
// Order state and side
// =============================================================================

#[test]
fn order_state_is_pure_and_passes_unknowns_through() {
    let mock = MockTransport::new();
    for adapter in every_adapter(&mock) {
        for raw in [json!("weird-state"), json!(17), json!(false)] {
            let first = adapter.order_state(&raw);
            assert_eq!(first, adapter.order_state(&raw), "{}", adapter.name());
            assert!(
                matches!(first, OrderState::Other(_)),
                "{} mapped {} to {:?}",
                adapter.name(),
                raw,
                first
            );
        }
    }
}

#[test]
fn order_side_understands_plain_sell() {
    let mock = MockTransport::new();
    for adapter in every_adapter(&mock) {
        if adapter.name() == "bigone" {
            assert_eq!(adapter.order_side("ASK"), Side::Sell);
        } else if adapter.name() == "huobi" {
            assert_eq!(adapter.order_side("sell-limit"), Side::Sell);
        } else {
            assert_eq!(adapter.order_side("sell"), Side::Sell, "{}", adapter.name());
        }
    }
}

// =============================================================================
// Unsupported operations
// =============================================================================

#[test]
fn public_only_venues_refuse_private_operations() {
    let mock = MockTransport::new();
    let order = Order::limit(CurrencyPair::new(btc(), usdt()), Side::Buy, 1.0, 1.0);
    for mut adapter in every_adapter(&mock) {
        if !PUBLIC_ONLY.contains(&adapter.name()) {
            continue;
        }
        adapter.set_key("AK", "SK");
        assert!(matches!(adapter.get_balance(), Err(ExchangeError::Unsupported { .. })));
        assert!(matches!(adapter.new_order(&order), Err(ExchangeError::Unsupported { .. })));
        assert!(matches!(adapter.cancel_order(&order), Err(ExchangeError::Unsupported { .. })));
        assert!(matches!(adapter.query_order(&order), Err(ExchangeError::Unsupported { .. })));
    }
    assert!(mock.requests().is_empty());
}

#[test]
fn public_only_venues_keep_their_credentials() {
    use adapters::{bitstamp, bittrex, exx, gate, hitbtc, kraken, poloniex, zb};

    let mock = MockTransport::new();
    let transport = || mock.clone() as Arc<dyn Transport>;

    let mut kraken = kraken::KrakenAdapter::new(transport());
    assert!(kraken.key().is_none());
    kraken.set_key("AK", "SK");
    assert_eq!(kraken.key().map(|k| k.access_key_id.as_str()), Some("AK"));

    let mut stored = Vec::new();
    macro_rules! check {
        ($adapter:expr) => {{
            let mut adapter = $adapter;
            adapter.set_key("AK", "SK");
            stored.push(adapter.key().map(|k| (k.access_key_id.clone(), k.secret_key_id.clone())));
        }};
    }
    check!(bitstamp::BitstampAdapter::new(transport()));
    check!(bittrex::BittrexAdapter::new(transport()));
    check!(exx::ExxAdapter::new(transport()));
    check!(gate::GateAdapter::new(transport()));
    check!(hitbtc::HitBtcAdapter::new(transport()));
    check!(poloniex::PoloniexAdapter::new(transport()));
    check!(zb::ZbAdapter::new(transport()));

    assert_eq!(stored.len(), 7);
    assert!(stored
        .iter()
        .all(|key| key == &Some(("AK".to_string(), "SK".to_string()))));
    assert!(mock.requests().is_empty());
}

#[test]
fn reference_adapter_never_touches_the_network() {
    let mut ex = ExAdapter::new();
    let pair = CurrencyPair::new(btc(), usdt());
    ex.set_key("AK", "SK");
    assert!(matches!(ex.get_price(&pair), Err(ExchangeError::Unsupported { operation: "get_price", .. })));
    assert!(matches!(ex.get_symbols(), Err(ExchangeError::Unsupported { .. })));
    assert!(matches!(ex.get_depth(&pair), Err(ExchangeError::Unsupported { .. })));
    assert!(matches!(ex.get_balance(), Err(ExchangeError::Unsupported { .. })));
    assert_eq!(ex.to_symbol(&pair), "BTC_USDT");
}

#[test]
fn private_calls_require_credentials() {
    let mock = MockTransport::new();
    for mut adapter in every_adapter(&mock) {
        if PUBLIC_ONLY.contains(&adapter.name()) || adapter.name() == "ex" {
            continue;
        }
        assert!(
            matches!(adapter.get_balance(), Err(ExchangeError::Validation(_))),
            "{}",
            adapter.name()
        );
    }
    assert!(mock.requests().is_empty());
}

// =============================================================================
// Zero-balance filtering
// =============================================================================

fn balances_of(name: &str, responses: &[serde_json::Value]) -> Vec<String> {
    let mock = MockTransport::new();
    for body in responses {
        mock.respond_json(200, body.clone());
    }
    let mut registry = Registry::new();
    register_all(&mut registry, mock.clone() as Arc<dyn Transport>);
    let mut adapter = registry.get(name).expect("registered");
    adapter.set_key("AK", "SK");
    adapter
        .get_balance()
        .expect("balance")
        .into_iter()
        .map(|b| b.currency)
        .collect()
}

#[test]
fn bigone_drops_literal_zero() {
    let body = json!({"data": [
        {"account_type": "BTC", "active_balance": "0.00000000"},
        {"account_type": "ETH", "active_balance": "1.50000000"}
    ]});
    assert_eq!(balances_of("bigone", &[body]), vec!["ETH"]);
}

#[test]
fn binance_drops_literal_zero() {
    let body = json!({"balances": [
        {"asset": "BTC", "free": "0.00000000", "locked": "0.00000000"},
        {"asset": "BNB", "free": "12.00000000", "locked": "0.00000000"}
    ]});
    assert_eq!(balances_of("binance", &[body]), vec!["BNB"]);
}

#[test]
fn bitfinex_drops_literal_zero() {
    let body = json!([
        {"type": "exchange", "currency": "btc", "amount": "0.0", "available": "0.0"},
        {"type": "exchange", "currency": "usd", "amount": "10.5", "available": "10.5"}
    ]);
    assert_eq!(balances_of("bitfinex", &[body]), vec!["usd"]);
}

#[test]
fn huobi_fetches_account_then_drops_literal_zero() {
    let accounts = json!({"status": "ok", "data": [{"id": 100009, "type": "spot", "state": "working"}]});
    let balance = json!({"status": "ok", "data": {"id": 100009, "list": [
        {"currency": "usdt", "type": "trade", "balance": "0.000000000000000000"},
        {"currency": "btc", "type": "trade", "balance": "0.250000000000000000"}
    ]}});
    assert_eq!(balances_of("huobi", &[accounts, balance]), vec!["btc"]);
}

#[test]
fn okex_drops_literal_zero() {
    let body = json!({"result": true, "info": {"funds": {"free": {"btc": "0", "ltc": "3.2"}}}});
    assert_eq!(balances_of("okex", &[body]), vec!["ltc"]);
}

#[test]
fn otcbtc_drops_literal_zero() {
    let body = json!({"accounts": [
        {"currency": "btc", "balance": "0.0", "locked": "0.0"},
        {"currency": "otb", "balance": "42.0", "locked": "0.0"}
    ]});
    assert_eq!(balances_of("otcbtc", &[body]), vec!["otb"]);
}
