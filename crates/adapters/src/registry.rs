//! Name to adapter-factory lookup.
//!
//! The registry is an ordinary value built once by the composition root and
//! passed to whatever needs adapter lookup. Every [`Registry::get`] builds a
//! fresh, credential-less adapter.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::traits::Exchange;
use crate::transport::{HttpTransport, Transport};

pub type Factory = Box<dyn Fn() -> Box<dyn Exchange> + Send + Sync>;

/// Wraps a constructor as a registry factory.
pub fn factory<F, E>(make: F) -> Option<Factory>
where
    F: Fn() -> E + Send + Sync + 'static,
    E: Exchange + 'static,
{
    Some(Box::new(move || Box::new(make()) as Box<dyn Exchange>))
}

#[derive(Default)]
pub struct Registry {
    factories: HashMap<String, Factory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` under `name`. A later registration for the same
    /// name replaces the earlier one. `None` registers nothing.
    pub fn register(&mut self, name: &str, factory: Option<Factory>) {
        match factory {
            Some(factory) => {
                if self.factories.insert(name.to_string(), factory).is_some() {
                    debug!(exchange = name, "replaced registered factory");
                } else {
                    debug!(exchange = name, "registered factory");
                }
            }
            None => debug!(exchange = name, "skipped registration without factory"),
        }
    }

    /// A new adapter instance, or `None` for an unknown name.
    pub fn get(&self, name: &str) -> Option<Box<dyn Exchange>> {
        self.factories.get(name).map(|factory| factory())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in no particular order.
    pub fn list(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

/// Registers every venue adapter against `transport`.
pub fn register_all(registry: &mut Registry, transport: Arc<dyn Transport>) {
    crate::bigone::register(registry, transport.clone());
    crate::binance::register(registry, transport.clone());
    crate::bitfinex::register(registry, transport.clone());
    crate::bitstamp::register(registry, transport.clone());
    crate::bittrex::register(registry, transport.clone());
    crate::exx::register(registry, transport.clone());
    crate::gate::register(registry, transport.clone());
    crate::hitbtc::register(registry, transport.clone());
    crate::huobi::register(registry, transport.clone());
    crate::kraken::register(registry, transport.clone());
    crate::okex::register(registry, transport.clone());
    crate::otcbtc::register(registry, transport.clone());
    crate::poloniex::register(registry, transport.clone());
    crate::zb::register(registry, transport);
    crate::ex::register(registry);
}

/// A registry of every venue over the real HTTP transport.
pub fn default_registry() -> Registry {
    let mut registry = Registry::new();
    register_all(&mut registry, Arc::new(HttpTransport::new()));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::CurrencyPair;
    use crate::error::Result;
    use crate::traits::{Balance, Depth, Order, OrderState, Price, Side};
    use serde_json::Value;

    struct Named(&'static str);

    impl Exchange for Named {
        fn name(&self) -> &'static str {
            self.0
        }
        fn to_symbol(&self, pair: &CurrencyPair) -> String {
            pair.to_symbol("_")
        }
        fn norm_symbol(&self, symbol: &str) -> CurrencyPair {
            CurrencyPair::from_symbol(symbol)
        }
        fn set_key(&mut self, _access: &str, _secret: &str) {}
        fn get_balance(&mut self) -> Result<Vec<Balance>> {
            Ok(vec![])
        }
        fn get_price(&self, _pair: &CurrencyPair) -> Result<Price> {
            Ok(Price::default())
        }
        fn get_symbols(&self) -> Result<Vec<String>> {
            Ok(vec![])
        }
        fn get_depth(&self, _pair: &CurrencyPair) -> Result<Depth> {
            Ok(Depth::default())
        }
        fn new_order(&mut self, _order: &Order) -> Result<String> {
            Ok(String::new())
        }
        fn cancel_order(&self, _order: &Order) -> Result<()> {
            Ok(())
        }
        fn query_order(&self, order: &Order) -> Result<Order> {
            Ok(order.clone())
        }
        fn order_state(&self, _value: &Value) -> OrderState {
            OrderState::Unknown
        }
        fn order_side(&self, _value: &str) -> Side {
            Side::Buy
        }
    }

    fn named(tag: &'static str) -> Option<Factory> {
        factory(move || Named(tag))
    }

    #[test]
    fn test_get_unknown_name() {
        let registry = Registry::new();
        assert!(registry.get("doesnotexist").is_none());
        assert!(registry.list().is_empty());
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = Registry::new();
        registry.register("venue", named("first"));
        registry.register("venue", named("second"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("venue").map(|e| e.name()), Some("second"));
    }

    #[test]
    fn test_none_factory_is_noop() {
        let mut registry = Registry::new();
        registry.register("venue", None);
        assert!(!registry.contains("venue"));

        registry.register("venue", named("kept"));
        registry.register("venue", None);
        assert_eq!(registry.get("venue").map(|e| e.name()), Some("kept"));
    }

    #[test]
    fn test_list_contains_registered_names() {
        let mut registry = Registry::new();
        registry.register("a", named("a"));
        registry.register("b", named("b"));
        let mut names = registry.list();
        names.sort();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }
}
