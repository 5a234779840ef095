//! Exchange Adapters
//!
//! One blocking client per venue behind the [`Exchange`] trait, a
//! [`Registry`] that hands out fresh adapters by name, and the shared
//! currency, response and signing plumbing they are built from.

pub mod currency;
pub mod error;
pub mod lenient;
pub mod normalize;
pub mod registry;
pub mod response;
pub mod rest;
pub mod sign;
pub mod traits;
pub mod transport;

pub mod bigone;
pub mod binance;
pub mod bitfinex;
pub mod bitstamp;
pub mod bittrex;
pub mod ex;
pub mod exx;
pub mod gate;
pub mod hitbtc;
pub mod huobi;
pub mod kraken;
pub mod okex;
pub mod otcbtc;
pub mod poloniex;
pub mod zb;

pub use currency::{Currency, CurrencyPair};
pub use error::{ExchangeError, Result};
pub use registry::{default_registry, register_all, Factory, Registry};
pub use traits::{Balance, Depth, Exchange, ExchangeKey, Order, OrderState, Price, Side, Unit};
pub use transport::{HttpTransport, Method, RawResponse, Request, Transport};
