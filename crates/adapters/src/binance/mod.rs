//! Binance Exchange Adapter
//!
//! # Supported Markets
//!
//! - **Spot**: balances, market data and limit orders via `BinanceSpotAdapter`

pub mod account;
pub mod spot;

use std::sync::Arc;

use crate::registry::{factory, Registry};
use crate::transport::Transport;

pub use account::{BinanceAuth, BINANCE_REST_URL};
pub use spot::BinanceSpotAdapter;

pub fn register(registry: &mut Registry, transport: Arc<dyn Transport>) {
    registry.register(
        spot::EXCHANGE,
        factory(move || BinanceSpotAdapter::new(transport.clone())),
    );
}
