//! Huobi Exchange Adapter
//!
//! # Supported Markets
//!
//! - **Spot**: balances, market data and limit orders via `HuobiSpotAdapter`

pub mod account;
pub mod spot;

use std::sync::Arc;

use crate::registry::{factory, Registry};
use crate::transport::Transport;

pub use account::{HuobiAuth, HUOBI_REST_URL};
pub use spot::HuobiSpotAdapter;

pub fn register(registry: &mut Registry, transport: Arc<dyn Transport>) {
    registry.register(
        spot::EXCHANGE,
        factory(move || HuobiSpotAdapter::new(transport.clone())),
    );
}
