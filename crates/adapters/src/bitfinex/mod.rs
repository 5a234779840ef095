//! Bitfinex Exchange Adapter (REST v1)

pub mod account;
pub mod spot;

use std::sync::Arc;

use crate::registry::{factory, Registry};
use crate::transport::Transport;

pub use account::{BitfinexAuth, BITFINEX_REST_URL};
pub use spot::BitfinexSpotAdapter;

pub fn register(registry: &mut Registry, transport: Arc<dyn Transport>) {
    registry.register(
        spot::EXCHANGE,
        factory(move || BitfinexSpotAdapter::new(transport.clone())),
    );
}
