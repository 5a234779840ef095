//! OtcBTC Exchange Adapter

pub mod account;
pub mod spot;

use std::sync::Arc;

use crate::registry::{factory, Registry};
use crate::transport::Transport;

pub use account::{OtcBtcAuth, OTCBTC_REST_URL};
pub use spot::OtcBtcSpotAdapter;

pub fn register(registry: &mut Registry, transport: Arc<dyn Transport>) {
    registry.register(
        spot::EXCHANGE,
        factory(move || OtcBtcSpotAdapter::new(transport.clone())),
    );
}
