//! OKEx Exchange Adapter (REST v1)

pub mod account;
pub mod spot;

use std::sync::Arc;

use crate::registry::{factory, Registry};
use crate::transport::Transport;

pub use account::{OkexAuth, OKEX_REST_URL};
pub use spot::OkexSpotAdapter;

pub fn register(registry: &mut Registry, transport: Arc<dyn Transport>) {
    registry.register(
        spot::EXCHANGE,
        factory(move || OkexSpotAdapter::new(transport.clone())),
    );
}
