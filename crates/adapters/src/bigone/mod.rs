//! BigOne Exchange Adapter
//!
//! Bearer-token authentication with a per-instance device id.

pub mod account;
pub mod spot;

use std::sync::Arc;

use crate::registry::{factory, Registry};
use crate::transport::Transport;

pub use account::{BigOneAuth, BIGONE_REST_URL};
pub use spot::BigOneSpotAdapter;

pub fn register(registry: &mut Registry, transport: Arc<dyn Transport>) {
    registry.register(
        spot::EXCHANGE,
        factory(move || BigOneSpotAdapter::new(transport.clone())),
    );
}
