//! Order-specific resource logic and entity implementation.

pub mod entity;
pub mod error;

pub use entity::OrderAction;
pub use error::*;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::clients::OrderClient;
use crate::config::ServiceConfig;
use crate::framework::ResourceActor;
use crate::model::{Order, OrderId};

/// Creates a new Order actor and its client.
///
/// Order ids combine the creation-time epoch milliseconds with a
/// process-wide sequence, so no two orders from the same actor ever share
/// an id.
pub fn new(config: Arc<ServiceConfig>) -> (ResourceActor<Order>, OrderClient) {
    let sequence = Arc::new(AtomicU64::new(0));
    let next_order_id = move || {
        let seq = sequence.fetch_add(1, Ordering::SeqCst);
        OrderId::generate(seq)
    };

    let (actor, generic_client) = ResourceActor::new(32, next_order_id);
    let client = OrderClient::new(generic_client, config);

    (actor, client)
}
