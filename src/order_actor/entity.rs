//! Entity trait implementation for the Order domain type.
//!
//! This wires [`Order`] into the generic
//! [`ResourceActor`](crate::framework::ResourceActor): creation stamps the
//! timestamps from the injected clock, and the single domain action runs
//! one status-advancement step.

use async_trait::async_trait;
use tracing::info;

use crate::framework::ActorEntity;
use crate::gateway::GatewayContext;
use crate::model::{Order, OrderCreate, OrderId, OrderStatus};

/// Resource-specific operations on a stored order.
#[derive(Debug)]
pub enum OrderAction {
    /// Run one status-advancement step against the injected clock and
    /// resolver. Stands in for querying the real gateway by order id.
    AdvanceStatus,
}

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type CreateParams = OrderCreate;
    type Action = OrderAction;
    type ActionResult = OrderStatus;
    type Context = GatewayContext;

    fn from_create_params(
        id: OrderId,
        params: OrderCreate,
        ctx: &GatewayContext,
    ) -> Result<Self, String> {
        Ok(Order::new(id, params, ctx.clock.now()))
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        ctx: &GatewayContext,
    ) -> Result<OrderStatus, String> {
        match action {
            OrderAction::AdvanceStatus => {
                let changed = self.advance(ctx.clock.now(), ctx.resolver.as_ref());
                if changed {
                    info!(order_id = %self.order_id, status = %self.status, "Order status advanced");
                }
                Ok(self.status)
            }
        }
    }
}
