use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::clients::actor_client::ActorClient;
use crate::config::ServiceConfig;
use crate::framework::{FrameworkError, ResourceClient};
use crate::gateway;
use crate::model::{Order, OrderCreate, OrderId, OrderStatus, OrderStatusView, OrderSummary};
use crate::order_actor::{OrderAction, OrderError};
use crate::polling::{self, PollController, PollObserver};

/// Client for interacting with the Order actor.
///
/// This is the payment-facing surface: order creation, status query, and
/// status polling. Creation and query model the remote round-trip with a
/// bounded random delay before returning.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    config: Arc<ServiceConfig>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>, config: Arc<ServiceConfig>) -> Self {
        Self { inner, config }
    }

    /// Registers a new pending order and returns the checkout summary.
    ///
    /// Unset payload fields fall back to the checkout defaults; the summary
    /// carries the pre-provisioned QR asset from the service config.
    #[instrument(skip(self, params))]
    pub async fn create_order(&self, params: OrderCreate) -> Result<OrderSummary, OrderError> {
        debug!(?params, "create_order called");

        let order = self
            .inner
            .create(params)
            .await
            .map_err(Self::map_error)?;

        gateway::simulate_round_trip(self.config.latency_min, self.config.latency_max).await;

        info!(order_id = %order.order_id, amount = order.amount, "Order created");
        Ok(OrderSummary {
            order_id: order.order_id,
            amount: order.amount,
            subject: order.subject,
            qr_code_url: self.config.qr_code_url.clone(),
            status: order.status,
        })
    }

    /// Fetches the stored status snapshot for an order.
    ///
    /// The snapshot reflects the last advancement; querying never advances
    /// the status itself. Unknown ids fail with [`OrderError::NotFound`].
    #[instrument(skip(self))]
    pub async fn query_order(&self, id: OrderId) -> Result<OrderStatusView, OrderError> {
        debug!("query_order called");

        gateway::simulate_round_trip(self.config.latency_min, self.config.latency_max).await;

        match self.inner.get(id.clone()).await.map_err(Self::map_error)? {
            Some(order) => Ok(order.status_view()),
            None => Err(OrderError::NotFound(id.to_string())),
        }
    }

    /// Runs one status-advancement step inside the actor and returns the
    /// resulting status.
    pub(crate) async fn advance_status(&self, id: OrderId) -> Result<OrderStatus, OrderError> {
        self.inner
            .perform_action(id, OrderAction::AdvanceStatus)
            .await
            .map_err(Self::map_error)
    }

    /// Starts a polling session for the order and returns its controller.
    ///
    /// See [`crate::polling`] for the session semantics. The interval and
    /// attempt budget come from the service config.
    pub fn start_polling<O: PollObserver>(&self, id: OrderId, observer: O) -> PollController {
        polling::spawn(
            self.clone(),
            id,
            observer,
            self.config.polling_interval,
            self.config.max_polling_attempts,
        )
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}
