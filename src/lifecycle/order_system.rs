use std::sync::Arc;

use tracing::{error, info};

use crate::clients::OrderClient;
use crate::config::ServiceConfig;
use crate::gateway::GatewayContext;
use crate::order_actor;

/// The runtime coordinator for the payment order service.
///
/// `OrderSystem` owns the order actor task and exposes the client used by
/// page logic. It is responsible for:
///
/// - **Wiring**: building the gateway context (clock + resolver) and
///   injecting it into the actor at startup
/// - **Lifecycle**: spawning the actor task and shutting it down cleanly
///
/// # Example
///
/// ```ignore
/// let system = OrderSystem::new();
///
/// let summary = system.order_client.create_order(params).await?;
/// let controller = system.order_client.start_polling(summary.order_id, observer);
///
/// // ... later
/// controller.stop();
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    /// Client for interacting with the Order actor.
    pub order_client: OrderClient,

    /// Task handles for all running actors (used for graceful shutdown).
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl OrderSystem {
    /// Creates a system with the default config and the production gateway
    /// wiring (system clock, weighted-coin resolver).
    pub fn new() -> Self {
        Self::with_config(ServiceConfig::default())
    }

    /// Creates a system with a custom config and the production gateway
    /// wiring.
    pub fn with_config(config: ServiceConfig) -> Self {
        Self::with_context(config, GatewayContext::live())
    }

    /// Creates a system with an explicit gateway context.
    ///
    /// Tests use this to inject a manual clock and a fixed outcome
    /// resolver, which makes every timing-dependent path deterministic.
    pub fn with_context(config: ServiceConfig, context: GatewayContext) -> Self {
        info!(app_id = %config.app_id, gateway = %config.gateway, "Starting payment order system");

        let config = Arc::new(config);
        let (order_actor, order_client) = order_actor::new(config);
        let order_handle = tokio::spawn(order_actor.run(context));

        Self {
            order_client,
            handles: vec![order_handle],
        }
    }

    /// Gracefully shuts down the system.
    ///
    /// Dropping the client closes the actor's channel; the actor drains its
    /// mailbox and exits its loop. Any polling sessions still running keep
    /// their client clones alive, so stop those first if a fully quiet
    /// shutdown matters.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down payment order system");

        drop(self.order_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("Payment order system shutdown complete");
        Ok(())
    }
}

impl Default for OrderSystem {
    fn default() -> Self {
        Self::new()
    }
}
