//! Timed polling loop driving an order toward a terminal status.
//!
//! A polling session is one tokio task per order. Its lifecycle:
//!
//! - the first cycle runs immediately; later cycles run on a fixed interval
//!   (3 s by default);
//! - every cycle reports progress through
//!   [`PollObserver::on_status_change`], runs one status-advancement step
//!   inside the actor, then queries the stored status;
//! - the session ends with exactly one terminal callback:
//!   [`on_success`](PollObserver::on_success) when the payment succeeded,
//!   [`on_error`](PollObserver::on_error) with
//!   [`OrderError::PaymentFailed`] when it failed, or
//!   [`on_timeout`](PollObserver::on_timeout) once the attempt budget is
//!   spent while the order is still pending;
//! - a cycle that errors (for example, the order vanished) is reported via
//!   `on_error` with no status view and the session keeps running. Only a
//!   terminal outcome or [`PollController::stop`] ends it.
//!
//! That last point mirrors how the checkout page has always behaved:
//! transient errors leave the timer running and the caller decides whether
//! to keep waiting or stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

use crate::clients::OrderClient;
use crate::model::{OrderId, OrderStatus, OrderStatusView};
use crate::order_actor::OrderError;

/// Progress report delivered at the start of every poll cycle.
#[derive(Debug, Clone)]
pub struct PollProgress {
    pub attempt: u32,
    pub max_attempts: u32,
    pub order_id: OrderId,
}

/// Callbacks observing a polling session.
///
/// `on_status_change` fires at the start of every cycle, before the status
/// is advanced or read. Exactly one of the other three fires per session,
/// except `on_error` with `view: None`, which reports a non-terminal cycle
/// error and may fire any number of times.
pub trait PollObserver: Send + Sync + 'static {
    fn on_status_change(&self, progress: PollProgress);
    fn on_success(&self, view: OrderStatusView);
    fn on_error(&self, error: OrderError, view: Option<OrderStatusView>);
    fn on_timeout(&self, error: OrderError, view: OrderStatusView);
}

/// Handle for cancelling a polling session.
///
/// The controller is the only way to end a session early. Dropping it does
/// not stop the session; the task keeps running until a terminal outcome.
pub struct PollController {
    stopped: Arc<AtomicBool>,
    wake: Arc<Notify>,
}

impl PollController {
    /// Stops the session.
    ///
    /// Idempotent: safe to call repeatedly and after the session already
    /// reached a terminal outcome. Stopping prevents any future cycle from
    /// starting but does not abort a cycle that is already in flight.
    pub fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            self.wake.notify_waiters();
        }
    }
}

/// Spawns the polling task for `order_id` and returns its controller.
pub(crate) fn spawn<O: PollObserver>(
    client: OrderClient,
    order_id: OrderId,
    observer: O,
    interval: Duration,
    max_attempts: u32,
) -> PollController {
    let stopped = Arc::new(AtomicBool::new(false));
    let wake = Arc::new(Notify::new());
    let controller = PollController {
        stopped: stopped.clone(),
        wake: wake.clone(),
    };

    tokio::spawn(run_session(
        client,
        order_id,
        observer,
        interval,
        max_attempts,
        stopped,
        wake,
    ));

    controller
}

#[instrument(skip_all, fields(order_id = %order_id))]
async fn run_session<O: PollObserver>(
    client: OrderClient,
    order_id: OrderId,
    observer: O,
    interval: Duration,
    max_attempts: u32,
    stopped: Arc<AtomicBool>,
    wake: Arc<Notify>,
) {
    // The first tick completes immediately, so attempt 1 runs right away.
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut attempts: u32 = 0;

    info!(max_attempts, "Polling session started");

    loop {
        if stopped.load(Ordering::SeqCst) {
            break;
        }
        tokio::select! {
            _ = ticker.tick() => {}
            _ = wake.notified() => break,
        }
        // The flag is re-checked after waking: a stop that raced the timer
        // must not start another cycle.
        if stopped.load(Ordering::SeqCst) {
            break;
        }

        attempts += 1;
        observer.on_status_change(PollProgress {
            attempt: attempts,
            max_attempts,
            order_id: order_id.clone(),
        });

        match run_cycle(&client, &order_id).await {
            Ok(view) => match view.status {
                OrderStatus::Success => {
                    stopped.store(true, Ordering::SeqCst);
                    info!(attempts, "Payment confirmed");
                    observer.on_success(view);
                    break;
                }
                OrderStatus::Failed => {
                    stopped.store(true, Ordering::SeqCst);
                    warn!(attempts, "Payment failed");
                    observer.on_error(OrderError::PaymentFailed(order_id.to_string()), Some(view));
                    break;
                }
                OrderStatus::Pending if attempts >= max_attempts => {
                    stopped.store(true, Ordering::SeqCst);
                    warn!(attempts, "Verification timed out");
                    observer.on_timeout(OrderError::VerificationTimeout { attempts }, view);
                    break;
                }
                OrderStatus::Pending => {
                    debug!(attempts, "Still pending");
                }
            },
            // A failed cycle is reported but does not end the session; the
            // caller decides whether to keep waiting or call `stop()`.
            Err(error) => {
                warn!(attempts, %error, "Poll cycle failed");
                observer.on_error(error, None);
            }
        }
    }

    debug!(attempts, "Polling session ended");
}

async fn run_cycle(client: &OrderClient, order_id: &OrderId) -> Result<OrderStatusView, OrderError> {
    client.advance_status(order_id.clone()).await?;
    client.query_order(order_id.clone()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_is_idempotent() {
        let controller = PollController {
            stopped: Arc::new(AtomicBool::new(false)),
            wake: Arc::new(Notify::new()),
        };

        controller.stop();
        controller.stop();
        assert!(controller.stopped.load(Ordering::SeqCst));
    }

    #[test]
    fn stop_after_natural_termination_is_a_noop() {
        // The session sets the flag itself when it reaches a terminal
        // outcome; a later stop() must not notify anyone.
        let controller = PollController {
            stopped: Arc::new(AtomicBool::new(true)),
            wake: Arc::new(Notify::new()),
        };

        controller.stop();
        assert!(controller.stopped.load(Ordering::SeqCst));
    }
}
