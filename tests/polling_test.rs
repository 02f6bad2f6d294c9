//! Polling session semantics, driven with a manual clock and paused tokio
//! time so every timing-dependent path is deterministic.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use tokio::sync::mpsc;

use payment_orders::config::ServiceConfig;
use payment_orders::gateway::{FixedOutcome, GatewayContext, ManualClock, PaymentOutcome};
use payment_orders::lifecycle::OrderSystem;
use payment_orders::model::{OrderCreate, OrderId, OrderStatus, OrderStatusView};
use payment_orders::order_actor::OrderError;
use payment_orders::polling::{PollObserver, PollProgress};

#[derive(Debug)]
enum PollEvent {
    StatusChange(PollProgress),
    Success(OrderStatusView),
    Error(OrderError, Option<OrderStatusView>),
    Timeout(OrderError, OrderStatusView),
}

/// Forwards every callback into an unbounded channel so tests can assert
/// on the exact event sequence.
struct ChannelObserver {
    tx: mpsc::UnboundedSender<PollEvent>,
}

impl PollObserver for ChannelObserver {
    fn on_status_change(&self, progress: PollProgress) {
        let _ = self.tx.send(PollEvent::StatusChange(progress));
    }

    fn on_success(&self, view: OrderStatusView) {
        let _ = self.tx.send(PollEvent::Success(view));
    }

    fn on_error(&self, error: OrderError, view: Option<OrderStatusView>) {
        let _ = self.tx.send(PollEvent::Error(error, view));
    }

    fn on_timeout(&self, error: OrderError, view: OrderStatusView) {
        let _ = self.tx.send(PollEvent::Timeout(error, view));
    }
}

fn observer() -> (ChannelObserver, mpsc::UnboundedReceiver<PollEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelObserver { tx }, rx)
}

fn fast_config() -> ServiceConfig {
    ServiceConfig::builder()
        .with_latency_bounds(Duration::ZERO, Duration::ZERO)
        .build()
}

fn system_with(clock: Arc<ManualClock>, outcome: PaymentOutcome) -> OrderSystem {
    let context = GatewayContext::new(clock, Arc::new(FixedOutcome(outcome)));
    OrderSystem::with_context(fast_config(), context)
}

fn start_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
}

#[tokio::test(start_paused = true)]
async fn successful_payment_reports_exactly_one_terminal_callback() {
    let clock = Arc::new(ManualClock::new(start_time()));
    let system = system_with(clock.clone(), PaymentOutcome::Success);

    let summary = system
        .order_client
        .create_order(OrderCreate::default())
        .await
        .unwrap();

    // Move into the decision window before the first poll cycle runs.
    clock.advance(ChronoDuration::seconds(12));

    let (obs, mut rx) = observer();
    let controller = system
        .order_client
        .start_polling(summary.order_id.clone(), obs);

    // The first event is always a progress report for attempt 1.
    match rx.recv().await.unwrap() {
        PollEvent::StatusChange(progress) => {
            assert_eq!(progress.attempt, 1);
            assert_eq!(progress.max_attempts, 10);
            assert_eq!(progress.order_id, summary.order_id);
        }
        other => panic!("expected a progress report first, got {:?}", other),
    }

    match rx.recv().await.unwrap() {
        PollEvent::Success(view) => {
            assert_eq!(view.order_id, summary.order_id);
            assert_eq!(view.status, OrderStatus::Success);
            assert!(view.update_time > view.create_time);
        }
        other => panic!("expected success, got {:?}", other),
    }

    // Session over: the observer is dropped and no second terminal arrives.
    assert!(rx.recv().await.is_none());

    // Stopping after natural termination is a harmless no-op.
    controller.stop();
    controller.stop();

    let view = system
        .order_client
        .query_order(summary.order_id)
        .await
        .unwrap();
    assert_eq!(view.status, OrderStatus::Success);
}

#[tokio::test(start_paused = true)]
async fn failed_payment_is_delivered_via_on_error_with_the_latest_view() {
    let clock = Arc::new(ManualClock::new(start_time()));
    let system = system_with(clock.clone(), PaymentOutcome::Failed);

    let summary = system
        .order_client
        .create_order(OrderCreate::default())
        .await
        .unwrap();
    clock.advance(ChronoDuration::seconds(12));

    let (obs, mut rx) = observer();
    let _controller = system
        .order_client
        .start_polling(summary.order_id.clone(), obs);

    match rx.recv().await.unwrap() {
        PollEvent::StatusChange(progress) => assert_eq!(progress.attempt, 1),
        other => panic!("expected a progress report first, got {:?}", other),
    }

    match rx.recv().await.unwrap() {
        PollEvent::Error(error, Some(view)) => {
            assert_eq!(
                error,
                OrderError::PaymentFailed(summary.order_id.to_string())
            );
            assert_eq!(view.status, OrderStatus::Failed);
        }
        other => panic!("expected a payment failure, got {:?}", other),
    }

    assert!(rx.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn stale_pending_order_is_forced_to_failed() {
    let clock = Arc::new(ManualClock::new(start_time()));
    // A resolver that would succeed must not matter past the deadline.
    let system = system_with(clock.clone(), PaymentOutcome::Success);

    let summary = system
        .order_client
        .create_order(OrderCreate::default())
        .await
        .unwrap();
    clock.advance(ChronoDuration::seconds(20));

    let (obs, mut rx) = observer();
    let _controller = system
        .order_client
        .start_polling(summary.order_id.clone(), obs);

    loop {
        match rx.recv().await.unwrap() {
            PollEvent::StatusChange(_) => {}
            PollEvent::Error(error, Some(view)) => {
                assert_eq!(
                    error,
                    OrderError::PaymentFailed(summary.order_id.to_string())
                );
                assert_eq!(view.status, OrderStatus::Failed);
                break;
            }
            other => panic!("expected a forced failure, got {:?}", other),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn timeout_fires_on_exactly_the_tenth_attempt() {
    // The clock never moves, so the order stays inside the grace window
    // and every cycle observes `pending`.
    let clock = Arc::new(ManualClock::new(start_time()));
    let system = system_with(clock, PaymentOutcome::Success);

    let summary = system
        .order_client
        .create_order(OrderCreate::default())
        .await
        .unwrap();

    let (obs, mut rx) = observer();
    let _controller = system
        .order_client
        .start_polling(summary.order_id.clone(), obs);

    let mut progress_reports = 0;
    loop {
        match rx.recv().await.unwrap() {
            PollEvent::StatusChange(progress) => {
                progress_reports += 1;
                assert_eq!(progress.attempt, progress_reports);
            }
            PollEvent::Timeout(error, view) => {
                assert_eq!(progress_reports, 10, "timeout must land on attempt 10");
                assert_eq!(error, OrderError::VerificationTimeout { attempts: 10 });
                assert_eq!(view.status, OrderStatus::Pending);
                break;
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    assert!(rx.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn cycle_errors_do_not_stop_the_session() {
    let clock = Arc::new(ManualClock::new(start_time()));
    let system = system_with(clock, PaymentOutcome::Success);

    let (obs, mut rx) = observer();
    let controller = system
        .order_client
        .start_polling(OrderId::from("ALI-missing"), obs);

    // Each cycle reports the missing order and keeps going; only stop()
    // ends the session.
    let mut errors = 0;
    while errors < 3 {
        match rx.recv().await.unwrap() {
            PollEvent::StatusChange(_) => {}
            PollEvent::Error(OrderError::NotFound(id), None) => {
                assert_eq!(id, "ALI-missing");
                errors += 1;
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    controller.stop();

    // An in-flight cycle may still report, but the session must end
    // without any terminal callback.
    while let Some(event) = rx.recv().await {
        match event {
            PollEvent::StatusChange(_) | PollEvent::Error(..) => {}
            other => panic!("unexpected terminal event {:?}", other),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn stop_prevents_any_further_cycles() {
    let clock = Arc::new(ManualClock::new(start_time()));
    let system = system_with(clock, PaymentOutcome::Success);

    let summary = system
        .order_client
        .create_order(OrderCreate::default())
        .await
        .unwrap();

    let (obs, mut rx) = observer();
    let controller = system
        .order_client
        .start_polling(summary.order_id, obs);

    match rx.recv().await.unwrap() {
        PollEvent::StatusChange(progress) => assert_eq!(progress.attempt, 1),
        other => panic!("expected a progress report, got {:?}", other),
    }

    controller.stop();

    // No attempt 2: the channel closes without another progress report.
    assert!(rx.recv().await.is_none());
}
