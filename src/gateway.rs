//! Seams toward the payment provider.
//!
//! In production, order creation and status checks would be signed HTTPS
//! calls against the gateway. This crate substitutes a local simulation and
//! concentrates everything a real integration would replace behind three
//! seams:
//!
//! - [`Clock`]: where "now" comes from when computing elapsed time;
//! - [`StatusResolver`]: how a pending payment turns into an outcome;
//! - [`simulate_round_trip`]: the stand-in for transport latency.
//!
//! Tests inject [`ManualClock`] and [`FixedOutcome`] to make every
//! timing-dependent path deterministic.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::model::Order;

/// Success probability of the simulated payment decision.
pub const SUCCESS_PROBABILITY: f64 = 0.8;

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A manually driven clock for tests. Time only moves when the test says
/// so, which pins down the grace-window and deadline behavior exactly.
#[derive(Debug)]
pub struct ManualClock {
    now_millis: AtomicI64,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now_millis: AtomicI64::new(start.timestamp_millis()),
        }
    }

    pub fn set(&self, to: DateTime<Utc>) {
        self.now_millis.store(to.timestamp_millis(), Ordering::SeqCst);
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.now_millis
            .fetch_add(by.num_milliseconds(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.now_millis.load(Ordering::SeqCst))
            .unwrap_or_default()
    }
}

/// Outcome of a payment decision. The resolver is only consulted inside the
/// decision window, and a decision is always terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Success,
    Failed,
}

/// Decides whether a pending payment succeeded or failed.
///
/// The production stand-in rolls a weighted coin; a real integration would
/// map the gateway's status vocabulary to [`PaymentOutcome`] here.
pub trait StatusResolver: Send + Sync {
    fn resolve(&self, order: &Order) -> PaymentOutcome;
}

/// Simulated payment decision: succeeds with the configured probability.
#[derive(Debug, Clone, Copy)]
pub struct RandomOutcome {
    success_probability: f64,
}

impl RandomOutcome {
    pub fn new(success_probability: f64) -> Self {
        Self {
            success_probability,
        }
    }
}

impl Default for RandomOutcome {
    fn default() -> Self {
        Self::new(SUCCESS_PROBABILITY)
    }
}

impl StatusResolver for RandomOutcome {
    fn resolve(&self, _order: &Order) -> PaymentOutcome {
        if rand::thread_rng().gen_bool(self.success_probability) {
            PaymentOutcome::Success
        } else {
            PaymentOutcome::Failed
        }
    }
}

/// Always returns the wrapped outcome. For tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedOutcome(pub PaymentOutcome);

impl StatusResolver for FixedOutcome {
    fn resolve(&self, _order: &Order) -> PaymentOutcome {
        self.0
    }
}

/// Runtime dependencies injected into the order actor.
///
/// Built once at startup and handed to
/// [`ResourceActor::run`](crate::framework::ResourceActor::run); every
/// entity hook sees the same clock and resolver.
#[derive(Clone)]
pub struct GatewayContext {
    pub clock: Arc<dyn Clock>,
    pub resolver: Arc<dyn StatusResolver>,
}

impl GatewayContext {
    pub fn new(clock: Arc<dyn Clock>, resolver: Arc<dyn StatusResolver>) -> Self {
        Self { clock, resolver }
    }

    /// The production wiring: system clock and the weighted-coin resolver.
    pub fn live() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(RandomOutcome::default()))
    }
}

/// Waits a bounded random interval standing in for gateway round-trip
/// latency. Not cancellable mid-flight; callers that stop polling only
/// prevent future cycles.
pub async fn simulate_round_trip(min: Duration, max: Duration) {
    let wait = if max > min {
        let span_millis = (max - min).as_millis() as u64;
        min + Duration::from_millis(rand::thread_rng().gen_range(0..=span_millis))
    } else {
        min
    };
    tokio::time::sleep(wait).await;
}
