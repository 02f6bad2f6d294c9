//! # Payment Orders
//!
//! > **An in-process payment order lifecycle with a timed status-polling loop.**
//!
//! This crate tracks payment orders from creation to a terminal outcome and
//! drives a polling session that watches an order until it succeeds, fails,
//! or runs out of attempts. The remote gateway is simulated behind narrow
//! seams (an injected clock and an injected outcome resolver), so the whole
//! lifecycle runs deterministically under test while keeping the shape of a
//! real integration.
//!
//! ## Design
//!
//! The order store lives inside a single actor task. Callers talk to it
//! through a typed client over an mpsc channel; each request carries a
//! oneshot channel for its response. Because the actor processes messages
//! sequentially, every status transition is serialized without locks, which
//! is what keeps the forward-only status invariant cheap to uphold.
//!
//! Dependencies the actor needs at runtime (the clock and the payment
//! outcome resolver) are injected into `run()`, not into the constructor.
//! Tests swap in a manually driven clock and a fixed resolver to pin down
//! timing-sensitive behavior.
//!
//! ## Concurrency Model
//!
//! - One actor task owns all orders and mutates them one message at a time.
//! - Each polling session is its own tokio task with a fixed-interval timer.
//!   The first cycle runs immediately; later cycles run on the interval.
//! - Cancelling a session prevents future cycles but never aborts a cycle
//!   that is already in flight.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use payment_orders::lifecycle::OrderSystem;
//! use payment_orders::model::OrderCreate;
//!
//! let system = OrderSystem::new();
//!
//! let summary = system.order_client.create_order(OrderCreate::default()).await?;
//! let status = system.order_client.query_order(summary.order_id.clone()).await?;
//! println!("{}: {}", status.order_id, status.status);
//!
//! system.shutdown().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Tour
//!
//! - [`framework`] - the generic resource actor: entity trait, message loop,
//!   typed client, and a mock client for tests.
//! - [`model`] - the `Order` entity, its status machine, and the views
//!   returned to callers.
//! - [`order_actor`] - wires `Order` into the framework and defines the
//!   order error taxonomy.
//! - [`gateway`] - the seams toward the payment provider: clock, outcome
//!   resolver, and the simulated round-trip latency.
//! - [`clients`] - the `OrderClient` facade: `create_order`, `query_order`,
//!   `start_polling`.
//! - [`polling`] - the polling state machine and its controller handle.
//! - [`config`] - merchant and tuning knobs with a builder.
//! - [`lifecycle`] - system startup, shutdown, and tracing setup.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test
//! RUST_LOG=debug cargo test -- --nocapture
//! ```

pub mod clients;
pub mod config;
pub mod framework;
pub mod gateway;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod polling;
