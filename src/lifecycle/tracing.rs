//! # Observability & Tracing
//!
//! Structured logging for the whole service, configured once at startup.
//!
//! The actor loop logs every create/get/action with structured fields, the
//! client methods are `#[instrument]`ed, and polling sessions carry their
//! order id on every event. Verbosity is controlled via `RUST_LOG`:
//!
//! ```bash
//! # Compact logs
//! RUST_LOG=info cargo run
//!
//! # Full payloads at function entry points
//! RUST_LOG=debug cargo run
//!
//! # Filter to specific modules
//! RUST_LOG=payment_orders::polling=debug cargo run
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Don't show module paths - we use entity_type instead
        .compact()
        .init();
}
