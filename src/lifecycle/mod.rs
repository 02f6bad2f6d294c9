//! System lifecycle: wiring, startup, shutdown, and tracing setup.

pub mod order_system;
pub mod tracing;

pub use self::order_system::OrderSystem;
pub use self::tracing::setup_tracing;
