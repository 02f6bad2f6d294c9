//! Error types for the order actor.

use thiserror::Error;

/// Errors that can occur during order operations.
///
/// `PaymentFailed` and `VerificationTimeout` are business outcomes rather
/// than faults: they end a polling session but leave the process healthy.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// No order with the given id exists in the store.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The payment reached the failed state.
    #[error("Payment failed for order {0}")]
    PaymentFailed(String),

    /// Polling exhausted its attempts while the order was still pending.
    #[error("Payment verification timed out after {attempts} attempts")]
    VerificationTimeout { attempts: u32 },

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for OrderError {
    fn from(msg: String) -> Self {
        OrderError::ActorCommunicationError(msg)
    }
}
