//! The payment order entity and the views returned to callers.

use std::fmt::Display;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::gateway::{PaymentOutcome, StatusResolver};

/// Opaque metadata bag attached to an order, passed through untouched.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Amount charged when the caller does not specify one.
pub const DEFAULT_AMOUNT: f64 = 9.90;
/// Subject used when the caller does not specify one.
pub const DEFAULT_SUBJECT: &str = "Child development assessment report";

/// Seconds after creation during which an order always stays pending.
pub(crate) const PENDING_GRACE_SECS: i64 = 10;
/// Seconds after creation past which a still-pending order is failed.
pub(crate) const DECISION_DEADLINE_SECS: i64 = 15;

/// Type-safe identifier for orders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Builds a fresh id from the current epoch milliseconds and a
    /// process-wide sequence number. The sequence keeps ids unique even when
    /// several orders land in the same millisecond.
    pub fn generate(sequence: u64) -> Self {
        Self(format!("ALI{}{:03}", Utc::now().timestamp_millis(), sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OrderId {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

impl From<String> for OrderId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payment state of an order.
///
/// Transitions are forward-only: `Pending` may move to `Success` or
/// `Failed`, and the terminal states never change again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Success,
    Failed,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Success => "success",
            OrderStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// A tracked payment order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub amount: f64,
    pub subject: String,
    pub status: OrderStatus,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
    pub metadata: Metadata,
}

/// Payload for creating a new order. Unset fields fall back to the
/// checkout defaults; amount bounds are deliberately not validated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderCreate {
    pub amount: Option<f64>,
    pub subject: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

/// What the caller gets back from order creation: enough to render the
/// checkout screen and start polling.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub order_id: OrderId,
    pub amount: f64,
    pub subject: String,
    pub qr_code_url: String,
    pub status: OrderStatus,
}

/// Snapshot of an order's stored state at query time.
#[derive(Debug, Clone, Serialize)]
pub struct OrderStatusView {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub amount: f64,
    pub subject: String,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl Order {
    /// Creates a pending order at `now`, applying the checkout defaults for
    /// any field the caller left unset.
    pub fn new(order_id: OrderId, params: OrderCreate, now: DateTime<Utc>) -> Self {
        Self {
            order_id,
            amount: params.amount.unwrap_or(DEFAULT_AMOUNT),
            subject: params.subject.unwrap_or_else(|| DEFAULT_SUBJECT.to_owned()),
            status: OrderStatus::Pending,
            create_time: now,
            update_time: now,
            metadata: params.metadata,
        }
    }

    pub fn status_view(&self) -> OrderStatusView {
        OrderStatusView {
            order_id: self.order_id.clone(),
            status: self.status,
            amount: self.amount,
            subject: self.subject.clone(),
            create_time: self.create_time,
            update_time: self.update_time,
        }
    }

    /// Runs one status-advancement step at `now` and reports whether the
    /// status changed.
    ///
    /// Rules, keyed by seconds elapsed since creation:
    ///
    /// - within the grace window (<= 10 s): no change;
    /// - between the grace window and the decision deadline (<= 15 s): the
    ///   resolver decides success or failure;
    /// - past the deadline (> 15 s): a still-pending order is failed.
    ///
    /// A terminal order is never re-evaluated, so the resolver is consulted
    /// at most once per order. `update_time` is refreshed on every
    /// transition and only on transitions.
    pub(crate) fn advance(&mut self, now: DateTime<Utc>, resolver: &dyn StatusResolver) -> bool {
        if self.status.is_terminal() {
            return false;
        }

        let elapsed = now.signed_duration_since(self.create_time);
        let next = if elapsed > Duration::seconds(DECISION_DEADLINE_SECS) {
            OrderStatus::Failed
        } else if elapsed > Duration::seconds(PENDING_GRACE_SECS) {
            match resolver.resolve(self) {
                PaymentOutcome::Success => OrderStatus::Success,
                PaymentOutcome::Failed => OrderStatus::Failed,
            }
        } else {
            return false;
        };

        self.status = next;
        self.update_time = now;
        true
    }
}
