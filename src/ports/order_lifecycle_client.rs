//! Order lifecycle port: create, get, capture and refund against the processor.
//!
//! Implementations map requests and responses only. They never retry;
//! retry policy belongs to the caller.

use async_trait::async_trait;

use crate::domain::payment::{CreatedOrder, Money, NewOrder, Order, PaymentError, RefundResult};

/// Port for processor order operations.
///
/// All methods fail with `Upstream` (or `Timeout`) carrying the processor's
/// raw error on non-success responses or transport failure.
#[async_trait]
pub trait OrderLifecycleClient: Send + Sync {
    /// Creates an order bound to `order.reference_id`.
    async fn create_order(&self, order: &NewOrder) -> Result<CreatedOrder, PaymentError>;

    /// Fetches an order with its purchase units.
    async fn get_order(&self, order_id: &str) -> Result<Order, PaymentError>;

    /// Captures an approved order.
    async fn capture_order(&self, order_id: &str) -> Result<Order, PaymentError>;

    /// Refunds a capture for the given amount.
    async fn refund_capture(
        &self,
        capture_id: &str,
        amount: &Money,
    ) -> Result<RefundResult, PaymentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn OrderLifecycleClient) {}
}
