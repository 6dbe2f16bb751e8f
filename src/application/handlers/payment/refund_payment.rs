//! RefundPaymentHandler - refunds a reservation's settled capture in full.

use std::sync::Arc;

use crate::domain::payment::{PaymentError, RefundResult};
use crate::domain::reservation::Reservation;
use crate::ports::OrderLifecycleClient;

pub struct RefundPaymentHandler {
    orders: Arc<dyn OrderLifecycleClient>,
}

impl RefundPaymentHandler {
    pub fn new(orders: Arc<dyn OrderLifecycleClient>) -> Self {
        Self { orders }
    }

    /// # Errors
    ///
    /// Every failure, including a reservation without capture, is
    /// `RefundFailed`.
    pub async fn handle(&self, reservation: &Reservation) -> Result<RefundResult, PaymentError> {
        let Some(capture_id) = reservation.payment_id.as_deref() else {
            return Err(PaymentError::refund_failed(format!(
                "reservation {} has no captured payment",
                reservation.id
            )));
        };

        match self.orders.refund_capture(capture_id, &reservation.amount).await {
            Ok(result) => {
                tracing::info!(
                    reservation_id = %reservation.id,
                    capture_id = %capture_id,
                    refund_id = %result.refund_id,
                    status = %result.status,
                    "PayPal refund issued"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::error!(
                    reservation_id = %reservation.id,
                    capture_id = %capture_id,
                    error = %e,
                    "PayPal refund failed"
                );
                Err(PaymentError::refund_failed(e.message))
            }
        }
    }
}
