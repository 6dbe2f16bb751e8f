//! Host-facing payment gateway port.
//!
//! This is the surface the booking system talks to. It hides which
//! checkout flow is configured and how captures are reconciled.

use async_trait::async_trait;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::domain::foundation::{DomainError, ReservationId};
use crate::domain::payment::{
    PaymentError, RefundResult, TransmissionHeaders, WebhookRejection,
};
use crate::domain::reservation::Reservation;

/// Result of starting a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentIntent {
    /// Processor order id.
    pub id: String,
    /// Approval page to send the payer to. `None` in the inline SDK flow.
    pub redirect_to: Option<String>,
}

/// Query parameters of the payer's return from the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectBackRequest {
    pub reservation_id: ReservationId,
    /// Order id the processor appends as `token`.
    pub token: Option<String>,
    pub cancelled: bool,
    pub client_ip: String,
}

/// Payment status reported to the booking system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectStatus {
    Succeeded,
    Failed,
    Pending,
}

impl Serialize for RedirectStatus {
    /// `true`, `false` or `"pending"`.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RedirectStatus::Succeeded => serializer.serialize_bool(true),
            RedirectStatus::Failed => serializer.serialize_bool(false),
            RedirectStatus::Pending => serializer.serialize_str("pending"),
        }
    }
}

/// Result of handling the payer's return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectBackResult {
    pub status: RedirectStatus,
    pub reservation: Reservation,
}

/// Acknowledgement of a webhook delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookAck {
    /// A reservation transition was applied.
    Processed,
    /// Valid delivery with nothing to do.
    Ignored,
}

/// Errors surfaced to the booking system.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Reservation {0} not found")]
    ReservationNotFound(ReservationId),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Storage(#[from] DomainError),
}

/// Port implemented by the PayPal gateway and consumed by the host system.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a processor order for the reservation.
    async fn payment_intent(&self, reservation: &Reservation)
        -> Result<PaymentIntent, GatewayError>;

    /// Refunds the reservation's settled capture.
    ///
    /// # Errors
    ///
    /// Every failure is reported as `RefundFailed`.
    async fn refund(&self, reservation: &Reservation) -> Result<RefundResult, PaymentError>;

    /// Handles the payer returning from the processor.
    async fn handle_redirect_back(
        &self,
        request: RedirectBackRequest,
    ) -> Result<RedirectBackResult, GatewayError>;

    /// Verifies and applies a webhook delivery.
    async fn verify_payment(
        &self,
        headers: &TransmissionHeaders,
        raw_body: &[u8],
    ) -> Result<WebhookAck, WebhookRejection>;

    /// The processor notifies settlement through webhooks.
    fn supports_webhooks(&self) -> bool;

    /// Whether payment intents carry a redirect target.
    fn redirects_for_payment(&self) -> bool;

    /// Client id exposed to the browser SDK.
    fn public_key(&self) -> String;

    /// Configured webhook id, if any.
    fn webhook_secret(&self) -> Option<String>;
}
