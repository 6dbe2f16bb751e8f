//! HTTP DTOs for the PayPal endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ReservationId;
use crate::domain::reservation::ReservationStatus;
use crate::ports::{RedirectBackResult, RedirectStatus};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Query string PayPal appends when the payer returns.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutCompleteQuery {
    pub id: String,
    /// PayPal order id.
    pub token: Option<String>,
    pub cancelled: Option<String>,
}

impl CheckoutCompleteQuery {
    /// Any value except an empty one, `0` or `false` counts as cancelled.
    pub fn is_cancelled(&self) -> bool {
        match self.cancelled.as_deref().map(str::trim) {
            None | Some("") | Some("0") => false,
            Some(value) => !value.eq_ignore_ascii_case("false"),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of a successful `POST /capture/{order_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CaptureResponse {
    pub status: String,
    pub capture_id: String,
    pub reservation_id: ReservationId,
}

impl CaptureResponse {
    pub fn completed(capture_id: String, reservation_id: ReservationId) -> Self {
        Self {
            status: "COMPLETED".to_string(),
            capture_id,
            reservation_id,
        }
    }
}

/// Body of `GET /checkout/complete`.
///
/// Only the id and status of the reservation leave the service; the
/// pending order id authorizes captures and must stay server-side.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CheckoutCompleteResponse {
    pub status: RedirectStatus,
    pub reservation: ReservationSummary,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReservationSummary {
    pub id: ReservationId,
    pub status: ReservationStatus,
}

impl From<RedirectBackResult> for CheckoutCompleteResponse {
    fn from(result: RedirectBackResult) -> Self {
        Self {
            status: result.status,
            reservation: ReservationSummary {
                id: result.reservation.id,
                status: result.reservation.status,
            },
        }
    }
}

/// Error body shared by the PayPal endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    /// Processor status when a capture did not complete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status: None,
            message: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
