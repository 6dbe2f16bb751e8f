//! CaptureOrderHandler - server-side capture for the inline SDK flow.
//!
//! The client SDK reports the approved order id; the reservation is found
//! through its recorded pending order and run through the reconciler.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ReservationId};
use crate::ports::ReservationRepository;

use super::{CaptureOutcome, CaptureReconciler, ReconcileCaptureCommand, RejectionReason};

/// Command to capture an approved order.
#[derive(Debug, Clone)]
pub struct CaptureOrderCommand {
    pub order_id: String,
    pub client_ip: String,
}

/// Result of a capture request, one variant per response shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOrderResult {
    /// 200: captured and recorded.
    Completed {
        capture_id: String,
        reservation_id: ReservationId,
    },
    /// 400: the processor did not complete the capture.
    NotCompleted { status: String },
    /// 403: no reservation holds this order as its pending order.
    UnknownOrder,
    /// 403: binding validation failed.
    InvalidOrder,
    /// 429
    RateLimited,
    /// 500: processor unreachable or capture call failed.
    Failed { message: String },
}

pub struct CaptureOrderHandler {
    reservations: Arc<dyn ReservationRepository>,
    reconciler: Arc<CaptureReconciler>,
}

impl CaptureOrderHandler {
    pub fn new(
        reservations: Arc<dyn ReservationRepository>,
        reconciler: Arc<CaptureReconciler>,
    ) -> Self {
        Self {
            reservations,
            reconciler,
        }
    }

    pub async fn handle(&self, cmd: CaptureOrderCommand) -> Result<CaptureOrderResult, DomainError> {
        let Some(reservation) = self
            .reservations
            .find_by_pending_order_id(&cmd.order_id)
            .await?
        else {
            tracing::warn!(
                ip = %cmd.client_ip,
                order_id = %cmd.order_id,
                "PayPal capture for unknown order"
            );
            return Ok(CaptureOrderResult::UnknownOrder);
        };

        let outcome = self
            .reconciler
            .reconcile(ReconcileCaptureCommand {
                reservation,
                token: Some(cmd.order_id),
                cancelled: false,
                client_ip: cmd.client_ip,
            })
            .await?;

        Ok(match outcome {
            CaptureOutcome::Captured {
                capture_id,
                reservation,
            } => CaptureOrderResult::Completed {
                capture_id,
                reservation_id: reservation.id,
            },
            CaptureOutcome::PendingSettlement { .. } => CaptureOrderResult::NotCompleted {
                status: "PENDING".to_string(),
            },
            CaptureOutcome::Rejected { reason, .. } => match reason {
                RejectionReason::RateLimited => CaptureOrderResult::RateLimited,
                RejectionReason::TokenMismatch
                | RejectionReason::ReferenceMismatch
                | RejectionReason::Cancelled
                | RejectionReason::MissingToken => CaptureOrderResult::InvalidOrder,
                RejectionReason::Upstream(_) | RejectionReason::CaptureFailed(_) => {
                    CaptureOrderResult::Failed {
                        message: "Payment processor request failed".to_string(),
                    }
                }
                RejectionReason::UnexpectedStatus(status) => {
                    CaptureOrderResult::NotCompleted { status }
                }
                RejectionReason::MalformedResponse
                | RejectionReason::SettlementConflict { .. } => CaptureOrderResult::NotCompleted {
                    status: "COMPLETED".to_string(),
                },
            },
        })
    }
}
