//! HandleRedirectBackHandler - resolves the payer's return from PayPal
//! into a payment status for the booking system.

use std::sync::Arc;

use crate::domain::payment::PaymentFlowMode;
use crate::ports::{
    GatewayError, RedirectBackRequest, RedirectBackResult, RedirectStatus, ReservationRepository,
};

use super::{CaptureOutcome, CaptureReconciler, ReconcileCaptureCommand};

pub struct HandleRedirectBackHandler {
    reservations: Arc<dyn ReservationRepository>,
    reconciler: Arc<CaptureReconciler>,
    flow_mode: PaymentFlowMode,
}

impl HandleRedirectBackHandler {
    pub fn new(
        reservations: Arc<dyn ReservationRepository>,
        reconciler: Arc<CaptureReconciler>,
        flow_mode: PaymentFlowMode,
    ) -> Self {
        Self {
            reservations,
            reconciler,
            flow_mode,
        }
    }

    pub async fn handle(
        &self,
        request: RedirectBackRequest,
    ) -> Result<RedirectBackResult, GatewayError> {
        let reservation = self
            .reservations
            .find_by_id(&request.reservation_id)
            .await?
            .ok_or_else(|| GatewayError::ReservationNotFound(request.reservation_id.clone()))?;

        match self.flow_mode {
            PaymentFlowMode::Redirect => {
                let outcome = self
                    .reconciler
                    .reconcile(ReconcileCaptureCommand {
                        reservation,
                        token: request.token,
                        cancelled: request.cancelled,
                        client_ip: request.client_ip,
                    })
                    .await?;

                let status = match &outcome {
                    CaptureOutcome::Captured { .. } => RedirectStatus::Succeeded,
                    CaptureOutcome::PendingSettlement { .. } => RedirectStatus::Pending,
                    CaptureOutcome::Rejected { reason, .. } => {
                        tracing::info!(
                            reservation_id = %request.reservation_id,
                            reason = ?reason,
                            "PayPal redirect-back did not capture"
                        );
                        RedirectStatus::Failed
                    }
                };
                Ok(RedirectBackResult {
                    status,
                    reservation: outcome.into_reservation(),
                })
            }
            // The client SDK captured through the capture endpoint already.
            PaymentFlowMode::InlineSdk => {
                let status = if !request.cancelled && reservation.is_settled() {
                    RedirectStatus::Succeeded
                } else {
                    RedirectStatus::Failed
                };
                Ok(RedirectBackResult {
                    status,
                    reservation,
                })
            }
        }
    }
}
