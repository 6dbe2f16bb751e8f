//! CaptureReconciler - validates a reported order against a reservation
//! and captures it.
//!
//! Order of checks, each able to reject before the next runs:
//!
//! 1. payer cancelled: reject, no calls, no penalty
//! 2. no token: reject, no calls
//! 3. rate limit reached: reject, no processor call
//! 4. token differs from the recorded `pending_order_id`: heavy penalty, reject
//! 5. `get_order` fails: reject, no penalty
//! 6. order `reference_id` differs from the reservation id: heavy penalty, reject
//! 7. one normal hit, then `capture_order`
//! 8. COMPLETED with a capture id settles the reservation and clears the bucket;
//!    PENDING keeps the hit; anything else rejects

use std::sync::Arc;

use crate::adapters::rate_limiter::CaptureRateLimitConfig;
use crate::domain::foundation::{DomainError, StateMachine};
use crate::domain::payment::{CaptureState, OrderStatus};
use crate::domain::reservation::{Reservation, SettleOutcome};
use crate::ports::{OrderLifecycleClient, RateLimitKey, RateLimiter, ReservationRepository};

/// Command to reconcile a reported order with a reservation.
#[derive(Debug, Clone)]
pub struct ReconcileCaptureCommand {
    pub reservation: Reservation,
    /// Order id reported by the redirect or the client SDK.
    pub token: Option<String>,
    pub cancelled: bool,
    pub client_ip: String,
}

/// Why a capture attempt was rejected. Logged, never shown to the payer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    Cancelled,
    MissingToken,
    RateLimited,
    /// Token differs from the order recorded at creation.
    TokenMismatch,
    /// Order belongs to another reservation.
    ReferenceMismatch,
    /// `get_order` failed.
    Upstream(String),
    /// `capture_order` failed.
    CaptureFailed(String),
    /// COMPLETED without a capture id.
    MalformedResponse,
    /// Capture returned a status other than COMPLETED or PENDING.
    UnexpectedStatus(String),
    /// Reservation already holds a different capture id.
    SettlementConflict { existing: String },
}

impl RejectionReason {
    /// True for reference or token mismatches.
    pub fn is_binding_mismatch(&self) -> bool {
        matches!(
            self,
            RejectionReason::TokenMismatch | RejectionReason::ReferenceMismatch
        )
    }
}

/// Terminal result of a capture attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Captured {
        capture_id: String,
        reservation: Reservation,
    },
    PendingSettlement {
        reservation: Reservation,
    },
    Rejected {
        reason: RejectionReason,
        reservation: Reservation,
    },
}

impl CaptureOutcome {
    pub fn state(&self) -> CaptureState {
        match self {
            CaptureOutcome::Captured { .. } => CaptureState::Captured,
            CaptureOutcome::PendingSettlement { .. } => CaptureState::PendingSettlement,
            CaptureOutcome::Rejected { .. } => CaptureState::Rejected,
        }
    }

    pub fn reservation(&self) -> &Reservation {
        match self {
            CaptureOutcome::Captured { reservation, .. }
            | CaptureOutcome::PendingSettlement { reservation }
            | CaptureOutcome::Rejected { reservation, .. } => reservation,
        }
    }

    pub fn into_reservation(self) -> Reservation {
        match self {
            CaptureOutcome::Captured { reservation, .. }
            | CaptureOutcome::PendingSettlement { reservation }
            | CaptureOutcome::Rejected { reservation, .. } => reservation,
        }
    }
}

/// Runs the capture reconciliation protocol.
pub struct CaptureReconciler {
    orders: Arc<dyn OrderLifecycleClient>,
    reservations: Arc<dyn ReservationRepository>,
    rate_limiter: Arc<dyn RateLimiter>,
    limits: CaptureRateLimitConfig,
}

/// Tracks the attempt's state and logs each transition.
struct Attempt<'a> {
    state: CaptureState,
    reservation_id: &'a str,
}

impl<'a> Attempt<'a> {
    fn advance(&mut self, next: CaptureState) {
        match self.state.transition_to(next) {
            Ok(state) => {
                tracing::debug!(
                    reservation_id = self.reservation_id,
                    from = ?self.state,
                    to = ?state,
                    "Capture state transition"
                );
                self.state = state;
            }
            Err(e) => {
                tracing::error!(reservation_id = self.reservation_id, error = %e, "Capture state machine violated");
                self.state = CaptureState::Rejected;
            }
        }
    }
}

impl CaptureReconciler {
    pub fn new(
        orders: Arc<dyn OrderLifecycleClient>,
        reservations: Arc<dyn ReservationRepository>,
        rate_limiter: Arc<dyn RateLimiter>,
        limits: CaptureRateLimitConfig,
    ) -> Self {
        Self {
            orders,
            reservations,
            rate_limiter,
            limits,
        }
    }

    /// # Errors
    ///
    /// Only when the reservation store fails after a successful capture.
    /// Every protocol rejection is an `Ok(CaptureOutcome::Rejected)`.
    pub async fn reconcile(
        &self,
        cmd: ReconcileCaptureCommand,
    ) -> Result<CaptureOutcome, DomainError> {
        let ReconcileCaptureCommand {
            mut reservation,
            token,
            cancelled,
            client_ip,
        } = cmd;
        let reservation_key = reservation.id.to_string();
        let mut attempt = Attempt {
            state: CaptureState::PendingApproval,
            reservation_id: &reservation_key,
        };

        macro_rules! reject {
            ($reason:expr) => {{
                attempt.advance(CaptureState::Rejected);
                return Ok(CaptureOutcome::Rejected {
                    reason: $reason,
                    reservation,
                });
            }};
        }

        // 1. Cancellation
        if cancelled {
            tracing::info!(reservation_id = %reservation.id, "PayPal payment cancelled by payer");
            reject!(RejectionReason::Cancelled);
        }

        // 2. Nothing to validate
        let token = match token.filter(|t| !t.trim().is_empty()) {
            Some(token) => token,
            None => reject!(RejectionReason::MissingToken),
        };

        // 3. Rate limit
        let key = RateLimitKey::capture_attempts(&client_ip);
        if self.limit_reached(&key).await {
            tracing::warn!(
                ip = %client_ip,
                reservation_id = %reservation.id,
                "PayPal capture rate limit exceeded"
            );
            reject!(RejectionReason::RateLimited);
        }

        // 4. Token must be the order recorded for this reservation
        if let Some(expected) = reservation.pending_order_id.as_deref() {
            if expected != token {
                tracing::warn!(
                    ip = %client_ip,
                    reservation_id = %reservation.id,
                    presented_order_id = %token,
                    "PayPal token does not match pending order - payment NOT captured"
                );
                self.penalize(&key).await;
                reject!(RejectionReason::TokenMismatch);
            }
        }

        // 5. Fetch the live order
        attempt.advance(CaptureState::ValidatingReference);
        let order = match self.orders.get_order(&token).await {
            Ok(order) => order,
            Err(e) => {
                tracing::error!(
                    reservation_id = %reservation.id,
                    order_id = %token,
                    error = %e,
                    "PayPal get order failed"
                );
                reject!(RejectionReason::Upstream(e.to_string()));
            }
        };

        // 6. Reference binding
        if !reservation.id.matches_reference(order.reference_id()) {
            tracing::warn!(
                ip = %client_ip,
                reservation_id = %reservation.id,
                order_id = %token,
                order_reference_id = ?order.reference_id(),
                "PayPal order reference_id mismatch - payment NOT captured"
            );
            self.penalize(&key).await;
            reject!(RejectionReason::ReferenceMismatch);
        }

        // 7. Capture
        self.hit(&key, 1).await;
        attempt.advance(CaptureState::Capturing);
        let captured = match self.orders.capture_order(&token).await {
            Ok(captured) => captured,
            Err(e) => {
                tracing::error!(
                    reservation_id = %reservation.id,
                    order_id = %token,
                    error = %e,
                    "PayPal capture failed"
                );
                reject!(RejectionReason::CaptureFailed(e.to_string()));
            }
        };

        // 8. Interpret the capture
        match &captured.status {
            OrderStatus::Completed => {}
            OrderStatus::Pending => {
                tracing::info!(
                    reservation_id = %reservation.id,
                    order_id = %token,
                    "PayPal capture pending settlement"
                );
                attempt.advance(CaptureState::PendingSettlement);
                return Ok(CaptureOutcome::PendingSettlement { reservation });
            }
            other => {
                tracing::warn!(
                    reservation_id = %reservation.id,
                    order_id = %token,
                    status = %other,
                    "PayPal capture did not complete as expected"
                );
                reject!(RejectionReason::UnexpectedStatus(other.to_string()));
            }
        }

        let capture_id = match captured.first_capture_id() {
            Some(id) => id.to_string(),
            None => {
                tracing::error!(
                    reservation_id = %reservation.id,
                    order_id = %token,
                    captures_count = captured
                        .purchase_units
                        .first()
                        .map(|u| u.captures.len())
                        .unwrap_or(0),
                    "PayPal capture completed but no capture ID found"
                );
                reject!(RejectionReason::MalformedResponse);
            }
        };

        let settled = self
            .reservations
            .settle_payment(&reservation.id, &capture_id)
            .await
            .map_err(|e| {
                tracing::error!(
                    reservation_id = %reservation.id,
                    capture_id = %capture_id,
                    error = %e,
                    "PayPal payment captured but not recorded"
                );
                e
            })?;

        match settled {
            SettleOutcome::Settled | SettleOutcome::AlreadySettled => {
                reservation.settle(&capture_id);
                self.clear(&key).await;
                attempt.advance(CaptureState::Captured);
                tracing::info!(
                    reservation_id = %reservation.id,
                    order_id = %token,
                    capture_id = %capture_id,
                    "PayPal payment captured successfully"
                );
                Ok(CaptureOutcome::Captured {
                    capture_id,
                    reservation,
                })
            }
            SettleOutcome::Conflict { existing } => {
                tracing::error!(
                    reservation_id = %reservation.id,
                    capture_id = %capture_id,
                    existing_capture_id = %existing,
                    "Reservation already settled with a different capture"
                );
                reject!(RejectionReason::SettlementConflict { existing });
            }
        }
    }

    // ─── Rate limiter access; backend failures fail open ───

    async fn limit_reached(&self, key: &RateLimitKey) -> bool {
        match self
            .rate_limiter
            .too_many_attempts(key, self.limits.max_attempts)
            .await
        {
            Ok(reached) => reached,
            Err(e) => {
                tracing::warn!(error = %e, "Rate limiter unavailable, allowing capture attempt");
                false
            }
        }
    }

    async fn hit(&self, key: &RateLimitKey, weight: u32) {
        if let Err(e) = self.rate_limiter.hit(key, weight, self.limits.decay()).await {
            tracing::warn!(error = %e, weight, "Failed to record capture attempt");
        }
    }

    async fn penalize(&self, key: &RateLimitKey) {
        self.hit(key, self.limits.mismatch_penalty).await;
    }

    async fn clear(&self, key: &RateLimitKey) {
        if let Err(e) = self.rate_limiter.clear(key).await {
            tracing::warn!(error = %e, "Failed to clear capture attempts");
        }
    }
}
