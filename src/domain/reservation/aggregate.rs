//! Reservation aggregate, as far as payment is concerned.
//!
//! The host booking system owns reservations. The gateway only reads and
//! writes the payment-related fields.
//!
//! # Invariants
//!
//! - At most one `pending_order_id` at a time; a new order replaces the old one.
//! - `payment_id` is written once. A second settlement with the same capture
//!   id is a no-op, a different capture id is a conflict.

use crate::domain::foundation::{DomainError, ErrorCode, ReservationId, StateMachine, Timestamp};
use crate::domain::payment::Money;
use serde::{Deserialize, Serialize};

use super::ReservationStatus;

/// Outcome of writing a capture id to a reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleOutcome {
    /// `payment_id` was empty and is now set.
    Settled,
    /// `payment_id` already held this capture id.
    AlreadySettled,
    /// `payment_id` holds a different capture id; nothing was written.
    Conflict { existing: String },
}

/// Reservation aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub status: ReservationStatus,
    pub amount: Money,
    pub description: String,
    /// Processor capture id once settled.
    pub payment_id: Option<String>,
    /// Processor order id created for this reservation, cleared on settlement.
    pub pending_order_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Reservation {
    /// Creates a reservation awaiting payment.
    pub fn new_pending(id: ReservationId, amount: Money, description: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            status: ReservationStatus::Pending,
            amount,
            description: description.into(),
            payment_id: None,
            pending_order_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// True once a capture id has been recorded.
    pub fn is_settled(&self) -> bool {
        self.payment_id.is_some()
    }

    /// Records the order created for this reservation.
    pub fn record_pending_order(&mut self, order_id: impl Into<String>) {
        self.pending_order_id = Some(order_id.into());
        self.updated_at = Timestamp::now();
    }

    /// Check-then-set of `payment_id`, clearing `pending_order_id` on success.
    pub fn settle(&mut self, capture_id: &str) -> SettleOutcome {
        match self.payment_id.as_deref() {
            None => {
                self.payment_id = Some(capture_id.to_string());
                self.pending_order_id = None;
                self.updated_at = Timestamp::now();
                SettleOutcome::Settled
            }
            Some(existing) if existing == capture_id => {
                self.pending_order_id = None;
                SettleOutcome::AlreadySettled
            }
            Some(existing) => SettleOutcome::Conflict {
                existing: existing.to_string(),
            },
        }
    }

    /// Marks the reservation confirmed.
    ///
    /// # Errors
    ///
    /// Returns error if transition from current status is not allowed.
    pub fn confirm(&mut self) -> Result<(), DomainError> {
        self.transition_to(ReservationStatus::Confirmed)
    }

    /// Marks the reservation cancelled.
    ///
    /// # Errors
    ///
    /// Returns error if transition from current status is not allowed.
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        self.transition_to(ReservationStatus::Cancelled)
    }

    fn transition_to(&mut self, target: ReservationStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Cannot transition reservation from {:?} to {:?}",
                    self.status, target
                ),
            )
            .with_detail("reservation_id", self.id.as_str())
        })?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
