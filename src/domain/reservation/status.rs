//! Reservation status state machine.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a reservation as seen by the payment gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    /// Awaiting payment.
    Pending,

    /// Payment settled and confirmed by the processor.
    Confirmed,

    /// Payment denied, refunded, or the reservation was withdrawn.
    Cancelled,

    /// Checkout window elapsed without payment.
    Expired,

    /// Settled payment was returned to the payer.
    Refunded,
}

impl ReservationStatus {
    /// Database/text form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "PENDING",
            ReservationStatus::Confirmed => "CONFIRMED",
            ReservationStatus::Cancelled => "CANCELLED",
            ReservationStatus::Expired => "EXPIRED",
            ReservationStatus::Refunded => "REFUNDED",
        }
    }

    /// Parses the text form produced by [`as_str`](Self::as_str).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "PENDING" => Some(ReservationStatus::Pending),
            "CONFIRMED" => Some(ReservationStatus::Confirmed),
            "CANCELLED" => Some(ReservationStatus::Cancelled),
            "EXPIRED" => Some(ReservationStatus::Expired),
            "REFUNDED" => Some(ReservationStatus::Refunded),
            _ => None,
        }
    }
}

impl StateMachine for ReservationStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, target),
            // From PENDING
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Pending, Expired)
            // From CONFIRMED
                | (Confirmed, Refunded)
                | (Confirmed, Cancelled)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ReservationStatus::*;
        match self {
            Pending => vec![Confirmed, Cancelled, Expired],
            Confirmed => vec![Refunded, Cancelled],
            Cancelled | Expired | Refunded => vec![],
        }
    }
}
