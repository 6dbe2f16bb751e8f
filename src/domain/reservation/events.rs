//! Reservation events published after webhook-driven transitions.

use crate::domain::foundation::{EventId, ReservationId, Timestamp};
use serde::{Deserialize, Serialize};

/// Why a reservation was cancelled by the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationReason {
    CaptureDenied,
    CaptureRefunded,
}

/// Events the host booking system subscribes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationEvent {
    /// State transition: Pending -> Confirmed.
    ///
    /// Trigger: `PAYMENT.CAPTURE.COMPLETED` webhook
    Confirmed {
        event_id: EventId,
        reservation_id: ReservationId,
        capture_id: String,
        occurred_at: Timestamp,
    },

    /// State transition: Pending -> Cancelled.
    ///
    /// Trigger: `PAYMENT.CAPTURE.DENIED` or `PAYMENT.CAPTURE.REFUNDED` webhook
    Cancelled {
        event_id: EventId,
        reservation_id: ReservationId,
        capture_id: String,
        reason: CancellationReason,
        occurred_at: Timestamp,
    },
}

impl ReservationEvent {
    pub fn confirmed(reservation_id: ReservationId, capture_id: impl Into<String>) -> Self {
        ReservationEvent::Confirmed {
            event_id: EventId::new(),
            reservation_id,
            capture_id: capture_id.into(),
            occurred_at: Timestamp::now(),
        }
    }

    pub fn cancelled(
        reservation_id: ReservationId,
        capture_id: impl Into<String>,
        reason: CancellationReason,
    ) -> Self {
        ReservationEvent::Cancelled {
            event_id: EventId::new(),
            reservation_id,
            capture_id: capture_id.into(),
            reason,
            occurred_at: Timestamp::now(),
        }
    }

    /// Returns the event type string for routing and filtering.
    pub fn event_type(&self) -> &'static str {
        match self {
            ReservationEvent::Confirmed { .. } => "reservation.confirmed",
            ReservationEvent::Cancelled { .. } => "reservation.cancelled",
        }
    }

    pub fn reservation_id(&self) -> &ReservationId {
        match self {
            ReservationEvent::Confirmed { reservation_id, .. }
            | ReservationEvent::Cancelled { reservation_id, .. } => reservation_id,
        }
    }

    pub fn event_id(&self) -> EventId {
        match self {
            ReservationEvent::Confirmed { event_id, .. }
            | ReservationEvent::Cancelled { event_id, .. } => *event_id,
        }
    }
}
