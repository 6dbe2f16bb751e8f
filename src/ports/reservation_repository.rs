//! Reservation repository port.
//!
//! The host booking system owns reservation rows. This port covers the
//! payment fields and the status column.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ReservationId};
use crate::domain::reservation::{Reservation, ReservationStatus, SettleOutcome};

/// Repository port for the payment-relevant reservation fields.
///
/// Implementations must provide read-after-write consistency on a single
/// reservation.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Find a reservation by its id.
    async fn find_by_id(&self, id: &ReservationId) -> Result<Option<Reservation>, DomainError>;

    /// Find the reservation settled with a processor capture id.
    async fn find_by_payment_id(&self, capture_id: &str)
        -> Result<Option<Reservation>, DomainError>;

    /// Find the reservation awaiting a processor order.
    async fn find_by_pending_order_id(
        &self,
        order_id: &str,
    ) -> Result<Option<Reservation>, DomainError>;

    /// Record the order created for a reservation, replacing any previous one.
    ///
    /// # Errors
    ///
    /// - `ReservationNotFound` if the reservation does not exist
    async fn record_pending_order(
        &self,
        id: &ReservationId,
        order_id: &str,
    ) -> Result<(), DomainError>;

    /// Conditionally write `payment_id` and clear `pending_order_id`.
    ///
    /// Writes only when `payment_id` is empty or already equals `capture_id`;
    /// never overwrites a different capture.
    ///
    /// # Errors
    ///
    /// - `ReservationNotFound` if the reservation does not exist
    async fn settle_payment(
        &self,
        id: &ReservationId,
        capture_id: &str,
    ) -> Result<SettleOutcome, DomainError>;

    /// Persist a new status.
    ///
    /// # Errors
    ///
    /// - `ReservationNotFound` if the reservation does not exist
    async fn update_status(
        &self,
        id: &ReservationId,
        status: ReservationStatus,
    ) -> Result<(), DomainError>;
}
