//! In-memory reservation store for tests and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, ReservationId, Timestamp};
use crate::domain::reservation::{Reservation, ReservationStatus, SettleOutcome};
use crate::ports::ReservationRepository;

/// In-memory implementation of [`ReservationRepository`].
///
/// Counts lookups so tests can assert that a request never touched storage,
/// and can be switched into a failing mode.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReservationRepository {
    reservations: Arc<RwLock<HashMap<ReservationId, Reservation>>>,
    lookups: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryReservationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a reservation.
    pub async fn insert(&self, reservation: Reservation) {
        self.reservations
            .write()
            .await
            .insert(reservation.id.clone(), reservation);
    }

    /// Current stored copy of a reservation.
    pub async fn get(&self, id: &ReservationId) -> Option<Reservation> {
        self.reservations.read().await.get(id).cloned()
    }

    /// Number of `find_*` calls made so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Make every operation fail with `DatabaseError`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::database("reservation store unavailable"));
        }
        Ok(())
    }

    async fn find_where<F>(&self, predicate: F) -> Result<Option<Reservation>, DomainError>
    where
        F: Fn(&Reservation) -> bool + Send,
    {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self
            .reservations
            .read()
            .await
            .values()
            .find(|r| predicate(*r))
            .cloned())
    }
}

fn not_found(id: &ReservationId) -> DomainError {
    DomainError::new(ErrorCode::ReservationNotFound, "Reservation not found")
        .with_detail("reservation_id", id.as_str())
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn find_by_id(&self, id: &ReservationId) -> Result<Option<Reservation>, DomainError> {
        self.find_where(|r| &r.id == id).await
    }

    async fn find_by_payment_id(
        &self,
        capture_id: &str,
    ) -> Result<Option<Reservation>, DomainError> {
        self.find_where(|r| r.payment_id.as_deref() == Some(capture_id))
            .await
    }

    async fn find_by_pending_order_id(
        &self,
        order_id: &str,
    ) -> Result<Option<Reservation>, DomainError> {
        self.find_where(|r| r.pending_order_id.as_deref() == Some(order_id))
            .await
    }

    async fn record_pending_order(
        &self,
        id: &ReservationId,
        order_id: &str,
    ) -> Result<(), DomainError> {
        self.check_available()?;
        let mut reservations = self.reservations.write().await;
        let reservation = reservations.get_mut(id).ok_or_else(|| not_found(id))?;
        reservation.record_pending_order(order_id);
        Ok(())
    }

    async fn settle_payment(
        &self,
        id: &ReservationId,
        capture_id: &str,
    ) -> Result<SettleOutcome, DomainError> {
        self.check_available()?;
        let mut reservations = self.reservations.write().await;
        let reservation = reservations.get_mut(id).ok_or_else(|| not_found(id))?;
        Ok(reservation.settle(capture_id))
    }

    async fn update_status(
        &self,
        id: &ReservationId,
        status: ReservationStatus,
    ) -> Result<(), DomainError> {
        self.check_available()?;
        let mut reservations = self.reservations.write().await;
        let reservation = reservations.get_mut(id).ok_or_else(|| not_found(id))?;
        reservation.status = status;
        reservation.updated_at = Timestamp::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::Money;

    fn reservation(id: &str) -> Reservation {
        Reservation::new_pending(
            ReservationId::new(id).unwrap(),
            Money::new(5_000, "USD").unwrap(),
            "Kayak tour",
        )
    }

    #[tokio::test]
    async fn finds_by_pending_order_and_payment_id() {
        let repo = InMemoryReservationRepository::new();
        repo.insert(reservation("42")).await;
        let id = ReservationId::new("42").unwrap();

        repo.record_pending_order(&id, "ORDER-1").await.unwrap();
        let found = repo.find_by_pending_order_id("ORDER-1").await.unwrap();
        assert_eq!(found.map(|r| r.id), Some(id.clone()));

        repo.settle_payment(&id, "CAP-1").await.unwrap();
        assert!(repo.find_by_pending_order_id("ORDER-1").await.unwrap().is_none());
        assert!(repo.find_by_payment_id("CAP-1").await.unwrap().is_some());
        assert_eq!(repo.lookup_count(), 3);
    }

    #[tokio::test]
    async fn settle_is_conditional() {
        let repo = InMemoryReservationRepository::new();
        repo.insert(reservation("42")).await;
        let id = ReservationId::new("42").unwrap();

        assert_eq!(repo.settle_payment(&id, "CAP-1").await.unwrap(), SettleOutcome::Settled);
        assert_eq!(
            repo.settle_payment(&id, "CAP-1").await.unwrap(),
            SettleOutcome::AlreadySettled
        );
        assert_eq!(
            repo.settle_payment(&id, "CAP-2").await.unwrap(),
            SettleOutcome::Conflict {
                existing: "CAP-1".into()
            }
        );
    }

    #[tokio::test]
    async fn missing_reservation_is_not_found() {
        let repo = InMemoryReservationRepository::new();
        let id = ReservationId::new("404").unwrap();

        let err = repo.settle_payment(&id, "CAP-1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationNotFound);
        let err = repo
            .update_status(&id, ReservationStatus::Confirmed)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationNotFound);
    }

    #[tokio::test]
    async fn unavailable_store_fails_with_database_error() {
        let repo = InMemoryReservationRepository::new();
        repo.set_unavailable(true);

        let err = repo.find_by_payment_id("CAP-1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
