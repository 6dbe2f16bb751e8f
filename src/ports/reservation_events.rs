//! Port for announcing reservation transitions to the host system.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::reservation::ReservationEvent;

/// Publishes reservation events.
///
/// Delivery is at-least-once; subscribers must tolerate duplicates.
#[async_trait]
pub trait ReservationEventPublisher: Send + Sync {
    async fn publish(&self, event: ReservationEvent) -> Result<(), DomainError>;
}
