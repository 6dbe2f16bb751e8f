//! In-memory reservation event publisher.
//!
//! Records every event for assertions and logs it, so a deployment without
//! a message bus still leaves an audit trail of reservation transitions.

use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::foundation::DomainError;
use crate::domain::reservation::ReservationEvent;
use crate::ports::ReservationEventPublisher;

/// In-memory publisher.
///
/// ```ignore
/// let publisher = Arc::new(InMemoryEventPublisher::new());
/// publisher.publish(ReservationEvent::confirmed(id, "CAP-1")).await?;
/// assert!(publisher.has_event("reservation.confirmed"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventPublisher {
    published: Arc<RwLock<Vec<ReservationEvent>>>,
}

impl InMemoryEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Returns all published events.
    pub fn published_events(&self) -> Vec<ReservationEvent> {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns count of published events.
    pub fn event_count(&self) -> usize {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Checks if a specific event type was published.
    pub fn has_event(&self, event_type: &str) -> bool {
        self.published_events()
            .iter()
            .any(|e| e.event_type() == event_type)
    }
}

#[async_trait]
impl ReservationEventPublisher for InMemoryEventPublisher {
    async fn publish(&self, event: ReservationEvent) -> Result<(), DomainError> {
        tracing::info!(
            event_id = %event.event_id(),
            event_type = event.event_type(),
            reservation_id = %event.reservation_id(),
            "Reservation event published"
        );
        self.published
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        Ok(())
    }
}
