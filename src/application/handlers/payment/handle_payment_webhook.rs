//! HandlePaymentWebhookHandler - verifies PayPal webhook deliveries and
//! applies capture outcomes to reservations.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ReservationId};
use crate::domain::payment::{
    TransmissionHeaders, WebhookEventKind, WebhookPayload, WebhookRejection,
};
use crate::domain::reservation::{CancellationReason, ReservationEvent, ReservationStatus};
use crate::ports::{ReservationEventPublisher, ReservationRepository, WebhookSignatureVerifier};

/// Command to handle a webhook delivery.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    pub headers: TransmissionHeaders,
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
}

/// Result of webhook processing. Every variant is acknowledged with 200.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlePaymentWebhookResult {
    /// `PAYMENT.CAPTURE.COMPLETED` confirmed the reservation.
    ReservationConfirmed { reservation_id: ReservationId },
    /// `PAYMENT.CAPTURE.DENIED` or `PAYMENT.CAPTURE.REFUNDED` cancelled it.
    ReservationCancelled {
        reservation_id: ReservationId,
        reason: CancellationReason,
    },
    /// Reservation was already confirmed; replayed or out-of-order delivery.
    AlreadyConfirmed { reservation_id: ReservationId },
    /// Reservation status does not allow the transition.
    TransitionRejected { reservation_id: ReservationId },
    /// No reservation holds this capture id.
    UnknownCapture { capture_id: String },
    /// Capture event without `resource.id`.
    MissingCaptureId,
    /// Event type we do not act on.
    Ignored { event_type: String },
}

impl HandlePaymentWebhookResult {
    /// True when a reservation transition was applied.
    pub fn is_processed(&self) -> bool {
        matches!(
            self,
            HandlePaymentWebhookResult::ReservationConfirmed { .. }
                | HandlePaymentWebhookResult::ReservationCancelled { .. }
        )
    }
}

/// Handler for PayPal webhook deliveries.
pub struct HandlePaymentWebhookHandler {
    verifier: Arc<dyn WebhookSignatureVerifier>,
    reservations: Arc<dyn ReservationRepository>,
    publisher: Arc<dyn ReservationEventPublisher>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        verifier: Arc<dyn WebhookSignatureVerifier>,
        reservations: Arc<dyn ReservationRepository>,
        publisher: Arc<dyn ReservationEventPublisher>,
    ) -> Self {
        Self {
            verifier,
            reservations,
            publisher,
        }
    }

    /// # Errors
    ///
    /// - `MalformedPayload` / `InvalidSignature`: 403, nothing looked up
    /// - `Storage`: 500 so the processor retries
    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<HandlePaymentWebhookResult, WebhookRejection> {
        let payload = WebhookPayload::parse(&cmd.payload).map_err(|e| {
            tracing::warn!(error = %e, "PayPal webhook payload rejected");
            e
        })?;

        match self.verifier.verify(&cmd.headers, &cmd.payload).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(event_id = ?payload.event_id, "PayPal webhook signature verification failed");
                return Err(WebhookRejection::InvalidSignature);
            }
            Err(e) => {
                tracing::error!(event_id = ?payload.event_id, error = %e, "PayPal webhook verification error");
                return Err(WebhookRejection::InvalidSignature);
            }
        }

        let reason = match &payload.kind {
            WebhookEventKind::CaptureCompleted => None,
            WebhookEventKind::CaptureDenied => Some(CancellationReason::CaptureDenied),
            WebhookEventKind::CaptureRefunded => Some(CancellationReason::CaptureRefunded),
            WebhookEventKind::Other(event_type) => {
                tracing::debug!(event_type = %event_type, "PayPal webhook ignored");
                return Ok(HandlePaymentWebhookResult::Ignored {
                    event_type: event_type.clone(),
                });
            }
        };

        let Some(capture_id) = payload.resource_id.clone() else {
            tracing::warn!(event_id = ?payload.event_id, "PayPal webhook missing resource id");
            return Ok(HandlePaymentWebhookResult::MissingCaptureId);
        };

        let mut reservation = match self.reservations.find_by_payment_id(&capture_id).await {
            Ok(Some(reservation)) => reservation,
            Ok(None) => {
                tracing::info!(capture_id = %capture_id, "PayPal webhook for unknown capture");
                return Ok(HandlePaymentWebhookResult::UnknownCapture { capture_id });
            }
            Err(e) => return Err(storage(e)),
        };

        if reservation.status == ReservationStatus::Confirmed {
            tracing::info!(
                reservation_id = %reservation.id,
                capture_id = %capture_id,
                "PayPal webhook for already confirmed reservation"
            );
            return Ok(HandlePaymentWebhookResult::AlreadyConfirmed {
                reservation_id: reservation.id,
            });
        }

        let transition = match reason {
            None => reservation.confirm(),
            Some(_) => reservation.cancel(),
        };
        if let Err(e) = transition {
            tracing::warn!(
                reservation_id = %reservation.id,
                capture_id = %capture_id,
                error = %e,
                "PayPal webhook transition not allowed"
            );
            return Ok(HandlePaymentWebhookResult::TransitionRejected {
                reservation_id: reservation.id,
            });
        }

        // Publish precedes the status write; a redelivery after a failed
        // write publishes again.
        let event = match reason {
            None => ReservationEvent::confirmed(reservation.id.clone(), &capture_id),
            Some(reason) => ReservationEvent::cancelled(reservation.id.clone(), &capture_id, reason),
        };
        self.publisher.publish(event).await.map_err(storage)?;
        self.reservations
            .update_status(&reservation.id, reservation.status)
            .await
            .map_err(storage)?;

        tracing::info!(
            reservation_id = %reservation.id,
            capture_id = %capture_id,
            status = reservation.status.as_str(),
            "PayPal webhook applied"
        );

        Ok(match reason {
            None => HandlePaymentWebhookResult::ReservationConfirmed {
                reservation_id: reservation.id,
            },
            Some(reason) => HandlePaymentWebhookResult::ReservationCancelled {
                reservation_id: reservation.id,
                reason,
            },
        })
    }
}

fn storage(e: DomainError) -> WebhookRejection {
    tracing::error!(error = %e, "PayPal webhook storage failure");
    WebhookRejection::Storage(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventPublisher;
    use crate::adapters::paypal::MockSignatureVerifier;
    use crate::adapters::reservation::InMemoryReservationRepository;
    use crate::domain::payment::{Money, PaymentError};
    use crate::domain::reservation::Reservation;
    use axum::http::StatusCode;
    use serde_json::json;

    struct Fixture {
        verifier: MockSignatureVerifier,
        repo: InMemoryReservationRepository,
        publisher: InMemoryEventPublisher,
        handler: HandlePaymentWebhookHandler,
    }

    fn fixture(verifier: MockSignatureVerifier) -> Fixture {
        let repo = InMemoryReservationRepository::new();
        let publisher = InMemoryEventPublisher::new();
        let handler = HandlePaymentWebhookHandler::new(
            Arc::new(verifier.clone()),
            Arc::new(repo.clone()),
            Arc::new(publisher.clone()),
        );
        Fixture {
            verifier,
            repo,
            publisher,
            handler,
        }
    }

    async fn settled_reservation(repo: &InMemoryReservationRepository, id: &str, capture: &str) -> Reservation {
        let mut reservation = Reservation::new_pending(
            ReservationId::new(id).unwrap(),
            Money::new(9_900, "EUR").unwrap(),
            "Double room",
        );
        reservation.settle(capture);
        repo.insert(reservation.clone()).await;
        reservation
    }

    fn headers() -> TransmissionHeaders {
        TransmissionHeaders {
            auth_algo: Some("SHA256withRSA".into()),
            cert_url: Some("https://api.paypal.com/cert".into()),
            transmission_id: Some("tx-1".into()),
            transmission_sig: Some("sig".into()),
            transmission_time: Some("2026-10-18T10:00:00Z".into()),
        }
    }

    fn delivery(event_type: &str, capture_id: &str) -> HandlePaymentWebhookCommand {
        HandlePaymentWebhookCommand {
            headers: headers(),
            payload: json!({
                "id": "WH-1",
                "event_type": event_type,
                "resource": { "id": capture_id }
            })
            .to_string()
            .into_bytes(),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Rejections
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn malformed_body_is_rejected_before_verification() {
        let f = fixture(MockSignatureVerifier::accepting());

        for body in ["not json", "[]", "{}", "\"text\""] {
            let err = f
                .handler
                .handle(HandlePaymentWebhookCommand {
                    headers: headers(),
                    payload: body.as_bytes().to_vec(),
                })
                .await
                .unwrap_err();
            assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        }
        assert_eq!(f.verifier.call_count(), 0);
        assert_eq!(f.repo.lookup_count(), 0);
    }

    #[tokio::test]
    async fn failed_verification_never_touches_reservations() {
        let f = fixture(MockSignatureVerifier::rejecting());
        settled_reservation(&f.repo, "42", "CAP-1").await;

        let err = f
            .handler
            .handle(delivery("PAYMENT.CAPTURE.COMPLETED", "CAP-1"))
            .await
            .unwrap_err();

        assert_eq!(err, WebhookRejection::InvalidSignature);
        assert_eq!(f.repo.lookup_count(), 0);
        assert_eq!(f.publisher.event_count(), 0);
    }

    #[tokio::test]
    async fn verifier_error_is_treated_as_invalid_signature() {
        let f = fixture(MockSignatureVerifier::failing(PaymentError::configuration(
            "webhook id not configured",
        )));

        let err = f
            .handler
            .handle(delivery("PAYMENT.CAPTURE.COMPLETED", "CAP-1"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(f.repo.lookup_count(), 0);
    }

    #[tokio::test]
    async fn storage_failure_asks_for_redelivery() {
        let f = fixture(MockSignatureVerifier::accepting());
        f.repo.set_unavailable(true);

        let err = f
            .handler
            .handle(delivery("PAYMENT.CAPTURE.COMPLETED", "CAP-1"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Acknowledged without action
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn other_event_types_are_ignored() {
        let f = fixture(MockSignatureVerifier::accepting());

        let result = f
            .handler
            .handle(delivery("CHECKOUT.ORDER.APPROVED", "ORDER-1"))
            .await
            .unwrap();

        assert_eq!(
            result,
            HandlePaymentWebhookResult::Ignored {
                event_type: "CHECKOUT.ORDER.APPROVED".into()
            }
        );
        assert_eq!(f.repo.lookup_count(), 0);
    }

    #[tokio::test]
    async fn unknown_capture_is_acknowledged() {
        let f = fixture(MockSignatureVerifier::accepting());

        let result = f
            .handler
            .handle(delivery("PAYMENT.CAPTURE.COMPLETED", "CAP-UNKNOWN"))
            .await
            .unwrap();
        assert!(matches!(result, HandlePaymentWebhookResult::UnknownCapture { .. }));
        assert!(!result.is_processed());
    }

    #[tokio::test]
    async fn capture_event_without_resource_id_is_acknowledged() {
        let f = fixture(MockSignatureVerifier::accepting());

        let result = f
            .handler
            .handle(HandlePaymentWebhookCommand {
                headers: headers(),
                payload: br#"{"event_type":"PAYMENT.CAPTURE.COMPLETED","resource":{}}"#.to_vec(),
            })
            .await
            .unwrap();
        assert_eq!(result, HandlePaymentWebhookResult::MissingCaptureId);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Transitions
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn completed_capture_confirms_once() {
        let f = fixture(MockSignatureVerifier::accepting());
        let reservation = settled_reservation(&f.repo, "42", "CAP-1").await;

        let first = f
            .handler
            .handle(delivery("PAYMENT.CAPTURE.COMPLETED", "CAP-1"))
            .await
            .unwrap();
        let second = f
            .handler
            .handle(delivery("PAYMENT.CAPTURE.COMPLETED", "CAP-1"))
            .await
            .unwrap();

        assert!(first.is_processed());
        assert_eq!(
            second,
            HandlePaymentWebhookResult::AlreadyConfirmed {
                reservation_id: reservation.id.clone()
            }
        );
        assert_eq!(f.publisher.event_count(), 1);
        assert!(f.publisher.has_event("reservation.confirmed"));
        let stored = f.repo.get(&reservation.id).await.unwrap();
        assert_eq!(stored.status, ReservationStatus::Confirmed);
    }

    #[tokio::test]
    async fn denied_capture_cancels_reservation() {
        let f = fixture(MockSignatureVerifier::accepting());
        let reservation = settled_reservation(&f.repo, "42", "CAP-1").await;

        let result = f
            .handler
            .handle(delivery("PAYMENT.CAPTURE.DENIED", "CAP-1"))
            .await
            .unwrap();

        assert_eq!(
            result,
            HandlePaymentWebhookResult::ReservationCancelled {
                reservation_id: reservation.id.clone(),
                reason: CancellationReason::CaptureDenied,
            }
        );
        assert!(f.publisher.has_event("reservation.cancelled"));
        let stored = f.repo.get(&reservation.id).await.unwrap();
        assert_eq!(stored.status, ReservationStatus::Cancelled);
    }

    #[tokio::test]
    async fn refund_after_confirmation_is_acknowledged_without_change() {
        let f = fixture(MockSignatureVerifier::accepting());
        let reservation = settled_reservation(&f.repo, "42", "CAP-1").await;
        f.handler
            .handle(delivery("PAYMENT.CAPTURE.COMPLETED", "CAP-1"))
            .await
            .unwrap();

        let result = f
            .handler
            .handle(delivery("PAYMENT.CAPTURE.REFUNDED", "CAP-1"))
            .await
            .unwrap();

        assert!(matches!(result, HandlePaymentWebhookResult::AlreadyConfirmed { .. }));
        let stored = f.repo.get(&reservation.id).await.unwrap();
        assert_eq!(stored.status, ReservationStatus::Confirmed);
    }

    #[tokio::test]
    async fn repeated_cancellation_is_acknowledged_without_new_event() {
        let f = fixture(MockSignatureVerifier::accepting());
        settled_reservation(&f.repo, "42", "CAP-1").await;

        f.handler
            .handle(delivery("PAYMENT.CAPTURE.DENIED", "CAP-1"))
            .await
            .unwrap();
        let again = f
            .handler
            .handle(delivery("PAYMENT.CAPTURE.REFUNDED", "CAP-1"))
            .await
            .unwrap();

        assert!(matches!(again, HandlePaymentWebhookResult::TransitionRejected { .. }));
        assert_eq!(f.publisher.event_count(), 1);
    }
}
