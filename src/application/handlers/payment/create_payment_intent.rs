//! CreatePaymentIntentHandler - creates a PayPal order bound to a reservation.

use std::sync::Arc;

use crate::domain::payment::{NewOrder, PaymentError, PaymentFlowMode};
use crate::domain::reservation::Reservation;
use crate::ports::{GatewayError, OrderLifecycleClient, PaymentIntent, ReservationRepository};

/// Settings that shape every order this gateway creates.
#[derive(Debug, Clone)]
pub struct PaymentIntentSettings {
    pub flow_mode: PaymentFlowMode,
    /// Settlement currency; reservations priced otherwise are refused.
    pub currency: String,
    /// Host page the payer returns to in the redirect flow.
    pub checkout_complete_url: String,
    /// Merchant name shown on the approval page.
    pub brand_name: Option<String>,
}

/// Handler that starts a payment for a reservation.
pub struct CreatePaymentIntentHandler {
    orders: Arc<dyn OrderLifecycleClient>,
    reservations: Arc<dyn ReservationRepository>,
    settings: PaymentIntentSettings,
}

impl CreatePaymentIntentHandler {
    pub fn new(
        orders: Arc<dyn OrderLifecycleClient>,
        reservations: Arc<dyn ReservationRepository>,
        settings: PaymentIntentSettings,
    ) -> Self {
        Self {
            orders,
            reservations,
            settings,
        }
    }

    pub async fn handle(&self, reservation: &Reservation) -> Result<PaymentIntent, GatewayError> {
        if !reservation
            .amount
            .currency
            .eq_ignore_ascii_case(&self.settings.currency)
        {
            return Err(PaymentError::configuration(format!(
                "reservation priced in {}, gateway settles in {}",
                reservation.amount.currency, self.settings.currency
            ))
            .into());
        }

        let redirect = self.settings.flow_mode.redirects_for_payment();
        let order = NewOrder {
            amount: reservation.amount.clone(),
            reference_id: reservation.id.to_string(),
            description: reservation.description.clone(),
            return_url: redirect.then(|| self.return_url(reservation, false)),
            cancel_url: redirect.then(|| self.return_url(reservation, true)),
            brand_name: if redirect {
                self.settings.brand_name.clone()
            } else {
                None
            },
        };

        let created = self.orders.create_order(&order).await?;

        let redirect_to = if redirect {
            match created.approval_url {
                Some(url) => Some(url),
                None => {
                    tracing::error!(
                        reservation_id = %reservation.id,
                        order_id = %created.order_id,
                        "PayPal order created without approval link"
                    );
                    return Err(PaymentError::malformed_response("order has no approval link").into());
                }
            }
        } else {
            None
        };

        self.reservations
            .record_pending_order(&reservation.id, &created.order_id)
            .await?;

        tracing::info!(
            reservation_id = %reservation.id,
            order_id = %created.order_id,
            flow_mode = ?self.settings.flow_mode,
            "PayPal order created"
        );

        Ok(PaymentIntent {
            id: created.order_id,
            redirect_to,
        })
    }

    fn return_url(&self, reservation: &Reservation, cancelled: bool) -> String {
        let base = &self.settings.checkout_complete_url;
        let separator = if base.contains('?') { '&' } else { '?' };
        let mut url = format!("{}{}id={}", base, separator, reservation.id);
        if cancelled {
            url.push_str("&cancelled=true");
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::paypal::MockOrderClient;
    use crate::adapters::reservation::InMemoryReservationRepository;
    use crate::domain::foundation::ReservationId;
    use crate::domain::payment::{CreatedOrder, Money, PaymentErrorCode};

    fn settings(flow_mode: PaymentFlowMode) -> PaymentIntentSettings {
        PaymentIntentSettings {
            flow_mode,
            currency: "EUR".into(),
            checkout_complete_url: "https://hotel.example/checkout/complete".into(),
            brand_name: Some("Hotel Example".into()),
        }
    }

    async fn setup(
        flow_mode: PaymentFlowMode,
    ) -> (MockOrderClient, InMemoryReservationRepository, CreatePaymentIntentHandler, Reservation) {
        let orders = MockOrderClient::new();
        let repo = InMemoryReservationRepository::new();
        let reservation = Reservation::new_pending(
            ReservationId::new("42").unwrap(),
            Money::new(12_550, "EUR").unwrap(),
            "Sea view room, 2 nights",
        );
        repo.insert(reservation.clone()).await;
        let handler = CreatePaymentIntentHandler::new(
            Arc::new(orders.clone()),
            Arc::new(repo.clone()),
            settings(flow_mode),
        );
        (orders, repo, handler, reservation)
    }

    #[tokio::test]
    async fn redirect_flow_binds_order_and_returns_approval_link() {
        let (orders, repo, handler, reservation) = setup(PaymentFlowMode::Redirect).await;

        let intent = handler.handle(&reservation).await.unwrap();

        assert_eq!(intent.id, "ORDER-42");
        assert!(intent.redirect_to.is_some());

        let created = orders.created_orders();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].reference_id, "42");
        assert_eq!(created[0].amount.format(), "125.50");
        assert_eq!(
            created[0].return_url.as_deref(),
            Some("https://hotel.example/checkout/complete?id=42")
        );
        assert_eq!(
            created[0].cancel_url.as_deref(),
            Some("https://hotel.example/checkout/complete?id=42&cancelled=true")
        );
        assert_eq!(created[0].brand_name.as_deref(), Some("Hotel Example"));

        let stored = repo.get(&reservation.id).await.unwrap();
        assert_eq!(stored.pending_order_id.as_deref(), Some("ORDER-42"));
    }

    #[tokio::test]
    async fn inline_flow_has_no_redirect() {
        let (orders, repo, handler, reservation) = setup(PaymentFlowMode::InlineSdk).await;

        let intent = handler.handle(&reservation).await.unwrap();

        assert_eq!(intent.redirect_to, None);
        assert!(orders.created_orders()[0].return_url.is_none());
        let stored = repo.get(&reservation.id).await.unwrap();
        assert_eq!(stored.pending_order_id.as_deref(), Some("ORDER-42"));
    }

    #[tokio::test]
    async fn new_order_replaces_pending_order() {
        let (orders, repo, handler, reservation) = setup(PaymentFlowMode::InlineSdk).await;
        handler.handle(&reservation).await.unwrap();
        orders.set_created_order(CreatedOrder {
            order_id: "ORDER-SECOND".into(),
            approval_url: None,
        });

        handler.handle(&reservation).await.unwrap();

        let stored = repo.get(&reservation.id).await.unwrap();
        assert_eq!(stored.pending_order_id.as_deref(), Some("ORDER-SECOND"));
    }

    #[tokio::test]
    async fn missing_approval_link_in_redirect_flow_is_malformed() {
        let (orders, repo, handler, reservation) = setup(PaymentFlowMode::Redirect).await;
        orders.set_created_order(CreatedOrder {
            order_id: "ORDER-1".into(),
            approval_url: None,
        });

        let err = handler.handle(&reservation).await.unwrap_err();

        assert!(matches!(
            err,
            GatewayError::Payment(ref e) if e.code == PaymentErrorCode::MalformedResponse
        ));
        assert!(repo.get(&reservation.id).await.unwrap().pending_order_id.is_none());
    }

    #[tokio::test]
    async fn currency_mismatch_is_refused_before_calling_processor() {
        let (orders, _repo, handler, mut reservation) = setup(PaymentFlowMode::Redirect).await;
        reservation.amount = Money::new(100, "USD").unwrap();

        let err = handler.handle(&reservation).await.unwrap_err();

        assert!(matches!(err, GatewayError::Payment(_)));
        assert_eq!(orders.total_calls(), 0);
    }

    #[tokio::test]
    async fn processor_failure_is_propagated() {
        let (orders, _repo, handler, reservation) = setup(PaymentFlowMode::Redirect).await;
        orders.set_method_error("create_order", PaymentError::upstream("INTERNAL_SERVER_ERROR"));

        let err = handler.handle(&reservation).await.unwrap_err();
        assert!(matches!(err, GatewayError::Payment(ref e) if e.is_upstream()));
    }
}
