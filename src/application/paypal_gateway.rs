//! PaypalPaymentGateway - the [`PaymentGateway`] the booking system uses.

use async_trait::async_trait;
use std::sync::Arc;

use crate::adapters::rate_limiter::CaptureRateLimitConfig;
use crate::domain::payment::{
    PaymentError, PaymentFlowMode, RefundResult, TransmissionHeaders, WebhookRejection,
};
use crate::domain::reservation::Reservation;
use crate::ports::{
    GatewayError, OrderLifecycleClient, PaymentGateway, PaymentIntent, RateLimiter,
    RedirectBackRequest, RedirectBackResult, ReservationEventPublisher, ReservationRepository,
    WebhookAck, WebhookSignatureVerifier,
};

use super::handlers::payment::{
    CaptureOrderHandler, CaptureReconciler, CreatePaymentIntentHandler,
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandleRedirectBackHandler,
    PaymentIntentSettings, RefundPaymentHandler,
};

/// Ports the gateway is assembled from.
#[derive(Clone)]
pub struct GatewayPorts {
    pub orders: Arc<dyn OrderLifecycleClient>,
    pub verifier: Arc<dyn WebhookSignatureVerifier>,
    pub reservations: Arc<dyn ReservationRepository>,
    pub publisher: Arc<dyn ReservationEventPublisher>,
    pub rate_limiter: Arc<dyn RateLimiter>,
}

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub client_id: String,
    pub webhook_id: Option<String>,
    pub intent: PaymentIntentSettings,
    pub rate_limit: CaptureRateLimitConfig,
}

pub struct PaypalPaymentGateway {
    create_intent: CreatePaymentIntentHandler,
    refund: RefundPaymentHandler,
    redirect_back: HandleRedirectBackHandler,
    capture: Arc<CaptureOrderHandler>,
    webhooks: Arc<HandlePaymentWebhookHandler>,
    flow_mode: PaymentFlowMode,
    client_id: String,
    webhook_id: Option<String>,
}

impl PaypalPaymentGateway {
    pub fn new(ports: GatewayPorts, settings: GatewaySettings) -> Self {
        let flow_mode = settings.intent.flow_mode;
        let reconciler = Arc::new(CaptureReconciler::new(
            ports.orders.clone(),
            ports.reservations.clone(),
            ports.rate_limiter,
            settings.rate_limit,
        ));

        Self {
            create_intent: CreatePaymentIntentHandler::new(
                ports.orders.clone(),
                ports.reservations.clone(),
                settings.intent,
            ),
            refund: RefundPaymentHandler::new(ports.orders),
            redirect_back: HandleRedirectBackHandler::new(
                ports.reservations.clone(),
                reconciler.clone(),
                flow_mode,
            ),
            capture: Arc::new(CaptureOrderHandler::new(
                ports.reservations.clone(),
                reconciler,
            )),
            webhooks: Arc::new(HandlePaymentWebhookHandler::new(
                ports.verifier,
                ports.reservations,
                ports.publisher,
            )),
            flow_mode,
            client_id: settings.client_id,
            webhook_id: settings.webhook_id,
        }
    }

    /// Handler behind `POST /capture/{order_id}`.
    pub fn capture_handler(&self) -> Arc<CaptureOrderHandler> {
        self.capture.clone()
    }

    /// Handler behind the webhook endpoint.
    pub fn webhook_handler(&self) -> Arc<HandlePaymentWebhookHandler> {
        self.webhooks.clone()
    }

    pub fn flow_mode(&self) -> PaymentFlowMode {
        self.flow_mode
    }
}

#[async_trait]
impl PaymentGateway for PaypalPaymentGateway {
    async fn payment_intent(
        &self,
        reservation: &Reservation,
    ) -> Result<PaymentIntent, GatewayError> {
        self.create_intent.handle(reservation).await
    }

    async fn refund(&self, reservation: &Reservation) -> Result<RefundResult, PaymentError> {
        self.refund.handle(reservation).await
    }

    async fn handle_redirect_back(
        &self,
        request: RedirectBackRequest,
    ) -> Result<RedirectBackResult, GatewayError> {
        self.redirect_back.handle(request).await
    }

    async fn verify_payment(
        &self,
        headers: &TransmissionHeaders,
        raw_body: &[u8],
    ) -> Result<WebhookAck, WebhookRejection> {
        let result = self
            .webhooks
            .handle(HandlePaymentWebhookCommand {
                headers: headers.clone(),
                payload: raw_body.to_vec(),
            })
            .await?;
        Ok(if result.is_processed() {
            WebhookAck::Processed
        } else {
            WebhookAck::Ignored
        })
    }

    fn supports_webhooks(&self) -> bool {
        true
    }

    fn redirects_for_payment(&self) -> bool {
        self.flow_mode.redirects_for_payment()
    }

    fn public_key(&self) -> String {
        self.client_id.clone()
    }

    fn webhook_secret(&self) -> Option<String> {
        self.webhook_id.clone()
    }
}
