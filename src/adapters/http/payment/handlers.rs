//! HTTP handlers for the PayPal endpoints.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{FromRef, Json, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::application::{CaptureOrderCommand, CaptureOrderHandler, CaptureOrderResult};
use crate::domain::foundation::ReservationId;
use crate::domain::payment::{TransmissionHeaders, WebhookRejection};
use crate::ports::{GatewayError, PaymentGateway, RedirectBackRequest};

use crate::adapters::http::client_ip::{ClientIp, ProxyTrust};
use super::dto::{CaptureResponse, CheckoutCompleteQuery, CheckoutCompleteResponse, ErrorResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the PayPal routes.
#[derive(Clone)]
pub struct PaymentAppState {
    pub gateway: Arc<dyn PaymentGateway>,
    pub capture_handler: Arc<CaptureOrderHandler>,
    pub proxy_trust: ProxyTrust,
}

impl FromRef<PaymentAppState> for ProxyTrust {
    fn from_ref(state: &PaymentAppState) -> Self {
        state.proxy_trust
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /capture/:order_id - capture an order approved in the client SDK
pub async fn capture_order(
    State(state): State<PaymentAppState>,
    Path(order_id): Path<String>,
    ClientIp(client_ip): ClientIp,
) -> Response {
    let cmd = CaptureOrderCommand {
        order_id,
        client_ip,
    };

    match state.capture_handler.handle(cmd).await {
        Ok(CaptureOrderResult::Completed {
            capture_id,
            reservation_id,
        }) => (
            StatusCode::OK,
            Json(CaptureResponse::completed(capture_id, reservation_id)),
        )
            .into_response(),
        Ok(CaptureOrderResult::NotCompleted { status }) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Capture failed").with_status(status)),
        )
            .into_response(),
        Ok(CaptureOrderResult::UnknownOrder | CaptureOrderResult::InvalidOrder) => (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::new("Invalid order")),
        )
            .into_response(),
        Ok(CaptureOrderResult::RateLimited) => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse::new("Too many attempts. Please try again later.")),
        )
            .into_response(),
        Ok(CaptureOrderResult::Failed { message }) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Capture failed").with_message(message)),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "PayPal capture request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Capture failed").with_message("Internal error")),
            )
                .into_response()
        }
    }
}

/// POST /webhooks/paypal - PayPal webhook deliveries
pub async fn paypal_webhook(
    State(state): State<PaymentAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let transmission = TransmissionHeaders::from_lookup(|name| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    });

    match state.gateway.verify_payment(&transmission, &body).await {
        Ok(_) => (StatusCode::OK, Json(serde_json::json!({}))).into_response(),
        Err(rejection) => {
            let error = match rejection {
                WebhookRejection::Storage(_) => "Webhook processing failed",
                WebhookRejection::MalformedPayload(_) | WebhookRejection::InvalidSignature => {
                    "Invalid webhook"
                }
            };
            (rejection.status_code(), Json(ErrorResponse::new(error))).into_response()
        }
    }
}

/// GET /checkout/complete - payer returns from the PayPal approval page
pub async fn checkout_complete(
    State(state): State<PaymentAppState>,
    Query(query): Query<CheckoutCompleteQuery>,
    ClientIp(client_ip): ClientIp,
) -> Response {
    let reservation_id = match ReservationId::new(query.id.clone()) {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Missing reservation id")),
            )
                .into_response()
        }
    };

    let request = RedirectBackRequest {
        reservation_id,
        cancelled: query.is_cancelled(),
        token: query.token,
        client_ip,
    };

    match state.gateway.handle_redirect_back(request).await {
        Ok(result) => (
            StatusCode::OK,
            Json(CheckoutCompleteResponse::from(result)),
        )
            .into_response(),
        Err(GatewayError::ReservationNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Reservation not found")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "PayPal redirect-back failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Payment could not be processed")),
            )
                .into_response()
        }
    }
}
