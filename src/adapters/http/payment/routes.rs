//! Axum router configuration for the PayPal endpoints.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{capture_order, checkout_complete, paypal_webhook, PaymentAppState};

/// Create the PayPal router.
///
/// # Routes
/// - `POST /capture/:order_id` - Server-side capture for the inline SDK flow
/// - `POST /webhooks/paypal` - PayPal webhooks (signature verified)
/// - `GET /checkout/complete` - Payer returns from the approval page
pub fn payment_routes() -> Router<PaymentAppState> {
    Router::new()
        .route("/capture/:order_id", post(capture_order))
        .route("/webhooks/paypal", post(paypal_webhook))
        .route("/checkout/complete", get(checkout_complete))
}

/// Complete router with request tracing and a per-request timeout.
///
/// ```ignore
/// let app = payment_router(state, Duration::from_secs(30));
/// axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
/// ```
pub fn payment_router(state: PaymentAppState, request_timeout: Duration) -> Router {
    payment_routes()
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
