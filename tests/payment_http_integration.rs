//! Integration tests for the PayPal HTTP endpoints.
//!
//! These drive the full router (handlers, reconciler, in-memory stores and
//! processor doubles) with `tower::ServiceExt::oneshot`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use booking_paypal::adapters::events::InMemoryEventPublisher;
use booking_paypal::adapters::http::{payment_router, PaymentAppState, ProxyTrust};
use booking_paypal::adapters::paypal::{MockOrderClient, MockSignatureVerifier};
use booking_paypal::adapters::rate_limiter::{CaptureRateLimitConfig, InMemoryRateLimiter};
use booking_paypal::adapters::reservation::InMemoryReservationRepository;
use booking_paypal::application::{
    GatewayPorts, GatewaySettings, PaymentIntentSettings, PaypalPaymentGateway,
};
use booking_paypal::domain::foundation::ReservationId;
use booking_paypal::domain::payment::{Money, OrderStatus, PaymentError, PaymentFlowMode};
use booking_paypal::domain::reservation::{Reservation, ReservationStatus};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    router: Router,
    orders: MockOrderClient,
    repo: InMemoryReservationRepository,
    publisher: InMemoryEventPublisher,
}

/// App deployed behind a trusted proxy.
fn app(flow_mode: PaymentFlowMode, verifier: MockSignatureVerifier) -> TestApp {
    app_with_trust(flow_mode, verifier, ProxyTrust(true))
}

fn app_with_trust(
    flow_mode: PaymentFlowMode,
    verifier: MockSignatureVerifier,
    proxy_trust: ProxyTrust,
) -> TestApp {
    let orders = MockOrderClient::new();
    let repo = InMemoryReservationRepository::new();
    let publisher = InMemoryEventPublisher::new();

    let gateway = Arc::new(PaypalPaymentGateway::new(
        GatewayPorts {
            orders: Arc::new(orders.clone()),
            verifier: Arc::new(verifier),
            reservations: Arc::new(repo.clone()),
            publisher: Arc::new(publisher.clone()),
            rate_limiter: Arc::new(InMemoryRateLimiter::new()),
        },
        GatewaySettings {
            client_id: "client-abc".into(),
            webhook_id: Some("WH-ID".into()),
            intent: PaymentIntentSettings {
                flow_mode,
                currency: "EUR".into(),
                checkout_complete_url: "https://hotel.example/checkout/complete".into(),
                brand_name: Some("Hotel Example".into()),
            },
            rate_limit: CaptureRateLimitConfig::default(),
        },
    ));

    let state = PaymentAppState {
        capture_handler: gateway.capture_handler(),
        gateway,
        proxy_trust,
    };

    TestApp {
        router: payment_router(state, Duration::from_secs(10)),
        orders,
        repo,
        publisher,
    }
}

async fn seed(repo: &InMemoryReservationRepository, id: &str, pending_order: Option<&str>) {
    let mut reservation = Reservation::new_pending(
        ReservationId::new(id).unwrap(),
        Money::new(12_500, "EUR").unwrap(),
        "Sea view room",
    );
    if let Some(order_id) = pending_order {
        reservation.record_pending_order(order_id);
    }
    repo.insert(reservation).await;
}

fn capture_request(order_id: &str, ip: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/capture/{}", order_id))
        .header("X-Forwarded-For", ip)
        .body(Body::empty())
        .unwrap()
}

fn capture_request_from_socket(order_id: &str, peer: SocketAddr, forwarded: &str) -> Request<Body> {
    let mut request = capture_request(order_id, forwarded);
    request.extensions_mut().insert(ConnectInfo(peer));
    request
}

fn webhook_request(body: Value, signed: bool) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhooks/paypal")
        .header("Content-Type", "application/json");
    if signed {
        builder = builder
            .header("PAYPAL-AUTH-ALGO", "SHA256withRSA")
            .header("PAYPAL-CERT-URL", "https://api.paypal.com/cert")
            .header("PAYPAL-TRANSMISSION-ID", "tx-1")
            .header("PAYPAL-TRANSMISSION-SIG", "sig")
            .header("PAYPAL-TRANSMISSION-TIME", "2026-10-18T10:00:00Z");
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

// =============================================================================
// POST /capture/:order_id
// =============================================================================

#[tokio::test]
async fn capture_completes_and_records_payment() {
    let app = app(PaymentFlowMode::InlineSdk, MockSignatureVerifier::accepting());
    seed(&app.repo, "42", Some("ORDER-1")).await;
    app.orders.add_order(MockOrderClient::approved_order("ORDER-1", "42"));
    app.orders
        .set_capture_result(MockOrderClient::completed_capture("ORDER-1", "42", "CAP-1"));

    let (status, body) = send(&app.router, capture_request("ORDER-1", "203.0.113.7")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "COMPLETED", "captureId": "CAP-1", "reservationId": "42"})
    );
    let stored = app.repo.get(&ReservationId::new("42").unwrap()).await.unwrap();
    assert_eq!(stored.payment_id.as_deref(), Some("CAP-1"));
}

#[tokio::test]
async fn capture_of_unknown_order_is_forbidden() {
    let app = app(PaymentFlowMode::InlineSdk, MockSignatureVerifier::accepting());

    let (status, body) = send(&app.router, capture_request("ORDER-NOPE", "203.0.113.7")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({"error": "Invalid order"}));
    assert_eq!(app.orders.total_calls(), 0);
}

#[tokio::test]
async fn capture_of_foreign_order_is_forbidden_and_never_captured() {
    let app = app(PaymentFlowMode::InlineSdk, MockSignatureVerifier::accepting());
    seed(&app.repo, "42", Some("ORDER-1")).await;
    app.orders.add_order(MockOrderClient::approved_order("ORDER-1", "99"));
    app.orders
        .set_capture_result(MockOrderClient::completed_capture("ORDER-1", "99", "CAP-1"));

    let (status, body) = send(&app.router, capture_request("ORDER-1", "203.0.113.7")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({"error": "Invalid order"}));
    assert_eq!(app.orders.call_count("capture_order"), 0);
}

#[tokio::test]
async fn repeated_mismatches_from_one_ip_are_rate_limited() {
    let app = app(PaymentFlowMode::InlineSdk, MockSignatureVerifier::accepting());
    seed(&app.repo, "42", Some("ORDER-1")).await;
    app.orders.add_order(MockOrderClient::approved_order("ORDER-1", "99"));

    for _ in 0..4 {
        let (status, _) = send(&app.router, capture_request("ORDER-1", "203.0.113.7")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    let (status, body) = send(&app.router, capture_request("ORDER-1", "203.0.113.7")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["error"].is_string());
    assert_eq!(app.orders.call_count("get_order"), 4);

    // Another client is unaffected
    let (status, _) = send(&app.router, capture_request("ORDER-1", "198.51.100.1")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.orders.call_count("get_order"), 5);
}

#[tokio::test]
async fn forged_forwarding_headers_do_not_escape_the_limit_by_default() {
    let app = app_with_trust(
        PaymentFlowMode::InlineSdk,
        MockSignatureVerifier::accepting(),
        ProxyTrust::default(),
    );
    seed(&app.repo, "42", Some("ORDER-1")).await;
    app.orders.add_order(MockOrderClient::approved_order("ORDER-1", "99"));
    let peer: SocketAddr = "203.0.113.7:51000".parse().unwrap();

    for i in 0..4 {
        let forged = format!("10.0.0.{}", i);
        let (status, _) = send(
            &app.router,
            capture_request_from_socket("ORDER-1", peer, &forged),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    let (status, _) = send(
        &app.router,
        capture_request_from_socket("ORDER-1", peer, "10.0.0.200"),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(app.orders.call_count("get_order"), 4);
}

#[tokio::test]
async fn pending_capture_is_a_bad_request_with_status() {
    let app = app(PaymentFlowMode::InlineSdk, MockSignatureVerifier::accepting());
    seed(&app.repo, "42", Some("ORDER-1")).await;
    app.orders.add_order(MockOrderClient::approved_order("ORDER-1", "42"));
    app.orders.set_capture_result(MockOrderClient::capture_with_status(
        "ORDER-1",
        "42",
        OrderStatus::Pending,
    ));

    let (status, body) = send(&app.router, capture_request("ORDER-1", "203.0.113.7")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Capture failed", "status": "PENDING"}));
}

#[tokio::test]
async fn processor_outage_is_a_server_error() {
    let app = app(PaymentFlowMode::InlineSdk, MockSignatureVerifier::accepting());
    seed(&app.repo, "42", Some("ORDER-1")).await;
    app.orders
        .set_method_error("get_order", PaymentError::timeout("deadline exceeded"));

    let (status, body) = send(&app.router, capture_request("ORDER-1", "203.0.113.7")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Capture failed");
    assert!(body["message"].is_string());
}

// =============================================================================
// POST /webhooks/paypal
// =============================================================================

#[tokio::test]
async fn verified_webhook_confirms_reservation_once() {
    let app = app(PaymentFlowMode::Redirect, MockSignatureVerifier::accepting());
    seed(&app.repo, "42", None).await;
    let mut reservation = app.repo.get(&ReservationId::new("42").unwrap()).await.unwrap();
    reservation.settle("CAP-1");
    app.repo.insert(reservation).await;

    let event = json!({
        "id": "WH-1",
        "event_type": "PAYMENT.CAPTURE.COMPLETED",
        "resource": { "id": "CAP-1" }
    });

    let (status, body) = send(&app.router, webhook_request(event.clone(), true)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    let (status, _) = send(&app.router, webhook_request(event, true)).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(app.publisher.event_count(), 1);
    let stored = app.repo.get(&ReservationId::new("42").unwrap()).await.unwrap();
    assert_eq!(stored.status, ReservationStatus::Confirmed);
}

#[tokio::test]
async fn unverified_webhook_is_forbidden() {
    let app = app(PaymentFlowMode::Redirect, MockSignatureVerifier::rejecting());

    let event = json!({
        "event_type": "PAYMENT.CAPTURE.COMPLETED",
        "resource": { "id": "CAP-1" }
    });
    let (status, body) = send(&app.router, webhook_request(event, false)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());
    assert_eq!(app.repo.lookup_count(), 0);
}

#[tokio::test]
async fn malformed_webhook_is_forbidden() {
    let app = app(PaymentFlowMode::Redirect, MockSignatureVerifier::accepting());

    let (status, _) = send(&app.router, webhook_request(json!([]), true)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn webhook_storage_failure_asks_for_retry() {
    let app = app(PaymentFlowMode::Redirect, MockSignatureVerifier::accepting());
    app.repo.set_unavailable(true);

    let event = json!({
        "event_type": "PAYMENT.CAPTURE.COMPLETED",
        "resource": { "id": "CAP-1" }
    });
    let (status, _) = send(&app.router, webhook_request(event, true)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// GET /checkout/complete
// =============================================================================

#[tokio::test]
async fn redirect_return_captures_and_reports_success() {
    let app = app(PaymentFlowMode::Redirect, MockSignatureVerifier::accepting());
    seed(&app.repo, "42", Some("ORDER-1")).await;
    app.orders.add_order(MockOrderClient::approved_order("ORDER-1", "42"));
    app.orders
        .set_capture_result(MockOrderClient::completed_capture("ORDER-1", "42", "CAP-1"));

    let request = Request::builder()
        .uri("/checkout/complete?id=42&token=ORDER-1")
        .header("X-Real-IP", "203.0.113.7")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app.router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!(true));
    assert_eq!(body["reservation"]["status"], "PENDING");
    let stored = app.repo.get(&ReservationId::new("42").unwrap()).await.unwrap();
    assert_eq!(stored.payment_id.as_deref(), Some("CAP-1"));
}

#[tokio::test]
async fn return_page_does_not_expose_order_or_capture_ids() {
    let app = app(PaymentFlowMode::InlineSdk, MockSignatureVerifier::accepting());
    seed(&app.repo, "42", Some("ORDER-SECRET")).await;

    let request = Request::builder()
        .uri("/checkout/complete?id=42")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app.router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": false, "reservation": {"id": "42", "status": "PENDING"}})
    );
    let raw = body.to_string();
    assert!(!raw.contains("ORDER-SECRET"));
    assert!(!raw.contains("pending_order_id"));
    assert!(!raw.contains("payment_id"));
}

#[tokio::test]
async fn cancelled_return_reports_failure() {
    let app = app(PaymentFlowMode::Redirect, MockSignatureVerifier::accepting());
    seed(&app.repo, "42", Some("ORDER-1")).await;

    let request = Request::builder()
        .uri("/checkout/complete?id=42&token=ORDER-1&cancelled=true")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app.router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!(false));
    assert_eq!(app.orders.total_calls(), 0);
}

#[tokio::test]
async fn return_for_unknown_reservation_is_not_found() {
    let app = app(PaymentFlowMode::Redirect, MockSignatureVerifier::accepting());

    let request = Request::builder()
        .uri("/checkout/complete?id=404&token=ORDER-1")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app.router, request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
