//! Test doubles for the PayPal ports.
//!
//! Supports:
//! - Pre-configured orders and capture results
//! - Error injection per method
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use secrecy::SecretString;

use crate::domain::payment::{
    Capture, CreatedOrder, Money, NewOrder, Order, OrderStatus, PaymentError, PurchaseUnit,
    RefundResult, TransmissionHeaders,
};
use crate::ports::{AccessTokenProvider, OrderLifecycleClient, WebhookSignatureVerifier};

/// Recorded method call for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Access tokens
// ════════════════════════════════════════════════════════════════════════════

/// Token provider that returns a fixed token or always fails.
#[derive(Debug, Clone)]
pub struct MockAccessTokenProvider {
    token: Option<String>,
}

impl MockAccessTokenProvider {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn failing() -> Self {
        Self { token: None }
    }
}

#[async_trait]
impl AccessTokenProvider for MockAccessTokenProvider {
    async fn access_token(&self) -> Result<SecretString, PaymentError> {
        self.token
            .clone()
            .map(SecretString::new)
            .ok_or_else(|| PaymentError::authentication("Failed to obtain PayPal access token"))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Orders
// ════════════════════════════════════════════════════════════════════════════

/// Configurable [`OrderLifecycleClient`] double.
///
/// ```ignore
/// let client = MockOrderClient::new();
/// client.add_order(MockOrderClient::approved_order("ORDER-1", "42"));
/// client.set_capture_result(MockOrderClient::completed_capture("ORDER-1", "42", "CAP-1"));
/// ```
#[derive(Clone, Default)]
pub struct MockOrderClient {
    inner: Arc<Mutex<OrderState>>,
}

#[derive(Default)]
struct OrderState {
    orders: HashMap<String, Order>,
    captures: HashMap<String, Order>,
    next_created: Option<CreatedOrder>,
    created: Vec<NewOrder>,
    method_errors: HashMap<String, PaymentError>,
    call_log: Vec<MethodCall>,
}

impl MockOrderClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, OrderState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Order returned by `get_order` for its id.
    pub fn add_order(&self, order: Order) {
        self.state().orders.insert(order.id.clone(), order);
    }

    /// Result returned by `capture_order` for its id.
    pub fn set_capture_result(&self, order: Order) {
        self.state().captures.insert(order.id.clone(), order);
    }

    /// Result of the next `create_order`.
    pub fn set_created_order(&self, created: CreatedOrder) {
        self.state().next_created = Some(created);
    }

    /// Error returned by every call to `method`.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.state().method_errors.insert(method.to_string(), error);
    }

    /// Orders passed to `create_order`.
    pub fn created_orders(&self) -> Vec<NewOrder> {
        self.state().created.clone()
    }

    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Total calls across every method.
    pub fn total_calls(&self) -> usize {
        self.state().call_log.len()
    }

    // ─── Order builders ───

    /// Approved order bound to `reference_id`.
    pub fn approved_order(order_id: &str, reference_id: &str) -> Order {
        Self::order(order_id, OrderStatus::Approved, Some(reference_id), None)
    }

    /// Completed capture result with one capture.
    pub fn completed_capture(order_id: &str, reference_id: &str, capture_id: &str) -> Order {
        Self::order(
            order_id,
            OrderStatus::Completed,
            Some(reference_id),
            Some(capture_id),
        )
    }

    /// Capture result with the given status and no captures.
    pub fn capture_with_status(order_id: &str, reference_id: &str, status: OrderStatus) -> Order {
        Self::order(order_id, status, Some(reference_id), None)
    }

    fn order(
        order_id: &str,
        status: OrderStatus,
        reference_id: Option<&str>,
        capture_id: Option<&str>,
    ) -> Order {
        Order {
            id: order_id.to_string(),
            status,
            purchase_units: vec![PurchaseUnit {
                reference_id: reference_id.map(String::from),
                captures: capture_id
                    .map(|id| {
                        vec![Capture {
                            id: Some(id.to_string()),
                            status: Some("COMPLETED".to_string()),
                        }]
                    })
                    .unwrap_or_default(),
            }],
        }
    }

    // ─── Internal helpers ───

    fn record(&self, method: &str, args: Vec<String>) -> Result<(), PaymentError> {
        let mut state = self.state();
        state.call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
        match state.method_errors.get(method) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl OrderLifecycleClient for MockOrderClient {
    async fn create_order(&self, order: &NewOrder) -> Result<CreatedOrder, PaymentError> {
        self.record("create_order", vec![order.reference_id.clone()])?;
        let mut state = self.state();
        state.created.push(order.clone());
        Ok(state.next_created.clone().unwrap_or_else(|| CreatedOrder {
            order_id: format!("ORDER-{}", order.reference_id),
            approval_url: order
                .return_url
                .as_ref()
                .map(|_| format!("https://www.sandbox.paypal.com/checkoutnow?token=ORDER-{}", order.reference_id)),
        }))
    }

    async fn get_order(&self, order_id: &str) -> Result<Order, PaymentError> {
        self.record("get_order", vec![order_id.to_string()])?;
        self.state()
            .orders
            .get(order_id)
            .cloned()
            .ok_or_else(|| PaymentError::upstream(format!("order {} not found", order_id)))
    }

    async fn capture_order(&self, order_id: &str) -> Result<Order, PaymentError> {
        self.record("capture_order", vec![order_id.to_string()])?;
        self.state()
            .captures
            .get(order_id)
            .cloned()
            .ok_or_else(|| PaymentError::upstream(format!("order {} cannot be captured", order_id)))
    }

    async fn refund_capture(
        &self,
        capture_id: &str,
        amount: &Money,
    ) -> Result<RefundResult, PaymentError> {
        self.record(
            "refund_capture",
            vec![capture_id.to_string(), amount.format()],
        )?;
        Ok(RefundResult {
            refund_id: format!("REFUND-{}", capture_id),
            status: "COMPLETED".to_string(),
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Signature verification
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
enum VerifyMode {
    Accept,
    Reject,
    Fail(PaymentError),
}

/// [`WebhookSignatureVerifier`] double with a fixed verdict.
#[derive(Clone)]
pub struct MockSignatureVerifier {
    mode: VerifyMode,
    calls: Arc<Mutex<usize>>,
}

impl MockSignatureVerifier {
    fn with_mode(mode: VerifyMode) -> Self {
        Self {
            mode,
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Verifies every delivery.
    pub fn accepting() -> Self {
        Self::with_mode(VerifyMode::Accept)
    }

    /// Rejects every delivery.
    pub fn rejecting() -> Self {
        Self::with_mode(VerifyMode::Reject)
    }

    /// Errors on every delivery.
    pub fn failing(error: PaymentError) -> Self {
        Self::with_mode(VerifyMode::Fail(error))
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl WebhookSignatureVerifier for MockSignatureVerifier {
    async fn verify(
        &self,
        _headers: &TransmissionHeaders,
        _raw_body: &[u8],
    ) -> Result<bool, PaymentError> {
        *self.calls.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        match &self.mode {
            VerifyMode::Accept => Ok(true),
            VerifyMode::Reject => Ok(false),
            VerifyMode::Fail(error) => Err(error.clone()),
        }
    }
}
