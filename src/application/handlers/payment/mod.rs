//! Payment handlers: order creation, capture reconciliation, redirect-back,
//! inline capture, webhooks and refunds.

mod capture_order;
mod create_payment_intent;
mod handle_payment_webhook;
mod handle_redirect_back;
mod reconcile_capture;
mod refund_payment;

pub use capture_order::{CaptureOrderCommand, CaptureOrderHandler, CaptureOrderResult};
pub use create_payment_intent::{CreatePaymentIntentHandler, PaymentIntentSettings};
pub use handle_payment_webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
};
pub use handle_redirect_back::HandleRedirectBackHandler;
pub use reconcile_capture::{
    CaptureOutcome, CaptureReconciler, ReconcileCaptureCommand, RejectionReason,
};
pub use refund_payment::RefundPaymentHandler;
