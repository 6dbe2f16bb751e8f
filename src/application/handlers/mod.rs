//! Application handlers.
//!
//! Command handlers that orchestrate domain operations over the ports.

pub mod payment;

pub use payment::{
    CaptureOrderCommand, CaptureOrderHandler, CaptureOrderResult, CaptureOutcome,
    CaptureReconciler, CreatePaymentIntentHandler, HandlePaymentWebhookCommand,
    HandlePaymentWebhookHandler, HandlePaymentWebhookResult, HandleRedirectBackHandler,
    PaymentIntentSettings, ReconcileCaptureCommand, RefundPaymentHandler, RejectionReason,
};
