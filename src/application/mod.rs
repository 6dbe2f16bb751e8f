//! Application layer - command handlers and the gateway facade.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;
mod paypal_gateway;

pub use handlers::{
    CaptureOrderCommand, CaptureOrderHandler, CaptureOrderResult, CaptureOutcome,
    CaptureReconciler, CreatePaymentIntentHandler, HandlePaymentWebhookCommand,
    HandlePaymentWebhookHandler, HandlePaymentWebhookResult, HandleRedirectBackHandler,
    PaymentIntentSettings, ReconcileCaptureCommand, RefundPaymentHandler, RejectionReason,
};
pub use paypal_gateway::{GatewayPorts, GatewaySettings, PaypalPaymentGateway};
