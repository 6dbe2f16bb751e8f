//! PayPal REST adapter.
//!
//! Implements the order lifecycle, access token and webhook verification
//! ports against PayPal's REST API:
//! - `POST /v1/oauth2/token`
//! - `POST /v2/checkout/orders`, `GET /v2/checkout/orders/{id}`
//! - `POST /v2/checkout/orders/{id}/capture`
//! - `POST /v2/payments/captures/{id}/refund`
//! - `POST /v1/notifications/verify-webhook-signature`
//!
//! # Security
//!
//! - Client secret handled via `secrecy::SecretString`
//! - Webhooks verified by PayPal itself; any doubt fails closed
//! - Mutating calls carry `PayPal-Request-Id` for idempotency

mod access_token;
mod api;
mod mock;
mod orders;
mod webhook_verifier;
mod wire_types;

pub use access_token::PaypalAccessTokenProvider;
pub use api::{PaypalApi, PaypalApiConfig, DEFAULT_TIMEOUT, LIVE_BASE_URL, SANDBOX_BASE_URL};
pub use mock::{MethodCall, MockAccessTokenProvider, MockOrderClient, MockSignatureVerifier};
pub use orders::PaypalOrdersClient;
pub use webhook_verifier::PaypalWebhookVerifier;
