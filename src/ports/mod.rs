//! Ports - async traits the application layer depends on.
//!
//! Adapters implement these; handlers only ever see `Arc<dyn Port>`.

mod access_token_provider;
mod order_lifecycle_client;
mod payment_gateway;
mod rate_limiter;
mod reservation_events;
mod reservation_repository;
mod signature_verifier;

pub use access_token_provider::AccessTokenProvider;
pub use order_lifecycle_client::OrderLifecycleClient;
pub use payment_gateway::{
    GatewayError, PaymentGateway, PaymentIntent, RedirectBackRequest, RedirectBackResult,
    RedirectStatus, WebhookAck,
};
pub use rate_limiter::{RateLimitError, RateLimitKey, RateLimiter, CAPTURE_RESOURCE};
pub use reservation_events::ReservationEventPublisher;
pub use reservation_repository::ReservationRepository;
pub use signature_verifier::WebhookSignatureVerifier;
