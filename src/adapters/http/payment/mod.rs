//! HTTP adapter for the PayPal endpoints:
//! - `POST /capture/:order_id` - capture an order approved in the client SDK
//! - `POST /webhooks/paypal` - PayPal webhook deliveries
//! - `GET /checkout/complete` - payer returns from PayPal

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::PaymentAppState;
pub use routes::{payment_router, payment_routes};
