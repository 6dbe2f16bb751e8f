//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `paypal` - PayPal REST API (tokens, orders, refunds, webhook verification)
//! - `rate_limiter` - capture attempt counters (in-memory, Redis)
//! - `reservation` - reservation stores (in-memory, PostgreSQL)
//! - `events` - reservation event publishing
//! - `http` - axum endpoints

pub mod events;
pub mod http;
pub mod paypal;
pub mod rate_limiter;
pub mod reservation;
