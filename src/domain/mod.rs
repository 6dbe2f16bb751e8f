//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `payment` - Money, processor orders, capture states, webhook payloads
//! - `reservation` - The payment-relevant slice of a booking

pub mod foundation;
pub mod payment;
pub mod reservation;
