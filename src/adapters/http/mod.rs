//! HTTP adapters - REST endpoints.

pub mod client_ip;
pub mod payment;

pub use client_ip::{ClientIp, ProxyTrust};
pub use payment::{payment_router, PaymentAppState};
