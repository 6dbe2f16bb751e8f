//! Booking PayPal - PayPal payment gateway for a reservation platform
//!
//! This crate creates PayPal orders bound to reservations, reconciles
//! approved orders into captures under per-IP rate limits, applies webhook
//! notifications, and issues refunds.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
