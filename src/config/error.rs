//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid socket address: {0}")]
    InvalidSocketAddr(String),

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Reservation store pool needs 1 to 32 connections")]
    InvalidPoolSize,

    #[error("PayPal mode must be 'sandbox' or 'live'")]
    InvalidPaypalMode,

    #[error("Currency must be a three-letter ISO 4217 code")]
    InvalidCurrency,

    #[error("Checkout complete URL must be an absolute http(s) URL")]
    InvalidCheckoutUrl,

    #[error("Checkout complete URL must use HTTPS in production")]
    CheckoutUrlMustBeHttps,

    #[error("Rate limit values must be greater than zero")]
    InvalidRateLimit,
}
