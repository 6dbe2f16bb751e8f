//! Payment error taxonomy shared by the PayPal adapters and the
//! capture reconciliation handlers.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode};

/// Error raised by payment processor operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Processor's error name (e.g. `UNPROCESSABLE_ENTITY`), if available.
    pub provider_code: Option<String>,

    /// Whether the operation can be retried by the caller.
    pub retryable: bool,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    /// Attach the processor's error name.
    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    /// Missing or unusable configuration (e.g. no webhook id).
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::Configuration, message)
    }

    /// Credential exchange failed.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::Authentication, message)
    }

    /// Processor API or transport failure.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::Upstream, message)
    }

    /// Outbound request exceeded its deadline.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::Timeout, message)
    }

    /// Reference id or token does not bind to the reservation.
    pub fn binding_mismatch(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::BindingMismatch, message)
    }

    /// Processor answered successfully but omitted required fields.
    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::MalformedResponse, message)
    }

    /// Refund could not be issued.
    pub fn refund_failed(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::RefundFailed, message)
    }

    /// Resource not found.
    pub fn not_found(resource: &str) -> Self {
        Self::new(PaymentErrorCode::NotFound, format!("{} not found", resource))
    }

    /// True for upstream and timeout failures.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self.code,
            PaymentErrorCode::Upstream | PaymentErrorCode::Timeout
        )
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        let code = match err.code {
            PaymentErrorCode::NotFound => ErrorCode::ReservationNotFound,
            _ => ErrorCode::InternalError,
        };
        DomainError::new(code, err.message)
    }
}

impl From<DomainError> for PaymentError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ReservationNotFound => Self::new(PaymentErrorCode::NotFound, err.message),
            _ => Self::upstream(err.to_string()),
        }
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    Configuration,
    Authentication,
    Upstream,
    Timeout,
    BindingMismatch,
    MalformedResponse,
    RefundFailed,
    NotFound,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentErrorCode::Upstream | PaymentErrorCode::Timeout)
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::Configuration => "configuration_error",
            PaymentErrorCode::Authentication => "authentication_error",
            PaymentErrorCode::Upstream => "upstream_error",
            PaymentErrorCode::Timeout => "timeout",
            PaymentErrorCode::BindingMismatch => "binding_mismatch",
            PaymentErrorCode::MalformedResponse => "malformed_response",
            PaymentErrorCode::RefundFailed => "refund_failed",
            PaymentErrorCode::NotFound => "not_found",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_and_timeout_are_retryable() {
        assert!(PaymentError::upstream("boom").retryable);
        assert!(PaymentError::timeout("slow").retryable);
        assert!(!PaymentError::authentication("bad creds").retryable);
        assert!(!PaymentError::configuration("no webhook id").retryable);
    }

    #[test]
    fn timeout_counts_as_upstream() {
        assert!(PaymentError::timeout("slow").is_upstream());
        assert!(!PaymentError::binding_mismatch("99 != 42").is_upstream());
    }

    #[test]
    fn display_includes_code_and_message() {
        let err = PaymentError::upstream("HTTP 422").with_provider_code("UNPROCESSABLE_ENTITY");
        assert_eq!(err.to_string(), "upstream_error: HTTP 422");
        assert_eq!(err.provider_code.as_deref(), Some("UNPROCESSABLE_ENTITY"));
    }

    #[test]
    fn not_found_maps_to_reservation_not_found() {
        let err: DomainError = PaymentError::not_found("Reservation").into();
        assert_eq!(err.code, ErrorCode::ReservationNotFound);
    }
}
