//! Webhook signature verification port.

use async_trait::async_trait;

use crate::domain::payment::{PaymentError, TransmissionHeaders};

/// Confirms a webhook delivery really came from the processor.
#[async_trait]
pub trait WebhookSignatureVerifier: Send + Sync {
    /// Returns `Ok(true)` only for a verified delivery.
    ///
    /// Missing headers, a non-success verification response, or a failed
    /// verification call all yield `Ok(false)`.
    ///
    /// # Errors
    ///
    /// - `Configuration` if no webhook id is configured
    /// - `Authentication` if no bearer token could be obtained
    async fn verify(
        &self,
        headers: &TransmissionHeaders,
        raw_body: &[u8],
    ) -> Result<bool, PaymentError>;
}
