//! Access token port for the processor's OAuth client-credentials grant.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::domain::payment::PaymentError;

/// Exchanges client credentials for a short-lived bearer token.
///
/// Callers must stay correct when every call fetches a fresh token.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// # Errors
    ///
    /// - `Authentication` if the exchange is not HTTP-successful or has no token
    /// - `Upstream` / `Timeout` on transport failure
    async fn access_token(&self) -> Result<SecretString, PaymentError>;
}
