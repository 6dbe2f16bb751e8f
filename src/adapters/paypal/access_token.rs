//! OAuth client-credentials exchange.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::payment::PaymentError;
use crate::ports::AccessTokenProvider;

use super::api::{transport_error, PaypalApi};
use super::wire_types::TokenResponse;

/// Fetches a fresh bearer token on every call.
#[derive(Debug, Clone)]
pub struct PaypalAccessTokenProvider {
    api: PaypalApi,
}

impl PaypalAccessTokenProvider {
    pub fn new(api: PaypalApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AccessTokenProvider for PaypalAccessTokenProvider {
    async fn access_token(&self) -> Result<SecretString, PaymentError> {
        let config = self.api.config();

        let response = self
            .api
            .http()
            .post(self.api.url("/v1/oauth2/token"))
            .basic_auth(config.client_id(), Some(config.client_secret().expose_secret()))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(status, error = %error_text, "PayPal token exchange failed");
            return Err(PaymentError::authentication(
                "Failed to obtain PayPal access token",
            ));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            PaymentError::authentication(format!("Unreadable PayPal token response: {}", e))
        })?;

        token
            .access_token
            .filter(|t| !t.is_empty())
            .map(SecretString::new)
            .ok_or_else(|| PaymentError::authentication("PayPal token response had no token"))
    }
}
