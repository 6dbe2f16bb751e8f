//! Webhook signature verification through PayPal's verification API.
//!
//! Fails closed: the only path to `Ok(true)` is a 2xx response whose
//! `verification_status` is `SUCCESS`.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::Value;
use std::sync::Arc;

use crate::domain::payment::{PaymentError, TransmissionHeaders};
use crate::ports::{AccessTokenProvider, WebhookSignatureVerifier};

use super::api::PaypalApi;
use super::wire_types::{VerifySignatureRequest, VerifySignatureResponse};

/// Marker PayPal returns for a genuine delivery.
const VERIFICATION_SUCCESS: &str = "SUCCESS";

pub struct PaypalWebhookVerifier {
    api: PaypalApi,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl PaypalWebhookVerifier {
    pub fn new(api: PaypalApi, tokens: Arc<dyn AccessTokenProvider>) -> Self {
        Self { api, tokens }
    }
}

#[async_trait]
impl WebhookSignatureVerifier for PaypalWebhookVerifier {
    async fn verify(
        &self,
        headers: &TransmissionHeaders,
        raw_body: &[u8],
    ) -> Result<bool, PaymentError> {
        let webhook_id = self.api.config().webhook_id().ok_or_else(|| {
            PaymentError::configuration("PayPal webhook id is not configured")
        })?;

        let headers = match headers.require_complete() {
            Ok(headers) => headers,
            Err(missing) => {
                tracing::warn!(header = missing, "PayPal webhook missing required header");
                return Ok(false);
            }
        };

        let event: Value = match serde_json::from_slice(raw_body) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "PayPal webhook body is not JSON");
                return Ok(false);
            }
        };

        let token = self.tokens.access_token().await?;

        let request = VerifySignatureRequest {
            auth_algo: &headers.auth_algo,
            cert_url: &headers.cert_url,
            transmission_id: &headers.transmission_id,
            transmission_sig: &headers.transmission_sig,
            transmission_time: &headers.transmission_time,
            webhook_id,
            webhook_event: &event,
        };

        let response = match self
            .api
            .http()
            .post(self.api.url("/v1/notifications/verify-webhook-signature"))
            .bearer_auth(token.expose_secret())
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "PayPal signature verification call failed");
                return Ok(false);
            }
        };

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(status, error = %error_text, "PayPal signature verification rejected");
            return Ok(false);
        }

        let verdict: VerifySignatureResponse = match response.json().await {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::error!(error = %e, "Unreadable PayPal verification response");
                return Ok(false);
            }
        };

        let verified = verdict.verification_status.as_deref() == Some(VERIFICATION_SUCCESS);
        if !verified {
            tracing::warn!(
                transmission_id = %headers.transmission_id,
                status = ?verdict.verification_status,
                "PayPal webhook signature not verified"
            );
        }
        Ok(verified)
    }
}
