//! Shared PayPal REST plumbing: base URL selection, credentials, the HTTP
//! client and response normalisation.

use secrecy::SecretString;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::domain::payment::PaymentError;

use super::wire_types::PaypalErrorBody;

/// Production REST endpoint.
pub const LIVE_BASE_URL: &str = "https://api-m.paypal.com";
/// Sandbox REST endpoint.
pub const SANDBOX_BASE_URL: &str = "https://api-m.sandbox.paypal.com";

/// Outbound timeout unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// PayPal API configuration.
#[derive(Clone)]
pub struct PaypalApiConfig {
    client_id: String,
    client_secret: SecretString,
    /// Webhook id registered with PayPal. Required only for verification.
    webhook_id: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl PaypalApiConfig {
    /// Create a configuration for the given mode.
    ///
    /// `live` (any case) selects production, anything else the sandbox.
    pub fn new(client_id: impl Into<String>, client_secret: SecretString, mode: &str) -> Self {
        let base_url = if mode.eq_ignore_ascii_case("live") {
            LIVE_BASE_URL
        } else {
            SANDBOX_BASE_URL
        };

        Self {
            client_id: client_id.into(),
            client_secret,
            webhook_id: None,
            base_url: base_url.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the webhook id used for signature verification.
    pub fn with_webhook_id(mut self, webhook_id: Option<String>) -> Self {
        self.webhook_id = webhook_id.filter(|id| !id.trim().is_empty());
        self
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the outbound request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &SecretString {
        &self.client_secret
    }

    pub fn webhook_id(&self) -> Option<&str> {
        self.webhook_id.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl std::fmt::Debug for PaypalApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaypalApiConfig")
            .field("client_id", &self.client_id)
            .field("base_url", &self.base_url)
            .field("webhook_id", &self.webhook_id)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Configured HTTP client shared by the PayPal adapters.
#[derive(Debug, Clone)]
pub struct PaypalApi {
    config: PaypalApiConfig,
    http_client: reqwest::Client,
}

impl PaypalApi {
    /// # Errors
    ///
    /// `Configuration` if the HTTP client cannot be built.
    pub fn new(config: PaypalApiConfig) -> Result<Self, PaymentError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &PaypalApiConfig {
        &self.config
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http_client
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }
}

/// Maps a transport error, keeping timeouts distinct.
pub(crate) fn transport_error(err: reqwest::Error) -> PaymentError {
    if err.is_timeout() {
        PaymentError::timeout(err.to_string())
    } else {
        PaymentError::upstream(err.to_string())
    }
}

/// Turns a response into `T`, or an `Upstream` error carrying the raw body.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    operation: &'static str,
) -> Result<T, PaymentError> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        tracing::error!(
            operation,
            status = status.as_u16(),
            error = %body,
            "PayPal API call failed"
        );
        let mut err = PaymentError::upstream(format!(
            "PayPal {} failed with HTTP {}: {}",
            operation,
            status.as_u16(),
            body
        ));
        if let Some(name) = serde_json::from_str::<PaypalErrorBody>(&body)
            .ok()
            .and_then(|e| e.name)
        {
            err = err.with_provider_code(name);
        }
        return Err(err);
    }

    serde_json::from_str(&body).map_err(|e| {
        PaymentError::malformed_response(format!(
            "Failed to parse PayPal {} response: {}",
            operation, e
        ))
    })
}
