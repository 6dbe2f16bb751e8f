//! PayPal configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::payment::PaymentFlowMode;

use super::error::ValidationError;

/// PayPal REST credentials and checkout settings
#[derive(Debug, Clone, Deserialize)]
pub struct PaypalConfig {
    /// REST app client id, also handed to the browser SDK
    pub client_id: String,

    /// REST app client secret
    pub client_secret: SecretString,

    /// `sandbox` or `live`
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Webhook id registered with PayPal. Verification fails without it.
    pub webhook_id: Option<String>,

    /// Settlement currency (ISO 4217)
    #[serde(default = "default_currency")]
    pub currency: String,

    /// `redirect` or `inline_sdk`
    #[serde(default)]
    pub flow_mode: PaymentFlowMode,

    /// Host page PayPal returns the payer to
    pub checkout_complete_url: String,

    /// Merchant name on the approval page
    pub brand_name: Option<String>,

    /// Outbound PayPal request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl PaypalConfig {
    pub fn is_live(&self) -> bool {
        self.mode.eq_ignore_ascii_case("live")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Webhook id with blank values treated as absent
    pub fn webhook_id(&self) -> Option<&str> {
        self.webhook_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Validate PayPal configuration
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if self.client_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("PAYPAL_CLIENT_ID"));
        }
        if self.client_secret.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("PAYPAL_CLIENT_SECRET"));
        }
        if !matches!(self.mode.to_ascii_lowercase().as_str(), "sandbox" | "live") {
            return Err(ValidationError::InvalidPaypalMode);
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidCurrency);
        }

        let url = self.checkout_complete_url.trim();
        if url.is_empty() {
            return Err(ValidationError::MissingRequired("PAYPAL_CHECKOUT_COMPLETE_URL"));
        }
        if !url.starts_with("https://") && !url.starts_with("http://") {
            return Err(ValidationError::InvalidCheckoutUrl);
        }
        if production && !url.starts_with("https://") {
            return Err(ValidationError::CheckoutUrlMustBeHttps);
        }

        if self.request_timeout_secs == 0 || self.request_timeout_secs > 60 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_mode() -> String {
    "sandbox".to_string()
}

fn default_currency() -> String {
    "EUR".to_string()
}

fn default_request_timeout() -> u64 {
    5
}
