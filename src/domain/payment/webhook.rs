//! PayPal webhook payloads and transmission headers.

use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Header carrying the signing algorithm.
pub const HEADER_AUTH_ALGO: &str = "PAYPAL-AUTH-ALGO";
/// Header carrying the signing certificate URL.
pub const HEADER_CERT_URL: &str = "PAYPAL-CERT-URL";
/// Header carrying the transmission id.
pub const HEADER_TRANSMISSION_ID: &str = "PAYPAL-TRANSMISSION-ID";
/// Header carrying the transmission signature.
pub const HEADER_TRANSMISSION_SIG: &str = "PAYPAL-TRANSMISSION-SIG";
/// Header carrying the transmission time.
pub const HEADER_TRANSMISSION_TIME: &str = "PAYPAL-TRANSMISSION-TIME";

/// Webhook event types this gateway reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEventKind {
    CaptureCompleted,
    CaptureDenied,
    CaptureRefunded,
    /// Acknowledged without action.
    Other(String),
}

impl WebhookEventKind {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "PAYMENT.CAPTURE.COMPLETED" => WebhookEventKind::CaptureCompleted,
            "PAYMENT.CAPTURE.DENIED" => WebhookEventKind::CaptureDenied,
            "PAYMENT.CAPTURE.REFUNDED" => WebhookEventKind::CaptureRefunded,
            other => WebhookEventKind::Other(other.to_string()),
        }
    }

    /// True for the capture events that drive reservation transitions.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, WebhookEventKind::Other(_))
    }
}

/// A parsed (not yet verified) webhook body.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookPayload {
    pub event_id: Option<String>,
    pub kind: WebhookEventKind,
    /// `resource.id`: the capture identifier for capture events.
    pub resource_id: Option<String>,
    /// The full body, forwarded to the verification endpoint.
    pub raw: Value,
}

impl WebhookPayload {
    /// Parses a raw body.
    ///
    /// Anything other than a non-empty JSON object is rejected.
    pub fn parse(body: &[u8]) -> Result<Self, WebhookRejection> {
        let raw: Value = serde_json::from_slice(body)
            .map_err(|e| WebhookRejection::MalformedPayload(e.to_string()))?;

        let object = raw
            .as_object()
            .filter(|map| !map.is_empty())
            .ok_or_else(|| {
                WebhookRejection::MalformedPayload("payload is not a JSON object".to_string())
            })?;

        let kind = object
            .get("event_type")
            .and_then(Value::as_str)
            .map(WebhookEventKind::parse)
            .unwrap_or_else(|| WebhookEventKind::Other(String::new()));
        let event_id = object.get("id").and_then(Value::as_str).map(String::from);
        let resource_id = object
            .get("resource")
            .and_then(|resource| resource.get("id"))
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(String::from);

        Ok(Self {
            event_id,
            kind,
            resource_id,
            raw,
        })
    }
}

/// The five transmission headers PayPal signs a delivery with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransmissionHeaders {
    pub auth_algo: Option<String>,
    pub cert_url: Option<String>,
    pub transmission_id: Option<String>,
    pub transmission_sig: Option<String>,
    pub transmission_time: Option<String>,
}

/// Transmission headers with every value present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteTransmissionHeaders {
    pub auth_algo: String,
    pub cert_url: String,
    pub transmission_id: String,
    pub transmission_sig: String,
    pub transmission_time: String,
}

impl TransmissionHeaders {
    /// Builds the headers from a case-insensitive lookup function.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            auth_algo: lookup(HEADER_AUTH_ALGO),
            cert_url: lookup(HEADER_CERT_URL),
            transmission_id: lookup(HEADER_TRANSMISSION_ID),
            transmission_sig: lookup(HEADER_TRANSMISSION_SIG),
            transmission_time: lookup(HEADER_TRANSMISSION_TIME),
        }
    }

    /// Returns all five values, or the name of the first missing header.
    ///
    /// Empty values count as missing.
    pub fn require_complete(&self) -> Result<CompleteTransmissionHeaders, &'static str> {
        fn take(value: &Option<String>, name: &'static str) -> Result<String, &'static str> {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(String::from)
                .ok_or(name)
        }

        Ok(CompleteTransmissionHeaders {
            auth_algo: take(&self.auth_algo, HEADER_AUTH_ALGO)?,
            cert_url: take(&self.cert_url, HEADER_CERT_URL)?,
            transmission_id: take(&self.transmission_id, HEADER_TRANSMISSION_ID)?,
            transmission_sig: take(&self.transmission_sig, HEADER_TRANSMISSION_SIG)?,
            transmission_time: take(&self.transmission_time, HEADER_TRANSMISSION_TIME)?,
        })
    }
}

/// Reasons a webhook delivery is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookRejection {
    /// Body is not a JSON object.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Signature did not verify, or verification could not run.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Reservation storage failed after the delivery was authenticated.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl WebhookRejection {
    /// Maps the rejection to the status PayPal sees.
    ///
    /// 5xx makes PayPal redeliver; 403 does not.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookRejection::MalformedPayload(_) | WebhookRejection::InvalidSignature => {
                StatusCode::FORBIDDEN
            }
            WebhookRejection::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
