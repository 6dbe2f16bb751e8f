//! Checkout flow selection.

use serde::{Deserialize, Serialize};

/// How the payer approves an order.
///
/// `Redirect` sends the payer to the processor's approval page and
/// captures when they come back. `InlineSdk` hands the order id to the
/// client-side SDK, which captures through `POST /capture/{order_id}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFlowMode {
    #[default]
    Redirect,
    InlineSdk,
}

impl PaymentFlowMode {
    /// Whether payment intents carry a redirect target.
    pub fn redirects_for_payment(&self) -> bool {
        matches!(self, PaymentFlowMode::Redirect)
    }

    /// Parses the configuration value (`redirect` or `inline_sdk`).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "redirect" => Some(PaymentFlowMode::Redirect),
            "inline_sdk" | "inline-sdk" | "sdk" => Some(PaymentFlowMode::InlineSdk),
            _ => None,
        }
    }
}
