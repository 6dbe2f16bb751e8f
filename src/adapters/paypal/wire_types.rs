//! PayPal REST request and response bodies.
//!
//! Only the fields this gateway reads or writes are modelled; everything
//! else PayPal sends is ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::payment::{Capture, Money, Order, OrderStatus, PurchaseUnit};

/// Error body shape shared by PayPal REST endpoints.
#[derive(Debug, Deserialize)]
pub struct PaypalErrorBody {
    pub name: Option<String>,
    #[allow(dead_code)]
    pub message: Option<String>,
}

/// `POST /v1/oauth2/token` response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
}

/// `{currency_code, value}` amount object.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct AmountWire {
    pub currency_code: String,
    pub value: String,
}

impl From<&Money> for AmountWire {
    fn from(money: &Money) -> Self {
        Self {
            currency_code: money.currency.clone(),
            value: money.format(),
        }
    }
}

/// `POST /v2/checkout/orders` body.
#[derive(Debug, Serialize)]
pub struct CreateOrderRequest {
    pub intent: &'static str,
    pub purchase_units: Vec<PurchaseUnitRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_source: Option<PaymentSource>,
}

#[derive(Debug, Serialize)]
pub struct PurchaseUnitRequest {
    pub reference_id: String,
    pub description: String,
    pub amount: AmountWire,
}

#[derive(Debug, Serialize)]
pub struct PaymentSource {
    pub paypal: PaypalWallet,
}

#[derive(Debug, Serialize)]
pub struct PaypalWallet {
    pub experience_context: ExperienceContext,
}

#[derive(Debug, Serialize)]
pub struct ExperienceContext {
    pub return_url: String,
    pub cancel_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    pub user_action: &'static str,
}

/// Order body returned by create, get and capture.
#[derive(Debug, Deserialize)]
pub struct OrderResponse {
    pub id: String,
    pub status: Option<String>,
    #[serde(default)]
    pub purchase_units: Vec<PurchaseUnitResponse>,
    #[serde(default)]
    pub links: Vec<LinkDescription>,
}

#[derive(Debug, Deserialize)]
pub struct PurchaseUnitResponse {
    pub reference_id: Option<String>,
    pub payments: Option<PaymentsResponse>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentsResponse {
    #[serde(default)]
    pub captures: Vec<CaptureResponse>,
}

#[derive(Debug, Deserialize)]
pub struct CaptureResponse {
    pub id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LinkDescription {
    pub href: String,
    pub rel: String,
}

impl OrderResponse {
    /// The `payer-action` link the payer approves the order on.
    pub fn approval_url(&self) -> Option<String> {
        self.links
            .iter()
            .find(|link| link.rel == "payer-action")
            .map(|link| link.href.clone())
    }

    pub fn into_order(self) -> Order {
        Order {
            status: OrderStatus::parse(self.status.as_deref().unwrap_or_default()),
            purchase_units: self
                .purchase_units
                .into_iter()
                .map(|unit| PurchaseUnit {
                    reference_id: unit.reference_id,
                    captures: unit
                        .payments
                        .map(|payments| {
                            payments
                                .captures
                                .into_iter()
                                .map(|c| Capture {
                                    id: c.id,
                                    status: c.status,
                                })
                                .collect()
                        })
                        .unwrap_or_default(),
                })
                .collect(),
            id: self.id,
        }
    }
}

/// `POST /v2/payments/captures/{id}/refund` body.
#[derive(Debug, Serialize)]
pub struct RefundRequest {
    pub amount: AmountWire,
}

#[derive(Debug, Deserialize)]
pub struct RefundResponse {
    pub id: String,
    pub status: String,
}

/// `POST /v1/notifications/verify-webhook-signature` body.
#[derive(Debug, Serialize)]
pub struct VerifySignatureRequest<'a> {
    pub auth_algo: &'a str,
    pub cert_url: &'a str,
    pub transmission_id: &'a str,
    pub transmission_sig: &'a str,
    pub transmission_time: &'a str,
    pub webhook_id: &'a str,
    pub webhook_event: &'a Value,
}

#[derive(Debug, Deserialize)]
pub struct VerifySignatureResponse {
    pub verification_status: Option<String>,
}
