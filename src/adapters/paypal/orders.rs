//! Orders v2 and captures-refund client.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::payment::{CreatedOrder, Money, NewOrder, Order, PaymentError, RefundResult};
use crate::ports::{AccessTokenProvider, OrderLifecycleClient};

use super::api::{read_json, transport_error, PaypalApi};
use super::wire_types::{
    AmountWire, CreateOrderRequest, ExperienceContext, OrderResponse, PaymentSource,
    PaypalWallet, PurchaseUnitRequest, RefundRequest, RefundResponse,
};

const REQUEST_ID_HEADER: &str = "PayPal-Request-Id";

/// PayPal implementation of [`OrderLifecycleClient`].
///
/// Every request carries a fresh bearer token; mutating requests carry a
/// `PayPal-Request-Id` so a replayed call cannot capture or refund twice.
pub struct PaypalOrdersClient {
    api: PaypalApi,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl PaypalOrdersClient {
    pub fn new(api: PaypalApi, tokens: Arc<dyn AccessTokenProvider>) -> Self {
        Self { api, tokens }
    }

    async fn bearer(&self) -> Result<String, PaymentError> {
        Ok(self.tokens.access_token().await?.expose_secret().clone())
    }
}

/// Processor ids end up in URL paths and must not carry path syntax.
fn checked_id<'a>(id: &'a str, resource: &str) -> Result<&'a str, PaymentError> {
    let valid = !id.is_empty()
        && id.len() <= 64
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(id)
    } else {
        Err(PaymentError::not_found(resource))
    }
}

fn create_order_body(order: &NewOrder) -> CreateOrderRequest {
    let payment_source = match (&order.return_url, &order.cancel_url) {
        (Some(return_url), Some(cancel_url)) => Some(PaymentSource {
            paypal: PaypalWallet {
                experience_context: ExperienceContext {
                    return_url: return_url.clone(),
                    cancel_url: cancel_url.clone(),
                    brand_name: order.brand_name.clone(),
                    user_action: "PAY_NOW",
                },
            },
        }),
        _ => None,
    };

    CreateOrderRequest {
        intent: "CAPTURE",
        purchase_units: vec![PurchaseUnitRequest {
            reference_id: order.reference_id.clone(),
            description: order.description.clone(),
            amount: AmountWire::from(&order.amount),
        }],
        payment_source,
    }
}

#[async_trait]
impl OrderLifecycleClient for PaypalOrdersClient {
    async fn create_order(&self, order: &NewOrder) -> Result<CreatedOrder, PaymentError> {
        let token = self.bearer().await?;

        let response = self
            .api
            .http()
            .post(self.api.url("/v2/checkout/orders"))
            .bearer_auth(token)
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string())
            .json(&create_order_body(order))
            .send()
            .await
            .map_err(transport_error)?;

        let created: OrderResponse = read_json(response, "create order").await?;

        Ok(CreatedOrder {
            approval_url: created.approval_url(),
            order_id: created.id,
        })
    }

    async fn get_order(&self, order_id: &str) -> Result<Order, PaymentError> {
        let order_id = checked_id(order_id, "PayPal order")?;
        let token = self.bearer().await?;

        let response = self
            .api
            .http()
            .get(self.api.url(&format!("/v2/checkout/orders/{}", order_id)))
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;

        let order: OrderResponse = read_json(response, "get order").await?;
        Ok(order.into_order())
    }

    async fn capture_order(&self, order_id: &str) -> Result<Order, PaymentError> {
        let order_id = checked_id(order_id, "PayPal order")?;
        let token = self.bearer().await?;

        let response = self
            .api
            .http()
            .post(self.api.url(&format!("/v2/checkout/orders/{}/capture", order_id)))
            .bearer_auth(token)
            .header(REQUEST_ID_HEADER, format!("capture-{}", order_id))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body("{}")
            .send()
            .await
            .map_err(transport_error)?;

        let order: OrderResponse = read_json(response, "capture order").await?;
        Ok(order.into_order())
    }

    async fn refund_capture(
        &self,
        capture_id: &str,
        amount: &Money,
    ) -> Result<RefundResult, PaymentError> {
        let capture_id = checked_id(capture_id, "PayPal capture")?;
        let token = self.bearer().await?;

        let response = self
            .api
            .http()
            .post(self.api.url(&format!("/v2/payments/captures/{}/refund", capture_id)))
            .bearer_auth(token)
            .header(REQUEST_ID_HEADER, format!("refund-{}", capture_id))
            .json(&RefundRequest {
                amount: AmountWire::from(amount),
            })
            .send()
            .await
            .map_err(transport_error)?;

        let refund: RefundResponse = read_json(response, "refund capture").await?;

        Ok(RefundResult {
            refund_id: refund.id,
            status: refund.status,
        })
    }
}
