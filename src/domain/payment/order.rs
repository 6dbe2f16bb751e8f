//! Processor-side order model.
//!
//! Orders are referenced, never owned: the processor is the source of
//! truth and these types only carry what reconciliation needs.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Money;

/// Order status as reported by the processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Created,
    Saved,
    Approved,
    Voided,
    Completed,
    PayerActionRequired,
    Pending,
    /// Anything the processor adds later.
    Unknown(String),
}

impl OrderStatus {
    /// Parses the processor's upper-case status string.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "CREATED" => OrderStatus::Created,
            "SAVED" => OrderStatus::Saved,
            "APPROVED" => OrderStatus::Approved,
            "VOIDED" => OrderStatus::Voided,
            "COMPLETED" => OrderStatus::Completed,
            "PAYER_ACTION_REQUIRED" => OrderStatus::PayerActionRequired,
            "PENDING" => OrderStatus::Pending,
            other => OrderStatus::Unknown(other.to_string()),
        }
    }

    /// Returns the processor's string form.
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::Saved => "SAVED",
            OrderStatus::Approved => "APPROVED",
            OrderStatus::Voided => "VOIDED",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::PayerActionRequired => "PAYER_ACTION_REQUIRED",
            OrderStatus::Pending => "PENDING",
            OrderStatus::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single capture recorded against a purchase unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    pub id: Option<String>,
    pub status: Option<String>,
}

/// A purchase unit of an order. Only the first one is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseUnit {
    pub reference_id: Option<String>,
    pub captures: Vec<Capture>,
}

/// Order as returned by get-order and capture-order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub status: OrderStatus,
    pub purchase_units: Vec<PurchaseUnit>,
}

impl Order {
    /// Reference id of the first purchase unit, binding the order to a reservation.
    pub fn reference_id(&self) -> Option<&str> {
        self.purchase_units
            .first()
            .and_then(|unit| unit.reference_id.as_deref())
    }

    /// Identifier of the first capture of the first purchase unit.
    ///
    /// Empty identifiers are treated as absent.
    pub fn first_capture_id(&self) -> Option<&str> {
        self.purchase_units
            .first()
            .and_then(|unit| unit.captures.first())
            .and_then(|capture| capture.id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

/// Parameters for creating an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub amount: Money,
    /// Reservation id as a string.
    pub reference_id: String,
    pub description: String,
    /// Present only in the redirect flow.
    pub return_url: Option<String>,
    pub cancel_url: Option<String>,
    pub brand_name: Option<String>,
}

/// Result of order creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedOrder {
    pub order_id: String,
    /// The `payer-action` link, when the processor returned one.
    pub approval_url: Option<String>,
}

/// Result of a capture refund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundResult {
    pub refund_id: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(reference: Option<&str>, captures: Vec<Option<&str>>) -> Order {
        Order {
            id: "ORDER-1".to_string(),
            status: OrderStatus::Completed,
            purchase_units: vec![PurchaseUnit {
                reference_id: reference.map(String::from),
                captures: captures
                    .into_iter()
                    .map(|id| Capture {
                        id: id.map(String::from),
                        status: Some("COMPLETED".to_string()),
                    })
                    .collect(),
            }],
        }
    }

    #[test]
    fn parses_known_and_unknown_statuses() {
        assert_eq!(OrderStatus::parse("COMPLETED"), OrderStatus::Completed);
        assert_eq!(OrderStatus::parse("PENDING"), OrderStatus::Pending);
        assert_eq!(
            OrderStatus::parse("PAYER_ACTION_REQUIRED"),
            OrderStatus::PayerActionRequired
        );
        let unknown = OrderStatus::parse("REVERSED");
        assert_eq!(unknown, OrderStatus::Unknown("REVERSED".to_string()));
        assert_eq!(unknown.to_string(), "REVERSED");
    }

    #[test]
    fn reference_id_comes_from_first_purchase_unit() {
        assert_eq!(order(Some("42"), vec![]).reference_id(), Some("42"));
        assert_eq!(order(None, vec![]).reference_id(), None);

        let empty = Order {
            id: "ORDER-2".to_string(),
            status: OrderStatus::Created,
            purchase_units: vec![],
        };
        assert_eq!(empty.reference_id(), None);
    }

    #[test]
    fn first_capture_id_ignores_missing_and_empty_ids() {
        assert_eq!(
            order(Some("42"), vec![Some("CAP-1"), Some("CAP-2")]).first_capture_id(),
            Some("CAP-1")
        );
        assert_eq!(order(Some("42"), vec![]).first_capture_id(), None);
        assert_eq!(order(Some("42"), vec![None]).first_capture_id(), None);
        assert_eq!(order(Some("42"), vec![Some("")]).first_capture_id(), None);
    }
}
