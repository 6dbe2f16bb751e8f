//! Payment domain: money, processor orders, capture states, checkout
//! flow selection and webhook payloads.

mod capture_state;
mod errors;
mod flow_mode;
mod money;
mod order;
mod webhook;

pub use capture_state::CaptureState;
pub use errors::{PaymentError, PaymentErrorCode};
pub use flow_mode::PaymentFlowMode;
pub use money::Money;
pub use order::{Capture, CreatedOrder, NewOrder, Order, OrderStatus, PurchaseUnit, RefundResult};
pub use webhook::{
    CompleteTransmissionHeaders, TransmissionHeaders, WebhookEventKind, WebhookPayload,
    WebhookRejection, HEADER_AUTH_ALGO, HEADER_CERT_URL, HEADER_TRANSMISSION_ID,
    HEADER_TRANSMISSION_SIG, HEADER_TRANSMISSION_TIME,
};
