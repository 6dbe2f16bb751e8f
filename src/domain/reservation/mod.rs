//! Reservation module - the payment-relevant slice of a booking.

mod aggregate;
mod events;
mod status;

pub use aggregate::{Reservation, SettleOutcome};
pub use events::{CancellationReason, ReservationEvent};
pub use status::ReservationStatus;
