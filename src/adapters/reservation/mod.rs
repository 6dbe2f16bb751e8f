//! Reservation storage adapters.
//!
//! - `InMemoryReservationRepository` - tests and single-process development
//! - `PostgresReservationRepository` - the host system's reservations table

mod in_memory;
mod postgres;

pub use in_memory::InMemoryReservationRepository;
pub use postgres::PostgresReservationRepository;
