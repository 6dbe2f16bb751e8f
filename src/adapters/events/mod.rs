//! Reservation event adapters.
//!
//! - `InMemoryEventPublisher` - records and logs events in-process

mod in_memory;

pub use in_memory::InMemoryEventPublisher;
