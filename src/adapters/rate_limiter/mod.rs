//! Rate limiter adapters.
//!
//! Implementations of the RateLimiter port for different backends.
//!
//! ## Available Adapters
//!
//! - `InMemoryRateLimiter` - In-memory for testing and single-server
//! - `RedisRateLimiter` - Redis-backed for production multi-server
//!
//! ## Usage
//!
//! ```ignore
//! use booking_paypal::adapters::rate_limiter::InMemoryRateLimiter;
//!
//! // For testing
//! let limiter = InMemoryRateLimiter::new();
//!
//! // For production
//! let limiter = RedisRateLimiter::new(redis_connection);
//! ```

mod config;
mod in_memory;
mod redis;

pub use config::CaptureRateLimitConfig;
pub use in_memory::InMemoryRateLimiter;
pub use self::redis::RedisRateLimiter;
