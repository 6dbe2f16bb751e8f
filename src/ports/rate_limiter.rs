//! Rate limiting port for bounding capture attempts.
//!
//! The limiter is an attempt counter with expiry: callers `hit` a key with a
//! weight, ask how many attempts it holds, and `clear` it on success.
//! Implementations can use in-memory storage for testing or Redis for
//! production.

use async_trait::async_trait;
use std::time::Duration;

/// Port for attempt-counting rate limits.
///
/// Implementations must make `hit` an atomic increment-with-expiry so
/// concurrent requests from one source cannot undercount.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Current number of attempts recorded for the key (0 if none or expired).
    async fn attempts(&self, key: &RateLimitKey) -> Result<u32, RateLimitError>;

    /// Adds `weight` attempts to the key, starting a `decay` window if the
    /// bucket does not exist yet. Returns the new total.
    async fn hit(
        &self,
        key: &RateLimitKey,
        weight: u32,
        decay: Duration,
    ) -> Result<u32, RateLimitError>;

    /// Removes the bucket entirely.
    async fn clear(&self, key: &RateLimitKey) -> Result<(), RateLimitError>;

    /// True when the key has reached `max_attempts`.
    async fn too_many_attempts(
        &self,
        key: &RateLimitKey,
        max_attempts: u32,
    ) -> Result<bool, RateLimitError> {
        Ok(self.attempts(key).await? >= max_attempts)
    }
}

/// Operation class for PayPal capture attempts.
pub const CAPTURE_RESOURCE: &str = "paypal-capture";

/// Key identifying a rate-limit bucket: a client IP plus an operation class.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct RateLimitKey {
    /// Client IP address.
    pub identifier: String,
    /// Operation class (e.g. `paypal-capture`).
    pub resource: String,
}

impl RateLimitKey {
    /// Creates an IP-based key for a specific operation class.
    pub fn ip_resource(ip: &str, resource: &str) -> Self {
        Self {
            identifier: ip.to_string(),
            resource: resource.to_string(),
        }
    }

    /// Key for capture attempts from one IP.
    pub fn capture_attempts(ip: &str) -> Self {
        Self::ip_resource(ip, CAPTURE_RESOURCE)
    }

    /// Returns the Redis key string for this rate limit key.
    pub fn to_redis_key(&self) -> String {
        format!("ratelimit:ip:{}:{}", self.identifier, self.resource)
    }
}

/// Errors that can occur during rate limiting operations.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    /// Rate limiter backend is unavailable.
    #[error("rate limiter unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_key_uses_capture_resource() {
        let key = RateLimitKey::capture_attempts("192.168.1.1");
        assert_eq!(key.identifier, "192.168.1.1");
        assert_eq!(key.resource, "paypal-capture");
    }

    #[test]
    fn redis_key_format() {
        let key = RateLimitKey::capture_attempts("10.0.0.1");
        assert_eq!(key.to_redis_key(), "ratelimit:ip:10.0.0.1:paypal-capture");
    }

    #[test]
    fn keys_differ_per_ip() {
        assert_ne!(
            RateLimitKey::capture_attempts("10.0.0.1"),
            RateLimitKey::capture_attempts("10.0.0.2")
        );
    }
}
