//! Redis settings for the shared capture-attempt counters

use redis::aio::MultiplexedConnection;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// `redis://` or `rediss://` URL
    pub url: String,

    /// Startup fails if no connection is made within this many seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl RedisConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Opens the multiplexed connection the rate limiter shares.
    pub async fn connect(&self) -> Result<MultiplexedConnection, redis::RedisError> {
        let client = redis::Client::open(self.url.as_str())?;
        tokio::time::timeout(
            self.connect_timeout(),
            client.get_multiplexed_tokio_connection(),
        )
        .await
        .map_err(|_| {
            redis::RedisError::from((
                redis::ErrorKind::IoError,
                "Redis connect timed out",
            ))
        })?
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("redis.url"));
        }
        if redis::parse_redis_url(&self.url).is_none() {
            return Err(ValidationError::InvalidRedisUrl);
        }
        if self.connect_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_connect_timeout() -> u64 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters(url: &str) -> RedisConfig {
        RedisConfig {
            url: url.to_string(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }

    #[test]
    fn tls_url_is_accepted() {
        assert!(counters("rediss://user:pw@cache.internal:6380").validate().is_ok());
    }

    #[test]
    fn blank_url_is_missing() {
        assert_eq!(
            counters("").validate(),
            Err(ValidationError::MissingRequired("redis.url"))
        );
    }

    #[test]
    fn http_url_is_rejected() {
        assert_eq!(
            counters("http://localhost:6379").validate(),
            Err(ValidationError::InvalidRedisUrl)
        );
    }

    #[test]
    fn zero_connect_timeout_is_rejected() {
        let config = RedisConfig {
            connect_timeout_secs: 0,
            ..counters("redis://localhost:6379")
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
    }
}
