//! Redis-backed rate limiter implementation for production deployments.
//!
//! Suitable for multi-server deployments.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;

use crate::ports::{RateLimitError, RateLimitKey, RateLimiter};

/// Redis-backed attempt counter.
///
/// `hit` runs as one MULTI/EXEC pipeline:
/// 1. `SET key 0 EX decay NX` creates the bucket and its expiry only if absent
/// 2. `INCRBY key weight` adds the attempts
///
/// The expiry is therefore anchored at the first hit of a window.
#[derive(Clone)]
pub struct RedisRateLimiter {
    conn: MultiplexedConnection,
}

impl RedisRateLimiter {
    /// Create a new Redis rate limiter.
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }
}

fn unavailable(e: redis::RedisError) -> RateLimitError {
    RateLimitError::Unavailable(e.to_string())
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn attempts(&self, key: &RateLimitKey) -> Result<u32, RateLimitError> {
        let mut conn = self.conn.clone();

        let count: Option<i64> = conn.get(key.to_redis_key()).await.map_err(unavailable)?;

        Ok(count.unwrap_or(0).max(0) as u32)
    }

    async fn hit(
        &self,
        key: &RateLimitKey,
        weight: u32,
        decay: Duration,
    ) -> Result<u32, RateLimitError> {
        let redis_key = key.to_redis_key();
        let mut conn = self.conn.clone();

        let (count,): (i64,) = redis::pipe()
            .atomic()
            .cmd("SET")
            .arg(&redis_key)
            .arg(0)
            .arg("EX")
            .arg(decay.as_secs().max(1))
            .arg("NX")
            .ignore()
            .cmd("INCRBY")
            .arg(&redis_key)
            .arg(weight)
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;

        Ok(count.max(0) as u32)
    }

    async fn clear(&self, key: &RateLimitKey) -> Result<(), RateLimitError> {
        let mut conn = self.conn.clone();

        conn.del::<_, ()>(key.to_redis_key())
            .await
            .map_err(unavailable)?;

        Ok(())
    }
}

impl std::fmt::Debug for RedisRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisRateLimiter").finish_non_exhaustive()
    }
}
