//! In-memory rate limiter implementation for testing and development.
//!
//! Each bucket expires `decay` after its first hit. Expired buckets are
//! swept once the map grows past a threshold, which doubles with the live
//! set. Not suitable for multi-server deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::ports::{RateLimitError, RateLimitKey, RateLimiter};

/// Bucket count that triggers the first sweep of expired buckets.
pub const DEFAULT_SWEEP_THRESHOLD: usize = 1024;

/// In-memory attempt counter.
#[derive(Debug, Clone)]
pub struct InMemoryRateLimiter {
    state: Arc<RwLock<State>>,
    sweep_threshold: usize,
}

#[derive(Debug)]
struct State {
    buckets: HashMap<String, Bucket>,
    next_sweep: usize,
}

#[derive(Debug, Clone)]
struct Bucket {
    count: u32,
    expires_at: Instant,
}

impl Bucket {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

impl InMemoryRateLimiter {
    pub fn new() -> Self {
        Self::with_sweep_threshold(DEFAULT_SWEEP_THRESHOLD)
    }

    pub fn with_sweep_threshold(threshold: usize) -> Self {
        let threshold = threshold.max(1);
        Self {
            state: Arc::new(RwLock::new(State {
                buckets: HashMap::new(),
                next_sweep: threshold,
            })),
            sweep_threshold: threshold,
        }
    }

    /// Number of buckets held, live or expired.
    pub async fn bucket_count(&self) -> usize {
        self.state.read().await.buckets.len()
    }
}

impl Default for InMemoryRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    fn sweep_if_due(&mut self, now: Instant, threshold: usize) {
        if self.buckets.len() < self.next_sweep {
            return;
        }
        let before = self.buckets.len();
        self.buckets.retain(|_, bucket| bucket.is_live(now));
        self.next_sweep = threshold.max(self.buckets.len().saturating_mul(2));
        tracing::debug!(
            removed = before - self.buckets.len(),
            remaining = self.buckets.len(),
            "Swept expired rate-limit buckets"
        );
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn attempts(&self, key: &RateLimitKey) -> Result<u32, RateLimitError> {
        let now = Instant::now();
        let state = self.state.read().await;
        Ok(state
            .buckets
            .get(&key.to_redis_key())
            .filter(|bucket| bucket.is_live(now))
            .map(|bucket| bucket.count)
            .unwrap_or(0))
    }

    async fn hit(
        &self,
        key: &RateLimitKey,
        weight: u32,
        decay: Duration,
    ) -> Result<u32, RateLimitError> {
        let now = Instant::now();
        let mut state = self.state.write().await;
        state.sweep_if_due(now, self.sweep_threshold);

        let bucket = state.buckets.entry(key.to_redis_key()).or_insert_with(|| Bucket {
            count: 0,
            expires_at: now + decay,
        });

        // Expired bucket starts a fresh window
        if !bucket.is_live(now) {
            bucket.count = 0;
            bucket.expires_at = now + decay;
        }

        bucket.count = bucket.count.saturating_add(weight);
        Ok(bucket.count)
    }

    async fn clear(&self, key: &RateLimitKey) -> Result<(), RateLimitError> {
        let mut state = self.state.write().await;
        state.buckets.remove(&key.to_redis_key());
        Ok(())
    }
}
