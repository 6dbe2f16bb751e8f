//! Capture rate limit configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Limits applied to capture attempts per client IP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRateLimitConfig {
    /// Attempts allowed within one window before captures are refused.
    pub max_attempts: u32,
    /// Window length, counted from the first attempt.
    pub decay_secs: u64,
    /// Weight of a single reference or token mismatch.
    pub mismatch_penalty: u32,
}

impl CaptureRateLimitConfig {
    pub fn decay(&self) -> Duration {
        Duration::from_secs(self.decay_secs)
    }
}

impl Default for CaptureRateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            decay_secs: 60,
            mismatch_penalty: 3,
        }
    }
}
