//! Capture rate limit configuration

use serde::Deserialize;

use crate::adapters::rate_limiter::CaptureRateLimitConfig;

use super::error::ValidationError;

/// Per-IP capture attempt limits
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Window length in seconds
    #[serde(default = "default_decay_secs")]
    pub decay_secs: u64,

    /// Weight of one reference or token mismatch
    #[serde(default = "default_mismatch_penalty")]
    pub mismatch_penalty: u32,
}

impl RateLimitConfig {
    pub fn capture_limits(&self) -> CaptureRateLimitConfig {
        CaptureRateLimitConfig {
            max_attempts: self.max_attempts,
            decay_secs: self.decay_secs,
            mismatch_penalty: self.mismatch_penalty,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_attempts == 0 || self.decay_secs == 0 || self.mismatch_penalty == 0 {
            return Err(ValidationError::InvalidRateLimit);
        }
        Ok(())
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            decay_secs: default_decay_secs(),
            mismatch_penalty: default_mismatch_penalty(),
        }
    }
}

fn default_max_attempts() -> u32 {
    10
}

fn default_decay_secs() -> u64 {
    60
}

fn default_mismatch_penalty() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_capture_limits() {
        assert_eq!(
            RateLimitConfig::default().capture_limits(),
            CaptureRateLimitConfig::default()
        );
    }

    #[test]
    fn test_zero_values_rejected() {
        let config = RateLimitConfig {
            max_attempts: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidRateLimit));
    }
}
