//! Reservation store connection settings
//!
//! The store only serves single-row lookups and conditional updates, so the
//! pool stays small and fails fast when no connection is free.

use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use super::error::ValidationError;

const MAX_POOL_SIZE: u32 = 32;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `postgres://` URL of the database holding the `reservations` table
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds to wait for a free connection before the request fails
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("database.url"));
        }
        if !["postgres://", "postgresql://"]
            .iter()
            .any(|scheme| self.url.starts_with(scheme))
        {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.max_connections == 0 || self.max_connections > MAX_POOL_SIZE {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.acquire_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_max_connections() -> u32 {
    8
}

fn default_acquire_timeout() -> u64 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
        }
    }

    #[test]
    fn postgres_url_with_defaults_is_valid() {
        let config = store("postgresql://booking:pw@db:5432/booking");
        assert!(config.validate().is_ok());
        assert_eq!(config.acquire_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn blank_url_is_missing() {
        assert_eq!(
            store(" ").validate(),
            Err(ValidationError::MissingRequired("database.url"))
        );
    }

    #[test]
    fn non_postgres_url_is_rejected() {
        assert_eq!(
            store("mysql://localhost/booking").validate(),
            Err(ValidationError::InvalidDatabaseUrl)
        );
    }

    #[test]
    fn pool_size_must_be_bounded() {
        for size in [0, MAX_POOL_SIZE + 1] {
            let config = DatabaseConfig {
                max_connections: size,
                ..store("postgres://localhost/booking")
            };
            assert_eq!(config.validate(), Err(ValidationError::InvalidPoolSize));
        }
    }

    #[test]
    fn zero_acquire_timeout_is_rejected() {
        let config = DatabaseConfig {
            acquire_timeout_secs: 0,
            ..store("postgres://localhost/booking")
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
    }
}
