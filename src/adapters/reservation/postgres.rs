//! PostgreSQL implementation of ReservationRepository.
//!
//! Expects the host system's `reservations` table to carry:
//!
//! ```sql
//! id               TEXT PRIMARY KEY,
//! status           TEXT NOT NULL,
//! amount_minor     BIGINT NOT NULL,
//! currency         TEXT NOT NULL,
//! description      TEXT NOT NULL,
//! payment_id       TEXT NULL UNIQUE,
//! pending_order_id TEXT NULL UNIQUE,
//! created_at       TIMESTAMPTZ NOT NULL,
//! updated_at       TIMESTAMPTZ NOT NULL
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, ReservationId, Timestamp};
use crate::domain::payment::Money;
use crate::domain::reservation::{Reservation, ReservationStatus, SettleOutcome};
use crate::ports::ReservationRepository;

const SELECT_COLUMNS: &str = r#"
    SELECT id, status, amount_minor, currency, description,
           payment_id, pending_order_id, created_at, updated_at
    FROM reservations
"#;

/// PostgreSQL implementation of the ReservationRepository port.
pub struct PostgresReservationRepository {
    pool: PgPool,
}

impl PostgresReservationRepository {
    /// Creates a new PostgresReservationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(
        &self,
        column: &'static str,
        value: &str,
    ) -> Result<Option<Reservation>, DomainError> {
        let row: Option<ReservationRow> =
            sqlx::query_as(&format!("{} WHERE {} = $1", SELECT_COLUMNS, column))
                .bind(value)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("Failed to find reservation", e))?;

        row.map(Reservation::try_from).transpose()
    }
}

/// Database row representation of a reservation.
#[derive(Debug, sqlx::FromRow)]
struct ReservationRow {
    id: String,
    status: String,
    amount_minor: i64,
    currency: String,
    description: String,
    payment_id: Option<String>,
    pending_order_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = DomainError;

    fn try_from(row: ReservationRow) -> Result<Self, Self::Error> {
        let status = ReservationStatus::parse(&row.status).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid status value: {}", row.status),
            )
        })?;
        let amount = Money::new(row.amount_minor, row.currency).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid amount: {}", e))
        })?;
        let id = ReservationId::new(row.id).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid id: {}", e))
        })?;

        Ok(Reservation {
            id,
            status,
            amount,
            description: row.description,
            payment_id: row.payment_id,
            pending_order_id: row.pending_order_id,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

/// Result of the conditional settlement statement.
#[derive(Debug, sqlx::FromRow)]
struct SettleRow {
    previous: Option<String>,
    written: bool,
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::database(format!("{}: {}", context, e))
}

fn not_found(id: &ReservationId) -> DomainError {
    DomainError::new(ErrorCode::ReservationNotFound, "Reservation not found")
        .with_detail("reservation_id", id.as_str())
}

#[async_trait]
impl ReservationRepository for PostgresReservationRepository {
    async fn find_by_id(&self, id: &ReservationId) -> Result<Option<Reservation>, DomainError> {
        self.find_one("id", id.as_str()).await
    }

    async fn find_by_payment_id(
        &self,
        capture_id: &str,
    ) -> Result<Option<Reservation>, DomainError> {
        self.find_one("payment_id", capture_id).await
    }

    async fn find_by_pending_order_id(
        &self,
        order_id: &str,
    ) -> Result<Option<Reservation>, DomainError> {
        self.find_one("pending_order_id", order_id).await
    }

    async fn record_pending_order(
        &self,
        id: &ReservationId,
        order_id: &str,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE reservations
            SET pending_order_id = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .bind(order_id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to record pending order", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn settle_payment(
        &self,
        id: &ReservationId,
        capture_id: &str,
    ) -> Result<SettleOutcome, DomainError> {
        // Row lock plus conditional update: payment_id is only ever written
        // when empty or already equal.
        let row: Option<SettleRow> = sqlx::query_as(
            r#"
            WITH current AS (
                SELECT id, payment_id FROM reservations WHERE id = $1 FOR UPDATE
            ), settled AS (
                UPDATE reservations r
                SET payment_id = $2, pending_order_id = NULL, updated_at = NOW()
                FROM current c
                WHERE r.id = c.id AND (c.payment_id IS NULL OR c.payment_id = $2)
                RETURNING r.id
            )
            SELECT c.payment_id AS previous,
                   EXISTS (SELECT 1 FROM settled) AS written
            FROM current c
            "#,
        )
        .bind(id.as_str())
        .bind(capture_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to settle payment", e))?;

        let row = row.ok_or_else(|| not_found(id))?;
        Ok(match (row.written, row.previous) {
            (true, None) => SettleOutcome::Settled,
            (true, Some(_)) => SettleOutcome::AlreadySettled,
            (false, Some(existing)) => SettleOutcome::Conflict { existing },
            (false, None) => {
                return Err(DomainError::database(
                    "Settlement neither written nor conflicting",
                ))
            }
        })
    }

    async fn update_status(
        &self,
        id: &ReservationId,
        status: ReservationStatus,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE reservations
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update reservation status", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str, currency: &str) -> ReservationRow {
        ReservationRow {
            id: "42".into(),
            status: status.into(),
            amount_minor: 12_500,
            currency: currency.into(),
            description: "Sea view room".into(),
            payment_id: Some("CAP-1".into()),
            pending_order_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn row_maps_to_reservation() {
        let reservation = Reservation::try_from(row("CONFIRMED", "EUR")).unwrap();
        assert_eq!(reservation.id.as_str(), "42");
        assert_eq!(reservation.status, ReservationStatus::Confirmed);
        assert_eq!(reservation.amount.format(), "125.00");
        assert!(reservation.is_settled());
    }

    #[test]
    fn unknown_status_is_database_error() {
        let err = Reservation::try_from(row("ON_HOLD", "EUR")).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn bad_currency_is_database_error() {
        let err = Reservation::try_from(row("PENDING", "EURO")).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
