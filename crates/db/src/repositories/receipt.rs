//! Receipt sequence allocation.
//!
//! Issues unique receipt numbers per (center, year, month) via an atomic
//! counter row. The increment executes on the caller's connection, so a
//! sequence consumed inside an aborted batch transaction rolls back with it
//! and is never observed.
//!
//! Any `ConnectionTrait` implementation works as the backend: the pool, a
//! transaction, or a different store exposing the same upsert semantics.

use sea_orm::{ConnectionTrait, DbBackend, DbErr, Statement};
use uuid::Uuid;

use centra_core::billing::BillingPeriod;
use centra_core::receipt::format_receipt_number;

const NEXT_SEQUENCE_SQL: &str = r"
INSERT INTO receipt_counters (center_id, year, month, last_value)
VALUES ($1, $2, $3, 1)
ON CONFLICT (center_id, year, month)
DO UPDATE SET last_value = receipt_counters.last_value + 1
RETURNING last_value
";

/// Atomically increments and returns the counter for (center, year, month).
///
/// Safe under concurrent callers: the upsert is a single statement, so two
/// simultaneous allocations for the same scope always observe distinct
/// values.
///
/// # Errors
///
/// Returns an error if the statement fails or yields no row.
pub async fn next_sequence<C: ConnectionTrait>(
    conn: &C,
    center_id: Uuid,
    period: BillingPeriod,
) -> Result<i64, DbErr> {
    #[allow(clippy::cast_possible_wrap)]
    let month = period.month() as i32;

    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        NEXT_SEQUENCE_SQL,
        [center_id.into(), period.year().into(), month.into()],
    );

    let row = conn
        .query_one(stmt)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("receipt counter upsert returned no row".into()))?;

    row.try_get("", "last_value")
}

/// Allocates the next receipt number for a center and period.
///
/// # Errors
///
/// Returns an error if the underlying counter increment fails.
pub async fn next_receipt_number<C: ConnectionTrait>(
    conn: &C,
    center_id: Uuid,
    center_code: &str,
    period: BillingPeriod,
) -> Result<String, DbErr> {
    let sequence = next_sequence(conn, center_id, period).await?;
    Ok(format_receipt_number(
        center_code,
        period.year(),
        period.month(),
        sequence,
    ))
}
