//! # Delivery Zone Repository
//!
//! Static zip → baseline delivery-days lookup.
//!
//! The table is reference data seeded by migration; zips without a row fall
//! back to `vendora_core::DEFAULT_BASE_DAYS` inside the pure estimator.

use sqlx::SqlitePool;

use crate::error::DbResult;

/// Looks up the baseline delivery days for a destination zip.
///
/// Takes an executor so the order orchestrator can read inside its
/// transaction.
///
/// ## Returns
/// * `Ok(Some(days))` - zone row found
/// * `Ok(None)` - unknown zip (caller applies the 7-day default)
pub async fn base_days(
    conn: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    zip: &str,
) -> DbResult<Option<i64>> {
    let days: Option<i64> =
        sqlx::query_scalar("SELECT base_days FROM delivery_zones WHERE zip = ?1")
            .bind(zip)
            .fetch_optional(conn)
            .await?;

    Ok(days)
}

/// Repository for delivery-zone operations.
#[derive(Debug, Clone)]
pub struct DeliveryZoneRepository {
    pool: SqlitePool,
}

impl DeliveryZoneRepository {
    /// Creates a new DeliveryZoneRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DeliveryZoneRepository { pool }
    }

    /// Looks up the baseline delivery days for a zip.
    pub async fn base_days(&self, zip: &str) -> DbResult<Option<i64>> {
        base_days(&self.pool, zip).await
    }

    /// Creates or replaces a zone row.
    pub async fn upsert(&self, zip: &str, base_days: i64) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO delivery_zones (zip, base_days)
            VALUES (?1, ?2)
            ON CONFLICT (zip) DO UPDATE SET base_days = excluded.base_days
            "#,
        )
        .bind(zip)
        .bind(base_days)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
