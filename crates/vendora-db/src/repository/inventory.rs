//! # Inventory Ledger
//!
//! Per-variant stock counts: the sufficiency read, the order-driven
//! deduction, and manual staff adjustments.
//!
//! ## Backorder Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Deduction Strategy                                   │
//! │                                                                         │
//! │  ❌ NOT DONE: conditional decrement                                     │
//! │     UPDATE inventory SET quantity = quantity - 5                        │
//! │     WHERE variant_id = ? AND quantity >= 5                              │
//! │                                                                         │
//! │  ✅ DONE: unconditional decrement                                       │
//! │     UPDATE inventory SET quantity = quantity - 5                        │
//! │     WHERE variant_id = ?                                                │
//! │                                                                         │
//! │  Going negative is the designed backorder signal, not an error.         │
//! │  Stock 2, order 5  →  quantity becomes -3 (backorder depth 3).          │
//! │                                                                         │
//! │  Concurrent orders on the same variant serialize on the row UPDATE;     │
//! │  both may commit and jointly drive stock negative. Accepted by design.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The sufficiency read ([`quantity_on_hand`]) classifies an order as
//! backordered BEFORE this order's own deductions - it never blocks.
//!
//! Order-driven deductions write no audit row; only manual staff
//! adjustments do.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult, OrderError, OrderResult};
use vendora_core::InventoryRecord;

// =============================================================================
// Transaction-scoped operations
// =============================================================================
// These take an executor instead of a pool so the order orchestrator can run
// them on its own transaction connection. Passing `&pool` works too for
// standalone use.

/// Reads the current on-hand quantity for a variant.
///
/// Used by the orchestrator *before* deduction, purely to classify the
/// order as backordered - never to block it.
///
/// ## Failure
/// `VariantNotFound` if the variant has no inventory row.
pub async fn quantity_on_hand(
    conn: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    variant_id: &str,
) -> OrderResult<i64> {
    let quantity: Option<i64> =
        sqlx::query_scalar("SELECT quantity FROM inventory WHERE variant_id = ?1")
            .bind(variant_id)
            .fetch_optional(conn)
            .await?;

    quantity.ok_or_else(|| OrderError::VariantNotFound(variant_id.to_string()))
}

/// Deducts `quantity` from a variant's stock, unconditionally.
///
/// ## Returns
/// The new quantity, which may be negative (backorder depth).
///
/// ## Failure
/// `VariantNotFound` if the variant has no inventory row.
pub async fn deduct(
    conn: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    variant_id: &str,
    quantity: i64,
) -> OrderResult<i64> {
    let now = Utc::now();

    let new_quantity: Option<i64> = sqlx::query_scalar(
        r#"
        UPDATE inventory
        SET quantity = quantity - ?2, updated_at = ?3
        WHERE variant_id = ?1
        RETURNING quantity
        "#,
    )
    .bind(variant_id)
    .bind(quantity)
    .bind(now)
    .fetch_optional(conn)
    .await?;

    let new_quantity =
        new_quantity.ok_or_else(|| OrderError::VariantNotFound(variant_id.to_string()))?;

    debug!(variant_id = %variant_id, deducted = %quantity, new_quantity = %new_quantity, "Inventory deducted");

    Ok(new_quantity)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for inventory operations outside the order transaction.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Gets the inventory record for a variant.
    pub async fn get(&self, variant_id: &str) -> DbResult<Option<InventoryRecord>> {
        let record = sqlx::query_as::<_, InventoryRecord>(
            "SELECT variant_id, quantity, updated_at FROM inventory WHERE variant_id = ?1",
        )
        .bind(variant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Creates or replaces the inventory row for a variant.
    ///
    /// ## Usage
    /// Initial stocking (seed data, receiving). Day-to-day corrections go
    /// through [`InventoryRepository::adjust`] so they leave an audit row.
    pub async fn set(&self, variant_id: &str, quantity: i64) -> DbResult<()> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO inventory (variant_id, quantity, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (variant_id) DO UPDATE SET
                quantity = excluded.quantity,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(variant_id)
        .bind(quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Applies a manual staff adjustment and writes its audit row, in one
    /// transaction.
    ///
    /// ## Returns
    /// The new quantity.
    pub async fn adjust(
        &self,
        variant_id: &str,
        delta: i64,
        reason: Option<&str>,
        staff_id: Option<&str>,
    ) -> DbResult<i64> {
        debug!(variant_id = %variant_id, delta = %delta, "Manual inventory adjustment");

        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let new_quantity: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE inventory
            SET quantity = quantity + ?2, updated_at = ?3
            WHERE variant_id = ?1
            RETURNING quantity
            "#,
        )
        .bind(variant_id)
        .bind(delta)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        let new_quantity = match new_quantity {
            Some(q) => q,
            None => return Err(DbError::not_found("Inventory", variant_id)),
        };

        sqlx::query(
            r#"
            INSERT INTO inventory_adjustments (id, variant_id, delta, reason, staff_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(variant_id)
        .bind(delta)
        .bind(reason)
        .bind(staff_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(new_quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;

    #[tokio::test]
    async fn test_deduct_goes_negative() {
        let db = testutil::test_db().await;
        testutil::seed_variant(&db, "var-1", 1000, 2).await;

        let new_quantity = deduct(db.pool(), "var-1", 5).await.unwrap();
        assert_eq!(new_quantity, -3);

        let record = db.inventory().get("var-1").await.unwrap().unwrap();
        assert_eq!(record.quantity, -3);
    }

    #[tokio::test]
    async fn test_deduct_missing_variant() {
        let db = testutil::test_db().await;

        let err = deduct(db.pool(), "ghost", 1).await.unwrap_err();
        assert!(matches!(err, OrderError::VariantNotFound(id) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_quantity_on_hand() {
        let db = testutil::test_db().await;
        testutil::seed_variant(&db, "var-1", 1000, 7).await;

        assert_eq!(quantity_on_hand(db.pool(), "var-1").await.unwrap(), 7);
        assert!(quantity_on_hand(db.pool(), "ghost").await.is_err());
    }

    #[tokio::test]
    async fn test_adjust_writes_audit_row() {
        let db = testutil::test_db().await;
        testutil::seed_variant(&db, "var-1", 1000, 10).await;

        let new_quantity = db
            .inventory()
            .adjust("var-1", -4, Some("damaged in storage"), Some("staff-9"))
            .await
            .unwrap();
        assert_eq!(new_quantity, 6);

        let audit_rows: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM inventory_adjustments WHERE variant_id = 'var-1'",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(audit_rows, 1);
    }

    #[tokio::test]
    async fn test_set_is_an_upsert() {
        let db = testutil::test_db().await;
        testutil::seed_variant(&db, "var-1", 1000, 3).await;

        db.inventory().set("var-1", 20).await.unwrap();
        let record = db.inventory().get("var-1").await.unwrap().unwrap();
        assert_eq!(record.quantity, 20);
    }
}
