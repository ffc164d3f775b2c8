//! # Variant Repository
//!
//! Catalog reads and writes for product variants.
//!
//! The wider catalog (products, categories, browsing) lives outside this
//! service; the order core only needs the variant rows it snapshots prices
//! from and joins display fields out of.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use vendora_core::ProductVariant;

/// Repository for product-variant database operations.
#[derive(Debug, Clone)]
pub struct VariantRepository {
    pool: SqlitePool,
}

impl VariantRepository {
    /// Creates a new VariantRepository.
    pub fn new(pool: SqlitePool) -> Self {
        VariantRepository { pool }
    }

    /// Gets a variant by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(ProductVariant))` - Variant found
    /// * `Ok(None)` - Variant not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ProductVariant>> {
        let variant = sqlx::query_as::<_, ProductVariant>(
            r#"
            SELECT
                id, product_name, variant_name, sku,
                price_cents, is_active, created_at, updated_at
            FROM product_variants
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(variant)
    }

    /// Inserts a new variant.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - SKU already exists
    pub async fn insert(&self, variant: &ProductVariant) -> DbResult<()> {
        debug!(sku = %variant.sku, "Inserting variant");

        sqlx::query(
            r#"
            INSERT INTO product_variants (
                id, product_name, variant_name, sku,
                price_cents, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&variant.id)
        .bind(&variant.product_name)
        .bind(&variant.variant_name)
        .bind(&variant.sku)
        .bind(variant.price_cents)
        .bind(variant.is_active)
        .bind(variant.created_at)
        .bind(variant.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates a variant's live catalog price.
    ///
    /// Committed orders are unaffected: their lines carry the price that was
    /// current when they were placed.
    pub async fn set_price(&self, id: &str, price_cents: i64) -> DbResult<()> {
        debug!(id = %id, price_cents = %price_cents, "Updating variant price");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE product_variants
            SET price_cents = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(price_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Variant", id));
        }

        Ok(())
    }
}
