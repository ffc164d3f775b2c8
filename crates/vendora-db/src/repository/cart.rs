//! # Cart Repository
//!
//! Persisted carts and the checkout snapshot.
//!
//! ## Snapshot Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Cart → Order Handoff                                │
//! │                                                                         │
//! │  POST /orders/checkout { cart_id }                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  snapshot(Cart { cart_id })                                             │
//! │       │                                                                 │
//! │       │  cart_items ⋈ product_variants                                  │
//! │       ▼                                                                 │
//! │  [{variant_id, quantity, unit_price_cents}]   ← price read from the     │
//! │       │                                          LIVE catalog, HERE     │
//! │       ▼                                                                 │
//! │  OrderRepository::create(...)                 ← stores it verbatim,     │
//! │                                                  frozen forever         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The buy-now path produces the same shape from a single explicit
//! variant/quantity, bypassing the persisted cart.
//!
//! Cart line CRUD (add/update/remove) belongs to the storefront surface,
//! not this core; [`CartRepository::create`] and [`CartRepository::put_item`]
//! are the explicit application-level writes it needs (no stored
//! procedures).

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbResult, OrderError, OrderResult};
use vendora_core::{CheckoutSource, NewOrderLine};

/// Repository for cart database operations.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Creates an empty cart for a customer.
    ///
    /// ## Returns
    /// The generated cart id.
    pub async fn create(&self, customer_id: &str) -> DbResult<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(cart_id = %id, customer_id = %customer_id, "Creating cart");

        sqlx::query(
            r#"
            INSERT INTO carts (id, customer_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&id)
        .bind(customer_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Sets the quantity of a variant in a cart (insert or replace).
    pub async fn put_item(&self, cart_id: &str, variant_id: &str, quantity: i64) -> DbResult<()> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO cart_items (id, cart_id, variant_id, quantity, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (cart_id, variant_id) DO UPDATE SET quantity = excluded.quantity
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(cart_id)
        .bind(variant_id)
        .bind(quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        sqlx::query("UPDATE carts SET updated_at = ?2 WHERE id = ?1")
            .bind(cart_id)
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Produces the finalized line-item list for a checkout attempt.
    ///
    /// Unit prices are read from the CURRENT catalog price at this moment;
    /// once the order commits they are immutable order-line facts.
    ///
    /// ## Failure
    /// * `EmptyCart` - the cart has no items (or an unknown cart id, which
    ///   reads the same as an empty one)
    /// * `VariantNotFound` - buy-now variant missing or inactive
    pub async fn snapshot(&self, source: &CheckoutSource) -> OrderResult<Vec<NewOrderLine>> {
        match source {
            CheckoutSource::Cart { cart_id } => {
                let lines = sqlx::query_as::<_, NewOrderLine>(
                    r#"
                    SELECT
                        ci.variant_id,
                        ci.quantity,
                        v.price_cents AS unit_price_cents
                    FROM cart_items ci
                    INNER JOIN product_variants v ON v.id = ci.variant_id
                    WHERE ci.cart_id = ?1
                    ORDER BY ci.created_at, ci.id
                    "#,
                )
                .bind(cart_id)
                .fetch_all(&self.pool)
                .await?;

                if lines.is_empty() {
                    return Err(OrderError::EmptyCart);
                }

                debug!(cart_id = %cart_id, lines = lines.len(), "Cart snapshot taken");
                Ok(lines)
            }

            CheckoutSource::BuyNow {
                variant_id,
                quantity,
            } => {
                let price_cents: Option<i64> = sqlx::query_scalar(
                    "SELECT price_cents FROM product_variants WHERE id = ?1 AND is_active = 1",
                )
                .bind(variant_id)
                .fetch_optional(&self.pool)
                .await?;

                let unit_price_cents = price_cents
                    .ok_or_else(|| OrderError::VariantNotFound(variant_id.to_string()))?;

                Ok(vec![NewOrderLine {
                    variant_id: variant_id.clone(),
                    quantity: *quantity,
                    unit_price_cents,
                }])
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
