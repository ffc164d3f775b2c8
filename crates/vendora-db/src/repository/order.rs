//! # Order Repository
//!
//! The order transaction and the read-only query surface.
//!
//! ## The Order Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 create(): ONE transaction, all-or-nothing               │
//! │                                                                         │
//! │  1. VALIDATE                                                           │
//! │     └── required fields, delivery gating, total invariant              │
//! │                                                                         │
//! │  2. INSERT order header            status = pending, payment unset     │
//! │                                                                         │
//! │  3. CLASSIFY stock sufficiency                                         │
//! │     └── read every line's on-hand quantity BEFORE deduction            │
//! │     └── missing inventory row → VariantNotFound → rollback             │
//! │     └── any short line → any_line_backordered = true (per-order)       │
//! │                                                                         │
//! │  4. INSERT lines + DEDUCT inventory (may go negative)                  │
//! │                                                                         │
//! │  5. INSERT payment (card → paid, COD → pending), backfill payment_id   │
//! │                                                                         │
//! │  6. ESTIMATE delivery days (zone lookup + pure estimate)               │
//! │     └── store_pickup stores NULL explicitly                            │
//! │                                                                         │
//! │  7. COMMIT    ← any error in 2-6 rolls back EVERYTHING:                │
//! │               no order, no lines, no payment, no inventory change      │
//! │                                                                         │
//! │  8. RETURN the fully joined order                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is retried automatically - the client must resubmit.
//!
//! ## Query Surface
//! Read-only joins. Line prices are always the stored historical
//! `unit_price_cents`, never the live catalog price - consumers rely on
//! this to detect price drift.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult, OrderResult};
use crate::repository::{inventory, zones};
use vendora_core::delivery::estimate_delivery_days;
use vendora_core::validation::validate_new_order;
use vendora_core::{
    DeliveryMode, Money, NewOrder, Order, OrderDetail, OrderLineDetail, OrderStatus, OrderSummary,
    Payment, Shipment,
};

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Creates an order atomically: header, lines, inventory deductions,
    /// payment record, and delivery estimate, in one database transaction.
    ///
    /// See the module docs for the step-by-step contract. On any failure
    /// the transaction is rolled back before the error is returned.
    pub async fn create(&self, input: &NewOrder) -> OrderResult<OrderDetail> {
        // Step 1: validate before touching the database.
        validate_new_order(input)?;

        let order_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(
            order_id = %order_id,
            customer_id = %input.customer_id,
            lines = input.lines.len(),
            "Creating order"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        // Step 2: order header in `pending`, payment reference unset.
        // Address and zip are stored only for standard delivery; pickup
        // stores NULL for both regardless of what the caller sent.
        let (address_id, delivery_zip) = match input.delivery_mode {
            DeliveryMode::StandardDelivery => (
                input.address_id.as_deref(),
                input.delivery_zip.as_deref(),
            ),
            DeliveryMode::StorePickup => (None, None),
        };

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, customer_id, address_id, delivery_mode, delivery_zip,
                status, subtotal_cents, delivery_fee_cents, total_cents,
                estimated_delivery_days, payment_id, shipment_id,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, NULL, NULL, NULL, ?10, ?11)
            "#,
        )
        .bind(&order_id)
        .bind(&input.customer_id)
        .bind(address_id)
        .bind(input.delivery_mode)
        .bind(delivery_zip)
        .bind(OrderStatus::Pending)
        .bind(input.subtotal_cents)
        .bind(input.delivery_fee_cents)
        .bind(input.total_cents)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        // Step 3: classify stock sufficiency from a pre-deduction read.
        // A missing inventory row aborts the whole transaction. The flag is
        // per-order: one short line marks the entire order backordered.
        let mut any_line_backordered = false;
        for line in &input.lines {
            let on_hand = inventory::quantity_on_hand(&mut *tx, &line.variant_id).await?;
            if line.quantity > on_hand {
                any_line_backordered = true;
            }
        }

        // Step 4: persist lines with the caller-captured unit prices (not
        // re-derived here), deducting inventory as we go. Negative results
        // are the backorder signal, not an error.
        for line in &input.lines {
            sqlx::query(
                r#"
                INSERT INTO order_lines (id, order_id, variant_id, quantity, unit_price_cents, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&order_id)
            .bind(&line.variant_id)
            .bind(line.quantity)
            .bind(line.unit_price_cents)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            inventory::deduct(&mut *tx, &line.variant_id, line.quantity).await?;
        }

        // Step 5: payment record. Card settles immediately; Cash on
        // Delivery (the default) stays pending.
        let method = input.payment_method.unwrap_or_default();
        let payment_id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO payments (id, order_id, method, amount_cents, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&payment_id)
        .bind(&order_id)
        .bind(method)
        .bind(input.total_cents)
        .bind(method.settlement_status())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE orders SET payment_id = ?2 WHERE id = ?1")
            .bind(&order_id)
            .bind(&payment_id)
            .execute(&mut *tx)
            .await?;

        // Step 6: delivery estimate, using the backorder flag from step 3.
        // Store pickup explicitly stores NULL.
        let estimated_days = match input.delivery_mode {
            DeliveryMode::StorePickup => None,
            DeliveryMode::StandardDelivery => {
                // delivery_zip validated present in step 1
                let zip = delivery_zip.unwrap_or("");
                let zone_base_days = zones::base_days(&mut *tx, zip).await?;
                estimate_delivery_days(input.delivery_mode, zone_base_days, any_line_backordered)
            }
        };

        sqlx::query("UPDATE orders SET estimated_delivery_days = ?2 WHERE id = ?1")
            .bind(&order_id)
            .bind(estimated_days)
            .execute(&mut *tx)
            .await?;

        // Step 7: all-or-nothing. Dropping `tx` without reaching this point
        // rolls everything back.
        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            order_id = %order_id,
            total = %Money::from_cents(input.total_cents),
            backordered = any_line_backordered,
            estimated_days = ?estimated_days,
            "Order created"
        );

        // Step 8: return the fully joined order.
        let detail = self
            .get_detail(&order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", &order_id))?;

        Ok(detail)
    }

    /// Gets a fully joined order: header + payment + shipment + lines with
    /// catalog display fields.
    ///
    /// ## Returns
    /// * `Ok(Some(OrderDetail))` - Order found
    /// * `Ok(None)` - Order not found
    pub async fn get_detail(&self, order_id: &str) -> DbResult<Option<OrderDetail>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT
                id, customer_id, address_id, delivery_mode, delivery_zip,
                status, subtotal_cents, delivery_fee_cents, total_cents,
                estimated_delivery_days, payment_id, shipment_id,
                created_at, updated_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        let order = match order {
            Some(order) => order,
            None => return Ok(None),
        };

        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, order_id, method, amount_cents, status, created_at
            FROM payments
            WHERE order_id = ?1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        let shipment = sqlx::query_as::<_, Shipment>(
            r#"
            SELECT id, order_id, carrier, tracking_number, shipped_at
            FROM shipments
            WHERE order_id = ?1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        // unit_price_cents comes from order_lines, never from the live
        // catalog row we join for display fields.
        let items = sqlx::query_as::<_, OrderLineDetail>(
            r#"
            SELECT
                l.id, l.order_id, l.variant_id, l.quantity, l.unit_price_cents,
                v.product_name, v.variant_name, v.sku,
                l.created_at
            FROM order_lines l
            INNER JOIN product_variants v ON v.id = l.variant_id
            WHERE l.order_id = ?1
            ORDER BY l.created_at, l.id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(OrderDetail {
            order,
            payment,
            shipment,
            items,
        }))
    }

    /// Lists all orders for a customer, newest first, aggregated with item
    /// counts and payment fields.
    pub async fn list_for_customer(&self, customer_id: &str) -> DbResult<Vec<OrderSummary>> {
        let orders = sqlx::query_as::<_, OrderSummary>(
            r#"
            SELECT
                o.id, o.customer_id, o.delivery_mode, o.status, o.total_cents,
                o.estimated_delivery_days,
                COUNT(l.id) AS item_count,
                p.method AS payment_method,
                p.status AS payment_status,
                o.created_at
            FROM orders o
            LEFT JOIN order_lines l ON l.order_id = o.id
            LEFT JOIN payments p ON p.id = o.payment_id
            WHERE o.customer_id = ?1
            GROUP BY o.id
            ORDER BY o.created_at DESC, o.id DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Lists all orders system-wide (staff view), newest first.
    pub async fn list_all(&self) -> DbResult<Vec<OrderSummary>> {
        let orders = sqlx::query_as::<_, OrderSummary>(
            r#"
            SELECT
                o.id, o.customer_id, o.delivery_mode, o.status, o.total_cents,
                o.estimated_delivery_days,
                COUNT(l.id) AS item_count,
                p.method AS payment_method,
                p.status AS payment_status,
                o.created_at
            FROM orders o
            LEFT JOIN order_lines l ON l.order_id = o.id
            LEFT JOIN payments p ON p.id = o.payment_id
            GROUP BY o.id
            ORDER BY o.created_at DESC, o.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Updates an order's lifecycle status (staff action).
    ///
    /// A plain single-field update; status enumeration is enforced by the
    /// type, and there are no further transition invariants.
    pub async fn update_status(&self, order_id: &str, status: OrderStatus) -> DbResult<()> {
        debug!(order_id = %order_id, status = %status, "Updating order status");

        let now = Utc::now();

        let result = sqlx::query("UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(order_id)
            .bind(status)
            .bind(now)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrderError;
    use crate::testutil::{self, order_input};
    use vendora_core::{NewOrderLine, PaymentMethod, PaymentStatus, ValidationError};

    /// The end-to-end scenario: variant at 599.99 with stock 10, standard
    /// delivery into a 5-day zone, quantity 1, 50.00 delivery fee.
    #[tokio::test]
    async fn test_create_order_standard_delivery() {
        let db = testutil::test_db().await;
        testutil::seed_variant(&db, "var-42", 59999, 10).await;
        db.zones().upsert("55501", 5).await.unwrap();

        let input = order_input(
            "customer-1",
            DeliveryMode::StandardDelivery,
            Some("55501"),
            vec![NewOrderLine {
                variant_id: "var-42".to_string(),
                quantity: 1,
                unit_price_cents: 59999,
            }],
            5000,
        );

        let detail = db.orders().create(&input).await.unwrap();

        let order = &detail.order;
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.subtotal_cents, 59999);
        assert_eq!(order.delivery_fee_cents, 5000);
        assert_eq!(order.total_cents, 64999);
        assert_eq!(
            order.total_cents,
            order.subtotal_cents + order.delivery_fee_cents
        );
        assert_eq!(order.estimated_delivery_days, Some(5));
        assert_eq!(order.delivery_zip.as_deref(), Some("55501"));

        // Cash on Delivery default → payment pending, linked to the order
        let payment = detail.payment.as_ref().unwrap();
        assert_eq!(payment.method, PaymentMethod::CashOnDelivery);
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.amount_cents, 64999);
        assert_eq!(order.payment_id.as_deref(), Some(payment.id.as_str()));

        // Line carries the snapshot price and display fields
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.items[0].unit_price_cents, 59999);
        assert_eq!(detail.items[0].sku, "SKU-var-42");

        // Inventory deducted 10 → 9
        let stock = db.inventory().get("var-42").await.unwrap().unwrap();
        assert_eq!(stock.quantity, 9);
    }

    #[tokio::test]
    async fn test_backordered_line_delays_estimate() {
        let db = testutil::test_db().await;
        testutil::seed_variant(&db, "var-1", 1000, 2).await;
        db.zones().upsert("55501", 5).await.unwrap();

        // Stock 2, ordering 5: accepted, inventory goes to -3
        let input = order_input(
            "customer-1",
            DeliveryMode::StandardDelivery,
            Some("55501"),
            vec![NewOrderLine {
                variant_id: "var-1".to_string(),
                quantity: 5,
                unit_price_cents: 1000,
            }],
            0,
        );

        let detail = db.orders().create(&input).await.unwrap();

        assert_eq!(detail.order.estimated_delivery_days, Some(8)); // 5 + 3

        let stock = db.inventory().get("var-1").await.unwrap().unwrap();
        assert_eq!(stock.quantity, -3);
    }

    #[tokio::test]
    async fn test_unknown_zip_defaults_to_seven_days() {
        let db = testutil::test_db().await;
        testutil::seed_variant(&db, "var-1", 1000, 10).await;

        let input = order_input(
            "customer-1",
            DeliveryMode::StandardDelivery,
            Some("99999"),
            vec![NewOrderLine {
                variant_id: "var-1".to_string(),
                quantity: 1,
                unit_price_cents: 1000,
            }],
            0,
        );

        let detail = db.orders().create(&input).await.unwrap();
        assert_eq!(detail.order.estimated_delivery_days, Some(7));
    }

    #[tokio::test]
    async fn test_store_pickup_has_no_estimate_and_needs_no_address() {
        let db = testutil::test_db().await;
        testutil::seed_variant(&db, "var-1", 1000, 10).await;

        let input = order_input(
            "customer-1",
            DeliveryMode::StorePickup,
            None,
            vec![NewOrderLine {
                variant_id: "var-1".to_string(),
                quantity: 2,
                unit_price_cents: 1000,
            }],
            0,
        );

        let detail = db.orders().create(&input).await.unwrap();

        assert_eq!(detail.order.estimated_delivery_days, None);
        assert_eq!(detail.order.address_id, None);
        assert_eq!(detail.order.delivery_zip, None);
    }

    #[tokio::test]
    async fn test_card_payment_settles_immediately() {
        let db = testutil::test_db().await;
        testutil::seed_variant(&db, "var-1", 1000, 10).await;

        let mut input = order_input(
            "customer-1",
            DeliveryMode::StorePickup,
            None,
            vec![NewOrderLine {
                variant_id: "var-1".to_string(),
                quantity: 1,
                unit_price_cents: 1000,
            }],
            0,
        );
        input.payment_method = Some(PaymentMethod::CardPayment);

        let detail = db.orders().create(&input).await.unwrap();

        let payment = detail.payment.unwrap();
        assert_eq!(payment.method, PaymentMethod::CardPayment);
        assert_eq!(payment.status, PaymentStatus::Paid);
    }

    /// The rollback property: if the SECOND of three lines references a
    /// variant with no inventory row, nothing from the attempt survives.
    #[tokio::test]
    async fn test_missing_variant_rolls_back_everything() {
        let db = testutil::test_db().await;
        testutil::seed_variant(&db, "var-a", 1000, 10).await;
        testutil::seed_variant(&db, "var-c", 3000, 10).await;
        // "var-b" exists in the catalog but has NO inventory row
        testutil::seed_variant_without_inventory(&db, "var-b", 2000).await;

        let input = order_input(
            "customer-1",
            DeliveryMode::StorePickup,
            None,
            vec![
                NewOrderLine {
                    variant_id: "var-a".to_string(),
                    quantity: 1,
                    unit_price_cents: 1000,
                },
                NewOrderLine {
                    variant_id: "var-b".to_string(),
                    quantity: 1,
                    unit_price_cents: 2000,
                },
                NewOrderLine {
                    variant_id: "var-c".to_string(),
                    quantity: 1,
                    unit_price_cents: 3000,
                },
            ],
            0,
        );

        let err = db.orders().create(&input).await.unwrap_err();
        assert!(matches!(err, OrderError::VariantNotFound(id) if id == "var-b"));

        // No order, no lines, no payment persisted
        assert!(db.orders().list_all().await.unwrap().is_empty());
        let line_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_lines")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(line_rows, 0);
        let payment_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(payment_rows, 0);

        // Inventory untouched
        assert_eq!(db.inventory().get("var-a").await.unwrap().unwrap().quantity, 10);
        assert_eq!(db.inventory().get("var-c").await.unwrap().unwrap().quantity, 10);
    }

    /// Changing the catalog price after an order commits must not alter the
    /// price stored on that order's lines.
    #[tokio::test]
    async fn test_historical_price_survives_catalog_change() {
        let db = testutil::test_db().await;
        testutil::seed_variant(&db, "var-1", 59999, 10).await;

        let input = order_input(
            "customer-1",
            DeliveryMode::StorePickup,
            None,
            vec![NewOrderLine {
                variant_id: "var-1".to_string(),
                quantity: 1,
                unit_price_cents: 59999,
            }],
            0,
        );
        let detail = db.orders().create(&input).await.unwrap();
        let order_id = detail.order.id.clone();

        db.variants().set_price("var-1", 69999).await.unwrap();

        let detail = db.orders().get_detail(&order_id).await.unwrap().unwrap();
        assert_eq!(detail.items[0].unit_price_cents, 59999);
    }

    #[tokio::test]
    async fn test_validation_failures_reject_before_writing() {
        let db = testutil::test_db().await;
        testutil::seed_variant(&db, "var-1", 1000, 10).await;

        // Empty line list
        let input = order_input("customer-1", DeliveryMode::StorePickup, None, vec![], 0);
        let err = db.orders().create(&input).await.unwrap_err();
        assert!(matches!(
            err,
            OrderError::Validation(ValidationError::Required { ref field }) if field == "items"
        ));

        // Broken total invariant
        let mut input = order_input(
            "customer-1",
            DeliveryMode::StorePickup,
            None,
            vec![NewOrderLine {
                variant_id: "var-1".to_string(),
                quantity: 1,
                unit_price_cents: 1000,
            }],
            0,
        );
        input.total_cents += 1;
        let err = db.orders().create(&input).await.unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));

        // Standard delivery without an address
        let mut input = order_input(
            "customer-1",
            DeliveryMode::StandardDelivery,
            Some("55501"),
            vec![NewOrderLine {
                variant_id: "var-1".to_string(),
                quantity: 1,
                unit_price_cents: 1000,
            }],
            0,
        );
        input.address_id = None;
        let err = db.orders().create(&input).await.unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));

        // Nothing was written by any attempt
        assert!(db.orders().list_all().await.unwrap().is_empty());
        assert_eq!(db.inventory().get("var-1").await.unwrap().unwrap().quantity, 10);
    }

    #[tokio::test]
    async fn test_customer_history_aggregates() {
        let db = testutil::test_db().await;
        testutil::seed_variant(&db, "var-1", 1000, 100).await;
        testutil::seed_variant(&db, "var-2", 2000, 100).await;

        // Two orders for customer-1, one for customer-2
        let two_lines = vec![
            NewOrderLine {
                variant_id: "var-1".to_string(),
                quantity: 1,
                unit_price_cents: 1000,
            },
            NewOrderLine {
                variant_id: "var-2".to_string(),
                quantity: 2,
                unit_price_cents: 2000,
            },
        ];
        let one_line = vec![NewOrderLine {
            variant_id: "var-1".to_string(),
            quantity: 1,
            unit_price_cents: 1000,
        }];

        db.orders()
            .create(&order_input("customer-1", DeliveryMode::StorePickup, None, two_lines, 0))
            .await
            .unwrap();
        db.orders()
            .create(&order_input("customer-1", DeliveryMode::StorePickup, None, one_line.clone(), 0))
            .await
            .unwrap();
        db.orders()
            .create(&order_input("customer-2", DeliveryMode::StorePickup, None, one_line, 0))
            .await
            .unwrap();

        let history = db.orders().list_for_customer("customer-1").await.unwrap();
        assert_eq!(history.len(), 2);
        let mut item_counts: Vec<i64> = history.iter().map(|o| o.item_count).collect();
        item_counts.sort_unstable();
        assert_eq!(item_counts, vec![1, 2]);
        for summary in &history {
            assert_eq!(summary.payment_method, Some(PaymentMethod::CashOnDelivery));
            assert_eq!(summary.payment_status, Some(PaymentStatus::Pending));
        }

        assert_eq!(db.orders().list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_status() {
        let db = testutil::test_db().await;
        testutil::seed_variant(&db, "var-1", 1000, 10).await;

        let detail = db
            .orders()
            .create(&order_input(
                "customer-1",
                DeliveryMode::StorePickup,
                None,
                vec![NewOrderLine {
                    variant_id: "var-1".to_string(),
                    quantity: 1,
                    unit_price_cents: 1000,
                }],
                0,
            ))
            .await
            .unwrap();

        db.orders()
            .update_status(&detail.order.id, OrderStatus::Paid)
            .await
            .unwrap();

        let reread = db.orders().get_detail(&detail.order.id).await.unwrap().unwrap();
        assert_eq!(reread.order.status, OrderStatus::Paid);

        let err = db
            .orders()
            .update_status("no-such-order", OrderStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_detail_unknown_order() {
        let db = testutil::test_db().await;
        assert!(db.orders().get_detail("missing").await.unwrap().is_none());
    }
}
