//! Shared helpers for the in-memory integration tests.
//!
//! Every test gets its own isolated in-memory database with the real
//! migrations applied.

use chrono::Utc;

use crate::pool::{Database, DbConfig};
use vendora_core::{DeliveryMode, Money, NewOrder, NewOrderLine, ProductVariant};

/// Creates a fresh in-memory database with migrations applied.
pub(crate) async fn test_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

/// Inserts a catalog variant with an inventory row.
pub(crate) async fn seed_variant(db: &Database, id: &str, price_cents: i64, stock: i64) {
    seed_variant_without_inventory(db, id, price_cents).await;
    db.inventory().set(id, stock).await.expect("seed inventory");
}

/// Inserts a catalog variant WITHOUT an inventory row (for the
/// missing-inventory rollback tests).
pub(crate) async fn seed_variant_without_inventory(db: &Database, id: &str, price_cents: i64) {
    let now = Utc::now();
    db.variants()
        .insert(&ProductVariant {
            id: id.to_string(),
            product_name: format!("Product {}", id),
            variant_name: "Standard".to_string(),
            sku: format!("SKU-{}", id),
            price_cents,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
        .await
        .expect("seed variant");
}

/// Builds a well-formed NewOrder: subtotal derived from the lines, total
/// satisfying the invariant, address present when delivery requires it.
pub(crate) fn order_input(
    customer_id: &str,
    delivery_mode: DeliveryMode,
    delivery_zip: Option<&str>,
    lines: Vec<NewOrderLine>,
    delivery_fee_cents: i64,
) -> NewOrder {
    let subtotal = lines
        .iter()
        .fold(Money::ZERO, |acc, line| acc + line.line_total());

    let address_id = match delivery_mode {
        DeliveryMode::StandardDelivery => Some("address-1".to_string()),
        DeliveryMode::StorePickup => None,
    };

    NewOrder {
        customer_id: customer_id.to_string(),
        address_id,
        delivery_mode,
        delivery_zip: delivery_zip.map(str::to_string),
        payment_method: None,
        lines,
        subtotal_cents: subtotal.cents(),
        delivery_fee_cents,
        total_cents: (subtotal + Money::from_cents(delivery_fee_cents)).cents(),
    }
}
