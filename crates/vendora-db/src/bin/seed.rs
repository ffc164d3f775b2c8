//! # Seed Data Generator
//!
//! Populates the database with test catalog, inventory, and cart data for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p vendora-db --bin seed
//!
//! # Specify database path
//! cargo run -p vendora-db --bin seed -- --db ./data/vendora.db
//! ```
//!
//! ## Generated Data
//! - One variant per (product, variant_name) pair below, with SKU
//!   `{PRODUCT}-{VARIANT}` and a deterministic price
//! - Inventory rows cycling through stock levels 0-25
//! - A demo cart for customer `customer-demo`

use chrono::Utc;
use std::env;
use uuid::Uuid;

use vendora_core::ProductVariant;
use vendora_db::{Database, DbConfig};

/// Catalog for realistic test data: (product, variants, base price cents).
const CATALOG: &[(&str, &[&str], i64)] = &[
    ("Aurora Phone 12", &["Black 128GB", "Black 256GB", "Silver 128GB"], 59999),
    ("Trailhead Backpack", &["20L Green", "30L Green", "30L Black"], 8999),
    ("Cascade Water Bottle", &["500ml Steel", "750ml Steel"], 2499),
    ("Summit Hiking Boots", &["Size 41", "Size 42", "Size 43", "Size 44"], 14999),
    ("Drift Hoodie", &["S Grey", "M Grey", "L Grey", "XL Navy"], 4999),
    ("Ember Camp Stove", &["Single Burner"], 7499),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = parse_db_path();
    println!("Seeding database at {}", db_path);

    let db = Database::new(DbConfig::new(&db_path)).await?;

    let now = Utc::now();
    let mut variant_ids = Vec::new();
    let mut stock_cycle = (0i64..=25).cycle();

    for (product_name, variants, base_price) in CATALOG {
        for (index, variant_name) in variants.iter().enumerate() {
            let id = Uuid::new_v4().to_string();
            let sku = format!(
                "{}-{}",
                abbreviate(product_name),
                abbreviate(variant_name)
            );

            db.variants()
                .insert(&ProductVariant {
                    id: id.clone(),
                    product_name: product_name.to_string(),
                    variant_name: variant_name.to_string(),
                    sku,
                    // Larger variants cost a bit more
                    price_cents: base_price + (index as i64) * 1000,
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                })
                .await?;

            let stock = stock_cycle.next().unwrap_or(10);
            db.inventory().set(&id, stock).await?;

            variant_ids.push(id);
        }
    }

    println!("Inserted {} variants with inventory", variant_ids.len());

    // A demo cart with the first two variants
    let cart_id = db.carts().create("customer-demo").await?;
    if let Some(first) = variant_ids.first() {
        db.carts().put_item(&cart_id, first, 1).await?;
    }
    if let Some(second) = variant_ids.get(1) {
        db.carts().put_item(&cart_id, second, 2).await?;
    }
    println!("Created demo cart {}", cart_id);

    db.close().await;
    println!("Done");
    Ok(())
}

/// `"Aurora Phone 12"` → `"AURORA-PHONE-12"`, `"500ml Steel"` → `"500ML-STEEL"`.
fn abbreviate(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_uppercase)
        .collect::<Vec<_>>()
        .join("-")
}

fn parse_db_path() -> String {
    let args: Vec<String> = env::args().collect();
    for window in args.windows(2) {
        if window[0] == "--db" {
            return window[1].clone();
        }
    }
    "./data/vendora.db".to_string()
}
