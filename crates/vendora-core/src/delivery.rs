//! # Delivery Estimation
//!
//! Pure computation of the estimated delivery days shown to the customer.
//!
//! ## Estimation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Delivery Estimate Decision                            │
//! │                                                                         │
//! │  delivery_mode == StorePickup?                                         │
//! │       │                                                                 │
//! │       ├── yes → None (no delivery-day concept)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  zone row for destination zip?                                         │
//! │       │                                                                 │
//! │       ├── found     → base = zone.base_days (e.g. 5 for major cities)  │
//! │       └── not found → base = 7 (DEFAULT_BASE_DAYS)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  any line backordered?                                                 │
//! │       │                                                                 │
//! │       ├── yes → Some(base + 3)                                         │
//! │       └── no  → Some(base)                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The zone lookup itself is a database read (vendora-db); this module only
//! sees its result, keeping the function pure and trivially testable.

use crate::types::DeliveryMode;
use crate::{BACKORDER_DELAY_DAYS, DEFAULT_BASE_DAYS};

/// Computes the estimated delivery days for an order.
///
/// ## Arguments
/// * `mode` - Pickup or courier delivery
/// * `zone_base_days` - Result of the delivery-zone lookup for the
///   destination zip (`None` when the zip has no zone row)
/// * `any_line_backordered` - Per-order flag: true if any line's ordered
///   quantity exceeded stock at classification time
///
/// ## Returns
/// * `None` for store pickup
/// * `Some(base + 3)` when backordered, else `Some(base)`
///
/// The 7-day default for unknown zips is a customer-visible promise and
/// must not change casually.
pub fn estimate_delivery_days(
    mode: DeliveryMode,
    zone_base_days: Option<i64>,
    any_line_backordered: bool,
) -> Option<i64> {
    match mode {
        DeliveryMode::StorePickup => None,
        DeliveryMode::StandardDelivery => {
            let base_days = zone_base_days.unwrap_or(DEFAULT_BASE_DAYS);
            if any_line_backordered {
                Some(base_days + BACKORDER_DELAY_DAYS)
            } else {
                Some(base_days)
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_pickup_has_no_estimate() {
        assert_eq!(
            estimate_delivery_days(DeliveryMode::StorePickup, Some(5), false),
            None
        );
        // Even a backorder does not create an estimate for pickup
        assert_eq!(
            estimate_delivery_days(DeliveryMode::StorePickup, None, true),
            None
        );
    }

    #[test]
    fn test_known_zone_in_stock() {
        assert_eq!(
            estimate_delivery_days(DeliveryMode::StandardDelivery, Some(5), false),
            Some(5)
        );
    }

    #[test]
    fn test_known_zone_backordered_adds_three_days() {
        assert_eq!(
            estimate_delivery_days(DeliveryMode::StandardDelivery, Some(5), true),
            Some(8)
        );
    }

    #[test]
    fn test_unknown_zip_defaults_to_seven_days() {
        assert_eq!(
            estimate_delivery_days(DeliveryMode::StandardDelivery, None, false),
            Some(7)
        );
    }

    #[test]
    fn test_unknown_zip_backordered() {
        assert_eq!(
            estimate_delivery_days(DeliveryMode::StandardDelivery, None, true),
            Some(10)
        );
    }
}
