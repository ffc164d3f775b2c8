//! # Validation Module
//!
//! Order input validation. Runs first inside the order transaction, before
//! anything is written.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (store-api)                                     │
//! │  ├── JSON shape + enum parsing (400 on bad delivery_mode/status)       │
//! │  └── delivery_fee default applied once                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (inside the order transaction)                   │
//! │  ├── required fields, delivery-mode gating                             │
//! │  └── total == subtotal + delivery_fee                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{DeliveryMode, NewOrder, NewOrderLine};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a complete create-order input.
///
/// ## Rules (all must hold)
/// - customer id present
/// - for standard delivery: address id and destination zip both present
/// - at least one line; every quantity >= 1; unit prices non-negative
/// - subtotal and fee non-negative, and `total == subtotal + delivery_fee`
///
/// Backorder state is deliberately NOT checked here - insufficient stock
/// is a classification input, never a rejection.
pub fn validate_new_order(input: &NewOrder) -> ValidationResult<()> {
    validate_customer_id(&input.customer_id)?;

    if input.delivery_mode == DeliveryMode::StandardDelivery {
        if input.address_id.as_deref().map_or(true, |a| a.trim().is_empty()) {
            return Err(ValidationError::Required {
                field: "address_id".to_string(),
            });
        }
        if input.delivery_zip.as_deref().map_or(true, |z| z.trim().is_empty()) {
            return Err(ValidationError::Required {
                field: "delivery_zip".to_string(),
            });
        }
    }

    validate_lines(&input.lines)?;
    validate_totals(
        input.subtotal_cents,
        input.delivery_fee_cents,
        input.total_cents,
    )?;

    Ok(())
}

/// Validates a customer id is present.
pub fn validate_customer_id(customer_id: &str) -> ValidationResult<()> {
    if customer_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "customer_id".to_string(),
        });
    }
    Ok(())
}

/// Validates the line-item list: non-empty, quantities >= 1, prices >= 0.
pub fn validate_lines(lines: &[NewOrderLine]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    for line in lines {
        if line.variant_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "items.variant_id".to_string(),
            });
        }
        if line.quantity < 1 {
            return Err(ValidationError::MustBePositive {
                field: "items.quantity".to_string(),
            });
        }
        if line.unit_price_cents < 0 {
            return Err(ValidationError::MustBeNonNegative {
                field: "items.unit_price_cents".to_string(),
            });
        }
    }

    Ok(())
}

/// Validates the money invariant: `total == subtotal + delivery_fee`, all
/// non-negative.
///
/// Exact integer equality - there is no rounding tolerance.
pub fn validate_totals(
    subtotal_cents: i64,
    delivery_fee_cents: i64,
    total_cents: i64,
) -> ValidationResult<()> {
    if subtotal_cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "subtotal_cents".to_string(),
        });
    }
    if delivery_fee_cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "delivery_fee_cents".to_string(),
        });
    }

    let expected = Money::from_cents(subtotal_cents) + Money::from_cents(delivery_fee_cents);
    if Money::from_cents(total_cents) != expected {
        return Err(ValidationError::Inconsistent {
            field: "total_cents".to_string(),
            reason: format!(
                "must equal subtotal plus delivery fee ({} + {} = {})",
                Money::from_cents(subtotal_cents),
                Money::from_cents(delivery_fee_cents),
                expected
            ),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentMethod;

    fn base_order() -> NewOrder {
        NewOrder {
            customer_id: "customer-1".to_string(),
            address_id: Some("address-1".to_string()),
            delivery_mode: DeliveryMode::StandardDelivery,
            delivery_zip: Some("10001".to_string()),
            payment_method: Some(PaymentMethod::CashOnDelivery),
            lines: vec![NewOrderLine {
                variant_id: "variant-42".to_string(),
                quantity: 1,
                unit_price_cents: 59999,
            }],
            subtotal_cents: 59999,
            delivery_fee_cents: 5000,
            total_cents: 64999,
        }
    }

    #[test]
    fn test_valid_order_passes() {
        assert!(validate_new_order(&base_order()).is_ok());
    }

    #[test]
    fn test_missing_customer_rejected() {
        let mut order = base_order();
        order.customer_id = "  ".to_string();
        assert!(matches!(
            validate_new_order(&order),
            Err(ValidationError::Required { field }) if field == "customer_id"
        ));
    }

    #[test]
    fn test_standard_delivery_requires_address_and_zip() {
        let mut order = base_order();
        order.address_id = None;
        assert!(matches!(
            validate_new_order(&order),
            Err(ValidationError::Required { field }) if field == "address_id"
        ));

        let mut order = base_order();
        order.delivery_zip = None;
        assert!(matches!(
            validate_new_order(&order),
            Err(ValidationError::Required { field }) if field == "delivery_zip"
        ));
    }

    #[test]
    fn test_pickup_requires_neither_address_nor_zip() {
        let mut order = base_order();
        order.delivery_mode = DeliveryMode::StorePickup;
        order.address_id = None;
        order.delivery_zip = None;
        assert!(validate_new_order(&order).is_ok());
    }

    #[test]
    fn test_empty_lines_rejected() {
        let mut order = base_order();
        order.lines.clear();
        assert!(matches!(
            validate_new_order(&order),
            Err(ValidationError::Required { field }) if field == "items"
        ));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut order = base_order();
        order.lines[0].quantity = 0;
        assert!(validate_new_order(&order).is_err());
    }

    #[test]
    fn test_total_invariant_enforced() {
        let mut order = base_order();
        order.total_cents = 64998; // off by one cent
        assert!(matches!(
            validate_new_order(&order),
            Err(ValidationError::Inconsistent { field, .. }) if field == "total_cents"
        ));
    }

    #[test]
    fn test_zero_delivery_fee_is_fine() {
        let mut order = base_order();
        order.delivery_fee_cents = 0;
        order.total_cents = order.subtotal_cents;
        assert!(validate_new_order(&order).is_ok());
    }

    #[test]
    fn test_negative_fee_rejected() {
        assert!(validate_totals(100, -1, 99).is_err());
    }
}
