//! # Domain Types
//!
//! Core domain types for the Vendora order subsystem.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ProductVariant  │   │      Order      │   │    Payment      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  sku (business) │   │  status         │   │  order_id (FK)  │       │
//! │  │  price_cents    │   │  total_cents    │   │  method         │       │
//! │  │                 │   │  est. days      │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ InventoryRecord │   │   OrderStatus   │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  quantity (i64) │   │  Pending→Paid→  │   │  CardPayment    │       │
//! │  │  < 0 backorder  │   │  Shipped→Deliv. │   │  CashOnDelivery │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `OrderLine.unit_price_cents` is copied from the live catalog price at
//! checkout and is immutable thereafter. A later catalog price change must
//! never alter a committed order - consumers diff the two to detect price
//! drift.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, ValidationError};
use crate::money::Money;

// =============================================================================
// Delivery Mode
// =============================================================================

/// How the customer receives the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Customer collects in store; no address, zip, or delivery estimate.
    StorePickup,
    /// Courier delivery to a stored address; requires a destination zip.
    StandardDelivery,
}

impl DeliveryMode {
    /// All wire names, for validation error messages.
    pub fn allowed() -> Vec<String> {
        vec!["store_pickup".to_string(), "standard_delivery".to_string()]
    }
}

impl FromStr for DeliveryMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "store_pickup" => Ok(DeliveryMode::StorePickup),
            "standard_delivery" => Ok(DeliveryMode::StandardDelivery),
            _ => Err(ValidationError::NotAllowed {
                field: "delivery_mode".to_string(),
                allowed: DeliveryMode::allowed(),
            }),
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle status of an order.
///
/// ```text
/// pending ──► paid ──► shipped ──► delivered
///    │          │
///    └──────────┴────► cancelled
/// ```
///
/// The orchestrator only ever creates orders in `Pending`; later
/// transitions are single-field staff updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(CoreError::UnknownStatus(s.to_string())),
        }
    }
}

// =============================================================================
// Payment Method & Status
// =============================================================================

/// How the customer declared they will pay.
///
/// No gateway is involved: payment status is derived directly from the
/// declared method at order time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Card captured client-side; recorded as already paid.
    CardPayment,
    /// Pay on delivery; recorded as pending until settled by staff.
    CashOnDelivery,
}

/// The normalization rule stated once: an unspecified or unrecognized
/// method is Cash on Delivery.
impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::CashOnDelivery
    }
}

impl PaymentMethod {
    /// Payment status recorded at order-creation time for this method.
    pub fn settlement_status(self) -> PaymentStatus {
        match self {
            PaymentMethod::CardPayment => PaymentStatus::Paid,
            PaymentMethod::CashOnDelivery => PaymentStatus::Pending,
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card_payment" => Ok(PaymentMethod::CardPayment),
            "cash_on_delivery" => Ok(PaymentMethod::CashOnDelivery),
            _ => Err(ValidationError::NotAllowed {
                field: "payment_method".to_string(),
                allowed: vec!["card_payment".to_string(), "cash_on_delivery".to_string()],
            }),
        }
    }
}

/// Settlement state of a payment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Pending,
}

// =============================================================================
// Catalog & Inventory
// =============================================================================

/// A purchasable SKU of a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductVariant {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name of the parent product.
    pub product_name: String,

    /// Distinguishing attributes, e.g. "Black / 128GB".
    pub variant_name: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// LIVE catalog price in cents. Snapshot at checkout; never read back
    /// for committed orders.
    pub price_cents: i64,

    /// Whether the variant is purchasable (soft delete).
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-variant stock count.
///
/// `quantity` is signed: a negative value is the backorder depth, not an
/// error. There is no enforced floor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryRecord {
    pub variant_id: String,
    pub quantity: i64,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Order
// =============================================================================

/// An order header.
///
/// ## Invariants
/// - `total_cents == subtotal_cents + delivery_fee_cents`
/// - `delivery_zip` and `address_id` both present iff
///   `delivery_mode == StandardDelivery`
/// - `estimated_delivery_days` is `None` for store pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub address_id: Option<String>,
    pub delivery_mode: DeliveryMode,
    pub delivery_zip: Option<String>,
    pub status: OrderStatus,
    pub subtotal_cents: i64,
    pub delivery_fee_cents: i64,
    pub total_cents: i64,
    pub estimated_delivery_days: Option<i64>,
    pub payment_id: Option<String>,
    pub shipment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line item in an order.
/// Uses the snapshot pattern to freeze the unit price at order time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: String,
    pub order_id: String,
    pub variant_id: String,
    /// Quantity ordered (>= 1).
    pub quantity: i64,
    /// Unit price in cents at order time (frozen).
    pub unit_price_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl OrderLine {
    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price_cents) * self.quantity
    }
}

/// A payment record, one per order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub method: PaymentMethod,
    pub amount_cents: i64,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

/// A shipment record, written by staff fulfillment flows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Shipment {
    pub id: String,
    pub order_id: String,
    pub carrier: String,
    pub tracking_number: Option<String>,
    pub shipped_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Order Creation Input
// =============================================================================

/// One line of a checkout, as produced by the cart snapshot reader or
/// submitted directly by the client.
///
/// `unit_price_cents` is captured here and stored verbatim on the order
/// line - the orchestrator does not re-derive it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct NewOrderLine {
    pub variant_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl NewOrderLine {
    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price_cents) * self.quantity
    }
}

/// Everything the order transaction needs, validated up front.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: String,
    pub address_id: Option<String>,
    pub delivery_mode: DeliveryMode,
    pub delivery_zip: Option<String>,
    /// `None` is normalized to the default (Cash on Delivery).
    pub payment_method: Option<PaymentMethod>,
    pub lines: Vec<NewOrderLine>,
    pub subtotal_cents: i64,
    pub delivery_fee_cents: i64,
    pub total_cents: i64,
}

/// Where a checkout's line items come from.
#[derive(Debug, Clone)]
pub enum CheckoutSource {
    /// Snapshot a persisted cart.
    Cart { cart_id: String },
    /// Buy-now path: a single explicit variant and quantity, bypassing
    /// the cart.
    BuyNow { variant_id: String, quantity: i64 },
}

// =============================================================================
// Query Surface Read Models
// =============================================================================

/// An order line joined with catalog display fields.
///
/// `unit_price_cents` here is the stored historical price, never the live
/// catalog price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderLineDetail {
    pub id: String,
    pub order_id: String,
    pub variant_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub product_name: String,
    pub variant_name: String,
    pub sku: String,
    pub created_at: DateTime<Utc>,
}

/// A fully joined order: header + payment + shipment + lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order: Order,
    pub payment: Option<Payment>,
    pub shipment: Option<Shipment>,
    pub items: Vec<OrderLineDetail>,
}

/// One row of an order listing (customer history or staff list),
/// aggregated with item count and payment fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderSummary {
    pub id: String,
    pub customer_id: String,
    pub delivery_mode: DeliveryMode,
    pub status: OrderStatus,
    pub total_cents: i64,
    pub estimated_delivery_days: Option<i64>,
    pub item_count: i64,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: Option<PaymentStatus>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
