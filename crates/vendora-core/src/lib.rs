//! # vendora-core: Pure Business Logic for the Vendora Store
//!
//! This crate is the **heart** of the order core. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vendora Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP Clients (storefront, staff)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    store-api (axum handlers)                    │   │
//! │  │    POST /orders, POST /orders/checkout, GET /orders/{id}, ...   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vendora-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ delivery  │  │ validation│  │   │
//! │  │   │   Order   │  │   Money   │  │ estimate  │  │   rules   │  │   │
//! │  │   │  Payment  │  │  (cents)  │  │   days    │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    vendora-db (Database Layer)                  │   │
//! │  │        SQLite queries, migrations, the order transaction        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Order, OrderLine, Payment, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`delivery`] - Delivery-day estimation
//! - [`error`] - Domain error types
//! - [`validation`] - Order input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod delivery;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use vendora_core::Money` instead of
// `use vendora_core::money::Money`

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Baseline delivery days for a destination zip with no delivery-zone row.
///
/// ## Why a constant?
/// The default is a customer-visible promise ("7 days unless we know your
/// zone"), so it lives in one place instead of inline fallbacks scattered
/// through the flow.
pub const DEFAULT_BASE_DAYS: i64 = 7;

/// Extra delivery days added when any line of an order is backordered.
///
/// The flag is per-order: a single short line delays the whole shipment.
pub const BACKORDER_DELAY_DAYS: i64 = 3;
