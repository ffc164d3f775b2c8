//! # vendora-db: Database Layer for Vendora
//!
//! This crate provides database access for the Vendora order subsystem.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vendora Data Flow                                │
//! │                                                                         │
//! │  HTTP handler (POST /orders)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     vendora-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (order.rs,   │    │  (embedded)  │  │   │
//! │  │   │               │    │   inventory,  │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│   cart, ...)  │    │ 001_init.sql │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │                      SQLite Database (WAL mode)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and order-flow error types
//! - [`repository`] - Repository implementations (order, inventory, cart, ...)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vendora_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/vendora.db")).await?;
//!
//! // The order transaction: all-or-nothing
//! let detail = db.orders().create(&new_order).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

#[cfg(test)]
pub(crate) mod testutil;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, OrderError};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::cart::CartRepository;
pub use repository::catalog::VariantRepository;
pub use repository::inventory::InventoryRepository;
pub use repository::order::OrderRepository;
pub use repository::zones::DeliveryZoneRepository;
