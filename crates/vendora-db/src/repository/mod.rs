//! # Repository Module
//!
//! Database repository implementations for Vendora.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.orders().create(&new_order)                                │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  OrderRepository                                                       │
//! │  ├── create(&self, input)        ← ONE transaction, all-or-nothing    │
//! │  ├── get_detail(&self, id)                                             │
//! │  ├── list_for_customer(&self, customer_id)                             │
//! │  └── update_status(&self, id, status)                                  │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • SQL is isolated in one place                                        │
//! │  • Transaction boundaries are explicit                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`catalog::VariantRepository`] - Catalog variants (prices, display fields)
//! - [`inventory::InventoryRepository`] - Inventory ledger and adjustments
//! - [`zones::DeliveryZoneRepository`] - Static zip → delivery-days lookup
//! - [`cart::CartRepository`] - Persisted carts and the checkout snapshot
//! - [`order::OrderRepository`] - The order transaction and query surface

pub mod cart;
pub mod catalog;
pub mod inventory;
pub mod order;
pub mod zones;
