//! # Error Types
//!
//! Domain-specific error types for vendora-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vendora-core errors (this file)                                       │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Order input validation failures                │
//! │                                                                         │
//! │  vendora-db errors (separate crate)                                    │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── OrderError       - Order-creation taxonomy (wraps the above)      │
//! │                                                                         │
//! │  store-api errors (in app)                                             │
//! │  └── ApiError         - What HTTP clients see (serialized)             │
//! │                                                                         │
//! │  Flow: ValidationError → OrderError → ApiError → JSON response         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (variant id, field name, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
/// Failures that require I/O to detect (missing inventory rows, empty
/// carts) live in vendora-db's `OrderError` instead.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Requested status string is not one of the enumerated lifecycle values.
    #[error("Unknown order status: {0}")]
    UnknownStatus(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Order input validation errors.
///
/// These occur when a create-order request doesn't meet requirements.
/// Used for early validation before anything is written.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be non-negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Fields that have to agree with each other do not.
    ///
    /// ## When This Occurs
    /// - `total_cents != subtotal_cents + delivery_fee_cents`
    /// - delivery zip present on a store-pickup order
    #[error("{field} is inconsistent: {reason}")]
    Inconsistent { field: String, reason: String },

    /// Invalid format (e.g., not a valid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in the allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
