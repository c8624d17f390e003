//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError        - Cart and checkout failures                     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  storefront-cli errors (in app)                                        │
//! │  └── ConfigError      - Bad environment configuration                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → caller (logs or displays)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, amounts)
//! 3. Errors are enum variants, never String
//! 4. Every checkout failure leaves stock and balance untouched

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Cart and checkout errors.
///
/// Each variant aborts the operation that raised it. None of them are raised
/// after stock or balance has been mutated.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Requested quantity exceeds available stock.
    ///
    /// ## When This Occurs
    /// - `Cart::add_product` with more units than are on the shelf
    /// - Checkout, when stock dropped between add and checkout
    ///
    /// ## User Workflow
    /// ```text
    /// Add to Cart (qty: 3)
    ///      │
    ///      ▼
    /// Check stock: available=1
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Biscuits", available: 1, requested: 3 }
    ///      │
    ///      ▼
    /// Caller shows: "Only 1 of Biscuits is available"
    /// ```
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// Checkout attempted on a cart with no items.
    #[error("Cart is empty")]
    EmptyCart,

    /// Checkout found a product past its expiry date.
    #[error("{product} expired on {expired_at}")]
    ExpiredProduct {
        product: String,
        expired_at: DateTime<Utc>,
    },

    /// Customer balance does not cover subtotal plus shipping.
    #[error("Insufficient balance: have {balance}, need {required}")]
    InsufficientBalance { balance: Money, required: Money },

    /// A money or stock amount left the representable range.
    ///
    /// Raised while pricing, before anything is mutated.
    #[error("Amount overflow while computing {0}")]
    AmountOverflow(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when constructor or cart input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., NaN weight).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
