//! # Error Types
//!
//! Domain-specific error types for homeware-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  homeware-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                        │
//! │  ├── ValidationError  - Input validation failures                       │
//! │  └── CouponRejection  - Coupon policy outcomes (coupon module)          │
//! │                                                                         │
//! │  homeware-db errors (separate crate)                                    │
//! │  ├── DbError          - Database operation failures                     │
//! │  └── StoreError       - CoreError | DbError, returned by services       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → API layer             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, order id, etc.) so
//!    the caller can render an actionable message
//! 3. Errors are enum variants, never String

use thiserror::Error;

use crate::coupon::CouponRejection;
use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised by the checkout engine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Requested quantity exceeds available stock.
    ///
    /// Raised both by the cart-side availability check (stock not yet
    /// decremented) and by the authoritative re-check inside the checkout
    /// transaction.
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Checkout or coupon application attempted on an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// No cart line for this user and product.
    #[error("Cart line not found for product {product_id}")]
    CartLineNotFound { product_id: String },

    /// Coupon policy rejected the code.
    #[error(transparent)]
    Coupon(#[from] CouponRejection),

    /// Order not found (or not owned by the caller).
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Order exists but is not in a cancellable status.
    #[error("Order {order_id} is {status:?}, cannot cancel")]
    OrderNotCancellable {
        order_id: String,
        status: OrderStatus,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when input doesn't meet requirements and are raised before
/// any state is touched.
#[derive(Debug, Error)]
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

    /// Invalid format (e.g., invalid UUID).
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
