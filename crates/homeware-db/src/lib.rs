//! # homeware-db: Database Layer for the Homeware Checkout Engine
//!
//! This crate provides database access for the checkout engine.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Homeware Data Flow                                │
//! │                                                                         │
//! │  API layer (add_to_cart / apply_coupon / checkout / cancel_order)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    homeware-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │   Checkout   │  │   │
//! │  │   │   (pool.rs)   │    │  product.rs   │    │ (checkout.rs)│  │   │
//! │  │   │               │    │  cart.rs      │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│  coupon.rs    │◄───│ one atomic   │  │   │
//! │  │   │ Migrations    │    │  order.rs     │    │ transaction  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database (WAL mode, foreign keys on)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and service error types
//! - [`repository`] - Repository implementations (product, cart, coupon, order)
//! - [`checkout`] - The cart→order transaction
//!
//! ## Usage
//!
//! ```rust,ignore
//! use homeware_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/shop.db")).await?;
//!
//! db.carts().add_to_cart("user-1", &product_id, 2).await?;
//! db.carts().apply_coupon("user-1", "SAVE10", Utc::now()).await?;
//! let order = db.checkout().create_order("user-1", None).await?;
//! db.orders().cancel(&order.id, "user-1").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

#[cfg(test)]
pub(crate) mod testutil;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::CheckoutService;
pub use error::{DbError, StoreError, StoreResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::cart::CartRepository;
pub use repository::coupon::CouponRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
