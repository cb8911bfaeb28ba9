//! # Repository Module
//!
//! Database repository implementations for the checkout engine.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The Repository pattern keeps SQL behind a typed API.                   │
//! │                                                                         │
//! │  API layer                                                              │
//! │       │  db.carts().add_to_cart(user, product, qty)                     │
//! │       ▼                                                                 │
//! │  CartRepository ── SQL ──► SQLite                                       │
//! │                                                                         │
//! │  Steps that must share the checkout (or cancel) transaction are         │
//! │  associated functions taking `&mut SqliteConnection`, so the            │
//! │  transaction boundary is visible at the call site instead of hiding     │
//! │  in ambient state.                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product reads, stock movements
//! - [`cart::CartRepository`] - The cart ledger
//! - [`coupon::CouponRepository`] - Coupon lookup, eligibility, consumption
//! - [`order::OrderRepository`] - Order queries and cancellation

pub mod cart;
pub mod coupon;
pub mod order;
pub mod product;
