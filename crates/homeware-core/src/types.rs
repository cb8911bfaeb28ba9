//! # Domain Types
//!
//! Core domain types used throughout the checkout engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    CartLine     │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  price_cents    │   │  user+product   │   │  status         │       │
//! │  │  tax_rate_bps   │   │  price snapshot │   │  totals         │       │
//! │  │  stock_quantity │   │  coupon_id?     │   │  OrderLines     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Coupon      │   │ UserCouponGrant │   │   OrderStatus   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  code (NOCASE)  │   │  user+coupon    │   │  Pending        │       │
//! │  │  discount_bps   │   │  used flag      │   │  ...            │       │
//! │  │  validity+uses  │   └─────────────────┘   │  Cancelled      │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `CartLine` and `OrderLine` freeze pricing data at mutation/purchase time.
//! A cart line is re-priced only by an explicit mutation; an order line is
//! never re-priced at all.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (standard GST rate on home goods)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Discount Rate
// =============================================================================

/// Percentage discount carried by a coupon, in basis points (0..=10000).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Creates a discount rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Creates a discount rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        DiscountRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// Catalog management lives outside this engine; the checkout core reads
/// products and mutates exactly one column, `stock_quantity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown in carts and error messages.
    pub name: String,

    /// Optional description for product details.
    pub description: Option<String>,

    /// Unit price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Tax rate in basis points (1800 = 18%).
    pub tax_rate_bps: u32,

    /// Available-to-sell stock. Never negative.
    ///
    /// Decremented only inside the checkout transaction and restored only
    /// by order cancellation.
    pub stock_quantity: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the tax rate.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Checks whether the requested quantity fits in current stock.
    #[inline]
    pub fn in_stock(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One product entry in a user's pending purchase selection.
///
/// ## Snapshot Pattern
/// Unit price and tax rate are captured when the line is created and
/// refreshed on explicit mutations only (quantity change, coupon applied).
/// A background catalog price change never silently re-prices a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CartLine {
    pub id: String,
    /// Owning user. Opaque identifier from the external auth service.
    pub user_id: String,
    pub product_id: String,
    /// Coupon that produced `discount_cents`, if any.
    pub coupon_id: Option<String>,
    /// Quantity in the cart (>= 1).
    pub quantity: i64,
    /// Unit price in cents at the last mutation (frozen).
    pub unit_price_cents: i64,
    /// Tax rate in basis points at the time the line was created (frozen).
    pub tax_rate_bps: u32,
    /// unit_price × quantity.
    pub subtotal_cents: i64,
    /// Deduction applied to the subtotal by the stamped coupon.
    pub discount_cents: i64,
    /// Tax on the discounted subtotal.
    pub tax_cents: i64,
    /// Final price: discounted subtotal plus tax. The amount charged.
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartLine {
    /// Returns the captured unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    /// Returns the discount deduction as Money.
    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_cents(self.discount_cents)
    }

    /// Returns the final price as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Cart Summary
// =============================================================================

/// Aggregated totals across all of a user's cart lines.
///
/// Computed from the stored line snapshots, so repeated reads without a
/// mutation in between always return identical totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CartSummary {
    /// Sum of quantities across all lines.
    pub total_items: i64,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    /// Sum of final prices. The amount checkout would charge.
    pub total_cents: i64,
}

impl CartSummary {
    /// Checks if the cart has no lines.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }
}

// =============================================================================
// Coupon
// =============================================================================

/// A percentage-off coupon with a validity window and a global usage budget.
///
/// ## Invariant
/// `total_used <= max_uses`, always. The counter is incremented only inside
/// the checkout transaction, guarded by a conditional UPDATE.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Coupon {
    pub id: String,
    /// Redemption code. Matched case-insensitively.
    pub code: String,
    /// Discount in basis points (1000 = 10% off).
    pub discount_bps: u32,
    /// Public coupons are redeemable by anyone; non-public coupons require
    /// a [`UserCouponGrant`].
    pub is_public: bool,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    /// Maximum total redemptions across all users.
    pub max_uses: i64,
    /// Redemptions so far.
    pub total_used: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Coupon {
    /// Returns the discount rate.
    #[inline]
    pub fn discount_rate(&self) -> DiscountRate {
        DiscountRate::from_bps(self.discount_bps)
    }

    /// Checks if the usage budget is spent.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.total_used >= self.max_uses
    }
}

// =============================================================================
// User Coupon Grant
// =============================================================================

/// Authorizes one user to redeem a non-public coupon once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UserCouponGrant {
    pub id: String,
    pub user_id: String,
    pub coupon_id: String,
    /// Set to true inside the checkout transaction that redeems the coupon.
    /// Never reset, not even when the order is later cancelled.
    pub used: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order.
///
/// The checkout engine creates orders as `Pending` and performs exactly one
/// transition: `Pending → Cancelled`. The remaining statuses are advanced by
/// fulfilment, outside this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created by checkout, awaiting confirmation. The only cancellable state.
    Pending,
    /// Accepted for fulfilment.
    Confirmed,
    /// Handed to the carrier.
    Shipped,
    /// Received by the customer.
    Delivered,
    /// Cancelled while pending; stock has been restored.
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order created atomically from one or more cart lines.
///
/// Immutable after creation except `status` and `balance_cents`. Totals are
/// the sums of the consumed cart lines' stored snapshot values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    pub user_id: String,
    /// Sum of line subtotals (before discount and tax).
    pub subtotal_cents: i64,
    /// Sum of line discounts.
    pub discount_cents: i64,
    /// Sum of line tax amounts.
    pub tax_cents: i64,
    /// Sum of line final prices. The amount charged.
    pub total_cents: i64,
    /// Outstanding balance. Settlement is handled by the payment service.
    pub balance_cents: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Checks whether this order may still be cancelled.
    #[inline]
    pub fn is_cancellable(&self) -> bool {
        self.status == OrderStatus::Pending
    }
}

// =============================================================================
// Order Line
// =============================================================================

/// An immutable snapshot of one ordered product.
///
/// `price_at_purchase_cents` is the product's unit price at checkout time,
/// decoupled from any later catalog price change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub price_at_purchase_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl OrderLine {
    /// Returns the price at purchase as Money.
    #[inline]
    pub fn price_at_purchase(&self) -> Money {
        Money::from_cents(self.price_at_purchase_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1800);
        assert_eq!(rate.bps(), 1800);
        assert!((rate.percentage() - 18.0).abs() < 0.001);
    }

    #[test]
    fn test_discount_rate_from_percentage() {
        let rate = DiscountRate::from_percentage(12.5);
        assert_eq!(rate.bps(), 1250);
    }

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_order_cancellable_only_when_pending() {
        let mut order = Order {
            id: "o1".to_string(),
            user_id: "u1".to_string(),
            subtotal_cents: 1000,
            discount_cents: 0,
            tax_cents: 0,
            total_cents: 1000,
            balance_cents: 0,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(order.is_cancellable());

        order.status = OrderStatus::Shipped;
        assert!(!order.is_cancellable());

        order.status = OrderStatus::Cancelled;
        assert!(!order.is_cancellable());
    }

    #[test]
    fn test_coupon_exhausted() {
        let now = Utc::now();
        let mut coupon = Coupon {
            id: "c1".to_string(),
            code: "SAVE10".to_string(),
            discount_bps: 1000,
            is_public: true,
            valid_from: now,
            valid_to: now,
            max_uses: 2,
            total_used: 1,
            created_at: now,
            updated_at: now,
        };
        assert!(!coupon.is_exhausted());

        coupon.total_used = 2;
        assert!(coupon.is_exhausted());
    }
}
