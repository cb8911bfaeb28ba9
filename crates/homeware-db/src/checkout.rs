//! # Checkout
//!
//! The cart→order transition: the one place a mutable cart becomes an
//! immutable order, stock is decremented, and coupons are consumed.
//!
//! ## The Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              create_order(user, selection?)                             │
//! │                                                                         │
//! │              BEGIN ───── one transaction, all or nothing ─────┐         │
//! │                │                                              │         │
//! │  VALIDATE      │  load cart lines (selection applied)         │         │
//! │                │  empty? ───────────────► EmptyCart           │         │
//! │                │                                              │         │
//! │  RESERVE       │  per line:                                   │         │
//! │                │    re-read product (current price + name)    │         │
//! │                │    stock -= qty WHERE stock >= qty           │         │
//! │                │    0 rows? ────────────► InsufficientStock   │ ROLLBACK│
//! │                │                                              │         │
//! │  COMMIT STEPS  │  insert order + order lines                  │         │
//! │                │  per distinct coupon on the lines:           │         │
//! │                │    grant.used = 1, total_used += 1 (guarded) │         │
//! │                │  delete the consumed cart lines              │         │
//! │                ▼                                              │         │
//! │              COMMIT ◄─────────────────────────────────────────┘         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - The stock re-check and the decrement are a single conditional UPDATE
//!   inside the transaction. Two checkouts racing for the last unit cannot
//!   both win; SQLite serializes the writers and the loser's guard fails.
//! - Order totals are sums of the *stored* cart-line snapshots. Checkout
//!   never re-prices.
//! - Each order line captures the product's current unit price as
//!   price-at-purchase, which may differ from the cart snapshot if the
//!   catalog moved since the line was added.
//! - No partial effect is ever observable: any failure after BEGIN rolls
//!   the whole transaction back.
//!
//! A transaction that fails because a competing writer held the database
//! lock is retried once; business failures are returned immediately.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, StoreError, StoreResult};
use crate::repository::cart::CartRepository;
use crate::repository::coupon::CouponRepository;
use crate::repository::order::OrderRepository;
use crate::repository::product::ProductRepository;
use homeware_core::validation;
use homeware_core::{CoreError, CouponRejection, Money, Order, OrderLine, OrderStatus};

/// The checkout orchestrator.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    pool: SqlitePool,
}

impl CheckoutService {
    /// Creates a new CheckoutService.
    pub fn new(pool: SqlitePool) -> Self {
        CheckoutService { pool }
    }

    /// Converts the user's cart (or a selected subset of its lines) into a
    /// pending order.
    ///
    /// ## Arguments
    /// * `user_id` - The cart owner
    /// * `selected_line_ids` - Optional subset of cart line ids to check out;
    ///   `None` checks out the whole cart
    ///
    /// ## Returns
    /// The created order, status `Pending`.
    ///
    /// ## Errors
    /// * `EmptyCart` - Nothing to check out (or the selection matched nothing)
    /// * `InsufficientStock` - A line no longer fits in stock; names the product
    /// * `Coupon(UsageLimitReached)` - A referenced coupon lost its last use
    /// * `Db(_)` - The store failed; everything was rolled back
    pub async fn create_order(
        &self,
        user_id: &str,
        selected_line_ids: Option<&[String]>,
    ) -> StoreResult<Order> {
        validation::validate_user_id(user_id)?;

        match self.run(user_id, selected_line_ids).await {
            Err(StoreError::Db(e)) if e.is_conflict() => {
                // A competing writer aborted us before any business check
                // could fail. One retry; stock may legitimately be gone now.
                warn!(user_id = %user_id, error = %e, "Checkout hit a busy store, retrying once");
                self.run(user_id, selected_line_ids).await
            }
            result => result,
        }
    }

    async fn run(&self, user_id: &str, selected_line_ids: Option<&[String]>) -> StoreResult<Order> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        let now = Utc::now();

        // Load the cart, narrowed to the caller's selection if given
        let mut lines = CartRepository::lines_on(&mut tx, user_id).await?;
        if let Some(selection) = selected_line_ids {
            lines.retain(|line| selection.iter().any(|id| id == &line.id));
        }
        if lines.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        debug!(user_id = %user_id, lines = lines.len(), "Validating stock and reserving");

        // Reserve stock line by line. The cart-time availability check is
        // advisory; this conditional decrement is the authoritative one.
        let order_id = Uuid::new_v4().to_string();
        let mut order_lines = Vec::with_capacity(lines.len());

        for line in &lines {
            let product = ProductRepository::get_on(&mut tx, &line.product_id)
                .await?
                .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;

            let reserved =
                ProductRepository::try_decrement_stock(&mut tx, &line.product_id, line.quantity)
                    .await?;
            if !reserved {
                // First short line aborts the whole checkout, by name
                return Err(CoreError::InsufficientStock {
                    name: product.name,
                    available: product.stock_quantity,
                    requested: line.quantity,
                }
                .into());
            }

            order_lines.push(OrderLine {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.clone(),
                product_id: line.product_id.clone(),
                quantity: line.quantity,
                // Price honored at order time: the catalog's current unit
                // price, not the cart snapshot
                price_at_purchase_cents: product.price_cents,
                created_at: now,
            });
        }

        // Aggregate the stored snapshots; no re-pricing at this stage
        let mut subtotal = Money::zero();
        let mut discount = Money::zero();
        let mut tax = Money::zero();
        let mut total = Money::zero();
        for line in &lines {
            subtotal += line.subtotal();
            discount += line.discount();
            tax += Money::from_cents(line.tax_cents);
            total += line.total();
        }

        let order = Order {
            id: order_id,
            user_id: user_id.to_string(),
            subtotal_cents: subtotal.cents(),
            discount_cents: discount.cents(),
            tax_cents: tax.cents(),
            total_cents: total.cents(),
            balance_cents: 0,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        OrderRepository::insert_on(&mut tx, &order, &order_lines).await?;

        // Consume each coupon referenced by the consumed lines, once per
        // checkout. The guarded increment keeps total_used <= max_uses even
        // against a checkout that validated the same coupon moments ago.
        let mut coupon_ids: Vec<String> =
            lines.iter().filter_map(|l| l.coupon_id.clone()).collect();
        coupon_ids.sort();
        coupon_ids.dedup();

        for coupon_id in &coupon_ids {
            let consumed = CouponRepository::consume_on(&mut tx, user_id, coupon_id).await?;
            if !consumed {
                return Err(CouponRejection::UsageLimitReached.into());
            }
        }

        // The consumed lines leave the cart
        let line_ids: Vec<String> = lines.iter().map(|l| l.id.clone()).collect();
        CartRepository::delete_lines_on(&mut tx, &line_ids).await?;

        tx.commit().await.map_err(DbError::from)?;

        info!(
            order_id = %order.id,
            user_id = %user_id,
            total = %order.total(),
            lines = order_lines.len(),
            coupons = coupon_ids.len(),
            "Order created"
        );

        Ok(order)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
