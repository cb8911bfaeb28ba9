//! # Cart Repository
//!
//! The cart ledger: a user's pending selections, one line per product.
//!
//! ## Snapshot Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     When a line is (re)priced                           │
//! │                                                                         │
//! │  add_to_cart ───────► re-priced from the product's current unit price   │
//! │  update_quantity ───► re-priced, stored discount amount retained        │
//! │  apply_coupon ──────► discount recomputed per line, coupon stamped      │
//! │                                                                         │
//! │  catalog price change ──► NOTHING. Lines keep their snapshot until      │
//! │                           the next explicit mutation.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock is *checked* here so the user finds out early, but it is never
//! decremented by a cart operation. The checkout transaction re-validates
//! and decrements; two browser tabs racing each other are resolved there,
//! not here.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult, StoreResult};
use crate::repository::coupon::CouponRepository;
use homeware_core::pricing::price_line;
use homeware_core::validation;
use homeware_core::{CartLine, CartSummary, CoreError, Coupon, Money, Product, TaxRate};

/// All columns of the cart_lines table, in struct order.
const CART_LINE_COLUMNS: &str = "id, user_id, product_id, coupon_id, quantity, unit_price_cents, \
     tax_rate_bps, subtotal_cents, discount_cents, tax_cents, total_cents, created_at, updated_at";

// =============================================================================
// Cart Line Detail
// =============================================================================

/// A cart line joined with the live product data a cart screen needs.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CartLineDetail {
    #[sqlx(flatten)]
    pub line: CartLine,
    /// Current product name (not the snapshot).
    pub product_name: String,
    /// Current available stock, for "only 2 left" hints.
    pub stock_quantity: i64,
}

// =============================================================================
// Cart Repository
// =============================================================================

/// Repository for cart ledger operations.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Adds a product to the user's cart, or adds to the quantity of the
    /// existing line for that product.
    ///
    /// ## Behavior
    /// - Product must exist → `ProductNotFound`
    /// - The cumulative quantity must fit in current stock →
    ///   `InsufficientStock` (stock is checked, NOT decremented)
    /// - The line is re-priced from the product's current unit price; an
    ///   existing line keeps its stored discount amount
    ///
    /// ## Returns
    /// The stored line after the mutation.
    pub async fn add_to_cart(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> StoreResult<CartLine> {
        validation::validate_user_id(user_id)?;
        validation::validate_quantity(quantity)?;

        let product = self.get_product(product_id).await?;
        let now = Utc::now();

        match self.find_line(user_id, product_id).await? {
            Some(line) => {
                let new_quantity = line.quantity + quantity;
                validation::validate_quantity(new_quantity)?;

                if !product.in_stock(new_quantity) {
                    return Err(CoreError::InsufficientStock {
                        name: product.name,
                        available: product.stock_quantity,
                        requested: new_quantity,
                    }
                    .into());
                }

                let totals = price_line(
                    product.price(),
                    new_quantity,
                    line.discount(),
                    TaxRate::from_bps(line.tax_rate_bps),
                );

                sqlx::query(
                    r#"
                    UPDATE cart_lines SET
                        quantity = ?2,
                        unit_price_cents = ?3,
                        subtotal_cents = ?4,
                        discount_cents = ?5,
                        tax_cents = ?6,
                        total_cents = ?7,
                        updated_at = ?8
                    WHERE id = ?1
                    "#,
                )
                .bind(&line.id)
                .bind(new_quantity)
                .bind(product.price_cents)
                .bind(totals.subtotal.cents())
                .bind(totals.discount.cents())
                .bind(totals.tax.cents())
                .bind(totals.total.cents())
                .bind(now)
                .execute(&self.pool)
                .await
                .map_err(DbError::from)?;

                debug!(user_id = %user_id, product_id = %product_id, quantity = %new_quantity, "Cart line updated");

                Ok(CartLine {
                    quantity: new_quantity,
                    unit_price_cents: product.price_cents,
                    subtotal_cents: totals.subtotal.cents(),
                    discount_cents: totals.discount.cents(),
                    tax_cents: totals.tax.cents(),
                    total_cents: totals.total.cents(),
                    updated_at: now,
                    ..line
                })
            }

            None => {
                let line_count: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM cart_lines WHERE user_id = ?1")
                        .bind(user_id)
                        .fetch_one(&self.pool)
                        .await
                        .map_err(DbError::from)?;
                validation::validate_cart_size(line_count as usize)?;

                if !product.in_stock(quantity) {
                    return Err(CoreError::InsufficientStock {
                        name: product.name,
                        available: product.stock_quantity,
                        requested: quantity,
                    }
                    .into());
                }

                let totals = price_line(product.price(), quantity, Money::zero(), product.tax_rate());

                let line = CartLine {
                    id: Uuid::new_v4().to_string(),
                    user_id: user_id.to_string(),
                    product_id: product_id.to_string(),
                    coupon_id: None,
                    quantity,
                    unit_price_cents: product.price_cents,
                    tax_rate_bps: product.tax_rate_bps,
                    subtotal_cents: totals.subtotal.cents(),
                    discount_cents: 0,
                    tax_cents: totals.tax.cents(),
                    total_cents: totals.total.cents(),
                    created_at: now,
                    updated_at: now,
                };

                sqlx::query(
                    r#"
                    INSERT INTO cart_lines (
                        id, user_id, product_id, coupon_id, quantity,
                        unit_price_cents, tax_rate_bps, subtotal_cents,
                        discount_cents, tax_cents, total_cents,
                        created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                    "#,
                )
                .bind(&line.id)
                .bind(&line.user_id)
                .bind(&line.product_id)
                .bind(&line.coupon_id)
                .bind(line.quantity)
                .bind(line.unit_price_cents)
                .bind(line.tax_rate_bps)
                .bind(line.subtotal_cents)
                .bind(line.discount_cents)
                .bind(line.tax_cents)
                .bind(line.total_cents)
                .bind(line.created_at)
                .bind(line.updated_at)
                .execute(&self.pool)
                .await
                .map_err(DbError::from)?;

                debug!(user_id = %user_id, product_id = %product_id, quantity = %quantity, "Cart line created");

                Ok(line)
            }
        }
    }

    /// Sets the quantity of an existing line.
    ///
    /// ## Behavior
    /// - Quantity <= 0 removes the line
    /// - Line must exist → `CartLineNotFound`
    /// - New quantity must fit in stock → `InsufficientStock`
    /// - Re-priced from the product's current unit price, keeping the
    ///   stored discount amount
    pub async fn update_quantity(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> StoreResult<()> {
        if quantity <= 0 {
            return self.remove(user_id, product_id).await;
        }
        validation::validate_quantity(quantity)?;

        let product = self.get_product(product_id).await?;
        let line = self
            .find_line(user_id, product_id)
            .await?
            .ok_or(CoreError::CartLineNotFound {
                product_id: product_id.to_string(),
            })?;

        if !product.in_stock(quantity) {
            return Err(CoreError::InsufficientStock {
                name: product.name,
                available: product.stock_quantity,
                requested: quantity,
            }
            .into());
        }

        let totals = price_line(
            product.price(),
            quantity,
            line.discount(),
            TaxRate::from_bps(line.tax_rate_bps),
        );
        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE cart_lines SET
                quantity = ?2,
                unit_price_cents = ?3,
                subtotal_cents = ?4,
                tax_cents = ?5,
                total_cents = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&line.id)
        .bind(quantity)
        .bind(product.price_cents)
        .bind(totals.subtotal.cents())
        .bind(totals.tax.cents())
        .bind(totals.total.cents())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        debug!(user_id = %user_id, product_id = %product_id, quantity = %quantity, "Cart quantity updated");
        Ok(())
    }

    /// Removes the line for (user, product).
    pub async fn remove(&self, user_id: &str, product_id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM cart_lines WHERE user_id = ?1 AND product_id = ?2")
            .bind(user_id)
            .bind(product_id)
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(CoreError::CartLineNotFound {
                product_id: product_id.to_string(),
            }
            .into());
        }

        debug!(user_id = %user_id, product_id = %product_id, "Cart line removed");
        Ok(())
    }

    /// Removes every line in the user's cart.
    ///
    /// ## Returns
    /// The number of lines removed.
    pub async fn clear(&self, user_id: &str) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM cart_lines WHERE user_id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        debug!(user_id = %user_id, removed = result.rows_affected(), "Cart cleared");
        Ok(result.rows_affected())
    }

    /// Evaluates a coupon code and applies it to every line in the cart.
    ///
    /// Each line gets its own discount amount (`subtotal × rate`) and is
    /// stamped with the coupon id. Applying a different coupon afterwards
    /// overwrites these discounts; coupons never stack.
    ///
    /// This only *prices* the discount. The coupon is consumed (grant marked,
    /// counter incremented) inside the checkout transaction, never here.
    ///
    /// ## Returns
    /// The applied coupon, so callers can echo the discount percentage.
    pub async fn apply_coupon(
        &self,
        user_id: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Coupon> {
        validation::validate_user_id(user_id)?;
        validation::validate_coupon_code(code)?;

        let coupon = CouponRepository::new(self.pool.clone())
            .evaluate(code, user_id, now)
            .await?;

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let lines = Self::lines_on(&mut tx, user_id).await?;
        if lines.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        let rate = coupon.discount_rate();
        for line in &lines {
            let discount = line.subtotal().calculate_discount(rate);
            let totals = price_line(
                line.unit_price(),
                line.quantity,
                discount,
                TaxRate::from_bps(line.tax_rate_bps),
            );

            sqlx::query(
                r#"
                UPDATE cart_lines SET
                    coupon_id = ?2,
                    discount_cents = ?3,
                    tax_cents = ?4,
                    total_cents = ?5,
                    updated_at = ?6
                WHERE id = ?1
                "#,
            )
            .bind(&line.id)
            .bind(&coupon.id)
            .bind(totals.discount.cents())
            .bind(totals.tax.cents())
            .bind(totals.total.cents())
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(user_id = %user_id, code = %coupon.code, discount_bps = %coupon.discount_bps, lines = lines.len(), "Coupon applied to cart");
        Ok(coupon)
    }

    /// Lists the user's cart with live product data, oldest line first.
    pub async fn lines_for_user(&self, user_id: &str) -> DbResult<Vec<CartLineDetail>> {
        let details = sqlx::query_as::<_, CartLineDetail>(
            r#"
            SELECT
                c.id, c.user_id, c.product_id, c.coupon_id, c.quantity,
                c.unit_price_cents, c.tax_rate_bps, c.subtotal_cents,
                c.discount_cents, c.tax_cents, c.total_cents,
                c.created_at, c.updated_at,
                p.name AS product_name,
                p.stock_quantity
            FROM cart_lines c
            INNER JOIN products p ON p.id = c.product_id
            WHERE c.user_id = ?1
            ORDER BY c.created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }

    /// Aggregates the user's cart totals from the stored line snapshots.
    ///
    /// Two calls without a mutation in between return identical totals.
    pub async fn summary(&self, user_id: &str) -> DbResult<CartSummary> {
        let summary = sqlx::query_as::<_, CartSummary>(
            r#"
            SELECT
                COALESCE(SUM(quantity), 0)       AS total_items,
                COALESCE(SUM(subtotal_cents), 0) AS subtotal_cents,
                COALESCE(SUM(discount_cents), 0) AS discount_cents,
                COALESCE(SUM(tax_cents), 0)      AS tax_cents,
                COALESCE(SUM(total_cents), 0)    AS total_cents
            FROM cart_lines
            WHERE user_id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }

    // =========================================================================
    // Transaction-scoped operations
    // =========================================================================

    /// Loads the user's cart lines on the given connection.
    pub(crate) async fn lines_on(
        conn: &mut SqliteConnection,
        user_id: &str,
    ) -> DbResult<Vec<CartLine>> {
        let lines = sqlx::query_as::<_, CartLine>(&format!(
            "SELECT {CART_LINE_COLUMNS} FROM cart_lines WHERE user_id = ?1 ORDER BY created_at"
        ))
        .bind(user_id)
        .fetch_all(conn)
        .await?;

        Ok(lines)
    }

    /// Deletes the given lines on the given connection (checkout step).
    pub(crate) async fn delete_lines_on(
        conn: &mut SqliteConnection,
        line_ids: &[String],
    ) -> DbResult<()> {
        for id in line_ids {
            sqlx::query("DELETE FROM cart_lines WHERE id = ?1")
                .bind(id)
                .execute(&mut *conn)
                .await?;
        }

        Ok(())
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    async fn get_product(&self, product_id: &str) -> StoreResult<Product> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price_cents, tax_rate_bps, stock_quantity, \
             created_at, updated_at FROM products WHERE id = ?1",
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?;

        product.ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()).into())
    }

    async fn find_line(&self, user_id: &str, product_id: &str) -> DbResult<Option<CartLine>> {
        let line = sqlx::query_as::<_, CartLine>(&format!(
            "SELECT {CART_LINE_COLUMNS} FROM cart_lines WHERE user_id = ?1 AND product_id = ?2"
        ))
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(line)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;
    use homeware_core::CouponRejection;

    #[tokio::test]
    async fn test_add_creates_priced_line_without_touching_stock() {
        let db = testutil::test_db().await;
        let product = testutil::product("Walnut Side Table", 10000, 1800, 5);
        db.products().insert(&product).await.unwrap();

        let line = db.carts().add_to_cart("u1", &product.id, 3).await.unwrap();

        assert_eq!(line.quantity, 3);
        assert_eq!(line.subtotal_cents, 30000);
        assert_eq!(line.discount_cents, 0);
        assert_eq!(line.tax_cents, 5400); // 18% of 300.00
        assert_eq!(line.total_cents, 35400);

        // Stock untouched until checkout
        let p = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(p.stock_quantity, 5);
    }

    #[tokio::test]
    async fn test_add_same_product_accumulates_quantity() {
        let db = testutil::test_db().await;
        let product = testutil::product("Brass Lamp", 4500, 0, 10);
        db.products().insert(&product).await.unwrap();

        db.carts().add_to_cart("u1", &product.id, 2).await.unwrap();
        let line = db.carts().add_to_cart("u1", &product.id, 3).await.unwrap();

        assert_eq!(line.quantity, 5);
        assert_eq!(line.subtotal_cents, 22500);

        let details = db.carts().lines_for_user("u1").await.unwrap();
        assert_eq!(details.len(), 1);
    }

    #[tokio::test]
    async fn test_add_cumulative_quantity_exceeding_stock_fails() {
        let db = testutil::test_db().await;
        let product = testutil::product("Wool Rug", 20000, 0, 4);
        db.products().insert(&product).await.unwrap();

        db.carts().add_to_cart("u1", &product.id, 3).await.unwrap();
        let err = db.carts().add_to_cart("u1", &product.id, 2).await.unwrap_err();

        assert!(matches!(
            err.as_core(),
            Some(CoreError::InsufficientStock {
                available: 4,
                requested: 5,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_add_unknown_product_fails() {
        let db = testutil::test_db().await;

        let err = db.carts().add_to_cart("u1", "missing", 1).await.unwrap_err();
        assert!(matches!(err.as_core(), Some(CoreError::ProductNotFound(_))));
    }

    #[tokio::test]
    async fn test_add_rejects_bad_quantity_before_any_lookup() {
        let db = testutil::test_db().await;

        let err = db.carts().add_to_cart("u1", "whatever", 0).await.unwrap_err();
        assert!(matches!(err.as_core(), Some(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_quantity_reprices_and_zero_removes() {
        let db = testutil::test_db().await;
        let product = testutil::product("Stoneware Bowl", 1200, 500, 10);
        db.products().insert(&product).await.unwrap();

        db.carts().add_to_cart("u1", &product.id, 2).await.unwrap();
        db.carts().update_quantity("u1", &product.id, 6).await.unwrap();

        let summary = db.carts().summary("u1").await.unwrap();
        assert_eq!(summary.total_items, 6);
        assert_eq!(summary.subtotal_cents, 7200);

        db.carts().update_quantity("u1", &product.id, 0).await.unwrap();
        let summary = db.carts().summary("u1").await.unwrap();
        assert!(summary.is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_line_fails() {
        let db = testutil::test_db().await;

        let err = db.carts().remove("u1", "missing").await.unwrap_err();
        assert!(matches!(err.as_core(), Some(CoreError::CartLineNotFound { .. })));
    }

    #[tokio::test]
    async fn test_clear_removes_every_line() {
        let db = testutil::test_db().await;
        let a = testutil::product("Dish Rack", 1800, 0, 5);
        let b = testutil::product("Soap Dish", 600, 0, 5);
        db.products().insert(&a).await.unwrap();
        db.products().insert(&b).await.unwrap();

        db.carts().add_to_cart("u1", &a.id, 1).await.unwrap();
        db.carts().add_to_cart("u1", &b.id, 2).await.unwrap();
        db.carts().add_to_cart("u2", &a.id, 1).await.unwrap();

        let removed = db.carts().clear("u1").await.unwrap();
        assert_eq!(removed, 2);

        assert!(db.carts().summary("u1").await.unwrap().is_empty());
        // Other carts untouched
        assert_eq!(db.carts().summary("u2").await.unwrap().total_items, 1);
    }

    #[tokio::test]
    async fn test_summary_is_idempotent() {
        let db = testutil::test_db().await;
        let product = testutil::product("Glass Carafe", 3300, 1800, 9);
        db.products().insert(&product).await.unwrap();
        db.carts().add_to_cart("u1", &product.id, 2).await.unwrap();

        let first = db.carts().summary("u1").await.unwrap();
        let second = db.carts().summary("u1").await.unwrap();

        assert_eq!(first.total_items, second.total_items);
        assert_eq!(first.subtotal_cents, second.subtotal_cents);
        assert_eq!(first.discount_cents, second.discount_cents);
        assert_eq!(first.tax_cents, second.tax_cents);
        assert_eq!(first.total_cents, second.total_cents);
    }

    #[tokio::test]
    async fn test_apply_coupon_discounts_each_line() {
        let db = testutil::test_db().await;
        // 100.00 line with 0% tax, the classic SAVE10 scenario
        let product = testutil::product("Teak Tray", 10000, 0, 5);
        db.products().insert(&product).await.unwrap();
        let coupon = testutil::coupon("SAVE10", 1000, true, 1);
        db.coupons().insert(&coupon).await.unwrap();

        db.carts().add_to_cart("u1", &product.id, 1).await.unwrap();
        let applied = db
            .carts()
            .apply_coupon("u1", "SAVE10", Utc::now())
            .await
            .unwrap();
        assert_eq!(applied.id, coupon.id);

        let details = db.carts().lines_for_user("u1").await.unwrap();
        let line = &details[0].line;
        assert_eq!(line.coupon_id.as_deref(), Some(coupon.id.as_str()));
        assert_eq!(line.discount_cents, 1000);
        assert_eq!(line.total_cents, 9000);
    }

    #[tokio::test]
    async fn test_applying_second_coupon_overwrites_first() {
        let db = testutil::test_db().await;
        let product = testutil::product("Oak Shelf", 10000, 0, 5);
        db.products().insert(&product).await.unwrap();
        db.coupons()
            .insert(&testutil::coupon("SAVE10", 1000, true, 10))
            .await
            .unwrap();
        let better = testutil::coupon("SAVE25", 2500, true, 10);
        db.coupons().insert(&better).await.unwrap();

        db.carts().add_to_cart("u1", &product.id, 1).await.unwrap();
        db.carts().apply_coupon("u1", "SAVE10", Utc::now()).await.unwrap();
        db.carts().apply_coupon("u1", "SAVE25", Utc::now()).await.unwrap();

        let details = db.carts().lines_for_user("u1").await.unwrap();
        let line = &details[0].line;
        // No stacking: 25% replaced 10%
        assert_eq!(line.coupon_id.as_deref(), Some(better.id.as_str()));
        assert_eq!(line.discount_cents, 2500);
        assert_eq!(line.total_cents, 7500);
    }

    #[tokio::test]
    async fn test_apply_coupon_to_empty_cart_fails() {
        let db = testutil::test_db().await;
        db.coupons()
            .insert(&testutil::coupon("SAVE10", 1000, true, 10))
            .await
            .unwrap();

        let err = db
            .carts()
            .apply_coupon("u1", "SAVE10", Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err.as_core(), Some(CoreError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_apply_unknown_code_fails() {
        let db = testutil::test_db().await;
        let product = testutil::product("Jute Basket", 1500, 0, 5);
        db.products().insert(&product).await.unwrap();
        db.carts().add_to_cart("u1", &product.id, 1).await.unwrap();

        let err = db
            .carts()
            .apply_coupon("u1", "NOPE", Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_core(),
            Some(CoreError::Coupon(CouponRejection::NotFound))
        ));
    }

    #[tokio::test]
    async fn test_catalog_price_change_does_not_reprice_lines() {
        let db = testutil::test_db().await;
        let product = testutil::product("Marble Coaster", 2000, 0, 10);
        db.products().insert(&product).await.unwrap();
        db.carts().add_to_cart("u1", &product.id, 1).await.unwrap();

        // Catalog raises the price behind the cart's back
        sqlx::query("UPDATE products SET price_cents = 9999 WHERE id = ?1")
            .bind(&product.id)
            .execute(db.pool())
            .await
            .unwrap();

        let summary = db.carts().summary("u1").await.unwrap();
        assert_eq!(summary.subtotal_cents, 2000); // snapshot retained

        // The next explicit mutation picks the new price up
        db.carts().add_to_cart("u1", &product.id, 1).await.unwrap();
        let summary = db.carts().summary("u1").await.unwrap();
        assert_eq!(summary.subtotal_cents, 19998);
    }
}
