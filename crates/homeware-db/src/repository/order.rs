//! # Order Repository
//!
//! Order queries and the one lifecycle transition this engine owns:
//! cancellation.
//!
//! ## Cancellation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cancel(order_id, user_id)            ONE TRANSACTION                   │
//! │                                                                         │
//! │  1. UPDATE orders SET status = 'cancelled'                              │
//! │     WHERE id = ? AND user_id = ? AND status = 'pending'                 │
//! │         │                                                               │
//! │         ├── 0 rows → NotFound or NotCancellable (diagnosed by re-read)  │
//! │         │                                                               │
//! │  2. stock_quantity += quantity for every order line                     │
//! │                                                                         │
//! │  3. COMMIT                                                              │
//! │                                                                         │
//! │  The status re-check and the transition are a single guarded UPDATE,    │
//! │  so a concurrent fulfilment transition cannot be cancelled over.        │
//! │  Coupon usage is NOT reversed: a redeemed coupon stays redeemed.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::error::{DbError, DbResult, StoreResult};
use crate::repository::product::ProductRepository;
use homeware_core::{CoreError, Order, OrderLine};

/// All columns of the orders table, in struct order.
const ORDER_COLUMNS: &str = "id, user_id, subtotal_cents, discount_cents, tax_cents, \
     total_cents, balance_cents, status, created_at, updated_at";

/// All columns of the order_lines table, in struct order.
const ORDER_LINE_COLUMNS: &str =
    "id, order_id, product_id, quantity, price_at_purchase_cents, created_at";

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order owned by the caller.
    ///
    /// ## Returns
    /// * `Ok(Some(Order))` - Order found and owned by `user_id`
    /// * `Ok(None)` - No such order for this user
    pub async fn get_by_id(&self, order_id: &str, user_id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1 AND user_id = ?2"
        ))
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets the lines of an order, oldest first.
    pub async fn lines(&self, order_id: &str) -> DbResult<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(&format!(
            "SELECT {ORDER_LINE_COLUMNS} FROM order_lines WHERE order_id = ?1 ORDER BY created_at, id"
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Lists a user's orders, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Cancels a pending order and restores its stock, as one transaction.
    ///
    /// Only the owning user may cancel, and only while the order is still
    /// `Pending`. Coupon usage consumed by the order is never reversed.
    ///
    /// ## Errors
    /// * `OrderNotFound` - No such order for this user
    /// * `OrderNotCancellable` - The order exists but left `Pending`
    pub async fn cancel(&self, order_id: &str, user_id: &str) -> StoreResult<()> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        let now = Utc::now();

        // Claim the order. Re-checks status at mutation time: a cancel
        // racing a fulfilment transition affects zero rows here.
        let claimed = sqlx::query(
            r#"
            UPDATE orders SET status = 'cancelled', updated_at = ?3
            WHERE id = ?1 AND user_id = ?2 AND status = 'pending'
            "#,
        )
        .bind(order_id)
        .bind(user_id)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        if claimed.rows_affected() == 0 {
            // Tell the caller why: missing order or wrong status
            let existing = Self::get_on(&mut tx, order_id, user_id).await?;
            return match existing {
                None => Err(CoreError::OrderNotFound(order_id.to_string()).into()),
                Some(order) => Err(CoreError::OrderNotCancellable {
                    order_id: order.id,
                    status: order.status,
                }
                .into()),
            };
        }

        // Put every ordered quantity back on the shelf
        let lines = Self::lines_on(&mut tx, order_id).await?;
        for line in &lines {
            ProductRepository::restore_stock(&mut tx, &line.product_id, line.quantity).await?;
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(order_id = %order_id, user_id = %user_id, lines = lines.len(), "Order cancelled");
        Ok(())
    }

    // =========================================================================
    // Transaction-scoped operations
    // =========================================================================

    /// Inserts an order header and its lines on the given connection.
    pub(crate) async fn insert_on(
        conn: &mut SqliteConnection,
        order: &Order,
        lines: &[OrderLine],
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO orders (
                id, user_id, subtotal_cents, discount_cents, tax_cents,
                total_cents, balance_cents, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(order.subtotal_cents)
        .bind(order.discount_cents)
        .bind(order.tax_cents)
        .bind(order.total_cents)
        .bind(order.balance_cents)
        .bind(order.status)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *conn)
        .await?;

        for line in lines {
            sqlx::query(
                r#"
                INSERT INTO order_lines (
                    id, order_id, product_id, quantity,
                    price_at_purchase_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&line.id)
            .bind(&line.order_id)
            .bind(&line.product_id)
            .bind(line.quantity)
            .bind(line.price_at_purchase_cents)
            .bind(line.created_at)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Gets an order on the given connection.
    pub(crate) async fn get_on(
        conn: &mut SqliteConnection,
        order_id: &str,
        user_id: &str,
    ) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1 AND user_id = ?2"
        ))
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;

        Ok(order)
    }

    /// Gets an order's lines on the given connection.
    pub(crate) async fn lines_on(
        conn: &mut SqliteConnection,
        order_id: &str,
    ) -> DbResult<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(&format!(
            "SELECT {ORDER_LINE_COLUMNS} FROM order_lines WHERE order_id = ?1 ORDER BY created_at, id"
        ))
        .bind(order_id)
        .fetch_all(conn)
        .await?;

        Ok(lines)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;
    use homeware_core::OrderStatus;

    /// Checkout a fresh order of `quantity` units for `user_id`.
    async fn place_order(
        db: &crate::pool::Database,
        user_id: &str,
        product: &homeware_core::Product,
        quantity: i64,
    ) -> Order {
        db.carts()
            .add_to_cart(user_id, &product.id, quantity)
            .await
            .unwrap();
        db.checkout().create_order(user_id, None).await.unwrap()
    }

    #[tokio::test]
    async fn test_cancel_restores_stock_and_sets_status() {
        let db = testutil::test_db().await;
        let product = testutil::product("Pine Bench", 8000, 0, 5);
        db.products().insert(&product).await.unwrap();

        let order = place_order(&db, "u1", &product, 2).await;

        // Checkout took 2 of 5
        let p = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(p.stock_quantity, 3);

        db.orders().cancel(&order.id, "u1").await.unwrap();

        let p = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(p.stock_quantity, 5);

        let cancelled = db.orders().get_by_id(&order.id, "u1").await.unwrap().unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_cancel_twice_fails_not_cancellable() {
        let db = testutil::test_db().await;
        let product = testutil::product("Cotton Throw", 2500, 0, 3);
        db.products().insert(&product).await.unwrap();

        let order = place_order(&db, "u1", &product, 1).await;
        db.orders().cancel(&order.id, "u1").await.unwrap();

        let err = db.orders().cancel(&order.id, "u1").await.unwrap_err();
        assert!(matches!(
            err.as_core(),
            Some(CoreError::OrderNotCancellable {
                status: OrderStatus::Cancelled,
                ..
            })
        ));

        // Stock restored exactly once
        let p = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(p.stock_quantity, 3);
    }

    #[tokio::test]
    async fn test_cancel_non_pending_order_fails() {
        let db = testutil::test_db().await;
        let product = testutil::product("Rattan Chair", 15000, 0, 2);
        db.products().insert(&product).await.unwrap();

        let order = place_order(&db, "u1", &product, 1).await;

        // Fulfilment moved the order on
        sqlx::query("UPDATE orders SET status = 'shipped' WHERE id = ?1")
            .bind(&order.id)
            .execute(db.pool())
            .await
            .unwrap();

        let err = db.orders().cancel(&order.id, "u1").await.unwrap_err();
        assert!(matches!(
            err.as_core(),
            Some(CoreError::OrderNotCancellable {
                status: OrderStatus::Shipped,
                ..
            })
        ));

        let p = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(p.stock_quantity, 1); // not restored
    }

    #[tokio::test]
    async fn test_cancel_requires_ownership() {
        let db = testutil::test_db().await;
        let product = testutil::product("Bamboo Ladder", 4000, 0, 2);
        db.products().insert(&product).await.unwrap();

        let order = place_order(&db, "u1", &product, 1).await;

        let err = db.orders().cancel(&order.id, "intruder").await.unwrap_err();
        assert!(matches!(err.as_core(), Some(CoreError::OrderNotFound(_))));
    }

    #[tokio::test]
    async fn test_cancel_unknown_order() {
        let db = testutil::test_db().await;

        let err = db.orders().cancel("no-such-order", "u1").await.unwrap_err();
        assert!(matches!(err.as_core(), Some(CoreError::OrderNotFound(_))));
    }

    #[tokio::test]
    async fn test_list_for_user_newest_first() {
        let db = testutil::test_db().await;
        let product = testutil::product("Clay Pot", 900, 0, 10);
        db.products().insert(&product).await.unwrap();

        let first = place_order(&db, "u1", &product, 1).await;
        let second = place_order(&db, "u1", &product, 2).await;

        let orders = db.orders().list_for_user("u1").await.unwrap();
        assert_eq!(orders.len(), 2);
        // Same-timestamp inserts keep a stable order by created_at; both
        // orders must be present and the totals distinguish them
        let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
        assert!(ids.contains(&first.id.as_str()));
        assert!(ids.contains(&second.id.as_str()));

        assert!(db.orders().list_for_user("u2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_order_lines_snapshot() {
        let db = testutil::test_db().await;
        let product = testutil::product("Iron Hook", 350, 0, 10);
        db.products().insert(&product).await.unwrap();

        let order = place_order(&db, "u1", &product, 4).await;

        let lines = db.orders().lines(&order.id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 4);
        assert_eq!(lines[0].price_at_purchase_cents, 350);
    }
}
