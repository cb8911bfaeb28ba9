//! # Coupon Repository
//!
//! Coupon lookup, eligibility evaluation, grants, and consumption.
//!
//! ## Validate vs Consume
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  evaluate()    read-only: resolve code, apply the policy checks         │
//! │                (homeware_core::coupon::check_usable)                    │
//! │                                                                         │
//! │  consume_on()  write: grant.used = 1, total_used += 1, BOTH inside      │
//! │                the caller's checkout transaction                        │
//! │                                                                         │
//! │  Nothing is reserved between the two. A coupon that was usable when     │
//! │  applied to the cart can still lose the race at checkout; the guarded   │
//! │  increment is what keeps total_used <= max_uses.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbResult, StoreResult};
use homeware_core::coupon::check_usable;
use homeware_core::{Coupon, CouponRejection, UserCouponGrant};

/// All columns of the coupons table, in struct order.
const COUPON_COLUMNS: &str = "id, code, discount_bps, is_public, valid_from, valid_to, \
     max_uses, total_used, created_at, updated_at";

/// All columns of the user_coupon_grants table, in struct order.
const GRANT_COLUMNS: &str = "id, user_id, coupon_id, used, created_at, updated_at";

/// Repository for coupon database operations.
#[derive(Debug, Clone)]
pub struct CouponRepository {
    pool: SqlitePool,
}

impl CouponRepository {
    /// Creates a new CouponRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CouponRepository { pool }
    }

    /// Inserts a new coupon.
    pub async fn insert(&self, coupon: &Coupon) -> DbResult<()> {
        debug!(code = %coupon.code, "Inserting coupon");

        sqlx::query(
            r#"
            INSERT INTO coupons (
                id, code, discount_bps, is_public, valid_from, valid_to,
                max_uses, total_used, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&coupon.id)
        .bind(&coupon.code)
        .bind(coupon.discount_bps)
        .bind(coupon.is_public)
        .bind(coupon.valid_from)
        .bind(coupon.valid_to)
        .bind(coupon.max_uses)
        .bind(coupon.total_used)
        .bind(coupon.created_at)
        .bind(coupon.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a coupon by code.
    ///
    /// Matching is case-insensitive: the column carries COLLATE NOCASE, so
    /// "save10" resolves the coupon stored as "SAVE10".
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Coupon>> {
        let coupon = sqlx::query_as::<_, Coupon>(&format!(
            "SELECT {COUPON_COLUMNS} FROM coupons WHERE code = ?1"
        ))
        .bind(code.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(coupon)
    }

    /// Gets a coupon by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Coupon>> {
        let coupon = sqlx::query_as::<_, Coupon>(&format!(
            "SELECT {COUPON_COLUMNS} FROM coupons WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(coupon)
    }

    /// Issues a grant authorizing `user_id` to redeem a non-public coupon.
    pub async fn grant(&self, user_id: &str, coupon_id: &str) -> DbResult<UserCouponGrant> {
        let now = Utc::now();
        let grant = UserCouponGrant {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            coupon_id: coupon_id.to_string(),
            used: false,
            created_at: now,
            updated_at: now,
        };

        debug!(user_id = %user_id, coupon_id = %coupon_id, "Issuing coupon grant");

        sqlx::query(
            r#"
            INSERT INTO user_coupon_grants (
                id, user_id, coupon_id, used, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&grant.id)
        .bind(&grant.user_id)
        .bind(&grant.coupon_id)
        .bind(grant.used)
        .bind(grant.created_at)
        .bind(grant.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(grant)
    }

    /// Finds the user's grant for a coupon, if one exists.
    pub async fn find_grant(
        &self,
        user_id: &str,
        coupon_id: &str,
    ) -> DbResult<Option<UserCouponGrant>> {
        let grant = sqlx::query_as::<_, UserCouponGrant>(&format!(
            "SELECT {GRANT_COLUMNS} FROM user_coupon_grants \
             WHERE user_id = ?1 AND coupon_id = ?2"
        ))
        .bind(user_id)
        .bind(coupon_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(grant)
    }

    /// Evaluates whether `code` is usable by `user_id` at `now`.
    ///
    /// Read-only; usage counters are mutated only by [`Self::consume_on`]
    /// inside the checkout transaction.
    ///
    /// ## Returns
    /// * `Ok(Coupon)` - Usable; apply `coupon.discount_rate()`
    /// * `Err` - The first failing policy check, as a [`CouponRejection`]
    pub async fn evaluate(
        &self,
        code: &str,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Coupon> {
        let coupon = self
            .get_by_code(code)
            .await?
            .ok_or(CouponRejection::NotFound)?;

        let grant = if coupon.is_public {
            None
        } else {
            self.find_grant(user_id, &coupon.id).await?
        };

        check_usable(&coupon, grant.as_ref(), now)?;

        Ok(coupon)
    }

    /// Lists the coupons `user_id` could redeem right now: public coupons
    /// plus non-public ones with an unused grant, all inside their validity
    /// window and under their usage budget.
    pub async fn available_for_user(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> DbResult<Vec<Coupon>> {
        let candidates = sqlx::query_as::<_, Coupon>(&format!(
            "SELECT {COUPON_COLUMNS} FROM coupons WHERE is_public = 1 \
             UNION \
             SELECT c.id, c.code, c.discount_bps, c.is_public, c.valid_from, c.valid_to, \
                    c.max_uses, c.total_used, c.created_at, c.updated_at \
             FROM coupons c \
             INNER JOIN user_coupon_grants g ON g.coupon_id = c.id \
             WHERE g.user_id = ?1 AND g.used = 0"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        // Eligibility is already settled per row (public, or unused grant);
        // what remains is the window and the usage budget.
        Ok(candidates
            .into_iter()
            .filter(|c| c.valid_from <= now && c.valid_to >= now && !c.is_exhausted())
            .collect())
    }

    // =========================================================================
    // Transaction-scoped operations
    // =========================================================================

    /// Consumes one use of a coupon inside the checkout transaction.
    ///
    /// Marks the user's grant used (when one exists; public coupons have
    /// none) and increments `total_used`, guarded by `total_used < max_uses`.
    ///
    /// ## Returns
    /// * `Ok(true)` - Consumed
    /// * `Ok(false)` - Usage budget already spent; the caller must abort
    pub(crate) async fn consume_on(
        conn: &mut SqliteConnection,
        user_id: &str,
        coupon_id: &str,
    ) -> DbResult<bool> {
        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE user_coupon_grants SET used = 1, updated_at = ?3
            WHERE user_id = ?1 AND coupon_id = ?2 AND used = 0
            "#,
        )
        .bind(user_id)
        .bind(coupon_id)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        let result = sqlx::query(
            r#"
            UPDATE coupons SET total_used = total_used + 1, updated_at = ?2
            WHERE id = ?1 AND total_used < max_uses
            "#,
        )
        .bind(coupon_id)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
