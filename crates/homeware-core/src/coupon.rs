//! # Coupon Eligibility Policy
//!
//! Decides whether a coupon is usable by a user at a point in time.
//!
//! ## Check Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  evaluate(code, user, now)                                              │
//! │                                                                         │
//! │  1. Code resolves to a coupon?          → NotFound                      │
//! │  2. now >= valid_from?                  → NotYetValid                   │
//! │  3. now <= valid_to?                    → Expired                       │
//! │  4. total_used < max_uses?              → UsageLimitReached             │
//! │  5. Non-public: unused grant for user?  → NotEligible                   │
//! │                                                                         │
//! │  Fail fast: the first failing check is the returned reason.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This policy is read-only. Marking a coupon used happens exclusively inside
//! the checkout transaction, so there is no window between "validated" and
//! "consumed" that a competing checkout could exploit.
//!
//! Step 1 lives in the repository (it needs a lookup); steps 2-5 are the pure
//! [`check_usable`] function below.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::{Coupon, UserCouponGrant};

// =============================================================================
// Rejection Reasons
// =============================================================================

/// Why a coupon cannot be used. One variant per failed policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CouponRejection {
    /// No coupon matches the given code.
    #[error("Invalid coupon code")]
    NotFound,

    /// The validity window has not opened yet.
    #[error("Coupon is not yet valid")]
    NotYetValid,

    /// The validity window has closed.
    #[error("Coupon has expired")]
    Expired,

    /// All permitted redemptions have been consumed.
    #[error("Coupon usage limit reached")]
    UsageLimitReached,

    /// Non-public coupon without an unused grant for this user.
    #[error("You are not eligible for this coupon")]
    NotEligible,
}

// =============================================================================
// Policy
// =============================================================================

/// Applies the eligibility checks to an already-resolved coupon.
///
/// ## Arguments
/// * `coupon` - The coupon resolved from the user's code
/// * `grant` - The user's grant for this coupon, if one exists. Ignored for
///   public coupons.
/// * `now` - The evaluation instant, passed in so callers own the clock
///
/// ## Returns
/// * `Ok(())` - Usable; the caller may apply `coupon.discount_rate()`
/// * `Err(CouponRejection)` - The first failing check, in policy order
pub fn check_usable(
    coupon: &Coupon,
    grant: Option<&UserCouponGrant>,
    now: DateTime<Utc>,
) -> Result<(), CouponRejection> {
    if coupon.valid_from > now {
        return Err(CouponRejection::NotYetValid);
    }

    if coupon.valid_to < now {
        return Err(CouponRejection::Expired);
    }

    if coupon.is_exhausted() {
        return Err(CouponRejection::UsageLimitReached);
    }

    if !coupon.is_public {
        match grant {
            Some(g) if !g.used => {}
            _ => return Err(CouponRejection::NotEligible),
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn coupon(is_public: bool, max_uses: i64, total_used: i64) -> Coupon {
        let now = Utc::now();
        Coupon {
            id: "c1".to_string(),
            code: "SAVE10".to_string(),
            discount_bps: 1000,
            is_public,
            valid_from: now - Duration::days(1),
            valid_to: now + Duration::days(1),
            max_uses,
            total_used,
            created_at: now,
            updated_at: now,
        }
    }

    fn grant(used: bool) -> UserCouponGrant {
        let now = Utc::now();
        UserCouponGrant {
            id: "g1".to_string(),
            user_id: "u1".to_string(),
            coupon_id: "c1".to_string(),
            used,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_public_coupon_usable() {
        let c = coupon(true, 10, 0);
        assert_eq!(check_usable(&c, None, Utc::now()), Ok(()));
    }

    #[test]
    fn test_window_not_open_yet() {
        let mut c = coupon(true, 10, 0);
        c.valid_from = Utc::now() + Duration::hours(1);
        assert_eq!(check_usable(&c, None, Utc::now()), Err(CouponRejection::NotYetValid));
    }

    #[test]
    fn test_window_closed() {
        let mut c = coupon(true, 10, 0);
        c.valid_to = Utc::now() - Duration::hours(1);
        assert_eq!(check_usable(&c, None, Utc::now()), Err(CouponRejection::Expired));
    }

    #[test]
    fn test_window_boundaries_inclusive() {
        let c = coupon(true, 10, 0);
        assert_eq!(check_usable(&c, None, c.valid_from), Ok(()));
        assert_eq!(check_usable(&c, None, c.valid_to), Ok(()));
    }

    #[test]
    fn test_usage_limit_reached() {
        let c = coupon(true, 1, 1);
        assert_eq!(
            check_usable(&c, None, Utc::now()),
            Err(CouponRejection::UsageLimitReached)
        );
    }

    #[test]
    fn test_window_checked_before_usage_limit() {
        // Expired AND exhausted: the window failure wins, in policy order
        let mut c = coupon(true, 1, 1);
        c.valid_to = Utc::now() - Duration::hours(1);
        assert_eq!(check_usable(&c, None, Utc::now()), Err(CouponRejection::Expired));
    }

    #[test]
    fn test_targeted_coupon_requires_grant() {
        let c = coupon(false, 10, 0);
        assert_eq!(check_usable(&c, None, Utc::now()), Err(CouponRejection::NotEligible));
    }

    #[test]
    fn test_targeted_coupon_with_unused_grant() {
        let c = coupon(false, 10, 0);
        let g = grant(false);
        assert_eq!(check_usable(&c, Some(&g), Utc::now()), Ok(()));
    }

    #[test]
    fn test_targeted_coupon_with_used_grant() {
        let c = coupon(false, 10, 0);
        let g = grant(true);
        assert_eq!(check_usable(&c, Some(&g), Utc::now()), Err(CouponRejection::NotEligible));
    }

    #[test]
    fn test_public_coupon_ignores_grant_state() {
        // A used grant on a public coupon does not block redemption
        let c = coupon(true, 10, 0);
        let g = grant(true);
        assert_eq!(check_usable(&c, Some(&g), Utc::now()), Ok(()));
    }
}
