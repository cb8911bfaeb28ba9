//! Shared fixtures for repository and checkout tests.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::pool::{Database, DbConfig};
use homeware_core::{Coupon, Product};

/// An isolated in-memory database with migrations applied.
pub(crate) async fn test_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

/// A product fixture with the given pricing and stock.
pub(crate) fn product(name: &str, price_cents: i64, tax_rate_bps: u32, stock: i64) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        description: None,
        price_cents,
        tax_rate_bps,
        stock_quantity: stock,
        created_at: now,
        updated_at: now,
    }
}

/// A coupon fixture valid from yesterday for thirty days.
pub(crate) fn coupon(code: &str, discount_bps: u32, is_public: bool, max_uses: i64) -> Coupon {
    let now = Utc::now();
    Coupon {
        id: Uuid::new_v4().to_string(),
        code: code.to_string(),
        discount_bps,
        is_public,
        valid_from: now - Duration::days(1),
        valid_to: now + Duration::days(30),
        max_uses,
        total_used: 0,
        created_at: now,
        updated_at: now,
    }
}
