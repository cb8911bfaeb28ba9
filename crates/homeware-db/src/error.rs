//! # Database Error Types
//!
//! Error types for database operations and the combined service error
//! returned by cart, checkout and order operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError ← DbError merged with CoreError business failures          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  API layer renders a message naming the product/coupon/order           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use homeware_core::{CoreError, CouponRejection, ValidationError};

// =============================================================================
// Db Error
// =============================================================================

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Duplicate coupon code
    /// - Second cart line for the same (user, product) pair
    #[error("Duplicate {field}: already exists")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// A competing writer holds the database lock.
    ///
    /// The checkout orchestrator retries these once; business failures are
    /// never mapped here.
    #[error("Database busy: {0}")]
    Busy(String),

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// True when the error came from a competing writer rather than from
    /// the statement itself. These are the only errors worth retrying.
    pub fn is_conflict(&self) -> bool {
        matches!(self, DbError::Busy(_) | DbError::PoolExhausted)
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint / lock type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // UNIQUE constraint: "UNIQUE constraint failed: <table>.<column>"
                // FK constraint: "FOREIGN KEY constraint failed"
                // Lock contention: "database is locked" / "database table is locked"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("database is locked") || msg.contains("database table is locked")
                {
                    DbError::Busy(msg.to_string())
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Store Error
// =============================================================================

/// The error type returned by cart, checkout and order operations.
///
/// Merges business rule violations (from homeware-core) with storage
/// failures, so a caller can distinguish "you can't" from "we couldn't".
#[derive(Debug, Error)]
pub enum StoreError {
    /// A business rule rejected the operation. The variant names the
    /// offending product/coupon/order.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The underlying store failed; the operation was rolled back.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl StoreError {
    /// Returns the business failure, if this is one.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            StoreError::Core(e) => Some(e),
            StoreError::Db(_) => None,
        }
    }
}

impl From<CouponRejection> for StoreError {
    fn from(err: CouponRejection) -> Self {
        StoreError::Core(CoreError::Coupon(err))
    }
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Core(CoreError::Validation(err))
    }
}

/// Result type for service-level operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_is_conflict() {
        assert!(DbError::Busy("database is locked".to_string()).is_conflict());
        assert!(DbError::PoolExhausted.is_conflict());
        assert!(!DbError::QueryFailed("syntax error".to_string()).is_conflict());
        assert!(!DbError::not_found("Order", "o1").is_conflict());
    }

    #[test]
    fn test_coupon_rejection_wraps_into_store_error() {
        let err: StoreError = CouponRejection::UsageLimitReached.into();
        assert!(matches!(
            err.as_core(),
            Some(CoreError::Coupon(CouponRejection::UsageLimitReached))
        ));
    }
}
