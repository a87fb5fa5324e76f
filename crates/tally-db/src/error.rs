//! # Database Errors
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sqlx::Error / MigrateError                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError ← constraint name parsed out of the SQLite message            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (tally-core) ← What every SaleStore caller sees            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ServiceError (sales-service) ← CONFLICT / STORAGE_ERROR               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tally_core::StoreError;
use thiserror::Error;

/// Failures of the SQLite layer, classified so that callers can tell a
/// taken sale number from a broken database.
#[derive(Debug, Error)]
pub enum DbError {
    /// Raised by `idx_sales_sale_number` when a sale number is reused.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// A `sale_items` row naming a sale that is not stored.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// The file could not be opened or created, or the pool is closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// No connection became free within `connect_timeout`.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Whether this is a unique violation on the sale number column.
    pub fn is_duplicate_sale_number(&self) -> bool {
        matches!(self, DbError::UniqueViolation { field, .. } if field.contains("sale_number"))
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::PoolClosed     → DbError::ConnectionFailed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite reports constraints as:
                // "UNIQUE constraint failed: <table>.<column>"
                // "FOREIGN KEY constraint failed"
                if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::UniqueViolation {
                        field: field.to_string(),
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
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

/// Surfaces database failures through the store port.
impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation { ref field, ref value } if field.contains("sale_number") => {
                StoreError::DuplicateSaleNumber(value.clone())
            }
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_sale_number_maps_to_store_error() {
        let err = DbError::duplicate("sales.sale_number", "S-0001");
        assert!(err.is_duplicate_sale_number());
        match StoreError::from(err) {
            StoreError::DuplicateSaleNumber(number) => assert_eq!(number, "S-0001"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_other_errors_map_to_backend() {
        let err: StoreError = DbError::PoolExhausted.into();
        assert!(matches!(err, StoreError::Backend(msg) if msg == "Connection pool exhausted"));
    }
}
