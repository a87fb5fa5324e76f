//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - Hard faults raised by the aggregate            │
//! │  └── StoreError       - What a SaleStore reports to its callers        │
//! │                                                                         │
//! │  tally-db errors (separate crate)                                      │
//! │  └── DbError          - sqlx / migration failures → StoreError         │
//! │                                                                         │
//! │  sales-service errors (in app)                                         │
//! │  └── ServiceError     - What a caller sees (code + message + errors)   │
//! │                                                                         │
//! │  Flow: CoreError/StoreError → ServiceError → ErrorResponse             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field-level problems are NOT errors here. They travel as a
//! [`ValidationReport`](crate::validation::ValidationReport) until a workflow
//! decides to reject the request.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Hard faults of the sale domain.
///
/// A `CoreError` means the operation aborted and the aggregate must not be
/// persisted in whatever state the caller was building.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A line carries more units than the per-product cap.
    ///
    /// ## When This Occurs
    /// ```text
    /// SaleItem { quantity: 21 }
    ///      │
    ///      ▼
    /// apply_discount_rules()
    ///      │
    ///      ▼
    /// ExceedsMaxQuantity { quantity: 21, max: 20 }   (no state changed)
    /// ```
    #[error("Cannot sell more than {max} identical items (requested {quantity})")]
    ExceedsMaxQuantity { quantity: i64, max: i64 },

    /// An item id that does not belong to the sale.
    #[error("Item {item_id} not found in sale {sale_id}")]
    ItemNotFound { sale_id: String, item_id: String },
}

// =============================================================================
// Store Error
// =============================================================================

/// Errors a [`SaleStore`](crate::store::SaleStore) implementation may report.
///
/// "Not found" is not an error: `load` returns `Ok(None)` and `delete` returns
/// `Ok(false)`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another sale already uses this business number.
    #[error("Sale number '{0}' already exists")]
    DuplicateSaleNumber(String),

    /// The backing store failed (connection, query, corrupt row ...).
    #[error("Store backend error: {0}")]
    Backend(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Convenience type alias for Results with StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ExceedsMaxQuantity {
            quantity: 21,
            max: 20,
        };
        assert_eq!(
            err.to_string(),
            "Cannot sell more than 20 identical items (requested 21)"
        );

        let err = CoreError::ItemNotFound {
            sale_id: "s-1".to_string(),
            item_id: "i-9".to_string(),
        };
        assert_eq!(err.to_string(), "Item i-9 not found in sale s-1");
    }

    #[test]
    fn test_store_error_messages() {
        let err = StoreError::DuplicateSaleNumber("S-0001".to_string());
        assert_eq!(err.to_string(), "Sale number 'S-0001' already exists");
    }
}
