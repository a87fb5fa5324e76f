//! # Service Errors
//!
//! Unified error type for the sale workflows.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Sales Service                      │
//! │                                                                         │
//! │  Command ──► validate() ── report has errors ──► Validation(report)    │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  store.load(id) ─────────── None ──────────────► NotFound               │
//! │     │          └─────────── StoreError ────────► Storage / Conflict     │
//! │     ▼                                                                   │
//! │  status check ───────────── Cancelled ─────────► SaleCancelled /        │
//! │     │                                            AlreadyCancelled       │
//! │     ▼                                                                   │
//! │  sale.apply_discount_rules() ── CoreError ─────► Domain                 │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  Ok(outcome)                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A transport layer turns any of these into an [`ErrorResponse`]: a
//! machine-readable `code`, a human-readable `message`, and the collected
//! validation issues when there are any.

use serde::Serialize;
use tally_core::{CoreError, StoreError, ValidationIssue, ValidationReport};
use thiserror::Error;

/// Errors returned by [`SalesService`](crate::SalesService) workflows.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Sale with ID {0} not found")]
    NotFound(String),

    /// The command or the resulting sale broke one or more rules.
    #[error("Validation failed: {0}")]
    Validation(ValidationReport),

    #[error("Sale number '{0}' already exists")]
    Conflict(String),

    #[error("Cannot update a cancelled sale")]
    SaleCancelled,

    #[error("Sale is already cancelled")]
    AlreadyCancelled,

    /// Hard business-rule fault raised by the aggregate.
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ServiceError::NotFound(_) | ServiceError::Domain(CoreError::ItemNotFound { .. }) => {
                ErrorCode::NotFound
            }
            ServiceError::Validation(_) => ErrorCode::ValidationError,
            ServiceError::Conflict(_) => ErrorCode::Conflict,
            ServiceError::SaleCancelled
            | ServiceError::AlreadyCancelled
            | ServiceError::Domain(_) => ErrorCode::BusinessRule,
            ServiceError::Storage(_) => ErrorCode::StorageError,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateSaleNumber(number) => ServiceError::Conflict(number),
            StoreError::Backend(message) => {
                tracing::error!("Sale store failed: {}", message);
                ServiceError::Storage(message)
            }
        }
    }
}

impl From<ValidationReport> for ServiceError {
    fn from(report: ValidationReport) -> Self {
        ServiceError::Validation(report)
    }
}

/// Result type for workflows.
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Error Response
// =============================================================================

/// Error codes for callers.
///
/// ## Serialization
/// ```json
/// "NOT_FOUND" | "VALIDATION_ERROR" | "CONFLICT" | "BUSINESS_RULE" | "STORAGE_ERROR"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Sale does not exist (404)
    NotFound,

    /// Command or sale failed validation (400)
    ValidationError,

    /// Sale number already taken (409)
    Conflict,

    /// Operation not allowed in the sale's current state (422)
    BusinessRule,

    /// Store failure (500)
    StorageError,
}

/// What a transport layer sends back when a workflow fails.
///
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Validation failed: items: At least one item is required",
///   "errors": [{ "field": "items", "message": "At least one item is required" }]
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationIssue>,
}

impl From<&ServiceError> for ErrorResponse {
    fn from(err: &ServiceError) -> Self {
        let errors = match err {
            ServiceError::Validation(report) => report.errors.clone(),
            _ => Vec::new(),
        };
        // Storage details stay in the logs
        let message = match err {
            ServiceError::Storage(_) => "Sale store operation failed".to_string(),
            other => other.to_string(),
        };

        ErrorResponse {
            code: err.code(),
            message,
            errors,
        }
    }
}

impl From<ServiceError> for ErrorResponse {
    fn from(err: ServiceError) -> Self {
        ErrorResponse::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_service_errors() {
        let err: ServiceError = StoreError::DuplicateSaleNumber("S-1".into()).into();
        assert!(matches!(err, ServiceError::Conflict(ref n) if n == "S-1"));
        assert_eq!(err.code(), ErrorCode::Conflict);

        let err: ServiceError = StoreError::Backend("disk full".into()).into();
        assert_eq!(err.code(), ErrorCode::StorageError);
    }

    #[test]
    fn test_validation_response_carries_issues() {
        let mut report = ValidationReport::new();
        report.push("items", "At least one item is required");

        let response = ErrorResponse::from(ServiceError::Validation(report));
        assert_eq!(response.code, ErrorCode::ValidationError);
        assert_eq!(response.errors.len(), 1);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["errors"][0]["field"], "items");
    }

    #[test]
    fn test_storage_message_is_generic() {
        let response = ErrorResponse::from(ServiceError::Storage("secret path".into()));
        assert_eq!(response.code, ErrorCode::StorageError);
        assert!(!response.message.contains("secret"));

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn test_domain_errors_are_business_rules() {
        let err = ServiceError::from(CoreError::ExceedsMaxQuantity {
            quantity: 21,
            max: 20,
        });
        assert_eq!(err.code(), ErrorCode::BusinessRule);
        assert_eq!(ServiceError::SaleCancelled.to_string(), "Cannot update a cancelled sale");
    }
}
