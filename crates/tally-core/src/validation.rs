//! # Validation Module
//!
//! The uniform `{ isValid, errors: [{ field, message }] }` shape returned by
//! every `validate()` in Tally, plus the small rule helpers that fill it.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Command validation (sales-service)                           │
//! │  ├── Shape checks: lengths, line count, positive numbers               │
//! │  └── Uses the helpers below                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Aggregate validation (Sale::validate / SaleItem::validate)   │
//! │  ├── Identity fields, item bounds, discount cross-rule                 │
//! │  └── Item reports merged as items[i].field                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── UNIQUE sale_number                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every rule runs. A report is never cut short after its first problem.
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{max_length, require_text, ValidationReport};
//!
//! let mut report = ValidationReport::new();
//! require_text(&mut report, "customerName", "", "Customer name is required");
//! max_length(&mut report, "branchName", &"x".repeat(101), 100, "Branch name cannot exceed 100 characters");
//!
//! assert!(!report.is_valid);
//! assert_eq!(report.errors.len(), 2);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Validation Issue
// =============================================================================

/// One field-level problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ValidationIssue {
    /// camelCase field path, e.g. `customerName` or `items[2].quantity`
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

// =============================================================================
// Validation Report
// =============================================================================

/// Collected result of a validation pass.
///
/// `is_valid` is kept in step with `errors` by every mutating method; build
/// reports through them rather than pushing into `errors` directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// An empty, valid report.
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Records a problem and marks the report invalid.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationIssue::new(field, message));
        self.is_valid = false;
    }

    /// Records `message` against `field` unless `ok` holds. Returns `ok`.
    pub fn ensure(&mut self, ok: bool, field: &str, message: &str) -> bool {
        if !ok {
            self.push(field, message);
        }
        ok
    }

    /// Appends another report unchanged.
    pub fn merge(&mut self, other: ValidationReport) {
        for issue in other.errors {
            self.push(issue.field, issue.message);
        }
    }

    /// Appends another report with every field qualified by `prefix`.
    ///
    /// ```text
    /// prefix "items[1]" + field "quantity"  →  "items[1].quantity"
    /// ```
    pub fn merge_prefixed(&mut self, prefix: &str, other: ValidationReport) {
        for issue in other.errors {
            self.push(format!("{}.{}", prefix, issue.field), issue.message);
        }
    }

    /// Whether any problem was recorded against exactly `field`.
    pub fn has_error_for(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Converts into `Err(self)` when invalid, for workflows that reject.
    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_valid {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid {
            return write!(f, "valid");
        }
        let parts: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join("; "))
    }
}

// =============================================================================
// Rule Helpers
// =============================================================================

/// Requires `value` to contain something other than whitespace.
pub fn require_text(report: &mut ValidationReport, field: &str, value: &str, message: &str) -> bool {
    report.ensure(!value.trim().is_empty(), field, message)
}

/// Requires `value` to be at most `max` characters.
///
/// Counts characters, not bytes, so accented names are measured the way a
/// user would count them.
pub fn max_length(
    report: &mut ValidationReport,
    field: &str,
    value: &str,
    max: usize,
    message: &str,
) -> bool {
    report.ensure(value.chars().count() <= max, field, message)
}

/// Requires an identifier to be present.
///
/// Blank strings and the nil UUID both count as missing.
pub fn require_id(report: &mut ValidationReport, field: &str, value: &str, message: &str) -> bool {
    let value = value.trim();
    let present = !value.is_empty()
        && uuid::Uuid::parse_str(value).map_or(true, |id| !id.is_nil());
    report.ensure(present, field, message)
}

// =============================================================================
// Unit Tests
// =============================================================================
