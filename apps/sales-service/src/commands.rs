//! # Workflow Commands
//!
//! Inputs of the sale workflows, each with its own `validate()`.
//!
//! Command validation checks the shape of the request (lengths, counts,
//! required ids). Rules that need the priced aggregate, such as the 20-unit
//! cap or discount bounds, are checked by `Sale::validate()` afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_core::validation::{max_length, require_id, require_text};
use tally_core::{NewSaleItem, SaleFilter, ValidationReport, MAX_NAME_LENGTH, MAX_SALE_LINES};

/// Page size used when a caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page a caller may ask for.
pub const MAX_PAGE_SIZE: u32 = 100;

// =============================================================================
// Create
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSale {
    /// Generated when absent or blank.
    #[serde(default)]
    pub sale_number: Option<String>,
    /// Defaults to now.
    #[serde(default)]
    pub sale_date: Option<DateTime<Utc>>,
    pub customer_id: String,
    pub customer_name: String,
    pub branch_id: String,
    pub branch_name: String,
    pub items: Vec<NewSaleItem>,
}

impl CreateSale {
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();

        require_id(&mut report, "customerId", &self.customer_id, "Customer ID is required");
        require_id(&mut report, "branchId", &self.branch_id, "Branch ID is required");
        check_names(&mut report, &self.customer_name, &self.branch_name);
        check_items(&mut report, &self.items);

        report
    }
}

// =============================================================================
// Update
// =============================================================================

/// Replaces the names and the whole item collection of an existing sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSale {
    pub id: String,
    pub customer_name: String,
    pub branch_name: String,
    pub items: Vec<NewSaleItem>,
}

impl UpdateSale {
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();

        require_text(&mut report, "id", &self.id, "Sale ID is required");
        check_names(&mut report, &self.customer_name, &self.branch_name);
        check_items(&mut report, &self.items);

        report
    }
}

// =============================================================================
// Cancel
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelSale {
    pub id: String,
    #[serde(default)]
    pub reason: Option<String>,
}

impl CancelSale {
    pub fn new(id: impl Into<String>) -> Self {
        CancelSale {
            id: id.into(),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        require_text(&mut report, "id", &self.id, "Sale ID is required");
        report
    }
}

// =============================================================================
// List
// =============================================================================

/// One page of sales, newest first.
///
/// Pages are 1-based. Filters left as `None` match every sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSales {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub size: u32,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub branch_id: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for ListSales {
    fn default() -> Self {
        ListSales {
            page: default_page(),
            size: default_page_size(),
            customer_id: None,
            branch_id: None,
        }
    }
}

impl ListSales {
    pub fn page(page: u32, size: u32) -> Self {
        ListSales {
            page,
            size,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();

        report.ensure(self.page > 0, "page", "Page must be greater than 0");
        if report.ensure(self.size > 0, "size", "Size must be greater than 0") {
            report.ensure(self.size <= MAX_PAGE_SIZE, "size", "Size cannot exceed 100");
        }

        if let Some(id) = &self.customer_id {
            require_text(
                &mut report,
                "customerId",
                id,
                "Customer ID cannot be empty when provided",
            );
        }
        if let Some(id) = &self.branch_id {
            require_text(
                &mut report,
                "branchId",
                id,
                "Branch ID cannot be empty when provided",
            );
        }

        report
    }

    pub fn filter(&self) -> SaleFilter {
        SaleFilter {
            customer_id: self.customer_id.as_deref().map(|id| id.trim().to_string()),
            branch_id: self.branch_id.as_deref().map(|id| id.trim().to_string()),
        }
    }
}

// =============================================================================
// Shared Rules
// =============================================================================

fn check_names(report: &mut ValidationReport, customer_name: &str, branch_name: &str) {
    if require_text(report, "customerName", customer_name, "Customer name is required") {
        max_length(
            report,
            "customerName",
            customer_name,
            MAX_NAME_LENGTH,
            "Customer name cannot exceed 100 characters",
        );
    }
    if require_text(report, "branchName", branch_name, "Branch name is required") {
        max_length(
            report,
            "branchName",
            branch_name,
            MAX_NAME_LENGTH,
            "Branch name cannot exceed 100 characters",
        );
    }
}

fn check_items(report: &mut ValidationReport, items: &[NewSaleItem]) {
    report.ensure(!items.is_empty(), "items", "At least one item is required");
    report.ensure(
        items.len() <= MAX_SALE_LINES,
        "items",
        "Cannot have more than 20 items per sale",
    );

    for (index, item) in items.iter().enumerate() {
        let mut line = ValidationReport::new();

        require_id(&mut line, "productId", &item.product_id, "Product ID is required");
        if require_text(&mut line, "productName", &item.product_name, "Product name is required") {
            max_length(
                &mut line,
                "productName",
                &item.product_name,
                MAX_NAME_LENGTH,
                "Product name cannot exceed 100 characters",
            );
        }
        line.ensure(item.quantity > 0, "quantity", "Quantity must be greater than 0");
        line.ensure(
            item.unit_price.is_positive(),
            "unitPrice",
            "Unit price must be greater than 0",
        );

        report.merge_prefixed(&format!("items[{index}]"), line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::Money;

    fn line(quantity: i64) -> NewSaleItem {
        NewSaleItem {
            product_id: "p-1".to_string(),
            product_name: "Widget".to_string(),
            quantity,
            unit_price: Money::from_cents(1_000),
        }
    }

    fn create() -> CreateSale {
        CreateSale {
            sale_number: None,
            sale_date: None,
            customer_id: "c-1".to_string(),
            customer_name: "Ada".to_string(),
            branch_id: "b-1".to_string(),
            branch_name: "Downtown".to_string(),
            items: vec![line(1)],
        }
    }

    #[test]
    fn test_valid_create() {
        assert!(create().validate().is_valid);
    }

    #[test]
    fn test_create_requires_items() {
        let mut cmd = create();
        cmd.items.clear();
        let report = cmd.validate();
        assert!(!report.is_valid);
        assert!(report.has_error_for("items"));
    }

    #[test]
    fn test_create_rejects_too_many_lines() {
        let mut cmd = create();
        cmd.items = (0..21).map(|_| line(1)).collect();
        let report = cmd.validate();
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].message, "Cannot have more than 20 items per sale");
    }

    #[test]
    fn test_name_length_counts_characters() {
        let mut cmd = create();
        cmd.customer_name = "é".repeat(100);
        assert!(cmd.validate().is_valid);

        cmd.customer_name = "é".repeat(101);
        let report = cmd.validate();
        assert!(report.has_error_for("customerName"));
    }

    #[test]
    fn test_line_errors_are_indexed() {
        let mut cmd = create();
        cmd.items.push(NewSaleItem {
            product_id: String::new(),
            product_name: " ".to_string(),
            quantity: 0,
            unit_price: Money::zero(),
        });

        let report = cmd.validate();
        assert!(report.has_error_for("items[1].productId"));
        assert!(report.has_error_for("items[1].productName"));
        assert!(report.has_error_for("items[1].quantity"));
        assert!(report.has_error_for("items[1].unitPrice"));
        assert!(!report.has_error_for("items[0].quantity"));
    }

    #[test]
    fn test_update_requires_id() {
        let cmd = UpdateSale {
            id: "  ".to_string(),
            customer_name: "Ada".to_string(),
            branch_name: "Downtown".to_string(),
            items: vec![line(2)],
        };
        let report = cmd.validate();
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].message, "Sale ID is required");
    }

    #[test]
    fn test_list_paging_rules() {
        assert!(ListSales::default().validate().is_valid);
        assert!(ListSales::page(1, 100).validate().is_valid);

        let report = ListSales::page(0, 0).validate();
        assert!(report.has_error_for("page"));
        assert_eq!(report.errors.len(), 2);

        let report = ListSales::page(1, 101).validate();
        assert_eq!(report.errors[0].message, "Size cannot exceed 100");
    }

    #[test]
    fn test_list_filters() {
        let mut cmd = ListSales::default();
        cmd.customer_id = Some(" ".to_string());
        assert!(cmd.validate().has_error_for("customerId"));

        cmd.customer_id = Some(" c-1 ".to_string());
        assert!(cmd.validate().is_valid);
        assert_eq!(cmd.filter().customer_id.as_deref(), Some("c-1"));
        assert!(cmd.filter().branch_id.is_none());
    }

    #[test]
    fn test_list_defaults_from_json() {
        let cmd: ListSales = serde_json::from_str("{}").unwrap();
        assert_eq!(cmd, ListSales::default());
    }
}
