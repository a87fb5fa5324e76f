//! # Sales Service
//!
//! The sale workflows, over any [`SaleStore`].
//!
//! ## Workflow Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         update_sale(cmd)                                │
//! │                                                                         │
//! │  cmd.validate() ──────────────► Validation                              │
//! │  store.load(id) ──────────────► NotFound                                │
//! │  sale.is_cancelled() ─────────► SaleCancelled                           │
//! │  rename_customer / rename_branch / replace_items                        │
//! │  sale.validate() ─────────────► Validation                              │
//! │  sale.apply_discount_rules() ─► Domain                                  │
//! │  store.save(&sale) ───────────► Conflict / Storage                      │
//! │  sale.take_events() ──► logged, returned in the SaleOutcome             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The service dispatches nothing itself: the drained events come back to
//! the caller, which publishes them however it likes.
//!
//! ## Example
//! ```rust,no_run
//! use tally_core::{Money, NewSaleItem};
//! use tally_db::InMemorySaleStore;
//! use tally_sales_service::{CreateSale, SalesService};
//!
//! # async fn run() -> Result<(), tally_sales_service::ServiceError> {
//! let service = SalesService::new(InMemorySaleStore::new());
//! let outcome = service
//!     .create_sale(CreateSale {
//!         sale_number: None,
//!         sale_date: None,
//!         customer_id: "c-1".into(),
//!         customer_name: "Ada".into(),
//!         branch_id: "b-1".into(),
//!         branch_name: "Downtown".into(),
//!         items: vec![NewSaleItem {
//!             product_id: "p-1".into(),
//!             product_name: "Widget".into(),
//!             quantity: 5,
//!             unit_price: Money::from_cents(10_000),
//!         }],
//!     })
//!     .await?;
//! assert_eq!(outcome.sale.sale.total_amount_cents, 45_000);
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::commands::{CancelSale, CreateSale, ListSales, UpdateSale};
use crate::error::{ServiceError, ServiceResult};
use tally_core::validation::require_text;
use tally_core::{NewSale, Sale, SaleDetails, SaleEvent, SaleStore, SaleSummary, ValidationReport};

/// The stored sale after a mutating workflow, plus the events it raised.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleOutcome {
    pub sale: SaleDetails,
    pub events: Vec<SaleEvent>,
}

/// Sale workflows over a [`SaleStore`].
#[derive(Debug)]
pub struct SalesService<S> {
    store: S,
}

impl<S: SaleStore> SalesService<S> {
    pub fn new(store: S) -> Self {
        SalesService { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // =========================================================================
    // Public Workflows
    // =========================================================================

    /// Validates, prices and stores a new sale.
    ///
    /// A sale number is generated when the command carries none.
    pub async fn create_sale(&self, cmd: CreateSale) -> ServiceResult<SaleOutcome> {
        self.create(cmd)
            .await
            .inspect_err(|e| log_rejection("create_sale", e))
    }

    pub async fn get_sale(&self, id: &str) -> ServiceResult<SaleDetails> {
        check_id(id)?;
        let sale = self.load_existing(id).await?;
        Ok(sale.details())
    }

    /// Renames customer and branch, replaces every line, and reprices.
    /// Cancelled sales are refused.
    pub async fn update_sale(&self, cmd: UpdateSale) -> ServiceResult<SaleOutcome> {
        self.update(cmd)
            .await
            .inspect_err(|e| log_rejection("update_sale", e))
    }

    pub async fn cancel_sale(&self, cmd: CancelSale) -> ServiceResult<SaleOutcome> {
        self.cancel(cmd)
            .await
            .inspect_err(|e| log_rejection("cancel_sale", e))
    }

    /// Cancels one line of an active sale. The line keeps counting toward
    /// the sale total.
    pub async fn cancel_sale_item(
        &self,
        sale_id: &str,
        item_id: &str,
        reason: Option<String>,
    ) -> ServiceResult<SaleOutcome> {
        self.cancel_item(sale_id, item_id, reason)
            .await
            .inspect_err(|e| log_rejection("cancel_sale_item", e))
    }

    pub async fn delete_sale(&self, id: &str) -> ServiceResult<()> {
        check_id(id)?;
        if !self.store.delete(id).await? {
            let err = ServiceError::NotFound(id.to_string());
            log_rejection("delete_sale", &err);
            return Err(err);
        }
        info!(sale_id = id, "Sale deleted");
        Ok(())
    }

    pub async fn list_sales(&self, query: ListSales) -> ServiceResult<Vec<SaleSummary>> {
        query.validate().into_result()?;

        let sales = self
            .store
            .list_page(query.page, query.size, &query.filter())
            .await?;
        debug!(page = query.page, size = query.size, found = sales.len(), "Listed sales");

        Ok(sales.iter().map(Sale::summary).collect())
    }

    // =========================================================================
    // Workflow Bodies
    // =========================================================================

    async fn create(&self, cmd: CreateSale) -> ServiceResult<SaleOutcome> {
        cmd.validate().into_result()?;

        let sale_date = cmd.sale_date.unwrap_or_else(Utc::now);
        let sale_number = match cmd.sale_number.as_deref().map(str::trim) {
            Some(number) if !number.is_empty() => number.to_string(),
            _ => generate_sale_number(sale_date),
        };

        if self.store.load_by_number(&sale_number).await?.is_some() {
            return Err(ServiceError::Conflict(sale_number));
        }

        let mut sale = Sale::new(NewSale {
            sale_number,
            sale_date,
            customer_id: cmd.customer_id,
            customer_name: cmd.customer_name,
            branch_id: cmd.branch_id,
            branch_name: cmd.branch_name,
        });
        for item in cmd.items {
            sale.add_item(item);
        }

        sale.validate().into_result()?;
        sale.apply_discount_rules()?;

        let outcome = self.persist(sale).await?;
        info!(
            sale_id = %outcome.sale.sale.id,
            sale_number = %outcome.sale.sale.sale_number,
            total = %outcome.sale.sale.total_amount(),
            "Sale created"
        );
        Ok(outcome)
    }

    async fn update(&self, cmd: UpdateSale) -> ServiceResult<SaleOutcome> {
        cmd.validate().into_result()?;

        let mut sale = self.load_existing(&cmd.id).await?;
        if sale.is_cancelled() {
            return Err(ServiceError::SaleCancelled);
        }

        sale.rename_customer(cmd.customer_name);
        sale.rename_branch(cmd.branch_name);
        sale.replace_items(cmd.items);

        sale.validate().into_result()?;
        sale.apply_discount_rules()?;

        let outcome = self.persist(sale).await?;
        info!(
            sale_id = %outcome.sale.sale.id,
            total = %outcome.sale.sale.total_amount(),
            "Sale updated"
        );
        Ok(outcome)
    }

    async fn cancel(&self, cmd: CancelSale) -> ServiceResult<SaleOutcome> {
        cmd.validate().into_result()?;

        let mut sale = self.load_existing(&cmd.id).await?;
        if sale.is_cancelled() {
            return Err(ServiceError::AlreadyCancelled);
        }

        sale.cancel_with_reason(cmd.reason);

        let outcome = self.persist(sale).await?;
        info!(sale_id = %outcome.sale.sale.id, "Sale cancelled");
        Ok(outcome)
    }

    async fn cancel_item(
        &self,
        sale_id: &str,
        item_id: &str,
        reason: Option<String>,
    ) -> ServiceResult<SaleOutcome> {
        check_id(sale_id)?;

        let mut sale = self.load_existing(sale_id).await?;
        if sale.is_cancelled() {
            return Err(ServiceError::SaleCancelled);
        }

        sale.cancel_item(item_id, reason)?;

        let outcome = self.persist(sale).await?;
        info!(sale_id, item_id, "Sale item cancelled");
        Ok(outcome)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn load_existing(&self, id: &str) -> ServiceResult<Sale> {
        self.store
            .load(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    /// Saves the aggregate and drains its outbox.
    async fn persist(&self, mut sale: Sale) -> ServiceResult<SaleOutcome> {
        let saved = self.store.save(&sale).await?;
        let events = sale.take_events();

        for event in &events {
            info!(
                event = event.name(),
                sale_id = event.sale_id(),
                occurred_at = %event.occurred_at(),
                "Domain event"
            );
        }

        Ok(SaleOutcome {
            sale: saved.details(),
            events,
        })
    }
}

fn check_id(id: &str) -> ServiceResult<()> {
    let mut report = ValidationReport::new();
    require_text(&mut report, "id", id, "Sale ID is required");
    Ok(report.into_result()?)
}

fn log_rejection(operation: &str, err: &ServiceError) {
    match err {
        ServiceError::Storage(_) => {}
        _ => warn!(operation, code = ?err.code(), error = %err, "Workflow rejected"),
    }
}

/// `S-YYYYMMDD-XXXXXXXX`: sale date plus eight hex digits of a UUID v4.
pub fn generate_sale_number(sale_date: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "S-{}-{}",
        sale_date.format("%Y%m%d"),
        suffix[..8].to_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_generated_sale_number_shape() {
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        let number = generate_sale_number(date);

        assert!(number.starts_with("S-20240309-"));
        assert_eq!(number.len(), "S-20240309-".len() + 8);
        assert_ne!(number, generate_sale_number(date));
    }

    #[test]
    fn test_check_id() {
        assert!(check_id("abc").is_ok());
        assert!(matches!(check_id(" "), Err(ServiceError::Validation(_))));
    }
}
