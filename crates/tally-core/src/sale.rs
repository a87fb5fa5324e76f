//! # Sale Aggregate
//!
//! The Sale is the aggregate root of Tally. It owns its items, prices them as
//! one basket, derives its total, guards its identity fields and moves through
//! a one-way lifecycle.
//!
//! ## Pricing a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  items: [qty 1, qty 2, qty 3]                                          │
//! │        │                                                                │
//! │        ▼  Σ quantity = 6                                                │
//! │  tier_for_basket(6) = 10%                                               │
//! │        │                                                                │
//! │        ▼  every line gets the SAME rate, whatever its own quantity     │
//! │  [1 @ 10%, 2 @ 10%, 3 @ 10%]                                            │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  total_amount = Σ item totals, updated_at = now                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle
//! ```text
//!   Sale::new ──► Active ──cancel()──► Cancelled   (terminal)
//! ```
//! The aggregate does not guard itself after cancellation. Workflows check
//! `status()` before updating or cancelling again.
//!
//! ## Events
//! Operations append [`SaleEvent`]s to an internal outbox that
//! [`Sale::take_events`] drains. A restored sale starts with an empty outbox.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::discount::tier_for_basket;
use crate::error::{CoreError, CoreResult};
use crate::events::SaleEvent;
use crate::money::Money;
use crate::sale_item::{NewSaleItem, SaleItem};
use crate::types::{SaleDetails, SaleItemRecord, SaleRecord, SaleStatus, SaleSummary};
use crate::validation::{require_id, require_text, ValidationReport};

// =============================================================================
// Input
// =============================================================================

/// Header fields of a new sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub sale_number: String,
    pub sale_date: DateTime<Utc>,
    pub customer_id: String,
    pub customer_name: String,
    pub branch_id: String,
    pub branch_name: String,
}

// =============================================================================
// Sale
// =============================================================================

#[derive(Debug, Clone)]
pub struct Sale {
    id: String,
    sale_number: String,
    sale_date: DateTime<Utc>,
    customer_id: String,
    customer_name: String,
    branch_id: String,
    branch_name: String,
    items: Vec<SaleItem>,
    total_amount: Money,
    status: SaleStatus,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,

    /// Outbox, drained by `take_events`.
    events: Vec<SaleEvent>,
    /// Total before the last unreported modification.
    modified_from: Option<Money>,
}

impl Sale {
    /// Opens a new, empty, Active sale and records `SaleCreated`.
    pub fn new(input: NewSale) -> Self {
        let now = Utc::now();
        let mut sale = Self {
            id: Uuid::new_v4().to_string(),
            sale_number: input.sale_number,
            sale_date: input.sale_date,
            customer_id: input.customer_id,
            customer_name: input.customer_name,
            branch_id: input.branch_id,
            branch_name: input.branch_name,
            items: Vec::new(),
            total_amount: Money::zero(),
            status: SaleStatus::Active,
            created_at: now,
            updated_at: None,
            events: Vec::new(),
            modified_from: None,
        };
        sale.record(SaleEvent::SaleCreated {
            sale_id: sale.id.clone(),
            sale_number: sale.sale_number.clone(),
            occurred_at: now,
        });
        sale
    }

    /// Rebuilds a sale from stored rows. Items are ordered by `position`.
    pub fn restore(record: SaleRecord, mut items: Vec<SaleItemRecord>) -> Self {
        items.sort_by_key(|item| item.position);
        Self {
            id: record.id,
            sale_number: record.sale_number,
            sale_date: record.sale_date,
            customer_id: record.customer_id,
            customer_name: record.customer_name,
            branch_id: record.branch_id,
            branch_name: record.branch_name,
            items: items.into_iter().map(SaleItem::from_record).collect(),
            total_amount: Money::from_cents(record.total_amount_cents),
            status: record.status,
            created_at: record.created_at,
            updated_at: record.updated_at,
            events: Vec::new(),
            modified_from: None,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sale_number(&self) -> &str {
        &self.sale_number
    }

    pub fn sale_date(&self) -> DateTime<Utc> {
        self.sale_date
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn branch_id(&self) -> &str {
        &self.branch_id
    }

    pub fn branch_name(&self) -> &str {
        &self.branch_name
    }

    pub fn items(&self) -> &[SaleItem] {
        &self.items
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn status(&self) -> SaleStatus {
        self.status
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == SaleStatus::Cancelled
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Units across every line, cancelled lines included. Saturates rather
    /// than overflowing on unvalidated quantities.
    pub fn total_quantity(&self) -> i64 {
        self.items
            .iter()
            .map(SaleItem::quantity)
            .fold(0_i64, i64::saturating_add)
    }

    // -------------------------------------------------------------------------
    // Item Management
    // -------------------------------------------------------------------------

    /// Appends a line owned by this sale. Totals are not recomputed.
    pub fn add_item(&mut self, input: NewSaleItem) -> &SaleItem {
        let index = self.items.len();
        self.items.push(SaleItem::new(self.id.clone(), input));
        &self.items[index]
    }

    /// Replaces the whole item collection.
    ///
    /// `SaleModified` is recorded at the next total recomputation, once the
    /// new total is known.
    pub fn replace_items(&mut self, inputs: Vec<NewSaleItem>) {
        self.mark_modified();
        let sale_id = self.id.clone();
        self.items = inputs
            .into_iter()
            .map(|input| SaleItem::new(sale_id.clone(), input))
            .collect();
    }

    /// Cancels one line and records `ItemCancelled`. The line keeps counting
    /// toward the sale total.
    pub fn cancel_item(&mut self, item_id: &str, reason: Option<String>) -> CoreResult<()> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id() == item_id)
            .ok_or_else(|| CoreError::ItemNotFound {
                sale_id: self.id.clone(),
                item_id: item_id.to_string(),
            })?;
        item.cancel();

        let now = Utc::now();
        self.updated_at = Some(now);
        self.record(SaleEvent::ItemCancelled {
            sale_id: self.id.clone(),
            sale_number: self.sale_number.clone(),
            item_id: item_id.to_string(),
            reason,
            occurred_at: now,
        });
        Ok(())
    }

    pub fn rename_customer(&mut self, customer_name: impl Into<String>) {
        self.mark_modified();
        self.customer_name = customer_name.into();
    }

    pub fn rename_branch(&mut self, branch_name: impl Into<String>) {
        self.mark_modified();
        self.branch_name = branch_name.into();
    }

    // -------------------------------------------------------------------------
    // Pricing
    // -------------------------------------------------------------------------

    /// Prices the sale as one basket.
    ///
    /// One tier is chosen from the summed quantity of all lines and applied to
    /// every line, then the sale total is recomputed. No-op without items.
    ///
    /// ## Errors
    /// [`CoreError::ExceedsMaxQuantity`] if any line holds more than 20 units.
    /// Every line is checked before any is touched, so a fault leaves the sale
    /// exactly as it was.
    pub fn apply_discount_rules(&mut self) -> CoreResult<()> {
        if self.items.is_empty() {
            return Ok(());
        }

        for item in &self.items {
            item.check_quantity_cap()?;
        }

        let rate = tier_for_basket(self.total_quantity());
        for item in &mut self.items {
            item.apply_discount_rules(Some(rate))?;
        }

        self.calculate_total_amount();
        Ok(())
    }

    /// `total_amount = Σ item totals`, and stamps `updated_at`.
    pub fn calculate_total_amount(&mut self) {
        self.total_amount = self.items.iter().map(SaleItem::total_amount).sum();
        let now = Utc::now();
        self.updated_at = Some(now);

        if let Some(previous) = self.modified_from.take() {
            self.record(SaleEvent::SaleModified {
                sale_id: self.id.clone(),
                sale_number: self.sale_number.clone(),
                previous_total_cents: previous.cents(),
                new_total_cents: self.total_amount.cents(),
                occurred_at: now,
            });
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Moves the sale to Cancelled. Does not look at the current status.
    pub fn cancel(&mut self) {
        self.cancel_with_reason(None);
    }

    /// As [`cancel`](Self::cancel), keeping a reason on the recorded event.
    pub fn cancel_with_reason(&mut self, reason: Option<String>) {
        let now = Utc::now();
        self.status = SaleStatus::Cancelled;
        self.updated_at = Some(now);
        self.record(SaleEvent::SaleCancelled {
            sale_id: self.id.clone(),
            sale_number: self.sale_number.clone(),
            reason,
            occurred_at: now,
        });
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Collects every header problem plus every item problem.
    ///
    /// Item problems are reported as `items[i].field`.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();

        require_text(&mut report, "saleNumber", &self.sale_number, "Sale number is required");
        require_text(
            &mut report,
            "customerName",
            &self.customer_name,
            "Customer name is required",
        );
        require_text(&mut report, "branchName", &self.branch_name, "Branch name is required");
        require_id(&mut report, "customerId", &self.customer_id, "Customer ID is required");
        require_id(&mut report, "branchId", &self.branch_id, "Branch ID is required");
        report.ensure(
            !self.items.is_empty(),
            "items",
            "Sale must have at least one item",
        );

        for (index, item) in self.items.iter().enumerate() {
            report.merge_prefixed(&format!("items[{index}]"), item.validate());
        }

        report
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Drains the outbox.
    pub fn take_events(&mut self) -> Vec<SaleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events recorded and not yet drained.
    pub fn pending_events(&self) -> &[SaleEvent] {
        &self.events
    }

    fn record(&mut self, event: SaleEvent) {
        self.events.push(event);
    }

    fn mark_modified(&mut self) {
        if self.modified_from.is_none() {
            self.modified_from = Some(self.total_amount);
        }
    }

    // -------------------------------------------------------------------------
    // Projections
    // -------------------------------------------------------------------------

    pub fn to_record(&self) -> SaleRecord {
        SaleRecord {
            id: self.id.clone(),
            sale_number: self.sale_number.clone(),
            sale_date: self.sale_date,
            customer_id: self.customer_id.clone(),
            customer_name: self.customer_name.clone(),
            branch_id: self.branch_id.clone(),
            branch_name: self.branch_name.clone(),
            total_amount_cents: self.total_amount.cents(),
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn item_records(&self) -> Vec<SaleItemRecord> {
        self.items
            .iter()
            .enumerate()
            .map(|(position, item)| item.to_record(position))
            .collect()
    }

    pub fn details(&self) -> SaleDetails {
        SaleDetails {
            sale: self.to_record(),
            items: self.item_records(),
        }
    }

    pub fn summary(&self) -> SaleSummary {
        SaleSummary {
            id: self.id.clone(),
            sale_number: self.sale_number.clone(),
            sale_date: self.sale_date,
            customer_id: self.customer_id.clone(),
            customer_name: self.customer_name.clone(),
            branch_id: self.branch_id.clone(),
            branch_name: self.branch_name.clone(),
            total_amount_cents: self.total_amount.cents(),
            status: self.status,
            item_count: self.items.len() as u32,
        }
    }
}

/// Equality over state only. Pending events are ignored.
impl PartialEq for Sale {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.sale_number == other.sale_number
            && self.sale_date == other.sale_date
            && self.customer_id == other.customer_id
            && self.customer_name == other.customer_name
            && self.branch_id == other.branch_id
            && self.branch_name == other.branch_name
            && self.items == other.items
            && self.total_amount == other.total_amount
            && self.status == other.status
            && self.created_at == other.created_at
            && self.updated_at == other.updated_at
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
