//! # Sale Store Port
//!
//! The persistence boundary of the aggregate. tally-core only declares it;
//! tally-db provides the SQLite and in-memory implementations.
//!
//! ```text
//! ┌──────────────────┐        ┌────────────────────┐
//! │   SalesService   │──uses─►│  dyn SaleStore     │
//! └──────────────────┘        └─────────┬──────────┘
//!                                       │ implemented by
//!                        ┌──────────────┴──────────────┐
//!                        ▼                             ▼
//!               SqliteSaleStore               InMemorySaleStore
//! ```
//!
//! A store always works on the whole aggregate: a loaded `Sale` carries its
//! items, and `save` replaces the stored items with the current ones.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::sale::Sale;

/// Optional listing filters. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleFilter {
    pub customer_id: Option<String>,
    pub branch_id: Option<String>,
}

impl SaleFilter {
    /// Whether `sale` passes every filter that is set.
    pub fn matches(&self, sale: &Sale) -> bool {
        self.customer_id
            .as_deref()
            .map_or(true, |id| sale.customer_id() == id)
            && self
                .branch_id
                .as_deref()
                .map_or(true, |id| sale.branch_id() == id)
    }
}

/// Loads and stores Sale aggregates.
///
/// ## Contract
/// - `load` / `load_by_number` return `Ok(None)` when nothing matches
/// - `save` inserts or updates the sale and replaces its items atomically;
///   a sale number already used by another sale fails with
///   [`StoreError::DuplicateSaleNumber`](crate::error::StoreError::DuplicateSaleNumber)
/// - `delete` returns `false` when nothing was removed
/// - `list_page` pages are 1-based, newest `sale_date` first, ties broken by
///   sale number
#[async_trait]
pub trait SaleStore: Send + Sync {
    async fn load(&self, id: &str) -> StoreResult<Option<Sale>>;

    async fn load_by_number(&self, sale_number: &str) -> StoreResult<Option<Sale>>;

    /// Persists the aggregate and returns it as stored (without pending events).
    async fn save(&self, sale: &Sale) -> StoreResult<Sale>;

    async fn delete(&self, id: &str) -> StoreResult<bool>;

    async fn list_page(&self, page: u32, size: u32, filter: &SaleFilter) -> StoreResult<Vec<Sale>>;
}
