//! # Domain Events
//!
//! Facts recorded by the Sale aggregate as it changes.
//!
//! ## Outbox Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Sale::new / replace_items / cancel / cancel_item                       │
//! │        │                                                                │
//! │        ▼  push                                                          │
//! │  ┌──────────────────────┐                                               │
//! │  │ Sale.events (outbox) │   not persisted, not compared, not serialized │
//! │  └──────────┬───────────┘                                               │
//! │             │ take_events()  (drains)                                   │
//! │             ▼                                                           │
//! │  Workflow logs each event and returns them to its caller, which         │
//! │  decides how to dispatch. The core never publishes anything.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Something that happened to a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum SaleEvent {
    /// A new sale was opened.
    SaleCreated {
        sale_id: String,
        sale_number: String,
        #[ts(as = "String")]
        occurred_at: DateTime<Utc>,
    },

    /// The item collection of an existing sale was replaced.
    SaleModified {
        sale_id: String,
        sale_number: String,
        previous_total_cents: i64,
        new_total_cents: i64,
        #[ts(as = "String")]
        occurred_at: DateTime<Utc>,
    },

    /// The whole sale was cancelled.
    SaleCancelled {
        sale_id: String,
        sale_number: String,
        reason: Option<String>,
        #[ts(as = "String")]
        occurred_at: DateTime<Utc>,
    },

    /// One line of the sale was cancelled.
    ItemCancelled {
        sale_id: String,
        sale_number: String,
        item_id: String,
        reason: Option<String>,
        #[ts(as = "String")]
        occurred_at: DateTime<Utc>,
    },
}

impl SaleEvent {
    /// Id of the sale the event belongs to.
    pub fn sale_id(&self) -> &str {
        match self {
            SaleEvent::SaleCreated { sale_id, .. }
            | SaleEvent::SaleModified { sale_id, .. }
            | SaleEvent::SaleCancelled { sale_id, .. }
            | SaleEvent::ItemCancelled { sale_id, .. } => sale_id,
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SaleEvent::SaleCreated { occurred_at, .. }
            | SaleEvent::SaleModified { occurred_at, .. }
            | SaleEvent::SaleCancelled { occurred_at, .. }
            | SaleEvent::ItemCancelled { occurred_at, .. } => *occurred_at,
        }
    }

    /// Stable name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            SaleEvent::SaleCreated { .. } => "sale_created",
            SaleEvent::SaleModified { .. } => "sale_modified",
            SaleEvent::SaleCancelled { .. } => "sale_cancelled",
            SaleEvent::ItemCancelled { .. } => "item_cancelled",
        }
    }
}
