//! # Domain Types
//!
//! Status enum and the flat record shapes a sale takes outside the aggregate.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │   SaleRecord    │   │  SaleItemRecord  │   │   SaleStatus    │      │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────  │      │
//! │  │  id (UUID)      │◄──│  sale_id (FK)    │   │  Active         │      │
//! │  │  sale_number    │   │  product_id      │   │  Cancelled      │      │
//! │  │  customer/branch│   │  quantity        │   └─────────────────┘      │
//! │  │  total cents    │   │  discount bps    │                            │
//! │  │  status         │   │  is_cancelled    │                            │
//! │  └─────────────────┘   └──────────────────┘                            │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐                            │
//! │  │   SaleSummary   │   │   SaleDetails    │                            │
//! │  │  (list rows)    │   │  record + items  │                            │
//! │  └─────────────────┘   └──────────────────┘                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! - `id`: UUID v4, immutable, used for relations
//! - `sale_number`: human-readable business id, unique per store
//!
//! Records carry no behaviour. The rules live on
//! [`Sale`](crate::sale::Sale) and [`SaleItem`](crate::sale_item::SaleItem),
//! which convert to and from these shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::{DiscountRate, Money};

// =============================================================================
// Sale Status
// =============================================================================

/// Lifecycle of a sale. `Active → Cancelled`, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Open for updates.
    Active,
    /// Terminal. Updates and a second cancellation are refused by workflows.
    Cancelled,
}

impl SaleStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Active => "active",
            SaleStatus::Cancelled => "cancelled",
        }
    }
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Active
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Sale Record
// =============================================================================

/// A sale header as stored and as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleRecord {
    pub id: String,
    pub sale_number: String,
    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,
    pub customer_id: String,
    pub customer_name: String,
    pub branch_id: String,
    pub branch_name: String,
    /// Σ item totals, in cents.
    pub total_amount_cents: i64,
    pub status: SaleStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    /// `None` until the first recomputation or cancellation.
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SaleRecord {
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

// =============================================================================
// Sale Item Record
// =============================================================================

/// One sale line as stored. `position` keeps the item order of the aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleItemRecord {
    pub id: String,
    pub sale_id: String,
    pub position: i64,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    /// Discount in basis points (1000 = 10%).
    pub discount_bps: i32,
    pub total_amount_cents: i64,
    pub is_cancelled: bool,
}

impl SaleItemRecord {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn discount(&self) -> DiscountRate {
        DiscountRate::from_bps(self.discount_bps)
    }

    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

// =============================================================================
// Read Models
// =============================================================================

/// A sale with its lines, as returned by a single-sale lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleDetails {
    #[serde(flatten)]
    pub sale: SaleRecord,
    pub items: Vec<SaleItemRecord>,
}

/// One row of a sale listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleSummary {
    pub id: String,
    pub sale_number: String,
    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,
    pub customer_id: String,
    pub customer_name: String,
    pub branch_id: String,
    pub branch_name: String,
    pub total_amount_cents: i64,
    pub status: SaleStatus,
    pub item_count: u32,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_status_default() {
        assert_eq!(SaleStatus::default(), SaleStatus::Active);
    }

    #[test]
    fn test_sale_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&SaleStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
        assert_eq!(SaleStatus::Active.to_string(), "active");
    }

    #[test]
    fn test_item_record_accessors() {
        let item = SaleItemRecord {
            id: "i-1".to_string(),
            sale_id: "s-1".to_string(),
            position: 0,
            product_id: "p-1".to_string(),
            product_name: "Beer".to_string(),
            quantity: 5,
            unit_price_cents: 1_000,
            discount_bps: 1_000,
            total_amount_cents: 4_500,
            is_cancelled: false,
        };
        assert_eq!(item.unit_price(), Money::from_cents(1_000));
        assert_eq!(item.discount(), DiscountRate::STANDARD);
        assert_eq!(item.total_amount().cents(), 4_500);
    }
}
