//! # tally-core: Pure Business Logic for Tally
//!
//! This crate is the **heart** of Tally. It owns the Sale aggregate and every
//! pricing, discount-tiering, cancellation and validation rule, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Tally Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              sales-service (workflows, config, logging)         │   │
//! │  │    create_sale, update_sale, cancel_sale, list_sales ...        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   sale    │  │ sale_item │  │ discount  │  │ validation│  │   │
//! │  │   │ aggregate │  │   line    │  │   tiers   │  │  report   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                 │   │
//! │  │   │   money   │  │  events   │  │   store   │ (trait only)    │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tally-db (SaleStore implementations)            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`sale`] - The Sale aggregate root
//! - [`sale_item`] - Sale lines, owned by their sale
//! - [`discount`] - Quantity discount tiers
//! - [`money`] - Money (integer cents) and DiscountRate (basis points)
//! - [`validation`] - Collected `{field, message}` validation reports
//! - [`events`] - Domain events recorded by the aggregate
//! - [`store`] - The `SaleStore` port implemented by tally-db
//! - [`types`] - Status enum, persistence records, summaries
//! - [`error`] - Domain error types
//!
//! ## Two Failure Channels
//! 1. **Hard faults** ([`CoreError`]): returned from `apply_discount_rules` when a
//!    line exceeds 20 units. The caller must not persist the sale.
//! 2. **Soft validation** ([`ValidationReport`]): returned by every `validate()`,
//!    collecting all violations at once. Never an `Err`.
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use tally_core::{Money, NewSale, NewSaleItem, Sale};
//!
//! let mut sale = Sale::new(NewSale {
//!     sale_number: "S-0001".to_string(),
//!     sale_date: Utc::now(),
//!     customer_id: "c-1".to_string(),
//!     customer_name: "Ada".to_string(),
//!     branch_id: "b-1".to_string(),
//!     branch_name: "Downtown".to_string(),
//! });
//!
//! for i in 0..5 {
//!     sale.add_item(NewSaleItem {
//!         product_id: format!("p-{i}"),
//!         product_name: format!("Product {i}"),
//!         quantity: 1,
//!         unit_price: Money::from_cents(10_000),
//!     });
//! }
//!
//! // Five units in the basket: every line gets 10% off
//! sale.apply_discount_rules().unwrap();
//! assert_eq!(sale.total_amount(), Money::from_cents(45_000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod discount;
pub mod error;
pub mod events;
pub mod money;
pub mod sale;
pub mod sale_item;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tally_core::Sale` instead of
// `use tally_core::sale::Sale`

pub use error::{CoreError, CoreResult, StoreError, StoreResult};
pub use events::SaleEvent;
pub use money::{DiscountRate, Money};
pub use sale::{NewSale, Sale};
pub use sale_item::{NewSaleItem, SaleItem};
pub use store::{SaleFilter, SaleStore};
pub use types::*;
pub use validation::{ValidationIssue, ValidationReport};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single product on one sale line.
///
/// ## Business Reason
/// "Cannot sell more than 20 identical items". Exceeding it while applying
/// discounts is a hard fault; `validate()` reports it as a soft error.
pub const MAX_ITEM_QUANTITY: i64 = 20;

/// Maximum number of lines a create/update command may carry.
pub const MAX_SALE_LINES: usize = 20;

/// Maximum length of customer, branch and product names in commands.
pub const MAX_NAME_LENGTH: usize = 100;
