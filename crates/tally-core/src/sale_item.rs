//! # Sale Item
//!
//! One product line of a sale: quantity, unit price, discount and the
//! discounted line total.
//!
//! ## Line Total
//! ```text
//! total = round_cents( quantity × unit_price × (1 - discount/100) )
//!
//!   5 × $100.00 at 10%  →  $450.00
//!  15 × $100.00 at 20%  →  $1,200.00
//! ```
//!
//! Items are owned by their [`Sale`](crate::sale::Sale). A `Sale` hands out
//! `&SaleItem` only, so once an item sits in a sale every change goes through
//! the parent. `SaleItem::new` is public for pricing a line on its own.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::discount::{tier_for_quantity, STANDARD_TIER_MIN};
use crate::error::{CoreError, CoreResult};
use crate::money::{DiscountRate, Money};
use crate::types::SaleItemRecord;
use crate::validation::{require_id, require_text, ValidationReport};
use crate::MAX_ITEM_QUANTITY;

// =============================================================================
// Input
// =============================================================================

/// What a caller supplies for a new line. Discount and total are derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSaleItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
}

// =============================================================================
// Sale Item
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleItem {
    id: String,
    /// Non-owning reference to the parent sale.
    sale_id: String,
    product_id: String,
    product_name: String,
    quantity: i64,
    unit_price: Money,
    discount: DiscountRate,
    total_amount: Money,
    is_cancelled: bool,
}

impl SaleItem {
    /// Creates a line with no discount and its undiscounted total.
    ///
    /// The input is not checked here. Out-of-range quantities or prices are
    /// reported by [`validate`](Self::validate), and a quantity above 20 is
    /// refused by [`apply_discount_rules`](Self::apply_discount_rules).
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::{Money, NewSaleItem, SaleItem};
    ///
    /// let mut item = SaleItem::new("sale-1", NewSaleItem {
    ///     product_id: "p-1".to_string(),
    ///     product_name: "Pilsen 350ml".to_string(),
    ///     quantity: 5,
    ///     unit_price: Money::from_cents(10_000),
    /// });
    /// assert_eq!(item.total_amount().cents(), 50_000);
    ///
    /// item.apply_discount_rules(None).unwrap();
    /// assert_eq!(item.total_amount().cents(), 45_000);
    /// ```
    pub fn new(sale_id: impl Into<String>, input: NewSaleItem) -> Self {
        let mut item = Self {
            id: Uuid::new_v4().to_string(),
            sale_id: sale_id.into(),
            product_id: input.product_id,
            product_name: input.product_name,
            quantity: input.quantity,
            unit_price: input.unit_price,
            discount: DiscountRate::NONE,
            total_amount: Money::zero(),
            is_cancelled: false,
        };
        item.calculate_total_amount();
        item
    }

    /// Rebuilds a line from its stored row. Values are taken as stored.
    pub fn from_record(record: SaleItemRecord) -> Self {
        Self {
            id: record.id,
            sale_id: record.sale_id,
            product_id: record.product_id,
            product_name: record.product_name,
            quantity: record.quantity,
            unit_price: Money::from_cents(record.unit_price_cents),
            discount: DiscountRate::from_bps(record.discount_bps),
            total_amount: Money::from_cents(record.total_amount_cents),
            is_cancelled: record.is_cancelled,
        }
    }

    /// Flattens the line into its stored row at `position` within the sale.
    pub fn to_record(&self, position: usize) -> SaleItemRecord {
        SaleItemRecord {
            id: self.id.clone(),
            sale_id: self.sale_id.clone(),
            position: position as i64,
            product_id: self.product_id.clone(),
            product_name: self.product_name.clone(),
            quantity: self.quantity,
            unit_price_cents: self.unit_price.cents(),
            discount_bps: self.discount.bps(),
            total_amount_cents: self.total_amount.cents(),
            is_cancelled: self.is_cancelled,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sale_id(&self) -> &str {
        &self.sale_id
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn discount(&self) -> DiscountRate {
        self.discount
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn is_cancelled(&self) -> bool {
        self.is_cancelled
    }

    // -------------------------------------------------------------------------
    // Rules
    // -------------------------------------------------------------------------

    /// Sets the discount and recomputes the line total.
    ///
    /// With `override_rate = None` the line is tiered by its own quantity.
    /// A sale passes its basket-wide rate instead, so every line gets the
    /// same percentage.
    ///
    /// ## Errors
    /// [`CoreError::ExceedsMaxQuantity`] when the line holds more than 20
    /// units. Nothing is modified in that case.
    pub fn apply_discount_rules(&mut self, override_rate: Option<DiscountRate>) -> CoreResult<()> {
        self.check_quantity_cap()?;

        self.discount = match override_rate {
            Some(rate) => rate,
            None => tier_for_quantity(self.quantity)?,
        };
        self.calculate_total_amount();
        Ok(())
    }

    /// `total = quantity × unit_price - discount`, rounded to the cent.
    /// Pure recomputation, no checks.
    pub fn calculate_total_amount(&mut self) {
        self.total_amount = self
            .unit_price
            .multiply_quantity(self.quantity)
            .apply_discount(self.discount);
    }

    /// Flags the line as cancelled. The total is left as it is and still
    /// counts toward the sale total.
    pub fn cancel(&mut self) {
        self.is_cancelled = true;
    }

    /// Collects every field problem of this line.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();

        require_id(&mut report, "productId", &self.product_id, "Product ID is required");
        require_text(
            &mut report,
            "productName",
            &self.product_name,
            "Product name is required",
        );

        report.ensure(
            self.quantity > 0,
            "quantity",
            "Quantity must be greater than zero",
        );
        report.ensure(
            self.quantity <= MAX_ITEM_QUANTITY,
            "quantity",
            "Cannot sell more than 20 identical items",
        );

        report.ensure(
            self.unit_price.is_positive(),
            "unitPrice",
            "Unit price must be greater than zero",
        );

        report.ensure(
            self.discount.is_within_bounds(),
            "discountPercentage",
            "Discount percentage must be between 0 and 100",
        );
        report.ensure(
            !(self.quantity < STANDARD_TIER_MIN && self.discount.bps() > 0),
            "discountPercentage",
            "Items with less than 4 quantity cannot have discount",
        );

        report
    }

    pub(crate) fn check_quantity_cap(&self) -> CoreResult<()> {
        if self.quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::ExceedsMaxQuantity {
                quantity: self.quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
