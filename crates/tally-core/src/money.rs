//! # Money Module
//!
//! Provides the `Money` type for monetary values and `DiscountRate` for the
//! percentage discounts applied to sale lines.
//!
//! ## Cents and Basis Points
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  3 × 33.33 at 10% off                                                   │
//! │                                                                         │
//! │    f64:    99.99 * 0.9 ≈ 89.991, rounding left to every caller           │
//! │    cents:  9_999 - round(9_999 * 1000 / 10000) = 9_999 - 1_000 = 8_999  │
//! │                                                                         │
//! │  Stored prices have two fractional digits, so cents are exact. The     │
//! │  discount is rounded half away from zero once per line.                 │
//! │  Discounts are basis points (1 bp = 0.01%).                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::{DiscountRate, Money};
//!
//! let price = Money::from_cents(10_000);        // $100.00
//! let line = price.multiply_quantity(5);        // $500.00
//! let net = line.apply_discount(DiscountRate::STANDARD);
//! assert_eq!(net.cents(), 45_000);              // $450.00
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: the discounted amount is computed by subtraction
/// - **Single field tuple struct**: zero-cost over i64
///
/// ## Where Money Flows
/// ```text
/// SaleItem.unit_price ──► × quantity ──► apply_discount ──► SaleItem.total_amount
///                                                                │
///                                         Σ over items ◄─────────┘
///                                              │
///                                              ▼
///                                      Sale.total_amount
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -$5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is strictly greater than zero.
    ///
    /// Unit prices must satisfy this ("Unit price must be greater than zero").
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    ///
    /// Quantities come straight from callers and are only checked later by
    /// `validate()`, so an absurd quantity must still produce a value.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Returns the amount after subtracting `rate` of it.
    ///
    /// ## Rounding
    /// The discount itself is rounded half away from zero to the cent, then
    /// subtracted. This is `amount × (1 - pct/100)` rounded to the cent.
    ///
    /// ```text
    /// amount 1_999 × 10%  = 199.9 → 200 discount → 1_799
    /// amount 10_000 × 20% = 2_000 discount      → 8_000
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::{DiscountRate, Money};
    ///
    /// let line = Money::from_cents(10_000);
    /// assert_eq!(line.apply_discount(DiscountRate::BULK).cents(), 8_000);
    /// assert_eq!(line.apply_discount(DiscountRate::NONE).cents(), 10_000);
    /// ```
    pub fn apply_discount(&self, rate: DiscountRate) -> Money {
        // i128 so large baskets at any rate cannot overflow
        let product = self.0 as i128 * rate.bps() as i128;
        let discount = if product >= 0 {
            (product + 5_000) / 10_000
        } else {
            (product - 5_000) / 10_000
        };
        let net = self.0 as i128 - discount;
        Money(net.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-oriented display (`$10.99`, `-$5.50`). Localised formatting belongs
/// to whatever renders the value.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

/// Summing item totals into a sale total.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Discount Rate
// =============================================================================

/// A discount percentage in basis points (1000 bps = 10%).
///
/// ## Why Signed?
/// A caller can hand us `-5%` or `150%`. The value must be representable so
/// that `SaleItem::validate()` can report "Discount percentage must be between
/// 0 and 100" instead of the input being rejected before validation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(i32);

impl DiscountRate {
    /// 0%: fewer than 4 units.
    pub const NONE: DiscountRate = DiscountRate(0);
    /// 10%: 4 to 9 units.
    pub const STANDARD: DiscountRate = DiscountRate(1_000);
    /// 20%: 10 to 20 units.
    pub const BULK: DiscountRate = DiscountRate(2_000);
    /// Upper bound accepted by validation (100%).
    pub const MAX: DiscountRate = DiscountRate(10_000);

    #[inline]
    pub const fn from_bps(bps: i32) -> Self {
        DiscountRate(bps)
    }

    /// Creates a rate from a whole percentage.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::DiscountRate;
    ///
    /// assert_eq!(DiscountRate::from_percent(10), DiscountRate::STANDARD);
    /// ```
    #[inline]
    pub const fn from_percent(percent: i32) -> Self {
        DiscountRate(percent * 100)
    }

    #[inline]
    pub const fn bps(&self) -> i32 {
        self.0
    }

    /// The rate as a percentage (`10.0` for 10%).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// True when the rate lies in `[0%, 100%]`.
    #[inline]
    pub const fn is_within_bounds(&self) -> bool {
        self.0 >= 0 && self.0 <= Self::MAX.0
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::NONE
    }
}

impl fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{:.2}%", self.percentage())
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
    }

    #[test]
    fn test_apply_discount_tiers() {
        let line = Money::from_cents(10_000);
        assert_eq!(line.apply_discount(DiscountRate::NONE).cents(), 10_000);
        assert_eq!(line.apply_discount(DiscountRate::STANDARD).cents(), 9_000);
        assert_eq!(line.apply_discount(DiscountRate::BULK).cents(), 8_000);
        assert_eq!(line.apply_discount(DiscountRate::MAX).cents(), 0);
    }

    #[test]
    fn test_apply_discount_rounds_half_up() {
        // 1_999 × 10% = 199.9 → 200
        assert_eq!(Money::from_cents(1_999).apply_discount(DiscountRate::STANDARD).cents(), 1_799);
        // 5 × 10% = 0.5 → 1
        assert_eq!(Money::from_cents(5).apply_discount(DiscountRate::STANDARD).cents(), 4);
        // 4 × 10% = 0.4 → 0
        assert_eq!(Money::from_cents(4).apply_discount(DiscountRate::STANDARD).cents(), 4);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Money::from_cents(100_000_000).multiply_quantity(1_000_000_000_000);
        assert_eq!(huge.cents(), i64::MAX);
        assert_eq!((huge + Money::from_cents(1)).cents(), i64::MAX);
        assert_eq!(huge.apply_discount(DiscountRate::from_bps(-100)).cents(), i64::MAX);
        assert!(huge.apply_discount(DiscountRate::BULK).cents() < i64::MAX);

        let sum: Money = vec![huge, huge].into_iter().sum();
        assert_eq!(sum.cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MIN) - Money::from_cents(1)).cents(), i64::MIN);
    }

    #[test]
    fn test_sum() {
        let totals = vec![Money::from_cents(9_000), Money::from_cents(9_000), Money::from_cents(50)];
        let sum: Money = totals.iter().sum();
        assert_eq!(sum.cents(), 18_050);
        let owned: Money = totals.into_iter().sum();
        assert_eq!(owned.cents(), 18_050);
    }

    #[test]
    fn test_discount_rate_constructors() {
        assert_eq!(DiscountRate::from_percent(20), DiscountRate::BULK);
        assert_eq!(DiscountRate::from_bps(1_000), DiscountRate::STANDARD);
        assert_eq!(DiscountRate::STANDARD.percentage(), 10.0);
        assert!(DiscountRate::default().is_zero());
    }

    #[test]
    fn test_discount_rate_bounds() {
        assert!(DiscountRate::NONE.is_within_bounds());
        assert!(DiscountRate::MAX.is_within_bounds());
        assert!(!DiscountRate::from_percent(-1).is_within_bounds());
        assert!(!DiscountRate::from_percent(101).is_within_bounds());
    }

    #[test]
    fn test_discount_rate_display() {
        assert_eq!(DiscountRate::BULK.to_string(), "20%");
        assert_eq!(DiscountRate::from_bps(1_250).to_string(), "12.50%");
    }
}
