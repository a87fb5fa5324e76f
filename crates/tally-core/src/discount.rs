//! # Discount Tiers
//!
//! Quantity-based discount tiering, in two flavours.
//!
//! ## Tier Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   units        │ per line (tier_for_quantity) │ basket (tier_for_basket)│
//! │  ──────────────┼──────────────────────────────┼─────────────────────────│
//! │   ≤ 3          │  0%                          │  0%                     │
//! │   4 ..= 9      │ 10%                          │ 10%                     │
//! │  10 ..= 20     │ 20%                          │ 20%                     │
//! │   > 20         │ ExceedsMaxQuantity (fault)   │ 10%                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The per-line table is used when an item is priced on its own. A whole sale
//! is priced by its basket size: one tier computed from the summed quantity of
//! every line and applied uniformly. Above 20 units the basket only qualifies
//! for the standard tier; the per-line cap is enforced separately when the
//! rate is pushed onto each item.

use crate::error::{CoreError, CoreResult};
use crate::money::DiscountRate;
use crate::MAX_ITEM_QUANTITY;

/// Smallest quantity that earns the standard (10%) tier.
pub const STANDARD_TIER_MIN: i64 = 4;

/// Smallest quantity that earns the bulk (20%) tier.
pub const BULK_TIER_MIN: i64 = 10;

/// Tier for a single line of `quantity` identical units.
///
/// ## Errors
/// [`CoreError::ExceedsMaxQuantity`] when `quantity > 20`.
///
/// ## Example
/// ```rust
/// use tally_core::discount::tier_for_quantity;
/// use tally_core::DiscountRate;
///
/// assert_eq!(tier_for_quantity(3).unwrap(), DiscountRate::NONE);
/// assert_eq!(tier_for_quantity(4).unwrap(), DiscountRate::STANDARD);
/// assert_eq!(tier_for_quantity(10).unwrap(), DiscountRate::BULK);
/// assert!(tier_for_quantity(21).is_err());
/// ```
pub fn tier_for_quantity(quantity: i64) -> CoreResult<DiscountRate> {
    if quantity > MAX_ITEM_QUANTITY {
        return Err(CoreError::ExceedsMaxQuantity {
            quantity,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(if quantity >= BULK_TIER_MIN {
        DiscountRate::BULK
    } else if quantity >= STANDARD_TIER_MIN {
        DiscountRate::STANDARD
    } else {
        DiscountRate::NONE
    })
}

/// Tier for a whole sale whose lines add up to `total_quantity` units.
///
/// Never fails. Baskets above 20 units fall back to the standard tier.
pub fn tier_for_basket(total_quantity: i64) -> DiscountRate {
    if (BULK_TIER_MIN..=MAX_ITEM_QUANTITY).contains(&total_quantity) {
        DiscountRate::BULK
    } else if total_quantity >= STANDARD_TIER_MIN {
        DiscountRate::STANDARD
    } else {
        DiscountRate::NONE
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_tier_boundaries() {
        assert_eq!(tier_for_quantity(1).unwrap(), DiscountRate::NONE);
        assert_eq!(tier_for_quantity(3).unwrap(), DiscountRate::NONE);
        assert_eq!(tier_for_quantity(4).unwrap(), DiscountRate::STANDARD);
        assert_eq!(tier_for_quantity(9).unwrap(), DiscountRate::STANDARD);
        assert_eq!(tier_for_quantity(10).unwrap(), DiscountRate::BULK);
        assert_eq!(tier_for_quantity(20).unwrap(), DiscountRate::BULK);
    }

    #[test]
    fn test_line_tier_faults_above_cap() {
        assert_eq!(
            tier_for_quantity(21),
            Err(CoreError::ExceedsMaxQuantity {
                quantity: 21,
                max: 20
            })
        );
    }

    #[test]
    fn test_line_tier_non_positive_is_none() {
        assert_eq!(tier_for_quantity(0).unwrap(), DiscountRate::NONE);
        assert_eq!(tier_for_quantity(-3).unwrap(), DiscountRate::NONE);
    }

    #[test]
    fn test_basket_tier_boundaries() {
        assert_eq!(tier_for_basket(0), DiscountRate::NONE);
        assert_eq!(tier_for_basket(3), DiscountRate::NONE);
        assert_eq!(tier_for_basket(4), DiscountRate::STANDARD);
        assert_eq!(tier_for_basket(9), DiscountRate::STANDARD);
        assert_eq!(tier_for_basket(10), DiscountRate::BULK);
        assert_eq!(tier_for_basket(20), DiscountRate::BULK);
    }

    #[test]
    fn test_basket_above_cap_falls_back_to_standard() {
        assert_eq!(tier_for_basket(21), DiscountRate::STANDARD);
        assert_eq!(tier_for_basket(400), DiscountRate::STANDARD);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: the line tier matches the published table for every quantity.
            #[test]
            fn line_tier_matches_table(q in -50i64..200) {
                let result = tier_for_quantity(q);
                if q > 20 {
                    let exceeds = matches!(result, Err(CoreError::ExceedsMaxQuantity { .. }));
                    prop_assert!(exceeds);
                } else if q >= 10 {
                    prop_assert_eq!(result, Ok(DiscountRate::BULK));
                } else if q >= 4 {
                    prop_assert_eq!(result, Ok(DiscountRate::STANDARD));
                } else {
                    prop_assert_eq!(result, Ok(DiscountRate::NONE));
                }
            }

            /// Property: within the cap, basket and line tiers agree.
            #[test]
            fn basket_agrees_with_line_within_cap(q in 0i64..=20) {
                prop_assert_eq!(Ok(tier_for_basket(q)), tier_for_quantity(q));
            }

            /// Property: tiers are monotonic up to the cap.
            #[test]
            fn line_tier_is_monotonic(a in 0i64..=20, b in 0i64..=20) {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(tier_for_quantity(lo).unwrap() <= tier_for_quantity(hi).unwrap());
            }
        }
    }
}
