//! Payable amount preview.
//!
//! Computes what a student owes for one enrollment period: the course base
//! price minus the applied discount, with the discount capped so the payable
//! amount can never go negative.

use rust_decimal::Decimal;
use serde::Serialize;

/// The net payable computation for one (student, group, period).
///
/// Invariants: `discount <= original`, `payable = original - discount`,
/// `payable >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentPreview {
    /// Course base price at computation time.
    pub original: Decimal,
    /// Discount actually applied (capped at `original`).
    pub discount: Decimal,
    /// Net amount owed for the period.
    pub payable: Decimal,
}

impl PaymentPreview {
    /// Computes the preview from a course price and the raw discount amount.
    ///
    /// The discount is capped at the course price, so a discount larger than
    /// the price yields a payable amount of zero rather than a negative one.
    /// Negative inputs are clamped to zero; amounts are validated upstream,
    /// this keeps the computation total.
    #[must_use]
    pub fn compute(original: Decimal, discount: Decimal) -> Self {
        let original = original.max(Decimal::ZERO);
        let applied = discount.clamp(Decimal::ZERO, original);

        Self {
            original,
            discount: applied,
            payable: original - applied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_discount_smaller_than_price() {
        let p = PaymentPreview::compute(dec!(1000), dec!(200));
        assert_eq!(p.original, dec!(1000));
        assert_eq!(p.discount, dec!(200));
        assert_eq!(p.payable, dec!(800));
    }

    #[test]
    fn test_discount_capped_at_price() {
        // Price 1000, discount 1500: applied = 1000, payable = 0.
        let p = PaymentPreview::compute(dec!(1000), dec!(1500));
        assert_eq!(p.discount, dec!(1000));
        assert_eq!(p.payable, dec!(0));
    }

    #[test]
    fn test_no_discount() {
        let p = PaymentPreview::compute(dec!(750), Decimal::ZERO);
        assert_eq!(p.discount, Decimal::ZERO);
        assert_eq!(p.payable, dec!(750));
    }

    #[test]
    fn test_negative_discount_clamped() {
        let p = PaymentPreview::compute(dec!(1000), dec!(-50));
        assert_eq!(p.discount, Decimal::ZERO);
        assert_eq!(p.payable, dec!(1000));
    }

    #[test]
    fn test_discount_equal_to_price() {
        let p = PaymentPreview::compute(dec!(500), dec!(500));
        assert_eq!(p.discount, dec!(500));
        assert_eq!(p.payable, Decimal::ZERO);
    }
}

#[cfg(test)]
mod props {
    use super::*;
    use proptest::prelude::*;

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        // Amounts up to 10^7 with cent precision.
        (0i64..=1_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// For all prices p and discounts d: applied = min(p, d) and
        /// payable = p - applied, with payable never negative.
        #[test]
        fn prop_applied_is_min_and_payable_non_negative(
            price in amount_strategy(),
            discount in amount_strategy(),
        ) {
            let preview = PaymentPreview::compute(price, discount);

            prop_assert_eq!(preview.discount, price.min(discount));
            prop_assert_eq!(preview.payable, price - preview.discount);
            prop_assert!(preview.payable >= Decimal::ZERO);
        }

        /// Original amount is always fully decomposed into discount + payable.
        #[test]
        fn prop_decomposition(
            price in amount_strategy(),
            discount in amount_strategy(),
        ) {
            let preview = PaymentPreview::compute(price, discount);
            prop_assert_eq!(preview.discount + preview.payable, preview.original);
        }
    }
}
