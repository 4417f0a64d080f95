//! Charge and refund amount validation.
//!
//! All monetary invariants are checked here, before any write happens:
//! no overpayment, no over-refund, no explicit amounts in batch payments.

use rust_decimal::Decimal;

use super::error::BillingError;
use super::preview::PaymentPreview;

/// Resolves the amount actually charged for a single-period payment.
///
/// With an explicit amount the caller decides how much to collect (e.g. a
/// partial payment); it must be strictly positive and must not exceed the
/// payable amount. Without one, the full payable amount is charged - which
/// may legitimately be zero when the discount covers the whole price.
///
/// # Errors
///
/// Returns `NonPositiveCharge` or `Overpayment` for invalid explicit amounts.
pub fn resolve_charge(
    preview: &PaymentPreview,
    explicit: Option<Decimal>,
) -> Result<Decimal, BillingError> {
    match explicit {
        None => Ok(preview.payable),
        Some(amount) => {
            if amount <= Decimal::ZERO {
                return Err(BillingError::NonPositiveCharge(amount));
            }
            if amount > preview.payable {
                return Err(BillingError::Overpayment {
                    charge: amount,
                    payable: preview.payable,
                });
            }
            Ok(amount)
        }
    }
}

/// Validates the months-count / explicit-amount combination of a payment
/// request.
///
/// Multi-month batches always charge the full payable amount per period, so
/// an explicit amount is only meaningful for a single period.
///
/// # Errors
///
/// Returns `InvalidMonthsCount` for a zero count and `ExplicitAmountWithBatch`
/// when an explicit amount accompanies a multi-month request.
pub fn validate_batch_request(
    months_count: u32,
    explicit: Option<Decimal>,
) -> Result<(), BillingError> {
    if months_count == 0 {
        return Err(BillingError::InvalidMonthsCount(months_count));
    }
    if months_count > 1 && explicit.is_some() {
        return Err(BillingError::ExplicitAmountWithBatch);
    }
    Ok(())
}

/// Validates a refund request against the original paid amount.
///
/// # Errors
///
/// Returns `NonPositiveCharge` for amounts <= 0 and `OverRefund` when the
/// request exceeds what was paid.
pub fn validate_refund(paid: Decimal, requested: Decimal) -> Result<(), BillingError> {
    if requested <= Decimal::ZERO {
        return Err(BillingError::NonPositiveCharge(requested));
    }
    if requested > paid {
        return Err(BillingError::OverRefund { requested, paid });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_charge_is_full_payable() {
        let preview = PaymentPreview::compute(dec!(1000), dec!(200));
        assert_eq!(resolve_charge(&preview, None), Ok(dec!(800)));
    }

    #[test]
    fn test_default_charge_of_zero_payable_succeeds() {
        // Price 1000, discount 1500: payable 0, default charge records 0.
        let preview = PaymentPreview::compute(dec!(1000), dec!(1500));
        assert_eq!(resolve_charge(&preview, None), Ok(Decimal::ZERO));
    }

    #[test]
    fn test_explicit_charge_equal_to_payable() {
        let preview = PaymentPreview::compute(dec!(1000), dec!(200));
        assert_eq!(resolve_charge(&preview, Some(dec!(800))), Ok(dec!(800)));
    }

    #[test]
    fn test_explicit_charge_above_payable_rejected() {
        let preview = PaymentPreview::compute(dec!(1000), dec!(200));
        assert_eq!(
            resolve_charge(&preview, Some(dec!(900))),
            Err(BillingError::Overpayment {
                charge: dec!(900),
                payable: dec!(800),
            })
        );
    }

    #[test]
    fn test_partial_explicit_charge_allowed() {
        let preview = PaymentPreview::compute(dec!(1000), Decimal::ZERO);
        assert_eq!(resolve_charge(&preview, Some(dec!(400))), Ok(dec!(400)));
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-100))]
    fn test_non_positive_explicit_charge_rejected(#[case] amount: Decimal) {
        let preview = PaymentPreview::compute(dec!(1000), Decimal::ZERO);
        assert_eq!(
            resolve_charge(&preview, Some(amount)),
            Err(BillingError::NonPositiveCharge(amount))
        );
    }

    #[test]
    fn test_batch_with_explicit_amount_rejected() {
        assert_eq!(
            validate_batch_request(3, Some(dec!(100))),
            Err(BillingError::ExplicitAmountWithBatch)
        );
    }

    #[test]
    fn test_single_month_with_explicit_amount_allowed() {
        assert_eq!(validate_batch_request(1, Some(dec!(100))), Ok(()));
    }

    #[test]
    fn test_batch_without_explicit_amount_allowed() {
        assert_eq!(validate_batch_request(6, None), Ok(()));
    }

    #[test]
    fn test_zero_months_rejected() {
        assert_eq!(
            validate_batch_request(0, None),
            Err(BillingError::InvalidMonthsCount(0))
        );
    }

    #[test]
    fn test_refund_within_paid_amount() {
        assert_eq!(validate_refund(dec!(800), dec!(800)), Ok(()));
        assert_eq!(validate_refund(dec!(800), dec!(100)), Ok(()));
    }

    #[test]
    fn test_over_refund_rejected() {
        assert_eq!(
            validate_refund(dec!(800), dec!(801)),
            Err(BillingError::OverRefund {
                requested: dec!(801),
                paid: dec!(800),
            })
        );
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-5))]
    fn test_non_positive_refund_rejected(#[case] amount: Decimal) {
        assert_eq!(
            validate_refund(dec!(800), amount),
            Err(BillingError::NonPositiveCharge(amount))
        );
    }
}
