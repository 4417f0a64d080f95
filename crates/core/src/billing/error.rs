//! Validation errors for the billing engine.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Pure validation failures detected before any write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillingError {
    /// Month outside 1..=12.
    #[error("invalid month: {0}")]
    InvalidMonth(u32),

    /// A payment must cover at least one month.
    #[error("months count must be at least 1, got {0}")]
    InvalidMonthsCount(u32),

    /// Discount amounts may not be negative.
    #[error("amount must not be negative")]
    NegativeAmount,

    /// Explicit charge amounts must be strictly positive.
    #[error("charge amount must be positive, got {0}")]
    NonPositiveCharge(Decimal),

    /// The requested charge exceeds the payable amount.
    #[error("charge {charge} exceeds payable amount {payable}")]
    Overpayment {
        /// Requested charge.
        charge: Decimal,
        /// Maximum payable for the period.
        payable: Decimal,
    },

    /// Multi-month batches always charge the full payable per period.
    #[error("explicit amount is not allowed for multi-month payments")]
    ExplicitAmountWithBatch,

    /// The requested refund exceeds what was originally paid.
    #[error("refund {requested} exceeds paid amount {paid}")]
    OverRefund {
        /// Requested refund amount.
        requested: Decimal,
        /// Amount originally paid.
        paid: Decimal,
    },

    /// The caller's scope does not cover the target center.
    #[error("caller is not scoped to center {0}")]
    CenterMismatch(Uuid),
}
