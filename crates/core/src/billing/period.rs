//! Billing period arithmetic.
//!
//! A billing period is the (year, month) a payment covers, independent of
//! when the payment record is created. Multi-month payments span consecutive
//! periods, rolling over year boundaries.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::BillingError;

/// A (year, month) accounting period.
///
/// The month is guaranteed to be within 1..=12 by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BillingPeriod {
    year: i32,
    month: u32,
}

impl BillingPeriod {
    /// Creates a billing period, validating the month.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::InvalidMonth` if `month` is outside 1..=12.
    pub const fn new(year: i32, month: u32) -> Result<Self, BillingError> {
        if month < 1 || month > 12 {
            return Err(BillingError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    /// The period containing the given calendar date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The period's year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// The period's month (1..=12).
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// The next consecutive period, rolling over into January.
    #[must_use]
    pub const fn succ(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The `count` consecutive periods starting at `self`.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::InvalidMonthsCount` if `count` is zero.
    pub fn span(self, count: u32) -> Result<Vec<Self>, BillingError> {
        if count == 0 {
            return Err(BillingError::InvalidMonthsCount(count));
        }

        let mut periods = Vec::with_capacity(count as usize);
        let mut current = self;
        for _ in 0..count {
            periods.push(current);
            current = current.succ();
        }
        Ok(periods)
    }
}

impl std::fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(13)]
    #[case(99)]
    fn test_invalid_month_rejected(#[case] month: u32) {
        assert_eq!(
            BillingPeriod::new(2026, month),
            Err(BillingError::InvalidMonth(month))
        );
    }

    #[test]
    fn test_succ_within_year() {
        let p = BillingPeriod::new(2026, 3).unwrap();
        assert_eq!(p.succ(), BillingPeriod::new(2026, 4).unwrap());
    }

    #[test]
    fn test_succ_rolls_over_december() {
        let p = BillingPeriod::new(2026, 12).unwrap();
        assert_eq!(p.succ(), BillingPeriod::new(2027, 1).unwrap());
    }

    #[test]
    fn test_span_crosses_year_boundary() {
        let p = BillingPeriod::new(2026, 11).unwrap();
        let span = p.span(4).unwrap();

        assert_eq!(
            span,
            vec![
                BillingPeriod::new(2026, 11).unwrap(),
                BillingPeriod::new(2026, 12).unwrap(),
                BillingPeriod::new(2027, 1).unwrap(),
                BillingPeriod::new(2027, 2).unwrap(),
            ]
        );
    }

    #[test]
    fn test_span_of_zero_rejected() {
        let p = BillingPeriod::new(2026, 1).unwrap();
        assert_eq!(p.span(0), Err(BillingError::InvalidMonthsCount(0)));
    }

    #[test]
    fn test_from_date() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        assert_eq!(
            BillingPeriod::from_date(date),
            BillingPeriod::new(2026, 8).unwrap()
        );
    }

    #[test]
    fn test_display() {
        let p = BillingPeriod::new(2026, 3).unwrap();
        assert_eq!(p.to_string(), "2026-03");
    }
}

#[cfg(test)]
mod props {
    use super::*;
    use proptest::prelude::*;

    fn period_strategy() -> impl Strategy<Value = BillingPeriod> {
        (2000i32..=2100, 1u32..=12)
            .prop_map(|(year, month)| BillingPeriod::new(year, month).unwrap())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// A span always has exactly `count` periods, each the successor of
        /// the previous one.
        #[test]
        fn prop_span_is_consecutive(start in period_strategy(), count in 1u32..=36) {
            let span = start.span(count).unwrap();
            prop_assert_eq!(span.len(), count as usize);
            prop_assert_eq!(span[0], start);
            for pair in span.windows(2) {
                prop_assert_eq!(pair[0].succ(), pair[1]);
            }
        }

        /// Every generated period keeps its month within 1..=12 after any
        /// number of successor steps.
        #[test]
        fn prop_succ_keeps_month_valid(start in period_strategy(), steps in 0u32..=48) {
            let mut current = start;
            for _ in 0..steps {
                current = current.succ();
            }
            prop_assert!((1..=12).contains(&current.month()));
        }

        /// Twelve successor steps advance the year by exactly one.
        #[test]
        fn prop_twelve_steps_advance_one_year(start in period_strategy()) {
            let mut current = start;
            for _ in 0..12 {
                current = current.succ();
            }
            prop_assert_eq!(current.year(), start.year() + 1);
            prop_assert_eq!(current.month(), start.month());
        }
    }
}
