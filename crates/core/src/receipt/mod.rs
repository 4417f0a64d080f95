//! Receipt number formatting.
//!
//! Receipt numbers are unique per (center, year, month), assigned once from a
//! monotonically increasing counter, and never reused. This module only
//! formats; the atomic counter lives in the database layer.

/// Formats a receipt number as `{CODE}/{year}/{month:02}/{seq:05}`.
///
/// `center_code` is the center's short human-readable code (e.g. `ANK01`),
/// `sequence` the value returned by the per-period counter. The sequence is
/// zero-padded to five digits but grows beyond that without truncation.
#[must_use]
pub fn format_receipt_number(center_code: &str, year: i32, month: u32, sequence: i64) -> String {
    format!("{center_code}/{year}/{month:02}/{sequence:05}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format() {
        assert_eq!(format_receipt_number("ANK01", 2026, 3, 42), "ANK01/2026/03/00042");
    }

    #[test]
    fn test_two_digit_month_not_padded_further() {
        assert_eq!(
            format_receipt_number("ANK01", 2026, 11, 7),
            "ANK01/2026/11/00007"
        );
    }

    #[test]
    fn test_sequence_grows_past_padding() {
        assert_eq!(
            format_receipt_number("ANK01", 2026, 1, 123_456),
            "ANK01/2026/01/123456"
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Distinct sequences within the same (center, year, month) scope
        /// always produce distinct receipt numbers.
        #[test]
        fn prop_distinct_sequences_distinct_numbers(
            year in 2000i32..=2100,
            month in 1u32..=12,
            a in 1i64..=1_000_000,
            b in 1i64..=1_000_000,
        ) {
            prop_assume!(a != b);
            let left = format_receipt_number("ANK01", year, month, a);
            let right = format_receipt_number("ANK01", year, month, b);
            prop_assert_ne!(left, right);
        }
    }
}
