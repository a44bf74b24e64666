//! Half-hour rounding for quota comparisons.

use rust_decimal::Decimal;

/// Rounds up to the next half hour: `ceil(2x) / 2`.
///
/// Quota is tracked to half-hour granularity so that fractional shares
/// (e.g. a third of 32 hours) do not leave someone a hair short of done.
///
/// # Examples
///
/// ```
/// use work_signup_engine::scheduling::round_next_half;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_next_half(Decimal::from_str("10.1").unwrap()), Decimal::from_str("10.5").unwrap());
/// assert_eq!(round_next_half(Decimal::from_str("10.5").unwrap()), Decimal::from_str("10.5").unwrap());
/// assert_eq!(round_next_half(Decimal::from_str("10.6").unwrap()), Decimal::from(11));
/// ```
pub fn round_next_half(hours: Decimal) -> Decimal {
    (hours * Decimal::TWO).ceil() / Decimal::TWO
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_whole_hours_unchanged() {
        assert_eq!(round_next_half(dec("8")), dec("8"));
        assert_eq!(round_next_half(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_third_of_quota_rounds_up() {
        // A third share of 32 hours
        let target = dec("32") / dec("3");
        assert_eq!(round_next_half(target), dec("11"));
    }

    #[test]
    fn test_quarter_hour_rounds_to_half() {
        assert_eq!(round_next_half(dec("2.25")), dec("2.5"));
        assert_eq!(round_next_half(dec("2.75")), dec("3"));
    }

    proptest! {
        #[test]
        fn prop_rounding_never_decreases_and_stays_within_half(cents in 0i64..1_000_000) {
            let hours = Decimal::new(cents, 2);
            let rounded = round_next_half(hours);
            prop_assert!(rounded >= hours);
            prop_assert!(rounded - hours < dec("0.5"));
            prop_assert_eq!((rounded * Decimal::TWO).fract(), Decimal::ZERO);
        }
    }
}
