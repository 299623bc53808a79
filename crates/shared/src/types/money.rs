//! Money rounding rules for plan amounts.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! The plan's batch history rounds half away from zero (never Banker's Rounding),
//! and year-end figures must reproduce it to the cent.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept on posted amounts.
pub const MONEY_SCALE: u32 = 2;

/// Number of decimal places kept on the ETVA share ratio.
pub const RATIO_SCALE: u32 = 6;

/// Rounds an amount to cents, half away from zero.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    round_half_away(value, MONEY_SCALE)
}

/// Rounds a value to `decimal_places`, half away from zero.
#[must_use]
pub fn round_half_away(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a value to whole points, half away from zero.
#[must_use]
pub fn round_points(value: Decimal) -> Decimal {
    round_half_away(value, 0)
}

/// Truncates a share ratio to [`RATIO_SCALE`] places.
#[must_use]
pub fn truncate_ratio(value: Decimal) -> Decimal {
    truncate_to(value, RATIO_SCALE)
}

/// Truncates a value toward zero at `decimal_places`.
#[must_use]
pub fn truncate_to(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::ToZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0.005), dec!(0.01))]
    #[case(dec!(0.015), dec!(0.02))]
    #[case(dec!(0.025), dec!(0.03))]
    #[case(dec!(-0.025), dec!(-0.03))]
    #[case(dec!(12.344), dec!(12.34))]
    #[case(dec!(1500), dec!(1500))]
    fn test_round_money_half_away_from_zero(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_money(input), expected);
    }

    #[test]
    fn test_round_half_away_differs_from_bankers() {
        // 14.5 points: Banker's Rounding would give 14
        assert_eq!(round_half_away(dec!(14.5), 0), dec!(15));
        assert_eq!(round_half_away(dec!(13.5), 0), dec!(14));
    }

    #[test]
    fn test_truncate_ratio() {
        assert_eq!(truncate_ratio(dec!(1000) / dec!(3000)), dec!(0.333333));
        assert_eq!(truncate_to(dec!(2) / dec!(3), RATIO_SCALE), dec!(0.666666));
        assert_eq!(round_points(dec!(1500.00) / dec!(100)), dec!(15));
    }
}
