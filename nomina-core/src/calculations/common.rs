//! Monetary rounding shared by every calculation.
//!
//! Both primitives work on [`Decimal`] so that chained subtractions never
//! drift by a cent the way binary floating point would.

use rust_decimal::{Decimal, RoundingStrategy};

/// Nudge added before rounding so that a value sitting on the half cent
/// always goes up, as the official procedure requires.
const ROUNDING_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 5);

/// Rounds to two decimal places the way the withholding procedure does:
/// add a negligible epsilon, then round half away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use nomina_core::calculations::common::round_euro;
///
/// assert_eq!(round_euro(dec!(0.005)), dec!(0.01));
/// assert_eq!(round_euro(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_euro(dec!(2.675)), dec!(2.68));
/// ```
pub fn round_euro(value: Decimal) -> Decimal {
    (value + ROUNDING_EPSILON).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Truncates to two decimal places: scale by 100, keep the integer part,
/// scale back.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use nomina_core::calculations::common::truncate_euro;
///
/// assert_eq!(truncate_euro(dec!(12.349)), dec!(12.34));
/// assert_eq!(truncate_euro(dec!(-12.349)), dec!(-12.34));
/// ```
pub fn truncate_euro(value: Decimal) -> Decimal {
    (value * Decimal::ONE_HUNDRED).trunc() / Decimal::ONE_HUNDRED
}

/// Returns the maximum of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Clamps a negative amount to zero.
pub fn non_negative(value: Decimal) -> Decimal {
    max(value, Decimal::ZERO)
}
