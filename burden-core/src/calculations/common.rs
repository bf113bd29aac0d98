//! Common utility functions for burden calculations.
//!
//! Shared helpers used by the calculator and the formatter: rounding,
//! the larger-of rule used by the AUSN floor and guarded division.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use burden_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use burden_core::calculations::common::max;
///
/// assert_eq!(max(dec!(-9100.00), dec!(30000.00)), dec!(30000.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Divides `numerator` by `denominator` when the denominator is strictly positive.
///
/// A zero or negative denominator means the ratio is not applicable and
/// yields `None` rather than an error or a zero. Quotients of validated
/// amounts always fit; `None` is also returned if one would not.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use burden_core::calculations::common::ratio;
///
/// assert_eq!(ratio(dec!(300000), dec!(1000000)), Some(dec!(0.3)));
/// assert_eq!(ratio(dec!(300000), dec!(0)), None);
/// assert_eq!(ratio(dec!(41480), dec!(-179500)), None);
/// ```
pub fn ratio(
    numerator: Decimal,
    denominator: Decimal,
) -> Option<Decimal> {
    if denominator > Decimal::ZERO {
        numerator.checked_div(denominator)
    } else {
        None
    }
}
