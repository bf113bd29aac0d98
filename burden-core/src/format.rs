//! Display formatting for report values.
//!
//! Amounts are rounded half-up to two decimals, grouped in thousands with a
//! space and stripped of trailing fractional zeros. Values that are not
//! applicable render as [`NOT_APPLICABLE`].

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::calculations::common::round_half_up;

/// Placeholder for a ratio whose denominator was zero or negative.
pub const NOT_APPLICABLE: &str = "-";

/// Formats an amount with space thousands separators and 0-2 decimals.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use burden_core::format::format_money;
///
/// assert_eq!(format_money(Some(dec!(1234567.891))), "1 234 567.89");
/// assert_eq!(format_money(Some(dec!(30000))), "30 000");
/// assert_eq!(format_money(Some(dec!(-179500.50))), "-179 500.5");
/// assert_eq!(format_money(None), "-");
/// ```
pub fn format_money(value: Option<Decimal>) -> String {
    match value {
        Some(value) => format_grouped(value),
        None => NOT_APPLICABLE.to_string(),
    }
}

/// Formats a ratio as a percentage, using the same rules as [`format_money`].
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use burden_core::format::format_percent;
///
/// assert_eq!(format_percent(Some(dec!(0.04148))), "4.15%");
/// assert_eq!(format_percent(Some(dec!(0.3))), "30%");
/// assert_eq!(format_percent(None), "-");
/// ```
pub fn format_percent(value: Option<Decimal>) -> String {
    match value {
        Some(value) => format!("{}%", format_grouped(value * dec!(100))),
        None => NOT_APPLICABLE.to_string(),
    }
}

fn format_grouped(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let text = format!("{:.2}", rounded.abs());
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut out = String::with_capacity(text.len() + integer.len() / 3 + 1);
    if rounded < Decimal::ZERO {
        out.push('-');
    }
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(digit);
    }

    let fraction = fraction.trim_end_matches('0');
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}
