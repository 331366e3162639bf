//! Engineering-notation labels for component values.
//!
//! Values are rounded to three significant figures, scaled down by powers
//! of 1000 and suffixed with a multiplier letter:
//!
//! - `1.0` → `1R`
//! - `4700.0` → `4.7k`
//! - `976000.0` → `976k`
//!
//! The electronics digit-grouping convention (`4k7`) is deliberately not
//! applied; existing libraries were generated with the `4.7k` form.

use crate::error::{GenResult, GenerateError};

/// Multiplier suffixes indexed by the number of divisions by 1000.
///
/// Index 0 is the base unit, written `R` for resistors.
pub const SUFFIXES: [&str; 5] = ["R", "k", "M", "B", "T"];

/// Number of significant figures kept before scaling.
pub const SIGNIFICANT_FIGURES: usize = 3;

/// Formats a value as a compact engineering label.
///
/// Zero yields `0R` and NaN yields `nanR`. Negative values are scaled on
/// their absolute value and keep the sign in the mantissa
/// (`-4700.0` → `-4.7k`).
///
/// # Errors
///
/// Returns [`GenerateError::ValueOutOfRange`] when the value needs a
/// multiplier beyond `T` (|value| ≥ 1e15, including infinities).
///
/// # Examples
///
/// ```
/// use altium_libgen::format::engineering_label;
///
/// assert_eq!(engineering_label(1.0).unwrap(), "1R");
/// assert_eq!(engineering_label(1000.0).unwrap(), "1k");
/// assert_eq!(engineering_label(4700.0).unwrap(), "4.7k");
/// ```
pub fn engineering_label(value: f64) -> GenResult<String> {
    let mut num = round_significant(value, SIGNIFICANT_FIGURES);
    let mut magnitude = 0;

    while num.abs() >= 1000.0 {
        magnitude += 1;
        if magnitude >= SUFFIXES.len() {
            return Err(GenerateError::ValueOutOfRange { value });
        }
        num /= 1000.0;
    }

    Ok(format!(
        "{}{}",
        mantissa_text(num),
        SUFFIXES[magnitude]
    ))
}

/// Rounds `value` to `digits` significant figures.
///
/// Goes through the shortest exact decimal rendering so the result matches
/// what a `%.3g`-style formatter would print.
#[must_use]
pub fn round_significant(value: f64, digits: usize) -> f64 {
    if !value.is_finite() || digits == 0 {
        return value;
    }
    let precision = digits - 1;
    format!("{value:.precision$e}").parse().unwrap_or(value)
}

/// Prints `num` with six decimals, then strips trailing zeros and the point.
fn mantissa_text(num: f64) -> String {
    if num.is_nan() {
        return "nan".to_string();
    }
    let fixed = format!("{num:.6}");
    if !fixed.contains('.') {
        return fixed;
    }
    fixed
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
