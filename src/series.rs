//! E96 preferred-value series.
//!
//! The E96 series holds 96 roughly logarithmically spaced mantissas per
//! decade (1% tolerance resistors). A resistor library replicates the
//! decade across several orders of magnitude.

use crate::error::GenResult;
use crate::format::engineering_label;

/// Normalised E96 mantissas for one decade, ascending.
pub const E96: [f64; 96] = [
    1.00, 1.02, 1.05, 1.07, 1.10, 1.13, 1.15, 1.18, 1.21, 1.24, 1.27, 1.30,
    1.33, 1.37, 1.40, 1.43, 1.47, 1.50, 1.54, 1.58, 1.62, 1.65, 1.69, 1.74,
    1.78, 1.82, 1.87, 1.91, 1.96, 2.00, 2.05, 2.10, 2.15, 2.21, 2.26, 2.32,
    2.37, 2.43, 2.49, 2.55, 2.61, 2.67, 2.74, 2.80, 2.87, 2.94, 3.01, 3.09,
    3.16, 3.24, 3.32, 3.40, 3.48, 3.57, 3.65, 3.74, 3.83, 3.92, 4.02, 4.12,
    4.22, 4.32, 4.42, 4.53, 4.64, 4.75, 4.87, 4.99, 5.11, 5.23, 5.36, 5.49,
    5.62, 5.76, 5.90, 6.04, 6.19, 6.34, 6.49, 6.65, 6.81, 6.98, 7.15, 7.32,
    7.50, 7.68, 7.87, 8.06, 8.25, 8.45, 8.66, 8.87, 9.09, 9.31, 9.53, 9.76,
];

/// Number of decades generated by default (1 Ω up to 976 kΩ).
pub const DEFAULT_DECADES: u32 = 6;

/// Standard chip packages a resistor value is offered in.
pub const DEFAULT_PACKAGES: [&str; 4] = ["0201", "0402", "0603", "0805"];

/// A resistor value with its engineering label.
#[derive(Debug, Clone, PartialEq)]
pub struct ResistorValue {
    /// Resistance in ohms.
    pub ohms: f64,
    /// Formatted label, e.g. `4.7k`.
    pub label: String,
}

impl ResistorValue {
    /// Creates a resistor value, formatting its label.
    ///
    /// # Errors
    ///
    /// Fails if the value is too large for the suffix table.
    pub fn new(ohms: f64) -> GenResult<Self> {
        Ok(Self {
            ohms,
            label: engineering_label(ohms)?,
        })
    }
}

/// Expands the E96 series over `decades` orders of magnitude.
///
/// Decade-major: all 96 mantissas of 10^0, then all of 10^1, and so on.
#[must_use]
pub fn e96_values(decades: u32) -> Vec<f64> {
    expand_series(&E96, decades)
}

/// Expands an arbitrary one-decade series over `decades` orders of magnitude.
#[must_use]
pub fn expand_series(series: &[f64], decades: u32) -> Vec<f64> {
    (0..decades)
        .flat_map(|decade| {
            let multiplier = 10f64.powi(i32::try_from(decade).unwrap_or(i32::MAX));
            series.iter().map(move |m| m * multiplier)
        })
        .collect()
}

/// Builds the resistor values for `decades` orders of magnitude.
///
/// # Errors
///
/// Fails if a value cannot be labelled.
pub fn resistor_values(decades: u32) -> GenResult<Vec<ResistorValue>> {
    e96_values(decades)
        .into_iter()
        .map(ResistorValue::new)
        .collect()
}

/// Returns only the labels of [`resistor_values`], in the same order.
///
/// # Errors
///
/// Fails if a value cannot be labelled.
pub fn resistor_labels(decades: u32) -> GenResult<Vec<String>> {
    Ok(resistor_values(decades)?
        .into_iter()
        .map(|v| v.label)
        .collect())
}
