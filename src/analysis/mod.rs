//! Frequency aggregation, cohort filtering, and baseline summaries.
//!
//! - **[`frequency`]**: per-sample relative frequencies of each population
//! - **[`cohort`]**: predicate-based cohort selection
//! - **[`baseline`]**: grouped cardinalities and conditional averages over a
//!   baseline cohort

pub mod baseline;
pub mod cohort;
pub mod frequency;

/// Round to a fixed number of decimal digits, half away from zero.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
