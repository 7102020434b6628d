//! Two-sample Mann–Whitney U test.
//!
//! Rank-based, distribution-free comparison of central tendency. P-values use
//! the normal approximation with tie-averaged ranks and a continuity
//! correction of 1/2, which is appropriate for the small group sizes seen in
//! trial cohorts.

use std::cmp::Ordering;

use num_traits::Float;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{AnalysisError, Result};
use crate::testing::{Alternative, TestResult};

fn to_finite_f64<T: Float>(value: T) -> Result<f64> {
    match num_traits::cast::<T, f64>(value) {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(AnalysisError::RankTest(
            "non-finite observation in rank test input".to_string(),
        )),
    }
}

/// Perform a Mann–Whitney U test comparing two samples.
///
/// Returns the U statistic of `x` and the p-value for the requested
/// alternative. Ties receive averaged ranks.
///
/// # Errors
///
/// Fails when either group is empty or any observation is non-finite; both
/// indicate malformed input rather than a legitimate "no result" state, which
/// callers are expected to handle before invoking the test.
pub fn mann_whitney<T>(x: &[T], y: &[T], alternative: Alternative) -> Result<TestResult>
where
    T: Float,
{
    let nx = x.len();
    let ny = y.len();

    if nx == 0 || ny == 0 {
        return Err(AnalysisError::RankTest(
            "both groups need at least one observation".to_string(),
        ));
    }

    // Combine samples and label their origin (0 for x, 1 for y).
    let mut combined: Vec<(f64, usize)> = Vec::with_capacity(nx + ny);
    for &value in x {
        combined.push((to_finite_f64(value)?, 0));
    }
    for &value in y {
        combined.push((to_finite_f64(value)?, 1));
    }

    combined.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    // Assign ranks, averaging over ties.
    let mut ranks = vec![0.0f64; nx + ny];
    let mut i = 0;
    while i < combined.len() {
        let value = combined[i].0;
        let mut j = i + 1;
        while j < combined.len() && combined[j].0 == value {
            j += 1;
        }
        let rank = (i + j - 1) as f64 / 2.0 + 1.0;
        for k in i..j {
            ranks[k] = rank;
        }
        i = j;
    }

    let mut rank_sum_x = 0.0;
    for (i, entry) in combined.iter().enumerate() {
        if entry.1 == 0 {
            rank_sum_x += ranks[i];
        }
    }

    let nx = nx as f64;
    let ny = ny as f64;
    let u_x = rank_sum_x - nx * (nx + 1.0) / 2.0;

    let mean_u = nx * ny / 2.0;
    let sd_u = (nx * ny * (nx + ny + 1.0) / 12.0).sqrt();
    let correction = 0.5;

    let normal = Normal::new(0.0, 1.0).unwrap();
    let p_value = match alternative {
        Alternative::TwoSided => {
            let z = (((u_x - mean_u).abs() - correction) / sd_u).max(0.0);
            (2.0 * (1.0 - normal.cdf(z))).min(1.0)
        }
        Alternative::Less => normal.cdf((u_x - mean_u + correction) / sd_u),
        Alternative::Greater => 1.0 - normal.cdf((u_x - mean_u - correction) / sd_u),
    };

    Ok(TestResult::new(u_x, p_value))
}
