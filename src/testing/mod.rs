//! Statistical comparison of response groups.
//!
//! For each population present in a cohort, partitions the relative
//! frequencies into responders and non-responders and runs a two-sided
//! rank test on the two distributions. Percentages are small-sample and not
//! assumed normal, so the comparison is distribution-free.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::frequency::FrequencyRecord;
use crate::error::Result;
use crate::store::Population;

pub mod nonparametric;

/// Two-sided p-value threshold for flagging a population as significant.
pub const SIGNIFICANCE_ALPHA: f64 = 0.05;

/// Alternative hypothesis for a two-sample rank test.
#[derive(Debug, Clone, Copy)]
pub enum Alternative {
    TwoSided,
    Less,
    Greater,
}

/// Outcome of a single two-sample rank test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    /// The U statistic of the first group.
    pub statistic: f64,
    /// The p-value of the test.
    pub p_value: f64,
}

impl TestResult {
    pub fn new(statistic: f64, p_value: f64) -> Self {
        TestResult { statistic, p_value }
    }

    /// Check if the result is statistically significant at the given threshold.
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Per-population comparison between responders and non-responders.
///
/// `p_value` is `None` when one of the two groups has no observations; the
/// test is then undefined and `significant` is false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationComparison {
    pub population: Population,
    pub p_value: Option<f64>,
    pub significant: bool,
}

fn response_is(record: &FrequencyRecord, value: &str) -> bool {
    record
        .response
        .as_deref()
        .is_some_and(|r| r.eq_ignore_ascii_case(value))
}

/// Run a two-sided Mann–Whitney U test per population in `cohort`.
///
/// Output order follows the first appearance of each population in the input
/// sequence. The p-values themselves are invariant under reordering of the
/// input rows. An empty group on either side degrades to an undefined
/// p-value; a hard error is raised only when the rank computation fails on
/// malformed input.
pub fn population_statistics(cohort: &[FrequencyRecord]) -> Result<Vec<PopulationComparison>> {
    let mut populations: Vec<Population> = Vec::new();
    for record in cohort {
        if !populations.contains(&record.population) {
            populations.push(record.population);
        }
    }

    populations
        .into_par_iter()
        .map(|population| {
            let responders: Vec<f64> = cohort
                .iter()
                .filter(|r| r.population == population && response_is(r, "yes"))
                .map(|r| r.percentage)
                .collect();
            let non_responders: Vec<f64> = cohort
                .iter()
                .filter(|r| r.population == population && response_is(r, "no"))
                .map(|r| r.percentage)
                .collect();

            if responders.is_empty() || non_responders.is_empty() {
                return Ok(PopulationComparison {
                    population,
                    p_value: None,
                    significant: false,
                });
            }

            let result = nonparametric::mann_whitney(
                &responders,
                &non_responders,
                Alternative::TwoSided,
            )?;
            Ok(PopulationComparison {
                population,
                significant: result.is_significant(SIGNIFICANCE_ALPHA),
                p_value: Some(result.p_value),
            })
        })
        .collect()
}
