//! Cohort selection.
//!
//! A cohort is the subset of samples (or their derived frequency records)
//! matching a conjunction of clinical predicates. Categorical predicates
//! compare case-insensitively because source data casing is inconsistent;
//! the optional timepoint predicate is an exact numeric match. An empty
//! cohort is a valid value, not an error.

use serde::{Deserialize, Serialize};

use crate::analysis::frequency::{FrequencyRecord, relative_frequencies};
use crate::error::Result;
use crate::store::{Sample, SampleStore};

/// Time-from-treatment-start value that marks the baseline timepoint.
pub const BASELINE_TIMEPOINT: f64 = 0.0;

/// Conjunction of cohort predicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortFilter {
    pub condition: String,
    pub treatment: String,
    pub sample_type: String,
    /// Exact timepoint restriction, applied only when set.
    pub time_from_treatment_start: Option<f64>,
}

impl CohortFilter {
    pub fn new(condition: &str, treatment: &str, sample_type: &str) -> Self {
        Self {
            condition: condition.to_string(),
            treatment: treatment.to_string(),
            sample_type: sample_type.to_string(),
            time_from_treatment_start: None,
        }
    }

    /// Restrict the cohort to one exact timepoint.
    pub fn at_timepoint(mut self, timepoint: f64) -> Self {
        self.time_from_treatment_start = Some(timepoint);
        self
    }

    fn matches(
        &self,
        condition: &str,
        treatment: &str,
        sample_type: &str,
        timepoint: f64,
    ) -> bool {
        condition.eq_ignore_ascii_case(&self.condition)
            && treatment.eq_ignore_ascii_case(&self.treatment)
            && sample_type.eq_ignore_ascii_case(&self.sample_type)
            && self
                .time_from_treatment_start
                .is_none_or(|t| timepoint == t)
    }

    /// Whether a raw sample satisfies every predicate.
    pub fn matches_sample(&self, sample: &Sample) -> bool {
        self.matches(
            &sample.condition,
            &sample.treatment,
            &sample.sample_type,
            sample.time_from_treatment_start,
        )
    }

    /// Whether a derived frequency record satisfies every predicate.
    pub fn matches_record(&self, record: &FrequencyRecord) -> bool {
        self.matches(
            &record.condition,
            &record.treatment,
            &record.sample_type,
            record.time_from_treatment_start,
        )
    }
}

/// Derived frequency records for the samples matching `filter`.
///
/// The frequency invariants (closed population set, nonzero totals) are
/// checked over the whole store before filtering, so an ingestion defect
/// surfaces even when the broken sample falls outside the cohort.
pub fn filtered_cohort<S: SampleStore>(
    store: &S,
    filter: &CohortFilter,
) -> Result<Vec<FrequencyRecord>> {
    let records = relative_frequencies(store)?;
    Ok(records
        .into_iter()
        .filter(|record| filter.matches_record(record))
        .collect())
}

/// Raw samples matching `filter` at the baseline timepoint.
///
/// When the filter carries no explicit timepoint, [`BASELINE_TIMEPOINT`] is
/// applied.
pub fn baseline_cohort<S: SampleStore>(store: &S, filter: &CohortFilter) -> Result<Vec<Sample>> {
    let timepoint = filter
        .time_from_treatment_start
        .unwrap_or(BASELINE_TIMEPOINT);
    let filter = filter.clone().at_timepoint(timepoint);
    Ok(store
        .samples()?
        .into_iter()
        .filter(|sample| filter.matches_sample(sample))
        .collect())
}
