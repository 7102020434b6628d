//! Relative frequency aggregation.
//!
//! Turns the raw (sample, cell type, count) relation into one record per
//! (sample, population) pair carrying the population's share of the sample's
//! total count. Ordering is part of the contract: records are sorted by
//! sample identifier, then by population label, so downstream consumers
//! render reproducible tables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::analysis::round_to;
use crate::error::{AnalysisError, Result};
use crate::store::{Population, Sample, SampleStore};

/// Decimal digits kept on full-summary percentages.
pub const SUMMARY_PERCENT_DECIMALS: i32 = 4;

/// One (sample, population) row of the relative frequency summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyRecord {
    pub sample: String,
    pub project: String,
    pub subject: String,
    pub condition: String,
    pub sex: String,
    pub treatment: String,
    pub response: Option<String>,
    pub sample_type: String,
    pub time_from_treatment_start: f64,
    /// Sum of counts over all populations of this sample.
    pub total_count: f64,
    pub population: Population,
    pub count: f64,
    /// `100 * count / total_count`, rounded to [`SUMMARY_PERCENT_DECIMALS`].
    pub percentage: f64,
}

/// Compute the relative frequency of every population in every sample.
///
/// Each count row's label is validated against the closed population set;
/// an out-of-set label aborts with [`AnalysisError::UnknownPopulation`].
/// A sample whose counts sum to zero has no defined percentage and aborts
/// with [`AnalysisError::ZeroTotalCount`] rather than emitting null or
/// infinite rows — a zero total indicates an ingestion defect.
///
/// Count rows referencing a sample absent from the sample table are dropped,
/// matching inner-join semantics of the underlying relations.
pub fn relative_frequencies<S: SampleStore>(store: &S) -> Result<Vec<FrequencyRecord>> {
    let samples = store.samples()?;
    let counts = store.cell_counts()?;

    let mut counts_by_sample: HashMap<&str, Vec<(Population, f64)>> = HashMap::new();
    for row in &counts {
        let population = Population::from_label(&row.cell_type).ok_or_else(|| {
            AnalysisError::UnknownPopulation {
                sample: row.sample_id.clone(),
                label: row.cell_type.clone(),
            }
        })?;
        counts_by_sample
            .entry(row.sample_id.as_str())
            .or_default()
            .push((population, row.count));
    }

    let mut ordered: Vec<&Sample> = samples.iter().collect();
    ordered.sort_by(|a, b| a.sample.cmp(&b.sample));

    let mut records = Vec::with_capacity(counts.len());
    for sample in ordered {
        let mut rows = counts_by_sample
            .get(sample.sample.as_str())
            .cloned()
            .unwrap_or_default();
        rows.sort_by_key(|(population, _)| *population);

        let total: f64 = rows.iter().map(|(_, count)| count).sum();
        if total <= 0.0 {
            return Err(AnalysisError::ZeroTotalCount {
                sample: sample.sample.clone(),
            });
        }

        for (population, count) in rows {
            records.push(FrequencyRecord {
                sample: sample.sample.clone(),
                project: sample.project.clone(),
                subject: sample.subject.clone(),
                condition: sample.condition.clone(),
                sex: sample.sex.clone(),
                treatment: sample.treatment.clone(),
                response: sample.response.clone(),
                sample_type: sample.sample_type.clone(),
                time_from_treatment_start: sample.time_from_treatment_start,
                total_count: total,
                population,
                count,
                percentage: round_to(count * 100.0 / total, SUMMARY_PERCENT_DECIMALS),
            });
        }
    }

    Ok(records)
}
