//! Baseline cohort summaries.
//!
//! Operates on a cohort already restricted to the baseline timepoint:
//! grouped cardinality counts over sample attributes and a conditional
//! subgroup average of one population's relative frequency.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::analysis::frequency::FrequencyRecord;
use crate::analysis::round_to;
use crate::store::{Population, Sample};

/// Decimal digits kept on averaged subgroup percentages.
pub const AVERAGE_PERCENT_DECIMALS: i32 = 2;

/// Attribute to group a baseline cohort by.
///
/// `Project` counts distinct samples; `Response` and `Sex` count distinct
/// subjects, since one subject contributes several samples over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupKey {
    Project,
    Response,
    Sex,
}

/// Cardinality of one group. A missing group value (e.g. an unset response)
/// is its own bucket with `key = None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedCount {
    pub key: Option<String>,
    pub count: usize,
}

/// Grouped cardinality counts over a cohort of raw samples.
///
/// Output is ordered by group key (missing bucket first) so repeated calls
/// render identically.
pub fn grouped_counts(cohort: &[Sample], key: GroupKey) -> Vec<GroupedCount> {
    let mut members: BTreeMap<Option<String>, HashSet<&str>> = BTreeMap::new();
    for sample in cohort {
        let (group, member) = match key {
            GroupKey::Project => (Some(sample.project.clone()), sample.sample.as_str()),
            GroupKey::Response => (sample.response.clone(), sample.subject.as_str()),
            GroupKey::Sex => (Some(sample.sex.clone()), sample.subject.as_str()),
        };
        members.entry(group).or_default().insert(member);
    }

    members
        .into_iter()
        .map(|(key, ids)| GroupedCount {
            key,
            count: ids.len(),
        })
        .collect()
}

/// Average relative frequency of `population` over the cohort records whose
/// sex and response match case-insensitively.
///
/// `None` means no record qualified — a legitimate state for small trial
/// subsets, distinct from an average of zero. The result is rounded to
/// [`AVERAGE_PERCENT_DECIMALS`].
pub fn conditional_average(
    cohort: &[FrequencyRecord],
    population: Population,
    sex: &str,
    response: &str,
) -> Option<f64> {
    let percentages: Vec<f64> = cohort
        .iter()
        .filter(|record| {
            record.population == population
                && record.sex.eq_ignore_ascii_case(sex)
                && record
                    .response
                    .as_deref()
                    .is_some_and(|r| r.eq_ignore_ascii_case(response))
        })
        .map(|record| record.percentage)
        .collect();

    if percentages.is_empty() {
        return None;
    }
    let mean = percentages.iter().sum::<f64>() / percentages.len() as f64;
    Some(round_to(mean, AVERAGE_PERCENT_DECIMALS))
}
