//! Data model and store seam.
//!
//! Samples and their per-population cell counts arrive from an external ETL
//! process. The [`SampleStore`] trait is the explicit handle the analysis
//! operations take instead of a process-wide connection: each query returns a
//! complete snapshot of one relation or fails outright, which keeps every
//! operation a pure function of its inputs.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// The closed set of measured cell populations.
///
/// Variants are declared in lexical order of their labels so the derived
/// `Ord` matches label order, which downstream ordering relies on. A stored
/// count row whose label falls outside this set is a data-integrity error,
/// not a silently skipped category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Population {
    BCell,
    Cd4TCell,
    Cd8TCell,
    Monocyte,
    NkCell,
}

impl Population {
    /// Every population, in lexical label order.
    pub const ALL: [Population; 5] = [
        Population::BCell,
        Population::Cd4TCell,
        Population::Cd8TCell,
        Population::Monocyte,
        Population::NkCell,
    ];

    /// The label used in stored count rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            Population::BCell => "b_cell",
            Population::Cd4TCell => "cd4_t_cell",
            Population::Cd8TCell => "cd8_t_cell",
            Population::Monocyte => "monocyte",
            Population::NkCell => "nk_cell",
        }
    }

    /// Parse a stored label, case-insensitively. `None` for out-of-set labels.
    pub fn from_label(label: &str) -> Option<Population> {
        Population::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(label))
    }
}

impl std::fmt::Display for Population {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clinical metadata for one trial sample. Created once by ingestion and
/// immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    /// Unique sample identifier.
    pub sample: String,
    pub project: String,
    pub subject: String,
    pub condition: String,
    pub age: f64,
    pub sex: String,
    pub treatment: String,
    /// Treatment response, "yes"/"no" when recorded.
    pub response: Option<String>,
    pub sample_type: String,
    /// Time from treatment start; 0 = baseline.
    pub time_from_treatment_start: f64,
}

/// One measured cell count for a sample.
///
/// The population label is kept raw here and validated against
/// [`Population`] when frequencies are derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellCount {
    pub sample_id: String,
    pub cell_type: String,
    pub count: f64,
}

/// Read-only snapshot access to the two underlying relations.
///
/// A query either returns its complete result set or fails; there are no
/// partial results and no cancellation. Implementations backed by an actual
/// database map their failures to [`crate::error::AnalysisError::Query`].
pub trait SampleStore {
    fn samples(&self) -> Result<Vec<Sample>>;
    fn cell_counts(&self) -> Result<Vec<CellCount>>;
}

/// In-memory store holding the sample and cell-count tables loaded by the
/// external ETL process. Reads never fail.
#[derive(Debug, Clone, Default)]
pub struct CohortStore {
    samples: Vec<Sample>,
    cell_counts: Vec<CellCount>,
}

impl CohortStore {
    pub fn new(samples: Vec<Sample>, cell_counts: Vec<CellCount>) -> Self {
        Self {
            samples,
            cell_counts,
        }
    }

    /// Number of samples in the snapshot.
    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    /// Number of count rows in the snapshot.
    pub fn n_cell_counts(&self) -> usize {
        self.cell_counts.len()
    }
}

impl SampleStore for CohortStore {
    fn samples(&self) -> Result<Vec<Sample>> {
        Ok(self.samples.clone())
    }

    fn cell_counts(&self) -> Result<Vec<CellCount>> {
        Ok(self.cell_counts.clone())
    }
}
