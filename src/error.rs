//! Error types for the cohort-statistics library.

use thiserror::Error;

/// Main error type for the library.
///
/// Data-integrity violations and upstream query failures abort the current
/// operation and are never recovered locally. Empty comparison groups and
/// empty cohorts are *not* errors; they are represented as typed "no result"
/// values (`None` p-value, empty sequence, `None` average) by the operations
/// that produce them.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A sample's counts sum to zero across all populations, so no percentage
    /// is defined. Indicates an ingestion defect.
    #[error("sample '{sample}' has a zero total cell count")]
    ZeroTotalCount { sample: String },

    /// A count row references a cell type outside the closed population set.
    #[error("cell count for sample '{sample}' references unknown population '{label}'")]
    UnknownPopulation { sample: String, label: String },

    /// The rank-test computation itself failed, e.g. on a non-finite
    /// observation. Signals a data-model invariant violation upstream.
    #[error("rank test failed: {0}")]
    RankTest(String),

    /// The underlying store query failed. Propagated unchanged; queries are
    /// read-only and idempotent, so retrying is caller policy.
    #[error("store query failed: {0}")]
    Query(String),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
