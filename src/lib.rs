//! # cohort-statistics
//!
//! Statistical analysis of immune cell population composition across clinical
//! trial cohorts.
//!
//! This crate turns raw (sample, cell type, count) records into normalized
//! per-sample percentages, filters cohorts by clinical attributes, and runs a
//! nonparametric rank test per population between treatment-response groups.
//! Ingestion, persistence, and visualization live outside the crate: an
//! external ETL process fills a [`store::CohortStore`] (or any other
//! [`store::SampleStore`] implementation) and a presentation layer consumes
//! the result rows.
//!
//! ## Core Features
//!
//! - **Relative Frequencies**: per-sample population percentages with stable,
//!   reproducible ordering
//! - **Cohort Filtering**: case-insensitive clinical predicates with optional
//!   timepoint restriction
//! - **Response Comparison**: two-sided Mann–Whitney U test per population
//!   with explicit handling of empty groups
//! - **Baseline Summaries**: grouped cardinalities and conditional subgroup
//!   averages at treatment start
//!
//! Every operation is a read-only transform over a store snapshot, so callers
//! may invoke them repeatedly and concurrently without coordination.
//!
//! ## Module Organization
//!
//! - **[`store`]**: Data model (samples, cell counts, the closed population
//!   set) and the store seam
//! - **[`analysis`]**: Frequency aggregation, cohort filtering, and baseline
//!   summaries
//! - **[`testing`]**: Rank-based hypothesis testing per population
//! - **[`error`]**: Error taxonomy shared across the crate

pub mod analysis;
pub mod error;
pub mod store;
pub mod testing;
