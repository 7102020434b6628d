// End-to-end run of the analysis operations over one in-memory store:
// frequencies, cohort filtering, response comparison, and baseline summaries.

use approx::assert_relative_eq;
use cohort_statistics::analysis::baseline::{GroupKey, GroupedCount, conditional_average, grouped_counts};
use cohort_statistics::analysis::cohort::{CohortFilter, baseline_cohort, filtered_cohort};
use cohort_statistics::analysis::frequency::relative_frequencies;
use cohort_statistics::error::AnalysisError;
use cohort_statistics::store::{CellCount, CohortStore, Population, Sample};
use cohort_statistics::testing::population_statistics;

fn sample(
    id: &str,
    project: &str,
    subject: &str,
    response: Option<&str>,
    sex: &str,
    timepoint: f64,
) -> Sample {
    Sample {
        sample: id.to_string(),
        project: project.to_string(),
        subject: subject.to_string(),
        condition: "melanoma".to_string(),
        age: 55.0,
        sex: sex.to_string(),
        treatment: "miraclib".to_string(),
        response: response.map(str::to_string),
        sample_type: "PBMC".to_string(),
        time_from_treatment_start: timepoint,
    }
}

fn counts(id: &str, b_cell: f64) -> Vec<CellCount> {
    // Totals are fixed at 1000 so percentages read directly off the counts.
    let cd8 = 100.0;
    let cd4 = 200.0;
    let monocyte = 150.0;
    let nk = 1000.0 - b_cell - cd8 - cd4 - monocyte;
    [
        (Population::BCell, b_cell),
        (Population::Cd4TCell, cd4),
        (Population::Cd8TCell, cd8),
        (Population::Monocyte, monocyte),
        (Population::NkCell, nk),
    ]
    .into_iter()
    .map(|(population, count)| CellCount {
        sample_id: id.to_string(),
        cell_type: population.as_str().to_string(),
        count,
    })
    .collect()
}

/// Four responders with low b_cell share, four non-responders with high
/// b_cell share, plus one healthy control outside the trial cohort.
fn trial_store() -> CohortStore {
    let samples = vec![
        sample("s1", "prj1", "sbj1", Some("yes"), "M", 0.0),
        sample("s2", "prj1", "sbj2", Some("yes"), "F", 0.0),
        sample("s3", "prj2", "sbj3", Some("yes"), "M", 7.0),
        sample("s4", "prj2", "sbj4", Some("yes"), "F", 7.0),
        sample("s5", "prj1", "sbj5", Some("no"), "M", 0.0),
        sample("s6", "prj2", "sbj6", Some("no"), "F", 0.0),
        sample("s7", "prj1", "sbj7", Some("no"), "M", 7.0),
        sample("s8", "prj2", "sbj8", Some("no"), "F", 7.0),
        {
            let mut healthy = sample("s9", "prj3", "sbj9", None, "M", 0.0);
            healthy.condition = "healthy".to_string();
            healthy.treatment = "none".to_string();
            healthy
        },
    ];
    let cell_counts = [
        counts("s1", 50.0),
        counts("s2", 55.0),
        counts("s3", 60.0),
        counts("s4", 65.0),
        counts("s5", 400.0),
        counts("s6", 410.0),
        counts("s7", 420.0),
        counts("s8", 430.0),
        counts("s9", 100.0),
    ]
    .concat();
    CohortStore::new(samples, cell_counts)
}

#[test]
fn frequencies_cover_every_sample_and_sum_to_one_hundred() {
    let store = trial_store();
    let records = relative_frequencies(&store).unwrap();
    assert_eq!(records.len(), 9 * 5);

    for chunk in records.chunks(5) {
        let sum: f64 = chunk.iter().map(|r| r.percentage).sum();
        assert_relative_eq!(sum, 100.0, epsilon = 1e-3);
    }
    assert_eq!(records[0].sample, "s1");
    assert_eq!(records[0].population, Population::BCell);
    assert_relative_eq!(records[0].percentage, 5.0);
}

#[test]
fn melanoma_miraclib_pbmc_b_cell_share_differs_by_response() {
    let store = trial_store();
    let cohort =
        filtered_cohort(&store, &CohortFilter::new("melanoma", "miraclib", "PBMC")).unwrap();
    assert_eq!(cohort.len(), 8 * 5);

    let comparisons = population_statistics(&cohort).unwrap();
    assert_eq!(comparisons.len(), 5);
    assert_eq!(comparisons[0].population, Population::BCell);

    let b_cell = &comparisons[0];
    assert!(b_cell.p_value.unwrap() < 0.05);
    assert!(b_cell.significant);

    // cd8_t_cell sits at 10% in every sample; no difference to detect.
    let cd8 = comparisons
        .iter()
        .find(|c| c.population == Population::Cd8TCell)
        .unwrap();
    assert_relative_eq!(cd8.p_value.unwrap(), 1.0);
    assert!(!cd8.significant);
}

#[test]
fn filter_casing_does_not_change_the_cohort() {
    let store = trial_store();
    let lower =
        filtered_cohort(&store, &CohortFilter::new("melanoma", "miraclib", "pbmc")).unwrap();
    let upper =
        filtered_cohort(&store, &CohortFilter::new("MELANOMA", "Miraclib", "PBMC")).unwrap();
    assert_eq!(lower.len(), upper.len());
    for (a, b) in lower.iter().zip(&upper) {
        assert_eq!(a.sample, b.sample);
        assert_eq!(a.population, b.population);
    }
}

#[test]
fn baseline_subset_counts() {
    let store = trial_store();
    let filter = CohortFilter::new("melanoma", "miraclib", "PBMC");
    let baseline = baseline_cohort(&store, &filter).unwrap();

    let ids: Vec<&str> = baseline.iter().map(|s| s.sample.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s2", "s5", "s6"]);

    let by_project = grouped_counts(&baseline, GroupKey::Project);
    assert_eq!(
        by_project,
        vec![
            GroupedCount { key: Some("prj1".to_string()), count: 2 },
            GroupedCount { key: Some("prj2".to_string()), count: 2 },
        ]
    );

    let by_response = grouped_counts(&baseline, GroupKey::Response);
    assert_eq!(
        by_response,
        vec![
            GroupedCount { key: Some("no".to_string()), count: 2 },
            GroupedCount { key: Some("yes".to_string()), count: 2 },
        ]
    );

    let by_sex = grouped_counts(&baseline, GroupKey::Sex);
    assert_eq!(
        by_sex,
        vec![
            GroupedCount { key: Some("F".to_string()), count: 2 },
            GroupedCount { key: Some("M".to_string()), count: 2 },
        ]
    );
}

#[test]
fn average_b_cell_share_of_male_responders_at_baseline() {
    let store = trial_store();
    let filter = CohortFilter::new("melanoma", "miraclib", "PBMC").at_timepoint(0.0);
    let baseline_records = filtered_cohort(&store, &filter).unwrap();

    // Only s1 is a male responder at baseline; its b_cell share is 5%.
    let avg = conditional_average(&baseline_records, Population::BCell, "M", "yes");
    assert_relative_eq!(avg.unwrap(), 5.0);

    // No male responders in a healthy cohort: "no data", not zero.
    let empty = filtered_cohort(&store, &CohortFilter::new("healthy", "miraclib", "PBMC")).unwrap();
    assert_eq!(
        conditional_average(&empty, Population::BCell, "M", "yes"),
        None
    );
}

#[test]
fn ingestion_defects_surface_as_integrity_errors() {
    let mut samples = vec![sample("s1", "prj1", "sbj1", Some("yes"), "M", 0.0)];
    let zero_counts: Vec<CellCount> = Population::ALL
        .iter()
        .map(|population| CellCount {
            sample_id: "s1".to_string(),
            cell_type: population.as_str().to_string(),
            count: 0.0,
        })
        .collect();
    let store = CohortStore::new(samples.clone(), zero_counts);
    assert!(matches!(
        relative_frequencies(&store),
        Err(AnalysisError::ZeroTotalCount { .. })
    ));

    samples.push(sample("s2", "prj1", "sbj2", Some("no"), "F", 0.0));
    let mut rows = counts("s1", 50.0);
    rows.extend(counts("s2", 60.0));
    rows.push(CellCount {
        sample_id: "s2".to_string(),
        cell_type: "granulocyte".to_string(),
        count: 12.0,
    });
    let store = CohortStore::new(samples, rows);
    assert!(matches!(
        relative_frequencies(&store),
        Err(AnalysisError::UnknownPopulation { .. })
    ));
}
