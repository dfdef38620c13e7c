use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::compare::{
    aggregate_differences, build_comparison, match_axes, match_identifiers, AxisAggregate,
    ComparisonRow,
};
use crate::measurement::{parse_export_a, MeasurementTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSlot {
    A,
    B,
}

impl Display for InputSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("export {0} contains no measurement rows")]
    EmptyTable(InputSlot),
    #[error("the two exports share no PSN identifiers")]
    NoCommonIdentifiers,
    #[error("the two exports share no axis columns")]
    NoCommonAxes,
}

#[derive(Debug, Clone)]
pub struct CompareOptions {
    pub decimals: u32,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self { decimals: 3 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub job_a: String,
    pub job_b: String,
    /// Both tables filtered to the matched identifiers; these are what the
    /// Rear_A / Rear_B workbook sheets show.
    pub table_a: MeasurementTable,
    pub table_b: MeasurementTable,
    pub matched: Vec<String>,
    pub axes: Vec<String>,
    pub comparisons: Vec<ComparisonRow>,
    pub aggregates: Vec<AxisAggregate>,
    pub decimals: u32,
    pub generated_at: DateTime<Utc>,
}

/// The whole parse → match → compare → aggregate pipeline as one pure
/// function. Reads nothing but the two buffers, writes nothing.
pub fn run_comparison(
    bytes_a: &[u8],
    bytes_b: &[u8],
    options: &CompareOptions,
) -> Result<ComparisonReport, PipelineError> {
    let table_a = parse_export_a(bytes_a);
    let table_b = parse_export_a(bytes_b);
    if table_a.is_empty() {
        return Err(PipelineError::EmptyTable(InputSlot::A));
    }
    if table_b.is_empty() {
        return Err(PipelineError::EmptyTable(InputSlot::B));
    }

    // Job labels come from the unfiltered tables; filtering may drop row 0.
    let job_a = table_a.job_id().unwrap_or_default().to_string();
    let job_b = table_b.job_id().unwrap_or_default().to_string();

    let matched = match_identifiers(&table_a, &table_b);
    if matched.is_empty() {
        return Err(PipelineError::NoCommonIdentifiers);
    }
    let axes = match_axes(&table_a, &table_b);
    if axes.is_empty() {
        return Err(PipelineError::NoCommonAxes);
    }

    let keep: BTreeSet<String> = matched.iter().cloned().collect();
    let table_a = table_a.retain_identifiers(&keep);
    let table_b = table_b.retain_identifiers(&keep);

    let comparisons = build_comparison(&table_a, &table_b, &axes, &matched, options.decimals);
    let aggregates = aggregate_differences(&comparisons, options.decimals);

    info!(
        matched = matched.len(),
        axes = axes.len(),
        comparisons = comparisons.len(),
        "comparison pipeline complete"
    );

    Ok(ComparisonReport {
        job_a,
        job_b,
        table_a,
        table_b,
        matched,
        axes,
        comparisons,
        aggregates,
        decimals: options.decimals,
        generated_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE_A: &str = "JSN\tPSN\tc3\tc4\tc5\tX\tY\n1\t100\t\t\t\t10.000\t20.000\n";
    const FILE_B: &str = "JSN\tPSN\tc3\tc4\tc5\tX\tY\n1\t100\t\t\t\t10.500\t19.000\n";

    fn run(a: &str, b: &str) -> Result<ComparisonReport, PipelineError> {
        run_comparison(a.as_bytes(), b.as_bytes(), &CompareOptions::default())
    }

    #[test]
    fn two_file_example_scenario() {
        let report = run(FILE_A, FILE_B).unwrap();
        assert_eq!(report.matched, vec!["100"]);
        assert_eq!(report.axes, vec!["X", "Y"]);

        let rows: Vec<(String, String, f64, f64, f64)> = report
            .comparisons
            .iter()
            .map(|r| {
                (
                    r.psn.clone(),
                    r.axis.clone(),
                    r.value_a,
                    r.value_b,
                    r.difference,
                )
            })
            .collect();
        assert_eq!(
            rows,
            vec![
                ("100".to_string(), "X".to_string(), 10.0, 10.5, -0.5),
                ("100".to_string(), "Y".to_string(), 20.0, 19.0, 1.0),
            ]
        );

        let aggregates: Vec<(String, f64)> = report
            .aggregates
            .iter()
            .map(|a| (a.axis.clone(), a.mean_difference))
            .collect();
        assert_eq!(
            aggregates,
            vec![("X".to_string(), -0.5), ("Y".to_string(), 1.0)]
        );
    }

    #[test]
    fn empty_table_a_is_reported_before_b() {
        assert_eq!(
            run("not a measurement file", "also not one"),
            Err(PipelineError::EmptyTable(InputSlot::A))
        );
        assert_eq!(
            run(FILE_A, "not a measurement file"),
            Err(PipelineError::EmptyTable(InputSlot::B))
        );
    }

    #[test]
    fn disjoint_identifiers_abort_before_axis_check() {
        let b = "JSN\tPSN\tc3\tc4\tc5\tP\tQ\n9\t999\t\t\t\t1\t2\n";
        assert_eq!(run(FILE_A, b), Err(PipelineError::NoCommonIdentifiers));
    }

    #[test]
    fn disjoint_axes_abort_after_identifier_check() {
        let b = "JSN\tPSN\tc3\tc4\tc5\tP\tQ\n9\t100\t\t\t\t1\t2\n";
        assert_eq!(run(FILE_A, b), Err(PipelineError::NoCommonAxes));
    }

    #[test]
    fn job_labels_come_from_the_first_data_row() {
        let report = run(FILE_A, FILE_B).unwrap();
        assert_eq!(report.job_a, "1");
        assert_eq!(report.job_b, "1");
    }

    #[test]
    fn report_tables_are_filtered_to_matched_identifiers() {
        let a = "JSN\tPSN\tc3\tc4\tc5\tX\n1\t100\t\t\t\t1.0\n1\t101\t\t\t\t2.0\n";
        let b = "JSN\tPSN\tc3\tc4\tc5\tX\n2\t101\t\t\t\t3.0\n2\t102\t\t\t\t4.0\n";
        let report = run(a, b).unwrap();
        assert_eq!(report.table_a.rows.len(), 1);
        assert_eq!(report.table_b.rows.len(), 1);
        assert_eq!(report.table_a.rows[0].psn, "101");
    }
}
