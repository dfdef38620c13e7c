use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use crate::compare::AxisAggregate;
use crate::measurement::MeasurementTable;
use crate::pipeline::ComparisonReport;

pub fn render_match_table(identifiers: &[String]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["PSN"]);
    for psn in identifiers {
        table.add_row(vec![psn.clone()]);
    }
    table.to_string()
}

pub fn render_comparison_table(report: &ComparisonReport) -> String {
    let decimals = report.decimals as usize;
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "PSN",
        "Axis",
        report.job_a.as_str(),
        report.job_b.as_str(),
        "Difference",
    ]);

    for row in &report.comparisons {
        table.add_row(vec![
            row.psn.clone(),
            row.axis.clone(),
            format!("{:.*}", decimals, row.value_a),
            format!("{:.*}", decimals, row.value_b),
            format!("{:+.*}", decimals, row.difference),
        ]);
    }
    table.to_string()
}

pub fn render_aggregate_table(aggregates: &[AxisAggregate], decimals: u32) -> String {
    let decimals = decimals as usize;
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Axis", "Mean Difference", "Samples"]);
    for aggregate in aggregates {
        table.add_row(vec![
            aggregate.axis.clone(),
            format!("{:+.*}", decimals, aggregate.mean_difference),
            aggregate.samples.to_string(),
        ]);
    }
    table.to_string()
}

/// Preview of a parsed table; `limit` of zero shows every row.
pub fn render_measurement_table(measurement: &MeasurementTable, limit: usize) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(measurement.header.clone());

    let shown = if limit == 0 {
        measurement.rows.len()
    } else {
        limit.min(measurement.rows.len())
    };
    for row in &measurement.rows[..shown] {
        let mut cells = vec![row.jsn.clone(), row.psn.clone()];
        cells.extend(row.labels.iter().cloned());
        cells.extend(row.values.iter().map(|value| match value {
            Some(v) => v.to_string(),
            None => "-".to_string(),
        }));
        table.add_row(cells);
    }

    let mut out = table.to_string();
    if shown < measurement.rows.len() {
        out.push_str(&format!(
            "\n({} of {} rows shown)",
            shown,
            measurement.rows.len()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::parse_export_a;
    use crate::pipeline::{run_comparison, CompareOptions};

    #[test]
    fn comparison_table_labels_value_columns_by_job() {
        let a = "JSN\tPSN\tc3\tc4\tc5\tX\n4711\t100\t\t\t\t1.0\n";
        let b = "JSN\tPSN\tc3\tc4\tc5\tX\n4712\t100\t\t\t\t2.0\n";
        let report =
            run_comparison(a.as_bytes(), b.as_bytes(), &CompareOptions::default()).unwrap();
        let rendered = render_comparison_table(&report);
        assert!(rendered.contains("4711"));
        assert!(rendered.contains("4712"));
        assert!(rendered.contains("-1.000"));
    }

    #[test]
    fn measurement_preview_reports_hidden_rows() {
        let input = "JSN\tPSN\tc3\tc4\tc5\tX\n\
                     1\t100\t\t\t\t1\n\
                     1\t101\t\t\t\t2\n\
                     1\t102\t\t\t\t3\n";
        let table = parse_export_a(input.as_bytes());
        let rendered = render_measurement_table(&table, 2);
        assert!(rendered.contains("(2 of 3 rows shown)"));
        assert!(!rendered.contains("102"));
    }
}
