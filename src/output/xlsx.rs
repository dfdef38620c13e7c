use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::compare::AxisAggregate;
use crate::measurement::MeasurementTable;
use crate::pipeline::ComparisonReport;

// Sheet names and column headers are the compatibility contract consumers
// of the workbook rely on; do not rename them.
const SHEET_TABLE_A: &str = "Rear_A";
const SHEET_TABLE_B: &str = "Rear_B";
const SHEET_MATCH: &str = "Match_PSN";
const SHEET_COMPARISON: &str = "Comparativo";
const SHEET_AGGREGATE: &str = "Correlacion";

pub fn build_workbook(report: &ComparisonReport) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    write_measurement_sheet(&mut workbook, SHEET_TABLE_A, &report.table_a)?;
    write_measurement_sheet(&mut workbook, SHEET_TABLE_B, &report.table_b)?;
    write_match_sheet(&mut workbook, &report.matched)?;
    write_comparison_sheet(&mut workbook, report)?;
    write_aggregate_sheet(&mut workbook, &report.aggregates)?;
    Ok(workbook)
}

pub fn write_workbook(report: &ComparisonReport, path: &Path) -> Result<()> {
    let mut workbook = build_workbook(report)?;
    workbook
        .save(path)
        .with_context(|| format!("failed saving workbook: {}", path.display()))?;
    Ok(())
}

pub fn workbook_to_buffer(report: &ComparisonReport) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(report)?;
    workbook
        .save_to_buffer()
        .context("failed serializing workbook to buffer")
}

fn header_format() -> Format {
    Format::new().set_bold()
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str]) -> Result<()> {
    let format = header_format();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &format)?;
    }
    Ok(())
}

fn write_measurement_sheet(
    workbook: &mut Workbook,
    name: &str,
    table: &MeasurementTable,
) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(name)?;

    let headers: Vec<&str> = table.header.iter().map(String::as_str).collect();
    write_headers(sheet, &headers)?;

    for (index, row) in table.rows.iter().enumerate() {
        let row_num = index as u32 + 1;
        sheet.write_string(row_num, 0, &row.jsn)?;
        sheet.write_string(row_num, 1, &row.psn)?;
        for (offset, label) in row.labels.iter().enumerate() {
            sheet.write_string(row_num, offset as u16 + 2, label)?;
        }
        let axis_base = 2 + row.labels.len() as u16;
        for (offset, value) in row.values.iter().enumerate() {
            // Missing cells stay blank.
            if let Some(v) = value {
                sheet.write_number(row_num, axis_base + offset as u16, *v)?;
            }
        }
    }

    sheet.autofit();
    Ok(())
}

fn write_match_sheet(workbook: &mut Workbook, identifiers: &[String]) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_MATCH)?;
    write_headers(sheet, &["PSN"])?;
    for (index, psn) in identifiers.iter().enumerate() {
        sheet.write_string(index as u32 + 1, 0, psn)?;
    }
    sheet.autofit();
    Ok(())
}

fn write_comparison_sheet(workbook: &mut Workbook, report: &ComparisonReport) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_COMPARISON)?;
    write_headers(
        sheet,
        &[
            "PSN",
            "Axis",
            report.job_a.as_str(),
            report.job_b.as_str(),
            "Correlacion",
        ],
    )?;

    for (index, row) in report.comparisons.iter().enumerate() {
        let row_num = index as u32 + 1;
        sheet.write_string(row_num, 0, &row.psn)?;
        sheet.write_string(row_num, 1, &row.axis)?;
        sheet.write_number(row_num, 2, row.value_a)?;
        sheet.write_number(row_num, 3, row.value_b)?;
        sheet.write_number(row_num, 4, row.difference)?;
    }

    sheet.autofit();
    Ok(())
}

fn write_aggregate_sheet(workbook: &mut Workbook, aggregates: &[AxisAggregate]) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_AGGREGATE)?;
    write_headers(sheet, &["Axis", "Correlacion"])?;
    for (index, aggregate) in aggregates.iter().enumerate() {
        let row_num = index as u32 + 1;
        sheet.write_string(row_num, 0, &aggregate.axis)?;
        sheet.write_number(row_num, 1, aggregate.mean_difference)?;
    }
    sheet.autofit();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{run_comparison, CompareOptions};

    fn sample_report() -> ComparisonReport {
        let a = "JSN\tPSN\tc3\tc4\tc5\tX\tY\n1\t100\t\t\t\t10.0\t20.0\n";
        let b = "JSN\tPSN\tc3\tc4\tc5\tX\tY\n2\t100\t\t\t\t10.5\t19.0\n";
        run_comparison(a.as_bytes(), b.as_bytes(), &CompareOptions::default()).unwrap()
    }

    #[test]
    fn workbook_buffer_is_a_zip_container() {
        let buffer = workbook_to_buffer(&sample_report()).unwrap();
        assert!(buffer.len() > 4);
        assert_eq!(&buffer[..2], b"PK");
    }

    #[test]
    fn workbook_saves_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        write_workbook(&sample_report(), &path).unwrap();
        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }
}
