use anyhow::Result;

use crate::compare::{AxisAggregate, ComparisonRow};
use crate::measurement::MeasurementTable;

pub fn comparison_to_csv(rows: &[ComparisonRow], decimals: u32) -> Result<String> {
    let decimals = decimals as usize;
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["psn", "axis", "value_a", "value_b", "difference"])?;
    for row in rows {
        writer.write_record([
            row.psn.clone(),
            row.axis.clone(),
            format!("{:.*}", decimals, row.value_a),
            format!("{:.*}", decimals, row.value_b),
            format!("{:.*}", decimals, row.difference),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn aggregates_to_csv(aggregates: &[AxisAggregate], decimals: u32) -> Result<String> {
    let decimals = decimals as usize;
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["axis", "mean_difference", "samples"])?;
    for aggregate in aggregates {
        writer.write_record([
            aggregate.axis.clone(),
            format!("{:.*}", decimals, aggregate.mean_difference),
            aggregate.samples.to_string(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

/// Re-serializes a parsed table to the tab-delimited header+rows shape the
/// parser reads. Missing cells come out as empty fields.
pub fn measurement_to_tsv(table: &MeasurementTable) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(vec![]);
    writer.write_record(&table.header)?;
    for row in &table.rows {
        let mut record = vec![row.jsn.clone(), row.psn.clone()];
        record.extend(row.labels.iter().cloned());
        record.extend(row.values.iter().map(|value| match value {
            Some(v) => v.to_string(),
            None => String::new(),
        }));
        writer.write_record(&record)?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}
