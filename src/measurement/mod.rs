pub mod parser;

use std::collections::BTreeSet;

use serde::Serialize;

pub use parser::parse_export_a;

/// Columns before the first axis: JSN, PSN and three instrument bookkeeping
/// fields whose names vary between stations.
pub const RESERVED_COLUMNS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementTable {
    pub header: Vec<String>,
    pub axes: Vec<String>,
    pub rows: Vec<MeasurementRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementRow {
    pub jsn: String,
    pub psn: String,
    pub labels: Vec<String>,
    /// Aligned index-for-index with the table's axis list; `None` is a cell
    /// that failed numeric coercion.
    pub values: Vec<Option<f64>>,
}

impl MeasurementTable {
    pub fn empty() -> Self {
        Self {
            header: Vec::new(),
            axes: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// JSN of the first data row, used only as a display label.
    pub fn job_id(&self) -> Option<&str> {
        self.rows.first().map(|row| row.jsn.as_str())
    }

    pub fn axis_index(&self, axis: &str) -> Option<usize> {
        self.axes.iter().position(|a| a == axis)
    }

    /// First row whose trimmed PSN matches. Duplicate PSNs keep the first
    /// occurrence.
    pub fn row_for(&self, psn: &str) -> Option<&MeasurementRow> {
        self.rows.iter().find(|row| row.psn.trim() == psn)
    }

    pub fn value(&self, psn: &str, axis: &str) -> Option<f64> {
        let index = self.axis_index(axis)?;
        self.row_for(psn)?.values.get(index).copied().flatten()
    }

    pub fn identifiers(&self) -> BTreeSet<String> {
        self.rows
            .iter()
            .map(|row| row.psn.trim().to_string())
            .collect()
    }

    pub fn retain_identifiers(&self, keep: &BTreeSet<String>) -> MeasurementTable {
        MeasurementTable {
            header: self.header.clone(),
            axes: self.axes.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| keep.contains(row.psn.trim()))
                .cloned()
                .collect(),
        }
    }
}
