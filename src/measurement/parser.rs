use encoding_rs::mem::decode_latin1;
use tracing::debug;

use crate::measurement::{MeasurementRow, MeasurementTable, RESERVED_COLUMNS};

/// Specification-limit annotation rows interleaved with the data block.
const LIMIT_ROW_TOKENS: [&str; 7] = ["USL", "LSL", "UTL", "LTL", "URL", "LRL", "NOMINAL"];

/// Reads one Export Format A file into a `MeasurementTable`.
///
/// Never fails: lines that do not fit the format are dropped and malformed
/// input degrades to an empty or partial table. Deciding whether an empty
/// table is fatal is the caller's job.
pub fn parse_export_a(raw: &[u8]) -> MeasurementTable {
    let text = decode_latin1(raw);

    let mut header: Option<Vec<String>> = None;
    let mut rows: Vec<MeasurementRow> = Vec::new();
    let mut dropped = 0usize;

    for line in text.lines() {
        let fields: Vec<&str> = line.split('\t').collect();

        if header.is_none() {
            // First header-shaped line wins; everything before it is noise.
            if is_header_line(&fields) {
                header = Some(fields.iter().map(|f| f.to_string()).collect());
            }
            continue;
        }

        let first = fields.first().copied().unwrap_or("");
        if LIMIT_ROW_TOKENS.contains(&first) {
            continue;
        }
        if !is_specimen_id(first) {
            // Covers malformed lines and any later header-shaped line.
            dropped += 1;
            continue;
        }
        if let Some(columns) = &header {
            rows.push(build_row(columns, &fields));
        }
    }

    let Some(header) = header else {
        debug!("no Export Format A header found, returning empty table");
        return MeasurementTable::empty();
    };

    let axes: Vec<String> = header[RESERVED_COLUMNS..].to_vec();
    debug!(
        rows = rows.len(),
        axes = axes.len(),
        dropped, "parsed Export Format A block"
    );

    MeasurementTable { header, axes, rows }
}

fn is_header_line(fields: &[&str]) -> bool {
    fields.len() > RESERVED_COLUMNS && fields[0] == "JSN" && fields[1] == "PSN"
}

fn is_specimen_id(field: &str) -> bool {
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit())
}

fn build_row(header: &[String], fields: &[&str]) -> MeasurementRow {
    // Pad short rows with empty cells and strip thousands-separator commas.
    let cell = |index: usize| -> String {
        fields
            .get(index)
            .copied()
            .unwrap_or("")
            .replace(',', "")
    };

    MeasurementRow {
        jsn: cell(0),
        psn: cell(1),
        labels: (2..RESERVED_COLUMNS).map(|index| cell(index)).collect(),
        values: (RESERVED_COLUMNS..header.len())
            .map(|index| coerce_numeric(&cell(index)))
            .collect(),
    }
}

fn coerce_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}
