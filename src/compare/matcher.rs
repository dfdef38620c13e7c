use std::collections::BTreeSet;

use crate::measurement::MeasurementTable;

/// Sorted intersection of the trimmed PSN identifiers in both tables.
/// Identifiers are compared as strings; "007" and "7" do not match.
pub fn match_identifiers(a: &MeasurementTable, b: &MeasurementTable) -> Vec<String> {
    let ids_a = a.identifiers();
    let ids_b = b.identifiers();
    ids_a.intersection(&ids_b).cloned().collect()
}

/// Sorted intersection of the two tables' axis-name lists.
pub fn match_axes(a: &MeasurementTable, b: &MeasurementTable) -> Vec<String> {
    let axes_a: BTreeSet<&str> = a.axes.iter().map(String::as_str).collect();
    let axes_b: BTreeSet<&str> = b.axes.iter().map(String::as_str).collect();
    axes_a
        .intersection(&axes_b)
        .map(|axis| axis.to_string())
        .collect()
}
