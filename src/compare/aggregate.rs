use std::collections::BTreeMap;

use crate::compare::{round_to, AxisAggregate, ComparisonRow};

/// Mean difference per axis, ascending by axis name. Axes with no
/// contributing rows produce no output row.
pub fn aggregate_differences(rows: &[ComparisonRow], decimals: u32) -> Vec<AxisAggregate> {
    let mut grouped: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for row in rows {
        let entry = grouped.entry(row.axis.as_str()).or_insert((0.0, 0));
        entry.0 += row.difference;
        entry.1 += 1;
    }

    grouped
        .into_iter()
        .map(|(axis, (sum, samples))| AxisAggregate {
            axis: axis.to_string(),
            mean_difference: round_to(sum / samples as f64, decimals),
            samples,
        })
        .collect()
}
