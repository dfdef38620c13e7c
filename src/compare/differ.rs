use crate::compare::{round_to, ComparisonRow};
use crate::measurement::MeasurementTable;

/// Emits one row per (axis, identifier) pair measured in both tables.
///
/// Iteration is axis-major over the given (sorted) slices; that ordering is
/// part of the output contract. Pairs with no row or a missing cell on
/// either side are omitted, never errors.
pub fn build_comparison(
    a: &MeasurementTable,
    b: &MeasurementTable,
    axes: &[String],
    identifiers: &[String],
    decimals: u32,
) -> Vec<ComparisonRow> {
    let mut rows = Vec::new();
    for axis in axes {
        for psn in identifiers {
            let (Some(value_a), Some(value_b)) = (a.value(psn, axis), b.value(psn, axis)) else {
                continue;
            };
            rows.push(ComparisonRow {
                psn: psn.clone(),
                axis: axis.clone(),
                value_a: round_to(value_a, decimals),
                value_b: round_to(value_b, decimals),
                // Subtract before rounding so the difference is not built
                // from already-rounded operands.
                difference: round_to(value_a - value_b, decimals),
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{match_axes, match_identifiers};
    use crate::measurement::parse_export_a;

    fn table(text: &str) -> MeasurementTable {
        parse_export_a(text.as_bytes())
    }

    fn compare(a: &MeasurementTable, b: &MeasurementTable) -> Vec<ComparisonRow> {
        build_comparison(a, b, &match_axes(a, b), &match_identifiers(a, b), 3)
    }

    #[test]
    fn missing_cell_on_either_side_skips_the_pair() {
        let a = table(
            "JSN\tPSN\tDate\tTime\tShift\tX\tY\n\
             1\t100\t\t\t\t10.0\t20.0\n",
        );
        let b = table(
            "JSN\tPSN\tDate\tTime\tShift\tX\tY\n\
             2\t100\t\t\t\t\t19.0\n",
        );
        let rows = compare(&a, &b);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].axis, "Y");
        assert_eq!(rows[0].difference, 1.0);
    }

    #[test]
    fn output_is_axis_major_then_identifier_minor() {
        // Input rows deliberately out of order on both sides.
        let a = table(
            "JSN\tPSN\tDate\tTime\tShift\tY\tX\n\
             1\t200\t\t\t\t1\t2\n\
             1\t100\t\t\t\t3\t4\n",
        );
        let b = table(
            "JSN\tPSN\tDate\tTime\tShift\tX\tY\n\
             2\t100\t\t\t\t1\t1\n\
             2\t200\t\t\t\t1\t1\n",
        );
        let keys: Vec<(String, String)> = compare(&a, &b)
            .into_iter()
            .map(|row| (row.axis, row.psn))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("X".to_string(), "100".to_string()),
                ("X".to_string(), "200".to_string()),
                ("Y".to_string(), "100".to_string()),
                ("Y".to_string(), "200".to_string()),
            ]
        );
    }

    #[test]
    fn duplicate_psn_uses_the_first_row_on_each_side() {
        let a = table(
            "JSN\tPSN\tDate\tTime\tShift\tX\n\
             1\t100\t\t\t\t10.0\n\
             1\t100\t\t\t\t99.0\n",
        );
        let b = table(
            "JSN\tPSN\tDate\tTime\tShift\tX\n\
             2\t100\t\t\t\t4.0\n",
        );
        let rows = compare(&a, &b);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value_a, 10.0);
        assert_eq!(rows[0].difference, 6.0);
    }

    #[test]
    fn values_and_difference_are_rounded_to_three_digits() {
        let a = table("JSN\tPSN\tDate\tTime\tShift\tX\n1\t100\t\t\t\t0.12345\n");
        let b = table("JSN\tPSN\tDate\tTime\tShift\tX\n2\t100\t\t\t\t0.1\n");
        let rows = compare(&a, &b);
        assert_eq!(rows[0].value_a, 0.123);
        assert_eq!(rows[0].value_b, 0.1);
        assert_eq!(rows[0].difference, 0.023);
    }
}
