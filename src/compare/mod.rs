pub mod aggregate;
pub mod differ;
pub mod matcher;

use serde::Serialize;

pub use aggregate::aggregate_differences;
pub use differ::build_comparison;
pub use matcher::{match_axes, match_identifiers};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub psn: String,
    pub axis: String,
    pub value_a: f64,
    pub value_b: f64,
    /// Plain signed subtraction (A minus B), not a correlation coefficient.
    pub difference: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisAggregate {
    pub axis: String,
    pub mean_difference: f64,
    pub samples: usize,
}

pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
