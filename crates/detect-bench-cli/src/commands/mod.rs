pub mod catalog;
pub mod report;
pub mod score;

/// Format a metric, spelling out values left undefined by a zero denominator.
pub fn fmt_metric(value: f64, precision: usize) -> String {
    if value.is_nan() {
        "undefined".to_string()
    } else {
        format!("{value:.precision$}")
    }
}
