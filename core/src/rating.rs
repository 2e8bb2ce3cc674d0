//! Read-time rating aggregation.

/// Arithmetic mean of `values`, rounded to one decimal place (half away from zero).
///
/// Returns `None` for an empty slice; a recipe nobody rated has no average.
pub fn average_rating(values: &[i32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let sum: i64 = values.iter().map(|&v| i64::from(v)).sum();
    let mean = sum as f64 / values.len() as f64;

    Some((mean * 10.0).round() / 10.0)
}
