use std::cmp::Ordering;

/// Safe comparison of floating point numbers, handling NaN values
pub fn safe_float_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Ascending copy of the values, leaving the input in insertion order
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| safe_float_cmp(*a, *b));
    sorted
}

/// Smallest value, or `None` for an empty slice
pub fn min_value(values: &[f64]) -> Option<f64> {
    values.iter().copied().min_by(|a, b| safe_float_cmp(*a, *b))
}

/// Largest value, or `None` for an empty slice
pub fn max_value(values: &[f64]) -> Option<f64> {
    values.iter().copied().max_by(|a, b| safe_float_cmp(*a, *b))
}
