//! Statistics over signal buffers.

/// Arithmetic mean, `0.0` for an empty slice.
pub fn mean(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    x.iter().sum::<f64>() / x.len() as f64
}

/// Sample standard deviation (`n - 1` denominator).
///
/// Fewer than two samples have no spread and yield `0.0`.
pub fn std_dev(x: &[f64]) -> f64 {
    if x.len() < 2 {
        return 0.0;
    }
    let m = mean(x);
    let ss: f64 = x.iter().map(|v| (v - m) * (v - m)).sum();
    libm::sqrt(ss / (x.len() - 1) as f64)
}
