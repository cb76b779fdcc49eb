//! Non-parametric empirical CDF utilities (component K).

/// Fraction of `sorted` values strictly below `threshold`.
///
/// Empty input has no distribution to speak of, so it reports `0.0` rather
/// than panicking — callers that need to distinguish "no data" from
/// "zero probability" should check `sorted.is_empty()` themselves.
pub fn probability_below(sorted: &[f64], threshold: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let count = sorted.partition_point(|&v| v < threshold);
    count as f64 / sorted.len() as f64
}

pub fn probability_above(sorted: &[f64], threshold: f64) -> f64 {
    1.0 - probability_below(sorted, threshold)
}

/// Fraction of values in `[low, high]`. Endpoints are swapped if passed in
/// reverse order.
pub fn probability_between(sorted: &[f64], low: f64, high: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let (low, high) = if low <= high { (low, high) } else { (high, low) };
    let lo_idx = sorted.partition_point(|&v| v < low);
    let hi_idx = sorted.partition_point(|&v| v <= high);
    (hi_idx - lo_idx) as f64 / sorted.len() as f64
}

/// `(x, F(x))` pairs of the empirical CDF evaluated at every distinct
/// value in `sorted`.
pub fn ecdf(sorted: &[f64]) -> Vec<(f64, f64)> {
    let n = sorted.len();
    let mut out = Vec::new();
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j < n && sorted[j] == sorted[i] {
            j += 1;
        }
        out.push((sorted[i], j as f64 / n as f64));
        i = j;
    }
    out
}
