//! Auto-binned frequency histograms (ambient split of the results container).

use serde::{Deserialize, Serialize};

use crate::error::SimError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    pub frequency: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

/// Sturges' rule bin count, used whenever Freedman–Diaconis degenerates
/// (zero IQR).
fn sturges_bins(n: usize) -> usize {
    ((n as f64).log2().ceil() as usize + 1).max(1)
}

/// `max(Sturges, Freedman-Diaconis)` per spec, falling back to Sturges
/// alone when the IQR is zero (e.g. a spike distribution) and FD is
/// undefined.
fn bin_count(values: &[f64], iqr: f64, min: f64, max: f64) -> usize {
    let n = values.len();
    let sturges = sturges_bins(n);
    if iqr <= 0.0 {
        return sturges;
    }
    let width = 2.0 * iqr / (n as f64).cbrt();
    if width <= 0.0 {
        return sturges;
    }
    let range = max - min;
    let fd = (range / width).ceil() as usize;
    sturges.max(fd).clamp(1, 1000)
}

impl Histogram {
    /// Build an auto-binned histogram from raw values plus their
    /// pre-computed IQR (so callers with a [`crate::stats::Percentiles`]
    /// on hand don't recompute quartiles).
    pub fn build(values: &[f64], iqr: f64) -> Result<Self, SimError> {
        if values.is_empty() {
            return Err(SimError::InsufficientData(
                "at least one value is required".into(),
            ));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SimError::NonFinite);
        }

        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        if min == max {
            return Ok(Histogram {
                bins: vec![HistogramBin {
                    lower: min,
                    upper: max,
                    count: values.len(),
                    frequency: 1.0,
                }],
            });
        }

        let n_bins = bin_count(values, iqr, min, max);
        let width = (max - min) / n_bins as f64;
        let mut counts = vec![0usize; n_bins];
        for &v in values {
            let idx = (((v - min) / width) as usize).min(n_bins - 1);
            counts[idx] += 1;
        }

        let total = values.len() as f64;
        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: min + i as f64 * width,
                upper: min + (i + 1) as f64 * width,
                count,
                frequency: count as f64 / total,
            })
            .collect();

        Ok(Histogram { bins })
    }
}
