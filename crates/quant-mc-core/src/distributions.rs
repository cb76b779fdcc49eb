//! Distribution sampling primitives (component A).
//!
//! Every variant exposes a single capability: draw one scalar from its
//! parameterized distribution. Parameters are validated once at
//! construction so a [`Distribution`] stored on a [`crate::input::SimulationInput`]
//! can never fail mid-run — only the model's output is checked by the
//! driver (see `crate::simulation`).

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::SimError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Distribution {
    Normal { mean: f64, std_dev: f64 },
    Uniform { min: f64, max: f64 },
    Triangular { low: f64, mode: f64, high: f64 },
    Beta { alpha: f64, beta: f64 },
    Weibull { shape: f64, scale: f64 },
    Rayleigh { mean: f64 },
    LogNormal { mu: f64, sigma: f64 },
}

impl Distribution {
    pub fn normal(mean: f64, std_dev: f64) -> Result<Self, SimError> {
        if !(std_dev > 0.0) {
            return Err(invalid("Normal", "std_dev must be > 0"));
        }
        Ok(Distribution::Normal { mean, std_dev })
    }

    pub fn uniform(min: f64, max: f64) -> Result<Self, SimError> {
        if min > max {
            return Err(invalid("Uniform", "min must be <= max"));
        }
        Ok(Distribution::Uniform { min, max })
    }

    pub fn triangular(low: f64, mode: f64, high: f64) -> Result<Self, SimError> {
        if !(low <= mode && mode <= high) {
            return Err(invalid("Triangular", "must satisfy low <= mode <= high"));
        }
        Ok(Distribution::Triangular { low, mode, high })
    }

    pub fn beta(alpha: f64, beta: f64) -> Result<Self, SimError> {
        if !(alpha > 0.0 && beta > 0.0) {
            return Err(invalid("Beta", "alpha and beta must both be > 0"));
        }
        Ok(Distribution::Beta { alpha, beta })
    }

    pub fn weibull(shape: f64, scale: f64) -> Result<Self, SimError> {
        if !(shape > 0.0 && scale > 0.0) {
            return Err(invalid("Weibull", "shape and scale must both be > 0"));
        }
        Ok(Distribution::Weibull { shape, scale })
    }

    pub fn rayleigh(mean: f64) -> Result<Self, SimError> {
        if !(mean > 0.0) {
            return Err(invalid("Rayleigh", "mean must be > 0"));
        }
        Ok(Distribution::Rayleigh { mean })
    }

    pub fn log_normal(mu: f64, sigma: f64) -> Result<Self, SimError> {
        if !(sigma > 0.0) {
            return Err(invalid("LogNormal", "sigma must be > 0"));
        }
        Ok(Distribution::LogNormal { mu, sigma })
    }

    /// Draw a single value. RNG advancement is the only side effect.
    pub fn sample(&self, rng: &mut impl Rng) -> f64 {
        match *self {
            Distribution::Normal { mean, std_dev } => mean + std_dev * standard_normal(rng),
            Distribution::Uniform { min, max } => sample_uniform(rng, min, max),
            Distribution::Triangular { low, mode, high } => sample_triangular(rng, low, mode, high),
            Distribution::Beta { alpha, beta } => sample_beta(rng, alpha, beta),
            Distribution::Weibull { shape, scale } => {
                let u = unit_open(rng);
                scale * (-((1.0 - u).ln())).powf(1.0 / shape)
            }
            Distribution::Rayleigh { mean } => {
                let sigma = mean * (2.0 / PI).sqrt();
                let u = unit_open(rng);
                sigma * (-2.0 * (1.0 - u).ln()).sqrt()
            }
            Distribution::LogNormal { mu, sigma } => (mu + sigma * standard_normal(rng)).exp(),
        }
    }
}

fn invalid(distribution: &str, reason: &str) -> SimError {
    SimError::InvalidDistributionParameters {
        distribution: distribution.to_string(),
        reason: reason.to_string(),
    }
}

/// A uniform draw from (0, 1], avoiding the `ln(0)` singularity that a bare
/// `rng.gen::<f64>()` (which can return exactly 0.0) would hit.
fn unit_open(rng: &mut impl Rng) -> f64 {
    loop {
        let u: f64 = rng.gen();
        if u > 0.0 {
            return u;
        }
    }
}

/// Standard normal via the two-uniform (Box–Muller) transform.
fn standard_normal(rng: &mut impl Rng) -> f64 {
    let u1 = unit_open(rng);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

fn sample_uniform(rng: &mut impl Rng, a: f64, b: f64) -> f64 {
    if a == b {
        return a;
    }
    let u: f64 = rng.gen();
    a + u * (b - a)
}

fn sample_triangular(rng: &mut impl Rng, low: f64, mode: f64, high: f64) -> f64 {
    if low == high {
        return low;
    }
    let u: f64 = rng.gen();
    let fm = (mode - low) / (high - low);
    if u < fm {
        low + (u * (high - low) * (mode - low)).sqrt()
    } else {
        high - ((1.0 - u) * (high - low) * (high - mode)).sqrt()
    }
}

/// Gamma(shape, 1) via Marsaglia–Tsang, boosted for shape < 1.
fn sample_gamma(rng: &mut impl Rng, shape: f64) -> f64 {
    if shape < 1.0 {
        let u = unit_open(rng);
        return sample_gamma(rng, shape + 1.0) * u.powf(1.0 / shape);
    }
    let d = shape - 1.0 / 3.0;
    let c = 1.0 / (9.0 * d).sqrt();
    loop {
        let x = standard_normal(rng);
        let v_cbrt = 1.0 + c * x;
        if v_cbrt <= 0.0 {
            continue;
        }
        let v = v_cbrt * v_cbrt * v_cbrt;
        let u = unit_open(rng);
        if u.ln() < 0.5 * x * x + d - d * v + d * v.ln() {
            return d * v;
        }
    }
}

/// Beta(alpha, beta) via the Gamma ratio X / (X + Y).
fn sample_beta(rng: &mut impl Rng, alpha: f64, beta: f64) -> f64 {
    loop {
        let x = sample_gamma(rng, alpha);
        let y = sample_gamma(rng, beta);
        let denom = x + y;
        if denom > 0.0 {
            return x / denom;
        }
        // Both draws underflowed to zero; resample rather than divide by zero.
    }
}
