//! Correlation-preserving multivariate normal sampling (component C).

use rand::Rng;

use crate::distributions::Distribution;
use crate::error::SimError;
use crate::matrix::{cholesky, validate_correlation_matrix};

/// Precomputes the Cholesky factor of a validated correlation matrix;
/// `sample()` then draws a correlated multivariate-normal vector by
/// transforming `n` independent standard normals through `μ + Lz`.
#[derive(Debug, Clone)]
pub struct CorrelatedNormals {
    means: Vec<f64>,
    l: Vec<Vec<f64>>,
}

impl CorrelatedNormals {
    pub fn new(means: &[f64], correlation: &[Vec<f64>]) -> Result<Self, SimError> {
        if means.len() != correlation.len() {
            return Err(SimError::DimensionMismatch {
                expected: means.len(),
                actual: correlation.len(),
            });
        }
        validate_correlation_matrix(correlation)?;
        let l = cholesky(correlation)
            .map_err(|cause| SimError::InvalidCorrelationMatrix { cause })?;
        Ok(CorrelatedNormals {
            means: means.to_vec(),
            l,
        })
    }

    pub fn dim(&self) -> usize {
        self.means.len()
    }

    /// Draw one correlated multivariate-normal vector. Pure w.r.t. `rng`.
    pub fn sample(&self, rng: &mut impl Rng) -> Vec<f64> {
        let n = self.means.len();
        let standard_normal = Distribution::Normal {
            mean: 0.0,
            std_dev: 1.0,
        };
        let z: Vec<f64> = (0..n).map(|_| standard_normal.sample(rng)).collect();

        let mut x = self.means.clone();
        for i in 0..n {
            let mut dot = 0.0;
            for k in 0..=i {
                dot += self.l[i][k] * z[k];
            }
            x[i] += dot;
        }
        x
    }
}
