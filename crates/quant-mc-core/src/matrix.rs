//! Correlation matrix validation and Cholesky decomposition (component B).

use crate::error::{CorrelationFault, SimError};

const EPS: f64 = 1e-10;

/// Validate a correlation matrix per the data model's five invariants,
/// cheapest checks first: square, unit diagonal, symmetry, bounds, then
/// positive semi-definiteness via Cholesky.
pub fn validate_correlation_matrix(m: &[Vec<f64>]) -> Result<(), SimError> {
    let n = m.len();
    if m.iter().any(|row| row.len() != n) {
        return Err(SimError::InvalidCorrelationMatrix {
            cause: CorrelationFault::NonSquare,
        });
    }
    for i in 0..n {
        if (m[i][i] - 1.0).abs() > EPS {
            return Err(SimError::InvalidCorrelationMatrix {
                cause: CorrelationFault::NonUnitDiagonal,
            });
        }
    }
    for i in 0..n {
        for j in 0..n {
            if (m[i][j] - m[j][i]).abs() > EPS {
                return Err(SimError::InvalidCorrelationMatrix {
                    cause: CorrelationFault::Asymmetric,
                });
            }
        }
    }
    for i in 0..n {
        for j in 0..n {
            if i != j && !(-1.0..=1.0).contains(&m[i][j]) {
                return Err(SimError::InvalidCorrelationMatrix {
                    cause: CorrelationFault::OutOfBounds,
                });
            }
        }
    }
    cholesky(m).map_err(|cause| SimError::InvalidCorrelationMatrix { cause })?;
    Ok(())
}

pub fn is_valid_correlation_matrix(m: &[Vec<f64>]) -> bool {
    validate_correlation_matrix(m).is_ok()
}

/// Classical Cholesky–Banachiewicz decomposition: returns lower-triangular
/// `L` such that `L · Lᵀ = M`.
pub fn cholesky(m: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, CorrelationFault> {
    let n = m.len();
    let mut l = vec![vec![0.0_f64; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[i][k] * l[j][k];
            }
            if i == j {
                let radicand = m[i][i] - sum;
                if radicand < -EPS {
                    return Err(CorrelationFault::NotPositiveSemiDefinite(format!(
                        "negative radicand {radicand} at diagonal {i}"
                    )));
                }
                l[i][i] = radicand.max(0.0).sqrt();
            } else {
                if l[j][j].abs() < EPS {
                    return Err(CorrelationFault::NotPositiveSemiDefinite(format!(
                        "zero pivot at ({j}, {j})"
                    )));
                }
                l[i][j] = (m[i][j] - sum) / l[j][j];
            }
        }
    }
    Ok(l)
}
