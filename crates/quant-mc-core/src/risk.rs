//! Value-at-Risk and Conditional Value-at-Risk (component G).

use crate::error::SimError;
use crate::stats::quantile;

/// VaR at `confidence` (e.g. 0.95) of a loss distribution: the R-7 quantile
/// at `alpha = 1 - confidence`, i.e. the lower-tail percentile beyond which
/// only `alpha` of outcomes fall. Losses are negative for a loss
/// distribution, so VaR is typically negative. `losses` need not be
/// pre-sorted.
pub fn value_at_risk(losses: &[f64], confidence: f64) -> Result<f64, SimError> {
    validate(losses, confidence)?;
    let mut sorted = losses.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    Ok(quantile(&sorted, 1.0 - confidence))
}

/// Expected value conditional on being at or below the VaR threshold
/// (Expected Shortfall). Always `<= VaR` for the same confidence level on
/// data with variation.
pub fn conditional_value_at_risk(losses: &[f64], confidence: f64) -> Result<f64, SimError> {
    validate(losses, confidence)?;
    let mut sorted = losses.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let var = quantile(&sorted, 1.0 - confidence);

    let tail: Vec<f64> = sorted.iter().copied().filter(|&v| v <= var).collect();
    if tail.is_empty() {
        return Ok(var);
    }
    Ok(tail.iter().sum::<f64>() / tail.len() as f64)
}

fn validate(losses: &[f64], confidence: f64) -> Result<(), SimError> {
    if losses.is_empty() {
        return Err(SimError::InsufficientData(
            "at least one loss observation is required".into(),
        ));
    }
    if losses.iter().any(|v| !v.is_finite()) {
        return Err(SimError::NonFinite);
    }
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(SimError::InvalidDistributionParameters {
            distribution: "value_at_risk".into(),
            reason: "confidence must be in (0, 1)".into(),
        });
    }
    Ok(())
}
