//! One-at-a-time sensitivity sweeps and tornado charts (component J).

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SimError;
use crate::input::SimulationInput;
use crate::results::SimulationResults;
use crate::simulation::SimulationDriver;

type ModelFn = Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// One point of a one-at-a-time sweep: the multiplier applied to the swept
/// input's base value, and the resulting model output distribution (every
/// other input held at its own base value, so in practice this is `N`
/// identical draws unless the model itself introduces variation).
pub struct SweepPoint {
    pub multiplier: f64,
    pub results: SimulationResults,
}

/// One row of a tornado chart: the metric's value at the low and high end
/// of a sweep, and the resulting swing.
#[derive(Debug, Clone)]
pub struct TornadoBar {
    pub input_name: String,
    pub low: f64,
    pub high: f64,
    pub impact: f64,
}

/// Sweeps `input_name` across `steps` evenly-spaced multipliers of its base
/// value in `[low, high]`, holding every other named input at its own base
/// value, and runs the model at each step. `base` must contain every name
/// in `input_names`.
pub fn analyze_input(
    input_names: &[String],
    base: &HashMap<String, f64>,
    iterations: u32,
    seed: u64,
    model: &ModelFn,
    input_name: &str,
    low: f64,
    high: f64,
    steps: usize,
) -> Result<Vec<SweepPoint>, SimError> {
    if !input_names.iter().any(|n| n == input_name) {
        return Err(SimError::UnknownInput {
            scenario: "sensitivity".into(),
            name: input_name.to_string(),
        });
    }
    if steps < 2 {
        return Err(SimError::InsufficientData(
            "at least two sweep steps are required".into(),
        ));
    }
    let base_value = *base.get(input_name).ok_or_else(|| SimError::MissingInputConfiguration {
        scenario: "sensitivity".into(),
        missing: input_name.to_string(),
    })?;

    let mut points = Vec::with_capacity(steps);
    for i in 0..steps {
        let multiplier = low + i as f64 * (high - low) / (steps as f64 - 1.0);
        let swept_value = base_value * multiplier;

        let inputs = input_names
            .iter()
            .map(|name| {
                let value = if name == input_name {
                    swept_value
                } else {
                    *base.get(name).ok_or_else(|| SimError::MissingInputConfiguration {
                        scenario: "sensitivity".into(),
                        missing: name.clone(),
                    })?
                };
                Ok(SimulationInput::from_closure(name.clone(), move |_rng| value))
            })
            .collect::<Result<Vec<_>, SimError>>()?;

        let model = Arc::clone(model);
        let driver = SimulationDriver::new(inputs, iterations as usize, seed, move |row| model(row))?;
        let results = driver.run()?;
        points.push(SweepPoint { multiplier, results });
    }
    Ok(points)
}

/// Runs `analyze_input` with `steps = 2` over every `(name, low, high)`
/// sweep range, takes the output mean at each end, and sorts the resulting
/// bars by descending `|impact|` (the standard tornado-chart ordering, ties
/// broken by input name).
pub fn tornado_chart(
    input_names: &[String],
    base: &HashMap<String, f64>,
    iterations: u32,
    seed: u64,
    model: impl Fn(&[f64]) -> f64 + Send + Sync + 'static,
    sweeps: &[(String, f64, f64)],
) -> Result<Vec<TornadoBar>, SimError> {
    if sweeps.is_empty() {
        return Err(SimError::InsufficientData(
            "at least one sweep range is required".into(),
        ));
    }

    let model: ModelFn = Arc::new(model);
    let mut bars: Vec<TornadoBar> = sweeps
        .iter()
        .map(|(name, low, high)| {
            let points = analyze_input(input_names, base, iterations, seed, &model, name, *low, *high, 2)?;
            let mean_lo = points[0].results.statistics.mean;
            let mean_hi = points[1].results.statistics.mean;
            let low_bound = mean_lo.min(mean_hi);
            let high_bound = mean_lo.max(mean_hi);
            Ok(TornadoBar {
                input_name: name.clone(),
                low: low_bound,
                high: high_bound,
                impact: high_bound - low_bound,
            })
        })
        .collect::<Result<_, SimError>>()?;

    bars.sort_by(|a, b| {
        b.impact
            .abs()
            .partial_cmp(&a.impact.abs())
            .unwrap()
            .then_with(|| a.input_name.cmp(&b.input_name))
    });
    Ok(bars)
}
