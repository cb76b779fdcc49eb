//! The simulation driver: independent sampling and Iman–Conover correlated
//! sampling over a fixed set of [`SimulationInput`]s (component H).

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::correlated::CorrelatedNormals;
use crate::error::SimError;
use crate::input::SimulationInput;
use crate::results::SimulationResults;
use crate::stats::standard_normal_cdf;

type ModelFn = Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// SplitMix64, used to turn `(base_seed, iteration_index)` into an
/// independent-looking per-iteration seed. Keeps results identical whether
/// or not the `parallel` feature is compiled in, since each iteration's RNG
/// depends only on its own index, never on execution order.
fn derive_seed(base_seed: u64, index: usize) -> u64 {
    let mut z = base_seed.wrapping_add(index as u64).wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

fn iteration_rng(base_seed: u64, index: usize) -> StdRng {
    StdRng::seed_from_u64(derive_seed(base_seed, index))
}

/// Drives a model over `inputs` for `iterations` draws, either independently
/// or through an Iman–Conover correlation structure.
pub struct SimulationDriver {
    pub inputs: Vec<SimulationInput>,
    pub iterations: usize,
    pub seed: u64,
    model: ModelFn,
}

impl SimulationDriver {
    pub fn new(
        inputs: Vec<SimulationInput>,
        iterations: usize,
        seed: u64,
        model: impl Fn(&[f64]) -> f64 + Send + Sync + 'static,
    ) -> Result<Self, SimError> {
        if inputs.is_empty() {
            return Err(SimError::NoInputs);
        }
        if iterations == 0 {
            return Err(SimError::InsufficientIterations);
        }
        Ok(SimulationDriver {
            inputs,
            iterations,
            seed,
            model: Arc::new(model),
        })
    }

    fn evaluate_row(&self, index: usize, row: &[f64]) -> Result<f64, SimError> {
        let out = (self.model)(row);
        if !out.is_finite() {
            return Err(SimError::InvalidModel {
                iteration: index,
                reason: "model output is not finite".into(),
            });
        }
        Ok(out)
    }

    /// Sample every input independently, `iterations` times.
    pub fn run(&self) -> Result<SimulationResults, SimError> {
        let values = self.run_independent_rows()?;
        SimulationResults::new(values)
    }

    #[cfg(not(feature = "parallel"))]
    fn run_independent_rows(&self) -> Result<Vec<f64>, SimError> {
        (0..self.iterations)
            .map(|i| {
                let mut rng = iteration_rng(self.seed, i);
                let row: Vec<f64> = self.inputs.iter().map(|inp| inp.sample(&mut rng)).collect();
                self.evaluate_row(i, &row)
            })
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn run_independent_rows(&self) -> Result<Vec<f64>, SimError> {
        (0..self.iterations)
            .into_par_iter()
            .map(|i| {
                let mut rng = iteration_rng(self.seed, i);
                let row: Vec<f64> = self.inputs.iter().map(|inp| inp.sample(&mut rng)).collect();
                self.evaluate_row(i, &row)
            })
            .collect()
    }

    /// Sample inputs under an Iman–Conover rank correlation structure: draw
    /// independent marginals, impose a target rank structure from a
    /// correlated-normal score matrix, then evaluate the model on the
    /// reordered rows. Every input must have been built with
    /// [`SimulationInput::from_distribution`] so its marginal can be
    /// resampled directly.
    pub fn run_correlated(&self, correlation: &[Vec<f64>]) -> Result<SimulationResults, SimError> {
        let d = self.inputs.len();
        if correlation.len() != d {
            return Err(SimError::DimensionMismatch {
                expected: d,
                actual: correlation.len(),
            });
        }

        let means = vec![0.0; d];
        let correlated = CorrelatedNormals::new(&means, correlation)?;

        let n = self.iterations;
        let mut marginals: Vec<Vec<f64>> = vec![Vec::with_capacity(n); d];
        let mut scores: Vec<Vec<f64>> = Vec::with_capacity(n);

        for i in 0..n {
            let mut rng = iteration_rng(self.seed, i);
            for (j, input) in self.inputs.iter().enumerate() {
                if input.original_distribution.is_none() {
                    return Err(SimError::InvalidDistributionParameters {
                        distribution: input.name.clone(),
                        reason: "correlated sampling requires a distribution-backed input".into(),
                    });
                }
                marginals[j].push(input.sample(&mut rng));
            }
            scores.push(correlated.sample(&mut rng));
        }

        for col in marginals.iter_mut() {
            col.sort_by(|a, b| a.partial_cmp(b).unwrap());
        }

        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                (0..d)
                    .map(|j| {
                        let u = standard_normal_cdf(scores[i][j]);
                        let idx = ((u * (n - 1) as f64).floor() as usize).min(n - 1);
                        marginals[j][idx]
                    })
                    .collect()
            })
            .collect();

        let values = self.evaluate_rows(&rows)?;
        SimulationResults::new(values)
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, SimError> {
        rows.iter()
            .enumerate()
            .map(|(i, row)| self.evaluate_row(i, row))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn evaluate_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, SimError> {
        rows.par_iter()
            .enumerate()
            .map(|(i, row)| self.evaluate_row(i, row))
            .collect()
    }
}
