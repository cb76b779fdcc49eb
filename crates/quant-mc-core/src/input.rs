//! Uniform sampler surface over distribution-backed or closure-backed
//! uncertain variables (component D).

use rand::rngs::StdRng;
use std::collections::HashMap;
use std::sync::Arc;

use crate::distributions::Distribution;

type SamplerFn = Arc<dyn Fn(&mut StdRng) -> f64 + Send + Sync>;

/// A single uncertain input to a simulation. Exclusively owned by whichever
/// driver it was added to; `sample()` is side-effect-free except for RNG
/// advancement.
#[derive(Clone)]
pub struct SimulationInput {
    pub name: String,
    pub metadata: HashMap<String, String>,
    sampler: SamplerFn,
    /// Retained when the input was built from a [`Distribution`] so callers
    /// can introspect it (and so `run_correlated` can resample it directly).
    pub original_distribution: Option<Distribution>,
}

impl std::fmt::Debug for SimulationInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationInput")
            .field("name", &self.name)
            .field("metadata", &self.metadata)
            .field("original_distribution", &self.original_distribution)
            .finish()
    }
}

impl SimulationInput {
    pub fn from_distribution(name: impl Into<String>, distribution: Distribution) -> Self {
        SimulationInput {
            name: name.into(),
            metadata: HashMap::new(),
            sampler: Arc::new(move |rng| distribution.sample(rng)),
            original_distribution: Some(distribution),
        }
    }

    pub fn from_closure(
        name: impl Into<String>,
        sampler: impl Fn(&mut StdRng) -> f64 + Send + Sync + 'static,
    ) -> Self {
        SimulationInput {
            name: name.into(),
            metadata: HashMap::new(),
            sampler: Arc::new(sampler),
            original_distribution: None,
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn sample(&self, rng: &mut StdRng) -> f64 {
        (self.sampler)(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn from_distribution_retains_it() {
        let dist = Distribution::normal(0.0, 1.0).unwrap();
        let input = SimulationInput::from_distribution("x", dist);
        assert!(input.original_distribution.is_some());
    }

    #[test]
    fn from_closure_has_no_original_distribution() {
        let input = SimulationInput::from_closure("fixed", |_rng| 42.0);
        assert!(input.original_distribution.is_none());
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(input.sample(&mut rng), 42.0);
    }
}
