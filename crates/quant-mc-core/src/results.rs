//! Bundled simulation output: raw draws, statistics, percentiles, and the
//! probability queries built on top of them (component F).

use serde::{Deserialize, Serialize};

use crate::ecdf::{probability_above, probability_below, probability_between};
use crate::error::SimError;
use crate::histogram::Histogram;
use crate::stats::{Percentiles, SimulationStatistics};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResults {
    pub values: Vec<f64>,
    pub statistics: SimulationStatistics,
    pub percentiles: Percentiles,
}

impl SimulationResults {
    pub fn new(values: Vec<f64>) -> Result<Self, SimError> {
        let percentiles = Percentiles::new(&values)?;
        let statistics = SimulationStatistics::new(values.clone())?;
        Ok(SimulationResults {
            values,
            statistics,
            percentiles,
        })
    }

    pub fn probability_below(&self, threshold: f64) -> f64 {
        probability_below(&self.percentiles.sorted, threshold)
    }

    pub fn probability_above(&self, threshold: f64) -> f64 {
        probability_above(&self.percentiles.sorted, threshold)
    }

    pub fn probability_between(&self, low: f64, high: f64) -> f64 {
        probability_between(&self.percentiles.sorted, low, high)
    }

    /// Auto-binned histogram of the raw draws (Sturges/Freedman–Diaconis
    /// per `crate::histogram`), reusing the IQR already computed in
    /// `percentiles` rather than recomputing quartiles.
    pub fn histogram(&self) -> Result<Histogram, SimError> {
        Histogram::build(&self.values, self.percentiles.iqr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundles_statistics_and_percentiles_consistently() {
        let values: Vec<f64> = (1..=1000).map(|i| i as f64).collect();
        let results = SimulationResults::new(values).unwrap();
        assert_eq!(results.statistics.min, results.percentiles.min);
        assert_eq!(results.statistics.max, results.percentiles.max);
    }

    #[test]
    fn probability_queries_delegate_to_ecdf() {
        let values: Vec<f64> = (1..=100).map(|i| i as f64).collect();
        let results = SimulationResults::new(values).unwrap();
        assert!((results.probability_below(50.0) - 0.49).abs() < 1e-9);
        assert!(
            (results.probability_below(50.0) + results.probability_above(50.0) - 1.0).abs()
                < 1e-9
        );
    }

    #[test]
    fn rejects_empty_values() {
        assert!(SimulationResults::new(vec![]).is_err());
    }

    #[test]
    fn histogram_covers_every_value() {
        let values: Vec<f64> = (0..1000).map(|i| i as f64).collect();
        let results = SimulationResults::new(values).unwrap();
        let histogram = results.histogram().unwrap();
        let total: usize = histogram.bins.iter().map(|b| b.count).sum();
        assert_eq!(total, results.values.len());
    }
}
