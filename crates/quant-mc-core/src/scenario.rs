//! Named what-if scenarios run over the same schema of inputs, compared
//! and ranked by a chosen summary metric (component I).

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::distributions::Distribution;
use crate::error::SimError;
use crate::input::SimulationInput;
use crate::results::SimulationResults;
use crate::risk::{conditional_value_at_risk, value_at_risk};
use crate::simulation::SimulationDriver;

type ModelFn = Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// One named scenario: every input named in the owning [`ScenarioAnalysis`]'s
/// `input_names` must be configured here exactly once, either as a fixed
/// point value or as a distribution to sample from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub fixed: HashMap<String, f64>,
    pub distributions: HashMap<String, Distribution>,
}

impl Scenario {
    pub fn new(
        name: impl Into<String>,
        fixed: HashMap<String, f64>,
        distributions: HashMap<String, Distribution>,
    ) -> Self {
        Scenario {
            name: name.into(),
            fixed,
            distributions,
        }
    }

    /// Serializes this scenario's configuration to JSON, for the "external
    /// encoders" spec §6 describes (scenario configs are plain data; the
    /// core itself never reads or writes files).
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a scenario's configuration from JSON produced by [`Scenario::to_json`]
    /// or hand-authored by a caller.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Runs each registered [`Scenario`] against the same model and input
/// schema, collecting one [`SimulationResults`] per scenario name.
pub struct ScenarioAnalysis {
    pub input_names: Vec<String>,
    pub iterations: u32,
    pub seed: u64,
    model: ModelFn,
    pub scenarios: Vec<Scenario>,
}

impl ScenarioAnalysis {
    pub fn new(
        input_names: Vec<String>,
        iterations: u32,
        seed: u64,
        model: impl Fn(&[f64]) -> f64 + Send + Sync + 'static,
        scenarios: Vec<Scenario>,
    ) -> Self {
        ScenarioAnalysis {
            input_names,
            iterations,
            seed,
            model: Arc::new(model),
            scenarios,
        }
    }

    /// Resolves a scenario's `fixed`/`distributions` maps into one
    /// [`SimulationInput`] per name in `input_names`, in that order. Every
    /// name must appear in exactly one of the two maps, and neither map may
    /// name an input outside the schema.
    fn resolve_inputs(&self, scenario: &Scenario) -> Result<Vec<SimulationInput>, SimError> {
        for key in scenario.fixed.keys().chain(scenario.distributions.keys()) {
            if !self.input_names.iter().any(|n| n == key) {
                return Err(SimError::UnknownInput {
                    scenario: scenario.name.clone(),
                    name: key.clone(),
                });
            }
        }

        self.input_names
            .iter()
            .map(|name| match (scenario.fixed.get(name), scenario.distributions.get(name)) {
                (Some(&value), None) => {
                    Ok(SimulationInput::from_closure(name.clone(), move |_rng| value))
                }
                (None, Some(dist)) => Ok(SimulationInput::from_distribution(name.clone(), *dist)),
                _ => Err(SimError::MissingInputConfiguration {
                    scenario: scenario.name.clone(),
                    missing: name.clone(),
                }),
            })
            .collect()
    }

    /// Runs every scenario and returns the resulting distributions keyed by
    /// scenario name. Fails `NoScenarios` if none were registered.
    pub fn run(&self) -> Result<HashMap<String, SimulationResults>, SimError> {
        if self.scenarios.is_empty() {
            return Err(SimError::NoScenarios);
        }

        let mut out = HashMap::with_capacity(self.scenarios.len());
        for scenario in &self.scenarios {
            let inputs = self.resolve_inputs(scenario)?;
            let model = Arc::clone(&self.model);
            let driver = SimulationDriver::new(inputs, self.iterations as usize, self.seed, move |row| {
                model(row)
            })?;
            out.insert(scenario.name.clone(), driver.run()?);
        }
        Ok(out)
    }
}

/// Extracts a named summary metric from a scenario's full results. Shared
/// by scenario comparison and sensitivity sweeps so both speak the same
/// metric vocabulary: `{mean, median, stddev, p5, p95, var95, cvar95}`.
pub fn metric_value(results: &SimulationResults, metric: &str) -> Result<f64, SimError> {
    match metric {
        "mean" => Ok(results.statistics.mean),
        "median" => Ok(results.statistics.median),
        "stddev" => Ok(results.statistics.stddev),
        "p5" => Ok(results.percentiles.p5),
        "p95" => Ok(results.percentiles.p95),
        "var95" => value_at_risk(&results.values, 0.95),
        "cvar95" => conditional_value_at_risk(&results.values, 0.95),
        other => Err(SimError::UnknownMetric {
            metric: other.to_string(),
        }),
    }
}

/// Ranks and compares a completed [`ScenarioAnalysis::run`] output by any
/// metric in the closed set, ties broken by scenario name.
pub struct ScenarioComparison<'a> {
    results: &'a HashMap<String, SimulationResults>,
}

impl<'a> ScenarioComparison<'a> {
    pub fn new(results: &'a HashMap<String, SimulationResults>) -> Self {
        ScenarioComparison { results }
    }

    /// Scenario names paired with `metric`'s value, sorted `ascending` (or
    /// descending), ties broken by name.
    pub fn rank_by(&self, metric: &str, ascending: bool) -> Result<Vec<(&'a str, f64)>, SimError> {
        let mut rows: Vec<(&str, f64)> = self
            .results
            .iter()
            .map(|(name, results)| metric_value(results, metric).map(|v| (name.as_str(), v)))
            .collect::<Result<_, _>>()?;

        rows.sort_by(|(name_a, value_a), (name_b, value_b)| {
            let ordering = if ascending {
                value_a.partial_cmp(value_b).unwrap()
            } else {
                value_b.partial_cmp(value_a).unwrap()
            };
            ordering.then_with(|| name_a.cmp(name_b))
        });
        Ok(rows)
    }

    pub fn best_by(&self, metric: &str) -> Result<(&'a str, f64), SimError> {
        Ok(self.rank_by(metric, false)?.remove(0))
    }

    pub fn worst_by(&self, metric: &str) -> Result<(&'a str, f64), SimError> {
        Ok(self.rank_by(metric, true)?.remove(0))
    }

    /// One row per scenario (sorted by name): `(name, values_in_metrics_order)`.
    pub fn summary_table(&self, metrics: &[&str]) -> Result<Vec<(String, Vec<f64>)>, SimError> {
        let mut names: Vec<&str> = self.results.keys().map(|s| s.as_str()).collect();
        names.sort();

        names
            .into_iter()
            .map(|name| {
                let results = &self.results[name];
                let values = metrics
                    .iter()
                    .map(|m| metric_value(results, m))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((name.to_string(), values))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::Distribution;

    fn schema() -> Vec<String> {
        vec!["revenue".to_string(), "costs".to_string()]
    }

    fn fixed_scenario(name: &str, revenue: f64, costs: f64) -> Scenario {
        let mut fixed = HashMap::new();
        fixed.insert("revenue".to_string(), revenue);
        fixed.insert("costs".to_string(), costs);
        Scenario::new(name, fixed, HashMap::new())
    }

    #[test]
    fn rejects_no_scenarios() {
        let analysis = ScenarioAnalysis::new(schema(), 10, 1, |row| row[0] - row[1], vec![]);
        assert!(analysis.run().is_err());
    }

    #[test]
    fn rejects_missing_input_configuration() {
        let mut fixed = HashMap::new();
        fixed.insert("revenue".to_string(), 1000.0);
        let scenario = Scenario::new("incomplete", fixed, HashMap::new());
        let analysis = ScenarioAnalysis::new(schema(), 10, 1, |row| row[0] - row[1], vec![scenario]);
        assert!(matches!(
            analysis.run().unwrap_err(),
            SimError::MissingInputConfiguration { .. }
        ));
    }

    #[test]
    fn rejects_unknown_input_name() {
        let mut fixed = HashMap::new();
        fixed.insert("revenue".to_string(), 1000.0);
        fixed.insert("costs".to_string(), 700.0);
        fixed.insert("nonexistent".to_string(), 1.0);
        let scenario = Scenario::new("bad", fixed, HashMap::new());
        let analysis = ScenarioAnalysis::new(schema(), 10, 1, |row| row[0] - row[1], vec![scenario]);
        assert!(matches!(
            analysis.run().unwrap_err(),
            SimError::UnknownInput { .. }
        ));
    }

    #[test]
    fn scenario_may_mix_fixed_and_distribution_inputs() {
        let mut fixed = HashMap::new();
        fixed.insert("costs".to_string(), 700.0);
        let mut distributions = HashMap::new();
        distributions.insert(
            "revenue".to_string(),
            Distribution::normal(1000.0, 5.0).unwrap(),
        );
        let scenario = Scenario::new("mixed", fixed, distributions);
        let analysis = ScenarioAnalysis::new(schema(), 5000, 3, |row| row[0] - row[1], vec![scenario]);
        let results = analysis.run().unwrap();
        assert!((results["mixed"].statistics.mean - 300.0).abs() < 1.0);
    }

    #[test]
    fn s6_scenario_ranking() {
        let scenarios = vec![
            fixed_scenario("A", 1000.0, 700.0),
            fixed_scenario("B", 1200.0, 600.0),
            fixed_scenario("C", 800.0, 800.0),
        ];
        let analysis = ScenarioAnalysis::new(schema(), 10, 1, |row| row[0] - row[1], scenarios);
        let results = analysis.run().unwrap();
        let comparison = ScenarioComparison::new(&results);

        let (best_name, best_value) = comparison.best_by("mean").unwrap();
        assert_eq!(best_name, "B");
        assert!((best_value - 600.0).abs() < 1e-9);

        let (worst_name, worst_value) = comparison.worst_by("mean").unwrap();
        assert_eq!(worst_name, "C");
        assert!((worst_value - 0.0).abs() < 1e-9);

        let ascending = comparison.rank_by("mean", true).unwrap();
        let names: Vec<&str> = ascending.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn summary_table_has_one_row_per_scenario_sorted_by_name() {
        let scenarios = vec![
            fixed_scenario("B", 1200.0, 600.0),
            fixed_scenario("A", 1000.0, 700.0),
        ];
        let analysis = ScenarioAnalysis::new(schema(), 10, 1, |row| row[0] - row[1], scenarios);
        let results = analysis.run().unwrap();
        let comparison = ScenarioComparison::new(&results);
        let table = comparison.summary_table(&["mean", "stddev"]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].0, "A");
        assert_eq!(table[1].0, "B");
    }

    #[test]
    fn unknown_metric_is_rejected() {
        let scenarios = vec![fixed_scenario("A", 1000.0, 700.0)];
        let analysis = ScenarioAnalysis::new(schema(), 10, 1, |row| row[0] - row[1], scenarios);
        let results = analysis.run().unwrap();
        let comparison = ScenarioComparison::new(&results);
        assert!(comparison.best_by("not_a_metric").is_err());
    }

    #[test]
    fn scenario_round_trips_through_json() {
        let scenario = fixed_scenario("A", 1000.0, 700.0);
        let json = scenario.to_json().unwrap();
        let restored = Scenario::from_json(&json).unwrap();
        assert_eq!(restored.name, scenario.name);
        assert_eq!(restored.fixed, scenario.fixed);
    }

    #[test]
    fn scenario_from_json_rejects_malformed_input() {
        assert!(Scenario::from_json("not valid json").is_err());
    }
}
