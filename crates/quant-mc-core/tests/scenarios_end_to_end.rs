//! End-to-end coverage across the public API, one test per reference
//! scenario the core's invariants were designed against.

use std::collections::HashMap;

use quant_mc_core::{
    tornado_chart, Distribution, Scenario, ScenarioAnalysis, ScenarioComparison, SimulationDriver,
    SimulationInput,
};

#[test]
fn s1_normal_confidence_interval_contains_mean() {
    let inputs = vec![SimulationInput::from_distribution(
        "x",
        Distribution::normal(100.0, 15.0).unwrap(),
    )];
    let driver = SimulationDriver::new(inputs, 200_000, 1, |row| row[0]).unwrap();
    let results = driver.run().unwrap();

    let (lo, hi) = results.statistics.confidence_interval(0.95).unwrap();
    assert!(lo < results.statistics.mean && results.statistics.mean < hi);
    assert!((results.statistics.mean - 100.0).abs() < 0.3);
}

#[test]
fn s2_weibull_reliability_mean_matches_closed_form() {
    let inputs = vec![SimulationInput::from_distribution(
        "lifetime",
        Distribution::weibull(2.0, 100.0).unwrap(),
    )];
    let driver = SimulationDriver::new(inputs, 200_000, 2, |row| row[0]).unwrap();
    let results = driver.run().unwrap();

    // mean = scale * Gamma(1 + 1/shape); for shape=2 that's scale*sqrt(pi)/2
    let expected = 100.0 * std::f64::consts::PI.sqrt() / 2.0;
    assert!((results.statistics.mean - expected).abs() < 1.0);
}

#[test]
fn s4_correlated_mixed_marginals_shift_output_variance() {
    let inputs = vec![
        SimulationInput::from_distribution("a", Distribution::normal(0.0, 1.0).unwrap()),
        SimulationInput::from_distribution("b", Distribution::uniform(-1.0, 1.0).unwrap()),
    ];
    let independent =
        SimulationDriver::new(inputs.clone(), 30_000, 5, |row| row[0] + row[1]).unwrap();
    let independent_results = independent.run().unwrap();

    let correlated = SimulationDriver::new(inputs, 30_000, 5, |row| row[0] + row[1]).unwrap();
    let corr = vec![vec![1.0, 0.8], vec![0.8, 1.0]];
    let correlated_results = correlated.run_correlated(&corr).unwrap();

    assert!(correlated_results.statistics.variance > independent_results.statistics.variance);
}

#[test]
fn s5_var_and_cvar_on_normal_losses() {
    let inputs = vec![SimulationInput::from_distribution(
        "loss",
        Distribution::normal(0.0, 1.0).unwrap(),
    )];
    let driver = SimulationDriver::new(inputs, 100_000, 6, |row| row[0]).unwrap();
    let results = driver.run().unwrap();

    let var95 = quant_mc_core::risk::value_at_risk(&results.values, 0.95).unwrap();
    let cvar95 = quant_mc_core::risk::conditional_value_at_risk(&results.values, 0.95).unwrap();

    // S5: VaR(0.95) in [-1.68, -1.62], CVaR(0.95) in [-2.10, -2.02], CVaR <= VaR.
    assert!((-1.68..=-1.62).contains(&var95), "var95={var95}");
    assert!((-2.10..=-2.02).contains(&cvar95), "cvar95={cvar95}");
    assert!(cvar95 <= var95);
}

#[test]
fn s6_scenario_ranking_orders_bull_base_bear() {
    let input_names = vec!["growth".to_string()];

    let mut base_dist = HashMap::new();
    base_dist.insert("growth".to_string(), Distribution::normal(0.05, 0.02).unwrap());
    let mut bull_dist = HashMap::new();
    bull_dist.insert("growth".to_string(), Distribution::normal(0.12, 0.02).unwrap());
    let mut bear_dist = HashMap::new();
    bear_dist.insert("growth".to_string(), Distribution::normal(-0.02, 0.02).unwrap());

    let scenarios = vec![
        Scenario::new("bull", HashMap::new(), bull_dist),
        Scenario::new("base", HashMap::new(), base_dist),
        Scenario::new("bear", HashMap::new(), bear_dist),
    ];
    let analysis = ScenarioAnalysis::new(input_names, 50_000, 7, |row| row[0], scenarios);
    let results = analysis.run().unwrap();
    let comparison = ScenarioComparison::new(&results);

    let ranked = comparison.rank_by("mean", false).unwrap();
    assert_eq!(
        ranked.iter().map(|(name, _)| *name).collect::<Vec<_>>(),
        vec!["bull", "base", "bear"]
    );

    let table = comparison.summary_table(&["mean", "stddev"]).unwrap();
    assert_eq!(table.len(), 3);
}

#[test]
fn s7_tornado_chart_orders_by_impact_magnitude() {
    let input_names = vec!["growth".to_string(), "discount".to_string(), "tax".to_string()];
    let mut base = HashMap::new();
    base.insert("growth".to_string(), 0.05);
    base.insert("discount".to_string(), 0.10);
    base.insert("tax".to_string(), 0.21);

    let model = |row: &[f64]| 1000.0 * row[0] - 4000.0 * row[1] - 10.0 * row[2];

    let sweeps = vec![
        ("growth".to_string(), 0.6, 1.4),
        ("discount".to_string(), 0.8, 1.2),
        ("tax".to_string(), 0.86, 1.14),
    ];
    let bars = tornado_chart(&input_names, &base, 10, 8, model, &sweeps).unwrap();

    assert_eq!(bars.len(), 3);
    for pair in bars.windows(2) {
        assert!(pair[0].impact.abs() >= pair[1].impact.abs());
    }
    assert_eq!(bars[0].input_name, "discount");
}
