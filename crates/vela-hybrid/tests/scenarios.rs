use std::time::{Duration, Instant};

use approx::assert_relative_eq;
use vela_adapter_sim::StatevectorSampler;
use vela_hybrid::circuits::RESULT_KEY;
use vela_hybrid::{
    AnsatzParameters, HybridConfig, HybridError, Mission, Stage, ThrustModel, ThrustRunner,
    extract_seed, variational_ansatz,
};

fn sample_ansatz(steps: u32, depth: u32, shots: u32, seed: u64) -> vela_adapter_sim::Counts {
    let circuit = variational_ansatz(steps, depth).unwrap();
    let parameters = AnsatzParameters::new(0.5, 0.25, vec![0.01; steps as usize]);
    let bound = circuit.bind(&parameters.binding());
    StatevectorSampler::new(Some(seed))
        .sample(&bound, shots)
        .unwrap()
        .into_histogram(RESULT_KEY)
        .unwrap()
}

#[test]
fn three_step_sampling_scenario() {
    let counts = sample_ansatz(3, 1, 100, 42);

    assert_eq!(counts.total(), 100);
    assert!(counts.iter().all(|(bits, _)| bits.len() == 3));

    let seed = extract_seed(&counts).unwrap();
    let (top, top_count) = counts.sorted()[0];
    let expected: Vec<f64> = top.chars().map(|c| if c == '1' { 1.0 } else { 0.0 }).collect();
    assert_eq!(seed, expected);
    assert!(counts.iter().all(|(_, n)| n <= top_count));
}

#[test]
fn single_shot_gives_single_entry() {
    let counts = sample_ansatz(3, 1, 1, 7);
    assert_eq!(counts.len(), 1);
    assert_eq!(counts.total(), 1);
}

#[test]
fn dynamics_step_scenario() {
    let (velocity, fuel) = ThrustModel::new(0.01).step(0.0, 5.0);
    assert_relative_eq!(velocity, 5.0);
    assert_relative_eq!(fuel, 0.05);
}

#[test]
fn all_ones_meets_target() {
    let mission = Mission::new(ThrustModel::new(0.01), 0.0, 10.0);
    assert_eq!(mission.constraint(&[1.0; 10]), 0.0);
    assert_eq!(mission.constraint(&[0.0; 10]), -10.0);
}

#[test]
fn seeded_runs_are_reproducible() {
    let mut config = HybridConfig::default();
    config.problem.num_steps = 6;
    config.problem.target_velocity = 6.0;
    config.sampler.shots = 300;
    config.sampler.seed = Some(2024);

    let a = ThrustRunner::new(config.clone()).unwrap().run().unwrap();
    let b = ThrustRunner::new(config).unwrap().run().unwrap();

    assert_eq!(a.histogram, b.histogram);
    assert_eq!(a.seed, b.seed);
    assert_eq!(a.controls, b.controls);
}

#[test]
fn default_mission_converges_to_full_thrust() {
    let mut config = HybridConfig::default();
    config.sampler.shots = 200;
    config.sampler.seed = Some(11);

    let result = ThrustRunner::new(config).unwrap().run().unwrap();
    assert!(result.converged, "{}", result.message);
    for u in &result.controls {
        assert_relative_eq!(*u, 1.0, epsilon = 1e-4);
    }
    assert_relative_eq!(result.objective, 0.1, epsilon = 1e-5);
}

#[test]
fn infeasible_target_is_reported_not_raised() {
    let mut config = HybridConfig::default();
    config.problem.num_steps = 3;
    config.ansatz.depth = 1;
    config.sampler.shots = 100;
    config.sampler.seed = Some(42);
    config.refiner.max_iterations = 15;

    let result = ThrustRunner::new(config).unwrap().run().unwrap();
    assert!(!result.converged);
    assert_eq!(result.iterations, 15);
    assert_relative_eq!(result.constraint_residual, -7.0, epsilon = 1e-9);
}

#[test]
fn register_beyond_limit_is_resource_error() {
    let mut config = HybridConfig::default();
    config.problem.num_steps = 25;
    config.problem.target_velocity = 25.0;

    let err = ThrustRunner::new(config).unwrap_err();
    assert!(matches!(
        err,
        HybridError::ResourceLimit {
            stage: Stage::Build,
            requested: 25,
            limit: 24,
        }
    ));
}

#[test]
fn oversized_step_override_fails_fast() {
    let mut config = HybridConfig::default();
    config
        .apply_overrides(|key| (key == "VELA_NUM_STEPS").then(|| "60000".to_string()))
        .unwrap();

    let started = Instant::now();
    let err = ThrustRunner::new(config).unwrap_err();
    assert!(err.is_resource_limit());
    assert!(started.elapsed() < Duration::from_millis(200));
}

#[test]
fn unbound_sampling_is_configuration_error() {
    let circuit = variational_ansatz(2, 1).unwrap();
    let err = StatevectorSampler::new(Some(1)).sample(&circuit, 10).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn builder_is_idempotent() {
    let a = variational_ansatz(4, 2).unwrap();
    let b = variational_ansatz(4, 2).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.parameters(), b.parameters());
}
