//! Sampled-seed thrust planner.
//!
//! Runs build → bind → sample → extract → refine once. The circuit is
//! sampled a single time with fixed angles; the classical refiner alone
//! turns its discrete seed into a continuous schedule.

use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use vela_adapter_sim::{Counts, StatevectorSampler};
use vela_ir::Circuit;

use crate::circuits::{AnsatzParameters, RESULT_KEY, variational_ansatz};
use crate::config::HybridConfig;
use crate::error::{HybridError, HybridResult, Stage};
use crate::optimizers::refine;
use crate::problems::Mission;
use crate::seed::{extract_seed, most_frequent};

/// Result of a thrust planning run.
#[derive(Debug, Clone, Serialize)]
pub struct ThrustResult {
    /// Refined thrust per step.
    pub controls: Vec<f64>,
    /// Fuel used by `controls`.
    pub objective: f64,
    /// Terminal velocity error of `controls`.
    pub constraint_residual: f64,
    /// Whether the refiner met both tolerances.
    pub converged: bool,
    /// Refiner outer iterations.
    pub iterations: usize,
    /// Objective evaluations spent by the refiner.
    pub evaluations: usize,
    /// Refiner termination reason.
    pub message: String,
    /// Initial guess taken from the histogram.
    pub seed: Vec<f64>,
    /// Bitstring the seed was read from.
    pub seed_bitstring: String,
    /// Raw sampled histogram.
    pub histogram: Counts,
    /// Velocities visited by `controls`, initial velocity first.
    pub trajectory: Vec<f64>,
    /// Angles and weights the circuit was bound to.
    pub parameters: AnsatzParameters,
}

/// Hybrid thrust planner.
#[derive(Debug, Clone)]
pub struct ThrustRunner {
    config: HybridConfig,
    mission: Mission,
    parameters: AnsatzParameters,
}

impl ThrustRunner {
    /// Create a runner, validating `config`.
    ///
    /// A register wider than `sampler.max_qubits` is rejected here, before
    /// any weight vector or circuit is allocated.
    pub fn new(config: HybridConfig) -> HybridResult<Self> {
        config.validate()?;
        let (requested, limit) = (config.problem.num_steps, config.sampler.max_qubits);
        if requested > limit {
            return Err(HybridError::ResourceLimit {
                stage: Stage::Build,
                requested,
                limit,
            });
        }
        let mission = Mission::from_config(&config.problem);
        let parameters = AnsatzParameters::from_config(&config);
        Ok(Self {
            config,
            mission,
            parameters,
        })
    }

    /// Override the ansatz angles and weights.
    pub fn with_parameters(mut self, parameters: AnsatzParameters) -> HybridResult<Self> {
        let steps = self.config.problem.num_steps as usize;
        if parameters.weights.len() != steps {
            return Err(HybridError::config(
                "ansatz.weights",
                format!("expected {} weights, got {}", steps, parameters.weights.len()),
            ));
        }
        self.parameters = parameters;
        Ok(self)
    }

    /// The configuration this runner was built from.
    pub fn config(&self) -> &HybridConfig {
        &self.config
    }

    /// The mission being planned.
    pub fn mission(&self) -> &Mission {
        &self.mission
    }

    /// The bound ansatz values.
    pub fn parameters(&self) -> &AnsatzParameters {
        &self.parameters
    }

    /// Build the symbolic ansatz.
    pub fn build_circuit(&self) -> HybridResult<Circuit> {
        variational_ansatz(self.config.problem.num_steps, self.config.ansatz.depth)
    }

    /// Sampler seeded from the configuration.
    pub fn sampler(&self) -> StatevectorSampler {
        StatevectorSampler::new(self.config.sampler.seed)
            .with_max_qubits(self.config.sampler.max_qubits)
    }

    /// Run with a sampler seeded from the configuration.
    pub fn run(&self) -> HybridResult<ThrustResult> {
        self.run_with_sampler(&mut self.sampler())
    }

    /// Run with a caller-supplied sampler.
    pub fn run_with_sampler(&self, sampler: &mut StatevectorSampler) -> HybridResult<ThrustResult> {
        let span = info_span!(
            "thrust_run",
            steps = self.config.problem.num_steps,
            depth = self.config.ansatz.depth
        );
        let _guard = span.enter();

        let circuit = self.build_circuit()?;
        debug!(
            stage = %Stage::Build,
            instructions = circuit.len(),
            depth = circuit.depth(),
            parameters = circuit.parameters().len(),
            "built ansatz"
        );

        let bound = circuit.bind(&self.parameters.binding());
        if let Some(name) = bound.parameters().into_iter().next() {
            return Err(HybridError::config(
                format!("ansatz.{name}"),
                "parameter has no value",
            ));
        }
        debug!(
            stage = %Stage::Bind,
            alpha = self.parameters.alpha,
            beta = self.parameters.beta,
            "bound parameters"
        );

        let shots = self.config.sampler.shots;
        let histogram = sampler
            .sample(&bound, shots)
            .map_err(|e| HybridError::from_sim(Stage::Sample, e))?
            .into_histogram(RESULT_KEY)
            .ok_or_else(|| {
                HybridError::config("ansatz", format!("circuit has no '{RESULT_KEY}' measurement"))
            })?;
        info!(stage = %Stage::Sample, shots, outcomes = histogram.len(), "sampled circuit");

        let seed = extract_seed(&histogram)?;
        let seed_bitstring = most_frequent(&histogram)
            .map(|(bits, _)| bits.to_string())
            .unwrap_or_default();
        info!(stage = %Stage::Extract, bitstring = %seed_bitstring, "extracted seed");

        let mission = self.mission;
        let refiner = &self.config.refiner;
        let refined = refine(
            &seed,
            |u: &[f64]| mission.objective(u),
            |u: &[f64]| mission.constraint(u),
            &refiner.bounds(seed.len()),
            refiner,
        )?;

        if refined.converged {
            info!(
                stage = %Stage::Refine,
                iterations = refined.num_iterations,
                objective = refined.optimal_value,
                "refined schedule"
            );
        } else {
            warn!(
                stage = %Stage::Refine,
                message = %refined.message,
                "returning best-effort schedule"
            );
        }

        let trajectory = mission.trajectory(&refined.optimal_params);
        Ok(ThrustResult {
            controls: refined.optimal_params,
            objective: refined.optimal_value,
            constraint_residual: refined.constraint_residual,
            converged: refined.converged,
            iterations: refined.num_iterations,
            evaluations: refined.num_evaluations,
            message: refined.message,
            seed,
            seed_bitstring,
            histogram,
            trajectory,
            parameters: self.parameters.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config(steps: u32, target: f64) -> HybridConfig {
        let mut config = HybridConfig::default();
        config.problem.num_steps = steps;
        config.problem.target_velocity = target;
        config.ansatz.depth = 1;
        config.sampler.shots = 100;
        config.sampler.seed = Some(42);
        config
    }

    #[test]
    fn test_full_pipeline_reaches_target() {
        let result = ThrustRunner::new(config(5, 5.0)).unwrap().run().unwrap();

        assert!(result.converged, "{}", result.message);
        assert_eq!(result.controls.len(), 5);
        assert!(result.constraint_residual.abs() <= 1e-6);
        assert_relative_eq!(result.objective, 0.05, epsilon = 1e-6);
        assert_eq!(result.trajectory.len(), 6);
        assert_relative_eq!(result.trajectory[5], 5.0, epsilon = 1e-6);
        assert_eq!(result.histogram.total(), 100);
    }

    #[test]
    fn test_seed_matches_most_frequent_outcome() {
        let result = ThrustRunner::new(config(3, 1.5)).unwrap().run().unwrap();
        let (bits, _) = result.histogram.sorted()[0];
        assert_eq!(result.seed_bitstring, bits);
        assert_eq!(result.seed.len(), 3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut c = config(3, 1.0);
        c.sampler.shots = 0;
        assert!(ThrustRunner::new(c).unwrap_err().is_configuration());
    }

    #[test]
    fn test_oversized_register_is_resource_error() {
        let mut c = config(12, 6.0);
        c.sampler.max_qubits = 8;
        let err = ThrustRunner::new(c).unwrap_err();
        assert!(err.is_resource_limit());
        assert!(err.to_string().starts_with("build stage"));
    }

    #[test]
    fn test_huge_register_rejected_before_building() {
        let mut c = config(1, 1.0);
        c.problem.num_steps = u32::MAX;
        let err = ThrustRunner::new(c).unwrap_err();
        assert!(matches!(
            err,
            HybridError::ResourceLimit {
                stage: Stage::Build,
                requested: u32::MAX,
                limit: 24,
            }
        ));
    }

    #[test]
    fn test_sampler_limit_still_applies_to_injected_sampler() {
        let runner = ThrustRunner::new(config(6, 3.0)).unwrap();
        let mut small = StatevectorSampler::new(Some(1)).with_max_qubits(4);
        let err = runner.run_with_sampler(&mut small).unwrap_err();
        assert!(err.to_string().starts_with("sample stage"));
        assert!(err.is_resource_limit());
    }

    #[test]
    fn test_wrong_weight_count_rejected() {
        let runner = ThrustRunner::new(config(3, 1.0)).unwrap();
        let err = runner
            .with_parameters(AnsatzParameters::new(0.5, 0.25, vec![0.1; 2]))
            .unwrap_err();
        assert!(err.is_configuration());
    }
}
