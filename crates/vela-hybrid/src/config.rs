//! Pipeline configuration.
//!
//! Configuration is assembled from, in increasing priority:
//!
//! 1. Built-in defaults
//! 2. A YAML file
//! 3. Environment variables (`VELA_*`)
//!
//! Binaries may apply CLI flags on top before calling
//! [`HybridConfig::validate`].

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use vela_adapter_sim::{DEFAULT_MAX_QUBITS, MAX_SUPPORTED_QUBITS};

use crate::error::{HybridError, HybridResult};

/// Complete configuration of one hybrid run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HybridConfig {
    /// Dynamics and mission targets.
    #[serde(default)]
    pub problem: ProblemConfig,

    /// Variational circuit shape and angles.
    #[serde(default)]
    pub ansatz: AnsatzConfig,

    /// Shot sampling.
    #[serde(default)]
    pub sampler: SamplerConfig,

    /// Classical refinement.
    #[serde(default)]
    pub refiner: RefinerConfig,
}

impl HybridConfig {
    /// Load from an optional YAML file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> HybridResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_yaml(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a YAML document. Missing sections take their defaults.
    pub fn from_yaml(content: &str) -> HybridResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply `VELA_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> HybridResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("VELA_SEED") {
            self.sampler.seed = Some(parse_override("VELA_SEED", &val)?);
        }
        if let Some(val) = lookup("VELA_SHOTS") {
            self.sampler.shots = parse_override("VELA_SHOTS", &val)?;
        }
        if let Some(val) = lookup("VELA_DEPTH") {
            self.ansatz.depth = parse_override("VELA_DEPTH", &val)?;
        }
        if let Some(val) = lookup("VELA_NUM_STEPS") {
            self.problem.num_steps = parse_override("VELA_NUM_STEPS", &val)?;
        }
        Ok(())
    }

    /// Validate every section.
    pub fn validate(&self) -> HybridResult<()> {
        self.problem.validate()?;
        self.ansatz.validate(self.problem.num_steps)?;
        self.sampler.validate()?;
        self.refiner.validate()
    }
}

fn parse_override<T: std::str::FromStr>(key: &str, val: &str) -> HybridResult<T> {
    val.trim()
        .parse()
        .map_err(|_| HybridError::config(key, format!("cannot parse '{val}'")))
}

fn require_finite(field: &str, value: f64) -> HybridResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(HybridError::config(field, format!("must be finite, got {value}")))
    }
}

/// Dynamics model and mission targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProblemConfig {
    /// Number of time steps (and qubits).
    #[serde(default = "default_num_steps")]
    pub num_steps: u32,

    /// Fuel consumed per unit of thrust.
    #[serde(default = "default_fuel_rate")]
    pub fuel_rate: f64,

    /// Velocity before the first step.
    #[serde(default)]
    pub initial_velocity: f64,

    /// Required velocity after the last step.
    #[serde(default = "default_target_velocity")]
    pub target_velocity: f64,
}

impl Default for ProblemConfig {
    fn default() -> Self {
        Self {
            num_steps: default_num_steps(),
            fuel_rate: default_fuel_rate(),
            initial_velocity: 0.0,
            target_velocity: default_target_velocity(),
        }
    }
}

impl ProblemConfig {
    pub fn validate(&self) -> HybridResult<()> {
        if self.num_steps == 0 {
            return Err(HybridError::config("problem.num_steps", "must be at least 1"));
        }
        require_finite("problem.fuel_rate", self.fuel_rate)?;
        if self.fuel_rate < 0.0 {
            return Err(HybridError::config(
                "problem.fuel_rate",
                format!("must be non-negative, got {}", self.fuel_rate),
            ));
        }
        require_finite("problem.initial_velocity", self.initial_velocity)?;
        require_finite("problem.target_velocity", self.target_velocity)
    }
}

/// Variational circuit shape and angles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnsatzConfig {
    /// Number of cost/mixing rounds.
    #[serde(default = "default_depth")]
    pub depth: u32,

    /// Shared cost-layer angle.
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Shared mixing-layer angle.
    #[serde(default = "default_beta")]
    pub beta: f64,

    /// Per-step cost weights. Defaults to the fuel rate for every step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
}

impl Default for AnsatzConfig {
    fn default() -> Self {
        Self {
            depth: default_depth(),
            alpha: default_alpha(),
            beta: default_beta(),
            weights: None,
        }
    }
}

impl AnsatzConfig {
    pub fn validate(&self, num_steps: u32) -> HybridResult<()> {
        if self.depth == 0 {
            return Err(HybridError::config("ansatz.depth", "must be at least 1"));
        }
        require_finite("ansatz.alpha", self.alpha)?;
        require_finite("ansatz.beta", self.beta)?;
        if let Some(weights) = &self.weights {
            if weights.len() != num_steps as usize {
                return Err(HybridError::config(
                    "ansatz.weights",
                    format!("expected {} weights, got {}", num_steps, weights.len()),
                ));
            }
            if let Some(w) = weights.iter().find(|w| !w.is_finite()) {
                return Err(HybridError::config(
                    "ansatz.weights",
                    format!("must be finite, got {w}"),
                ));
            }
        }
        Ok(())
    }
}

/// Shot sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SamplerConfig {
    /// Circuit executions per run.
    #[serde(default = "default_shots")]
    pub shots: u32,

    /// Generator seed; `None` draws from OS entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Largest register the simulator will allocate.
    #[serde(default = "default_max_qubits")]
    pub max_qubits: u32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            shots: default_shots(),
            seed: None,
            max_qubits: default_max_qubits(),
        }
    }
}

impl SamplerConfig {
    pub fn validate(&self) -> HybridResult<()> {
        if self.shots == 0 {
            return Err(HybridError::config("sampler.shots", "must be at least 1"));
        }
        if self.max_qubits == 0 || self.max_qubits > MAX_SUPPORTED_QUBITS {
            return Err(HybridError::config(
                "sampler.max_qubits",
                format!(
                    "must be between 1 and {MAX_SUPPORTED_QUBITS}, got {}",
                    self.max_qubits
                ),
            ));
        }
        Ok(())
    }
}

/// Classical refinement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefinerConfig {
    /// Lower bound for every control.
    #[serde(default)]
    pub lower_bound: f64,

    /// Upper bound for every control.
    #[serde(default = "default_upper_bound")]
    pub upper_bound: f64,

    /// Projected-gradient tolerance.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Allowed absolute constraint residual.
    #[serde(default = "default_tolerance")]
    pub constraint_tolerance: f64,

    /// Outer (multiplier update) iteration cap.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Inner (projected gradient) iteration cap per outer iteration.
    #[serde(default = "default_inner_iterations")]
    pub inner_iterations: usize,
}

impl Default for RefinerConfig {
    fn default() -> Self {
        Self {
            lower_bound: 0.0,
            upper_bound: default_upper_bound(),
            tolerance: default_tolerance(),
            constraint_tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            inner_iterations: default_inner_iterations(),
        }
    }
}

impl RefinerConfig {
    /// The same `[lower, upper]` box for each of `n` controls.
    pub fn bounds(&self, n: usize) -> Vec<(f64, f64)> {
        vec![(self.lower_bound, self.upper_bound); n]
    }

    pub fn validate(&self) -> HybridResult<()> {
        require_finite("refiner.lower_bound", self.lower_bound)?;
        require_finite("refiner.upper_bound", self.upper_bound)?;
        if self.lower_bound > self.upper_bound {
            return Err(HybridError::config(
                "refiner.lower_bound",
                format!(
                    "lower bound {} exceeds upper bound {}",
                    self.lower_bound, self.upper_bound
                ),
            ));
        }
        if self.tolerance.is_nan() || self.tolerance <= 0.0 {
            return Err(HybridError::config("refiner.tolerance", "must be positive"));
        }
        if self.constraint_tolerance.is_nan() || self.constraint_tolerance <= 0.0 {
            return Err(HybridError::config(
                "refiner.constraint_tolerance",
                "must be positive",
            ));
        }
        if self.max_iterations == 0 {
            return Err(HybridError::config("refiner.max_iterations", "must be at least 1"));
        }
        if self.inner_iterations == 0 {
            return Err(HybridError::config(
                "refiner.inner_iterations",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

fn default_num_steps() -> u32 {
    10
}

fn default_fuel_rate() -> f64 {
    0.01
}

fn default_target_velocity() -> f64 {
    10.0
}

fn default_depth() -> u32 {
    2
}

fn default_alpha() -> f64 {
    0.5
}

fn default_beta() -> f64 {
    0.25
}

fn default_shots() -> u32 {
    1000
}

fn default_max_qubits() -> u32 {
    DEFAULT_MAX_QUBITS
}

fn default_upper_bound() -> f64 {
    1.0
}

fn default_tolerance() -> f64 {
    1e-6
}

fn default_max_iterations() -> usize {
    100
}

fn default_inner_iterations() -> usize {
    500
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = HybridConfig::default();
        config.validate().unwrap();
        assert_eq!(config.problem.num_steps, 10);
        assert_eq!(config.ansatz.depth, 2);
        assert_eq!(config.sampler.shots, 1000);
        assert_eq!(config.refiner.bounds(3), vec![(0.0, 1.0); 3]);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = HybridConfig::from_yaml(
            "problem:\n  num_steps: 3\nsampler:\n  shots: 100\n  seed: 42\n",
        )
        .unwrap();
        assert_eq!(config.problem.num_steps, 3);
        assert_eq!(config.problem.fuel_rate, 0.01);
        assert_eq!(config.sampler.seed, Some(42));
        assert_eq!(config.refiner.max_iterations, 100);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            HybridConfig::from_yaml("problem:\n  steps: 3\n"),
            Err(HybridError::Parse(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let mut config = HybridConfig::default();
        config
            .apply_overrides(|key| match key {
                "VELA_SEED" => Some("7".into()),
                "VELA_SHOTS" => Some(" 250 ".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.sampler.seed, Some(7));
        assert_eq!(config.sampler.shots, 250);
        assert_eq!(config.ansatz.depth, 2);
    }

    #[test]
    fn test_bad_override() {
        let mut config = HybridConfig::default();
        let err = config
            .apply_overrides(|key| (key == "VELA_DEPTH").then(|| "two".to_string()))
            .unwrap_err();
        assert!(matches!(err, HybridError::Config { ref field, .. } if field == "VELA_DEPTH"));
    }

    fn field_of(config: &HybridConfig) -> String {
        match config.validate() {
            Err(HybridError::Config { field, .. }) => field,
            other => panic!("expected a configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_rejects_each_field() {
        let mut c = HybridConfig::default();
        c.problem.num_steps = 0;
        assert_eq!(field_of(&c), "problem.num_steps");

        let mut c = HybridConfig::default();
        c.problem.fuel_rate = -0.5;
        assert_eq!(field_of(&c), "problem.fuel_rate");

        let mut c = HybridConfig::default();
        c.ansatz.depth = 0;
        assert_eq!(field_of(&c), "ansatz.depth");

        let mut c = HybridConfig::default();
        c.ansatz.weights = Some(vec![0.1; 3]);
        assert_eq!(field_of(&c), "ansatz.weights");

        let mut c = HybridConfig::default();
        c.sampler.shots = 0;
        assert_eq!(field_of(&c), "sampler.shots");

        let mut c = HybridConfig::default();
        c.sampler.max_qubits = 31;
        assert_eq!(field_of(&c), "sampler.max_qubits");

        let mut c = HybridConfig::default();
        c.refiner.lower_bound = 2.0;
        assert_eq!(field_of(&c), "refiner.lower_bound");

        let mut c = HybridConfig::default();
        c.refiner.tolerance = 0.0;
        assert_eq!(field_of(&c), "refiner.tolerance");

        let mut c = HybridConfig::default();
        c.refiner.max_iterations = 0;
        assert_eq!(field_of(&c), "refiner.max_iterations");
    }
}
