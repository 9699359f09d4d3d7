//! Error types for the hybrid pipeline.
//!
//! Two failure classes are fatal: configuration errors (bad sizes, bounds,
//! unbound parameters) and resource limits (registers too large to
//! simulate). Failure to converge is not an error; it is reported through
//! [`crate::OptimizationResult::converged`].

use std::fmt;

use thiserror::Error;
use vela_adapter_sim::SimError;
use vela_ir::IrError;

/// Result type alias for hybrid pipeline operations.
pub type HybridResult<T> = std::result::Result<T, HybridError>;

/// Pipeline stage, carried in errors for diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Circuit construction.
    Build,
    /// Parameter binding.
    Bind,
    /// Shot sampling.
    Sample,
    /// Seed extraction.
    Extract,
    /// Classical refinement.
    Refine,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Build => "build",
            Stage::Bind => "bind",
            Stage::Sample => "sample",
            Stage::Extract => "extract",
            Stage::Refine => "refine",
        };
        f.write_str(name)
    }
}

/// Errors raised by the hybrid pipeline.
#[derive(Error, Debug)]
pub enum HybridError {
    /// A configuration value or call argument is invalid.
    #[error("configuration error in '{field}': {message}")]
    Config { field: String, message: String },

    /// The register is too large for the statevector simulator.
    #[error("{stage} stage: {requested} qubits exceed the simulator limit of {limit}")]
    ResourceLimit {
        stage: Stage,
        requested: u32,
        limit: u32,
    },

    /// The simulator rejected the circuit.
    #[error("{stage} stage: {source}")]
    Simulation {
        stage: Stage,
        #[source]
        source: SimError,
    },

    /// Circuit construction failed.
    #[error("{stage} stage: {source}")]
    Circuit {
        stage: Stage,
        #[source]
        source: IrError,
    },

    /// The histogram held no outcomes.
    #[error("cannot extract a seed from an empty histogram")]
    EmptyHistogram,

    /// Configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl HybridError {
    /// Build a [`HybridError::Config`].
    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        HybridError::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Classify a simulator error raised during `stage`.
    pub fn from_sim(stage: Stage, err: SimError) -> Self {
        match err {
            SimError::QubitLimit { requested, limit } => HybridError::ResourceLimit {
                stage,
                requested,
                limit,
            },
            SimError::UnboundParameter { name, instruction } => HybridError::config(
                format!("ansatz.{name}"),
                format!("{stage} stage: parameter is unbound at instruction {instruction}"),
            ),
            SimError::InvalidShots(shots) => HybridError::config(
                "sampler.shots",
                format!("{stage} stage: must be at least 1, got {shots}"),
            ),
            source => HybridError::Simulation { stage, source },
        }
    }

    /// True for configuration errors.
    pub fn is_configuration(&self) -> bool {
        matches!(self, HybridError::Config { .. })
    }

    /// True when the problem exceeds the simulator's capacity.
    pub fn is_resource_limit(&self) -> bool {
        matches!(self, HybridError::ResourceLimit { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_limit_maps_to_resource_error() {
        let err = HybridError::from_sim(
            Stage::Sample,
            SimError::QubitLimit {
                requested: 40,
                limit: 24,
            },
        );
        assert!(err.is_resource_limit());
        assert_eq!(
            err.to_string(),
            "sample stage: 40 qubits exceed the simulator limit of 24"
        );
    }

    #[test]
    fn test_unbound_parameter_is_configuration() {
        let err = HybridError::from_sim(
            Stage::Sample,
            SimError::UnboundParameter {
                name: "beta".into(),
                instruction: 7,
            },
        );
        assert!(err.is_configuration());
        assert_eq!(
            err.to_string(),
            "configuration error in 'ansatz.beta': sample stage: parameter is unbound at instruction 7"
        );
    }
}
