//! Simulator error types.

use thiserror::Error;
use vela_ir::IrError;

/// Result type alias for simulator operations.
pub type SimResult<T> = std::result::Result<T, SimError>;

/// Errors raised by the simulator and sampler.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Shot count must be positive.
    #[error("shot count must be at least 1, got {0}")]
    InvalidShots(u32),

    /// A gate angle still references a free symbol.
    #[error("parameter '{name}' is unbound (instruction {instruction})")]
    UnboundParameter { name: String, instruction: usize },

    /// The register does not fit in memory as a statevector.
    #[error("{requested} qubits exceed the statevector limit of {limit}")]
    QubitLimit { requested: u32, limit: u32 },

    /// The circuit cannot be sampled as written.
    #[error("invalid circuit: {0}")]
    InvalidCircuit(String),

    /// A histogram entry does not match the register width.
    #[error("bitstring '{bitstring}' is not a {expected_bits}-bit outcome")]
    InvalidBitstring {
        bitstring: String,
        expected_bits: usize,
    },

    /// Error from the circuit IR.
    #[error(transparent)]
    Ir(#[from] IrError),
}

impl SimError {
    /// True for caller mistakes: bad shots, unbound symbols, malformed input.
    pub fn is_configuration(&self) -> bool {
        !self.is_resource_limit()
    }

    /// True when the problem is too large to simulate.
    pub fn is_resource_limit(&self) -> bool {
        matches!(self, SimError::QubitLimit { .. })
    }
}
