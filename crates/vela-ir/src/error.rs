//! Error types for circuit construction.

use thiserror::Error;

/// Result type alias for IR operations.
pub type IrResult<T> = std::result::Result<T, IrError>;

/// Errors raised while building or inspecting a circuit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IrError {
    /// A gate or measurement referenced a qubit outside the register.
    #[error("qubit {qubit} is out of range for a {num_qubits}-qubit circuit")]
    QubitOutOfRange { qubit: u32, num_qubits: u32 },

    /// A multi-qubit instruction listed the same qubit twice.
    #[error("qubit {0} appears more than once in one instruction")]
    DuplicateQubit(u32),

    /// Two measurements were recorded under the same key.
    #[error("measurement key '{0}' is already in use")]
    DuplicateMeasurementKey(String),

    /// A measurement with no qubits.
    #[error("measurement '{0}' has no qubits")]
    EmptyMeasurement(String),

    /// A gate was given the wrong number of qubits.
    #[error("gate '{gate}' acts on {expected} qubit(s), got {actual}")]
    ArityMismatch {
        gate: &'static str,
        expected: usize,
        actual: usize,
    },
}
