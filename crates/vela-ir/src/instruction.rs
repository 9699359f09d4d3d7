//! Circuit instructions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::gate::StandardGate;
use crate::qubit::QubitId;

/// What an instruction does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A unitary gate.
    Gate(StandardGate),
    /// Joint computational-basis measurement recorded under `key`.
    Measure { key: String },
}

/// A single operation applied to a list of qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The operation.
    pub kind: InstructionKind,
    /// Target qubits, in operand order.
    pub qubits: Vec<QubitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: StandardGate, qubits: Vec<QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate),
            qubits,
        }
    }

    /// Create a measurement instruction.
    pub fn measure(key: impl Into<String>, qubits: Vec<QubitId>) -> Self {
        Self {
            kind: InstructionKind::Measure { key: key.into() },
            qubits,
        }
    }

    /// True for measurements.
    pub fn is_measurement(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure { .. })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let qubits: Vec<String> = self.qubits.iter().map(ToString::to_string).collect();
        match &self.kind {
            InstructionKind::Gate(g) => write!(f, "{} {}", g, qubits.join(", ")),
            InstructionKind::Measure { key } => {
                write!(f, "measure[{}] {}", key, qubits.join(", "))
            }
        }
    }
}
