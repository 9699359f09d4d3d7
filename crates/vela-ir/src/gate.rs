//! Gate definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::parameter::{ParameterBinding, ParameterExpression};

/// Gates understood by the Vela simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Hadamard.
    H,
    /// Pauli-X.
    X,
    /// Pauli-Z.
    Z,
    /// Rotation about X: `exp(-i θ/2 X)`.
    Rx(ParameterExpression),
    /// Rotation about Z: `exp(-i θ/2 Z)`.
    Rz(ParameterExpression),
    /// Controlled-NOT (control, target).
    CX,
}

impl StandardGate {
    /// OpenQASM-style gate name.
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::H => "h",
            StandardGate::X => "x",
            StandardGate::Z => "z",
            StandardGate::Rx(_) => "rx",
            StandardGate::Rz(_) => "rz",
            StandardGate::CX => "cx",
        }
    }

    /// Number of qubits the gate acts on.
    pub fn num_qubits(&self) -> usize {
        match self {
            StandardGate::CX => 2,
            _ => 1,
        }
    }

    /// The rotation angle, for parameterized gates.
    pub fn parameter(&self) -> Option<&ParameterExpression> {
        match self {
            StandardGate::Rx(p) | StandardGate::Rz(p) => Some(p),
            _ => None,
        }
    }

    /// Substitute bound symbols in the angle.
    pub fn bind(&self, binding: &ParameterBinding) -> Self {
        match self {
            StandardGate::Rx(p) => StandardGate::Rx(p.bind(binding)),
            StandardGate::Rz(p) => StandardGate::Rz(p.bind(binding)),
            other => other.clone(),
        }
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parameter() {
            Some(p) => write!(f, "{}({})", self.name(), p),
            None => write!(f, "{}", self.name()),
        }
    }
}
