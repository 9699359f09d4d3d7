//! Qubit identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a qubit inside a circuit register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// The register index as `usize`, for statevector bit arithmetic.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// All qubits of an `n`-qubit register in ascending order.
    pub fn range(n: u32) -> impl Iterator<Item = QubitId> {
        (0..n).map(QubitId)
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q[{}]", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(value: u32) -> Self {
        QubitId(value)
    }
}
