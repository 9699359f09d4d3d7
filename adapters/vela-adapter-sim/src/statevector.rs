//! Dense statevector simulation.
//!
//! Basis index bit `q` holds the state of qubit `q`, so `|q1 q0⟩ = |10⟩` is
//! index 2.

use ndarray::Array1;
use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;

use vela_ir::{IrError, ParameterExpression, QubitId, StandardGate};

use crate::error::{SimError, SimResult};

/// Amplitudes of an `n`-qubit pure state.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    num_qubits: usize,
    amplitudes: Array1<Complex64>,
}

impl Statevector {
    /// The all-zero state `|0...0⟩`.
    pub fn zero_state(num_qubits: usize) -> Self {
        let mut amplitudes = Array1::<Complex64>::zeros(1 << num_qubits);
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            num_qubits,
            amplitudes,
        }
    }

    /// Register size.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Raw amplitudes.
    pub fn amplitudes(&self) -> &Array1<Complex64> {
        &self.amplitudes
    }

    /// Outcome probabilities `|ψ_i|²`, indexed like the amplitudes.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Apply a gate. `instruction` is only used for error context.
    pub fn apply(
        &mut self,
        gate: &StandardGate,
        qubits: &[QubitId],
        instruction: usize,
    ) -> SimResult<()> {
        if qubits.len() != gate.num_qubits() {
            return Err(IrError::ArityMismatch {
                gate: gate.name(),
                expected: gate.num_qubits(),
                actual: qubits.len(),
            }
            .into());
        }
        if let Some(q) = qubits.iter().find(|q| q.index() >= self.num_qubits) {
            return Err(IrError::QubitOutOfRange {
                qubit: q.0,
                num_qubits: self.num_qubits as u32,
            }
            .into());
        }
        match gate {
            StandardGate::H => self.apply_h(qubits[0].index()),
            StandardGate::X => self.apply_x(qubits[0].index()),
            StandardGate::Z => self.apply_z(qubits[0].index()),
            StandardGate::Rx(p) => self.apply_rx(angle(p, instruction)?, qubits[0].index()),
            StandardGate::Rz(p) => self.apply_rz(angle(p, instruction)?, qubits[0].index()),
            StandardGate::CX => self.apply_cx(qubits[0].index(), qubits[1].index()),
        }
        Ok(())
    }

    fn apply_h(&mut self, q: usize) {
        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        for i in 0..self.amplitudes.len() {
            if (i >> q) & 1 == 0 {
                let j = i | (1 << q);
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = h * (a + b);
                self.amplitudes[j] = h * (a - b);
            }
        }
    }

    fn apply_x(&mut self, q: usize) {
        for i in 0..self.amplitudes.len() {
            if (i >> q) & 1 == 0 {
                self.amplitudes.swap(i, i | (1 << q));
            }
        }
    }

    fn apply_z(&mut self, q: usize) {
        for i in 0..self.amplitudes.len() {
            if (i >> q) & 1 == 1 {
                self.amplitudes[i] = -self.amplitudes[i];
            }
        }
    }

    fn apply_rx(&mut self, theta: f64, q: usize) {
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let s = Complex64::new(0.0, -(theta / 2.0).sin());
        for i in 0..self.amplitudes.len() {
            if (i >> q) & 1 == 0 {
                let j = i | (1 << q);
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + s * b;
                self.amplitudes[j] = s * a + c * b;
            }
        }
    }

    fn apply_rz(&mut self, theta: f64, q: usize) {
        let phase0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase1 = Complex64::from_polar(1.0, theta / 2.0);
        for i in 0..self.amplitudes.len() {
            if (i >> q) & 1 == 0 {
                self.amplitudes[i] *= phase0;
            } else {
                self.amplitudes[i] *= phase1;
            }
        }
    }

    fn apply_cx(&mut self, control: usize, target: usize) {
        for i in 0..self.amplitudes.len() {
            if (i >> control) & 1 == 1 && (i >> target) & 1 == 0 {
                self.amplitudes.swap(i, i | (1 << target));
            }
        }
    }
}

fn angle(p: &ParameterExpression, instruction: usize) -> SimResult<f64> {
    match p {
        ParameterExpression::Value(v) => Ok(*v),
        ParameterExpression::Symbol { name, .. } => Err(SimError::UnboundParameter {
            name: name.clone(),
            instruction,
        }),
    }
}
