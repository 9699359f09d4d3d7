//! Layered cost/mixing ansatz with symbolic parameters.
//!
//! The circuit alternates a cost layer, which encodes the per-step fuel
//! weights, and a mixing layer, which spreads amplitude across bitstrings.
//! All angles stay symbolic until [`AnsatzParameters::binding`] supplies
//! numbers, so one template serves every evaluation.

use serde::{Deserialize, Serialize};

use vela_ir::{Circuit, IrResult, ParameterBinding, ParameterExpression, QubitId};

use crate::config::HybridConfig;
use crate::error::{HybridError, HybridResult, Stage};

/// Shared cost-layer angle.
pub const ALPHA: &str = "alpha";

/// Shared mixing-layer angle.
pub const BETA: &str = "beta";

/// Measurement key of the joint outcome.
pub const RESULT_KEY: &str = "result";

/// Symbol of the cost weight on qubit `i`.
pub fn weight_symbol(i: u32) -> String {
    format!("w_{i}")
}

/// Number of free parameters: `alpha`, `beta` and one weight per qubit.
pub fn num_parameters(num_qubits: u32) -> usize {
    2 + num_qubits as usize
}

/// Build the parameterized ansatz.
///
/// Structure:
/// 1. `H` on every qubit
/// 2. `depth` rounds of
///    - cost layer: `RX(-2·alpha)` on every qubit, then `RZ(2·w_i)` on qubit
///      `i`, i.e. `exp(-i w_i Z_i)`
///    - mixing layer: `RX(2·beta)` on every qubit, then the summed Pauli-X
///      mixer term as `X` on every qubit
/// 3. `H` on every qubit
/// 4. Joint measurement of all qubits under [`RESULT_KEY`]
///
/// Identical arguments always produce equal circuits.
pub fn variational_ansatz(num_qubits: u32, depth: u32) -> HybridResult<Circuit> {
    if num_qubits == 0 {
        return Err(HybridError::config(
            "problem.num_steps",
            "the ansatz needs at least one qubit",
        ));
    }
    if depth == 0 {
        return Err(HybridError::config("ansatz.depth", "must be at least 1"));
    }
    build(num_qubits, depth).map_err(|source| HybridError::Circuit {
        stage: Stage::Build,
        source,
    })
}

fn build(num_qubits: u32, depth: u32) -> IrResult<Circuit> {
    let mut circuit = Circuit::with_size("variational_ansatz", num_qubits);

    for q in QubitId::range(num_qubits) {
        circuit.h(q)?;
    }

    for _ in 0..depth {
        apply_cost_layer(&mut circuit, num_qubits)?;
        apply_mixing_layer(&mut circuit, num_qubits)?;
    }

    for q in QubitId::range(num_qubits) {
        circuit.h(q)?;
    }

    circuit.measure_all(RESULT_KEY)?;
    Ok(circuit)
}

fn apply_cost_layer(circuit: &mut Circuit, num_qubits: u32) -> IrResult<()> {
    for q in QubitId::range(num_qubits) {
        circuit.rx(ParameterExpression::symbol(ALPHA).scaled(-2.0), q)?;
    }
    for q in QubitId::range(num_qubits) {
        circuit.rz(ParameterExpression::symbol(weight_symbol(q.0)).scaled(2.0), q)?;
    }
    Ok(())
}

fn apply_mixing_layer(circuit: &mut Circuit, num_qubits: u32) -> IrResult<()> {
    for q in QubitId::range(num_qubits) {
        circuit.rx(ParameterExpression::symbol(BETA).scaled(2.0), q)?;
    }
    for q in QubitId::range(num_qubits) {
        circuit.x(q)?;
    }
    Ok(())
}

/// Numeric values for the ansatz symbols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnsatzParameters {
    /// Cost-layer angle.
    pub alpha: f64,
    /// Mixing-layer angle.
    pub beta: f64,
    /// Per-qubit cost weights.
    pub weights: Vec<f64>,
}

impl AnsatzParameters {
    /// Create a parameter set.
    pub fn new(alpha: f64, beta: f64, weights: Vec<f64>) -> Self {
        Self {
            alpha,
            beta,
            weights,
        }
    }

    /// Take angles and weights from the configuration.
    ///
    /// Without explicit weights every step is weighted by the fuel rate.
    pub fn from_config(config: &HybridConfig) -> Self {
        let weights = config.ansatz.weights.clone().unwrap_or_else(|| {
            vec![config.problem.fuel_rate; config.problem.num_steps as usize]
        });
        Self::new(config.ansatz.alpha, config.ansatz.beta, weights)
    }

    /// Symbol values for [`Circuit::bind`].
    pub fn binding(&self) -> ParameterBinding {
        let mut binding = ParameterBinding::new()
            .with(ALPHA, self.alpha)
            .with(BETA, self.beta);
        for (i, w) in self.weights.iter().enumerate() {
            binding.insert(weight_symbol(i as u32), *w);
        }
        binding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_ir::InstructionKind;

    #[test]
    fn test_ansatz_shape() {
        let circuit = variational_ansatz(3, 2).unwrap();

        assert_eq!(circuit.num_qubits(), 3);
        // 2 Hadamard layers + 2 rounds of 4 single-qubit layers + measure
        assert_eq!(circuit.len(), 3 * 2 + 2 * 4 * 3 + 1);
        assert_eq!(circuit.depth(), 2 + 2 * 4 + 1);

        let keys: Vec<_> = circuit.measurement_keys().collect();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].0, RESULT_KEY);
        assert_eq!(keys[0].1.len(), 3);
    }

    #[test]
    fn test_parameters_are_symbolic() {
        let circuit = variational_ansatz(4, 1).unwrap();
        let names: Vec<String> = circuit.parameters().into_iter().collect();
        assert_eq!(names, vec!["alpha", "beta", "w_0", "w_1", "w_2", "w_3"]);
        assert_eq!(names.len(), num_parameters(4));
    }

    #[test]
    fn test_build_is_idempotent() {
        assert_eq!(variational_ansatz(5, 3).unwrap(), variational_ansatz(5, 3).unwrap());
    }

    #[test]
    fn test_cost_layer_angles() {
        let circuit = variational_ansatz(2, 1).unwrap();
        let bound = circuit.bind(&AnsatzParameters::new(0.5, 0.25, vec![0.1, 0.2]).binding());
        assert!(!bound.is_parameterized());

        let angles: Vec<(String, f64)> = bound
            .instructions()
            .iter()
            .filter_map(|instr| match &instr.kind {
                InstructionKind::Gate(g) => g
                    .parameter()
                    .and_then(|p| p.as_f64())
                    .map(|angle| (g.name().to_string(), angle)),
                InstructionKind::Measure { .. } => None,
            })
            .collect();

        assert_eq!(
            angles,
            vec![
                ("rx".to_string(), -1.0),
                ("rx".to_string(), -1.0),
                ("rz".to_string(), 0.2),
                ("rz".to_string(), 0.4),
                ("rx".to_string(), 0.5),
                ("rx".to_string(), 0.5),
            ]
        );
    }

    #[test]
    fn test_rejects_empty_register_and_zero_depth() {
        assert!(variational_ansatz(0, 2).unwrap_err().is_configuration());
        assert!(variational_ansatz(3, 0).unwrap_err().is_configuration());
    }

    #[test]
    fn test_default_weights_follow_fuel_rate() {
        let config = HybridConfig::default();
        let params = AnsatzParameters::from_config(&config);
        assert_eq!(params.weights, vec![0.01; 10]);
        assert_eq!(params.binding().len(), num_parameters(10));
    }
}
