//! Quantum circuit container and builder.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::parameter::{ParameterBinding, ParameterExpression};
use crate::qubit::QubitId;

/// An ordered list of instructions over a fixed qubit register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    name: String,
    num_qubits: u32,
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create an empty circuit over `num_qubits` qubits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            instructions: Vec::new(),
        }
    }

    /// Circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register size.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// True if no instruction has been added.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Append a gate after checking its operands.
    pub fn apply(&mut self, gate: StandardGate, qubits: &[QubitId]) -> IrResult<&mut Self> {
        if qubits.len() != gate.num_qubits() {
            return Err(IrError::ArityMismatch {
                gate: gate.name(),
                expected: gate.num_qubits(),
                actual: qubits.len(),
            });
        }
        self.check_qubits(qubits)?;
        self.instructions.push(Instruction::gate(gate, qubits.to_vec()));
        Ok(self)
    }

    /// Hadamard.
    pub fn h(&mut self, q: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::H, &[q])
    }

    /// Pauli-X.
    pub fn x(&mut self, q: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::X, &[q])
    }

    /// Pauli-Z.
    pub fn z(&mut self, q: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::Z, &[q])
    }

    /// X rotation by `angle`.
    pub fn rx(&mut self, angle: impl Into<ParameterExpression>, q: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::Rx(angle.into()), &[q])
    }

    /// Z rotation by `angle`.
    pub fn rz(&mut self, angle: impl Into<ParameterExpression>, q: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::Rz(angle.into()), &[q])
    }

    /// Controlled-NOT.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::CX, &[control, target])
    }

    /// Measure `qubits` jointly under `key`.
    ///
    /// Outcome bit `j` of the key corresponds to `qubits[j]`.
    pub fn measure(&mut self, qubits: &[QubitId], key: impl Into<String>) -> IrResult<&mut Self> {
        let key = key.into();
        if qubits.is_empty() {
            return Err(IrError::EmptyMeasurement(key));
        }
        if self.measurement_keys().any(|(k, _)| k == key) {
            return Err(IrError::DuplicateMeasurementKey(key));
        }
        self.check_qubits(qubits)?;
        self.instructions.push(Instruction::measure(key, qubits.to_vec()));
        Ok(self)
    }

    /// Measure every qubit, in register order, under `key`.
    pub fn measure_all(&mut self, key: impl Into<String>) -> IrResult<&mut Self> {
        let qubits: Vec<QubitId> = QubitId::range(self.num_qubits).collect();
        self.measure(&qubits, key)
    }

    /// Measurement keys and their qubits, in instruction order.
    pub fn measurement_keys(&self) -> impl Iterator<Item = (&str, &[QubitId])> {
        self.instructions.iter().filter_map(|instr| match &instr.kind {
            InstructionKind::Measure { key } => Some((key.as_str(), instr.qubits.as_slice())),
            InstructionKind::Gate(_) => None,
        })
    }

    /// Names of the free symbols, sorted.
    pub fn parameters(&self) -> BTreeSet<String> {
        self.instructions
            .iter()
            .filter_map(|instr| match &instr.kind {
                InstructionKind::Gate(g) => g.parameter(),
                InstructionKind::Measure { .. } => None,
            })
            .filter_map(|p| p.symbol_name().map(str::to_owned))
            .collect()
    }

    /// True if any gate angle is still symbolic.
    pub fn is_parameterized(&self) -> bool {
        !self.parameters().is_empty()
    }

    /// Return a copy with every symbol found in `binding` replaced by its value.
    ///
    /// The instruction sequence is unchanged; only angles differ.
    pub fn bind(&self, binding: &ParameterBinding) -> Circuit {
        let instructions = self
            .instructions
            .iter()
            .map(|instr| match &instr.kind {
                InstructionKind::Gate(g) => {
                    Instruction::gate(g.bind(binding), instr.qubits.clone())
                }
                InstructionKind::Measure { .. } => instr.clone(),
            })
            .collect();
        Circuit {
            name: self.name.clone(),
            num_qubits: self.num_qubits,
            instructions,
        }
    }

    /// Circuit depth: the longest chain of instructions sharing a qubit.
    pub fn depth(&self) -> usize {
        let mut layer = vec![0usize; self.num_qubits as usize];
        for instr in &self.instructions {
            let next = instr
                .qubits
                .iter()
                .map(|q| layer[q.index()])
                .max()
                .unwrap_or(0)
                + 1;
            for q in &instr.qubits {
                layer[q.index()] = next;
            }
        }
        layer.into_iter().max().unwrap_or(0)
    }

    /// Re-check every instruction against the register.
    ///
    /// The builder enforces these rules as instructions are added; a circuit
    /// obtained through deserialization has not been through it.
    pub fn validate(&self) -> IrResult<()> {
        let mut keys = FxHashSet::default();
        for instr in &self.instructions {
            match &instr.kind {
                InstructionKind::Gate(gate) => {
                    if instr.qubits.len() != gate.num_qubits() {
                        return Err(IrError::ArityMismatch {
                            gate: gate.name(),
                            expected: gate.num_qubits(),
                            actual: instr.qubits.len(),
                        });
                    }
                }
                InstructionKind::Measure { key } => {
                    if instr.qubits.is_empty() {
                        return Err(IrError::EmptyMeasurement(key.clone()));
                    }
                    if !keys.insert(key.as_str()) {
                        return Err(IrError::DuplicateMeasurementKey(key.clone()));
                    }
                }
            }
            self.check_qubits(&instr.qubits)?;
        }
        Ok(())
    }

    fn check_qubits(&self, qubits: &[QubitId]) -> IrResult<()> {
        let mut seen = FxHashSet::default();
        seen.reserve(qubits.len());
        for q in qubits {
            if q.0 >= self.num_qubits {
                return Err(IrError::QubitOutOfRange {
                    qubit: q.0,
                    num_qubits: self.num_qubits,
                });
            }
            if !seen.insert(q.0) {
                return Err(IrError::DuplicateQubit(q.0));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "circuit {} ({} qubits)", self.name, self.num_qubits)?;
        for instr in &self.instructions {
            writeln!(f, "  {instr}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let mut circuit = Circuit::with_size("bell", 2);
        circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        circuit.measure_all("m").unwrap();

        assert_eq!(circuit.len(), 3);
        assert_eq!(circuit.depth(), 3);
        let keys: Vec<_> = circuit.measurement_keys().collect();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].0, "m");
        assert_eq!(keys[0].1, &[QubitId(0), QubitId(1)]);
    }

    #[test]
    fn test_qubit_out_of_range() {
        let mut circuit = Circuit::with_size("small", 2);
        let err = circuit.h(QubitId(2)).unwrap_err();
        assert_eq!(
            err,
            IrError::QubitOutOfRange {
                qubit: 2,
                num_qubits: 2
            }
        );
    }

    #[test]
    fn test_cx_rejects_same_qubit() {
        let mut circuit = Circuit::with_size("c", 2);
        assert_eq!(
            circuit.cx(QubitId(1), QubitId(1)).unwrap_err(),
            IrError::DuplicateQubit(1)
        );
    }

    #[test]
    fn test_duplicate_measurement_key() {
        let mut circuit = Circuit::with_size("c", 2);
        circuit.measure(&[QubitId(0)], "a").unwrap();
        assert!(matches!(
            circuit.measure(&[QubitId(1)], "a"),
            Err(IrError::DuplicateMeasurementKey(_))
        ));
    }

    #[test]
    fn test_parameters_and_bind() {
        let mut circuit = Circuit::with_size("p", 2);
        circuit
            .rx(ParameterExpression::symbol("beta").scaled(2.0), QubitId(0))
            .unwrap();
        circuit
            .rz(ParameterExpression::symbol("alpha"), QubitId(1))
            .unwrap();
        circuit.rz(0.3, QubitId(1)).unwrap();

        let names: Vec<String> = circuit.parameters().into_iter().collect();
        assert_eq!(names, vec!["alpha".to_string(), "beta".to_string()]);

        let partial = circuit.bind(&ParameterBinding::new().with("beta", 0.5));
        assert_eq!(partial.parameters().len(), 1);
        assert_eq!(partial.len(), circuit.len());

        let full = partial.bind(&ParameterBinding::new().with("alpha", 0.1));
        assert!(!full.is_parameterized());
        match &full.instructions()[0].kind {
            InstructionKind::Gate(StandardGate::Rx(p)) => assert_eq!(p.as_f64(), Some(1.0)),
            other => panic!("unexpected instruction {other:?}"),
        }
    }

    #[test]
    fn test_wide_register_measures_in_linear_time() {
        let mut circuit = Circuit::with_size("wide", 200_000);
        circuit.measure_all("m").unwrap();
        assert_eq!(circuit.measurement_keys().next().unwrap().1.len(), 200_000);
        circuit.validate().unwrap();
    }

    #[test]
    fn test_validate_catches_deserialized_defects() {
        let mut circuit = Circuit::with_size("d", 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.measure_all("m").unwrap();
        let json = serde_json::to_string(&circuit).unwrap();

        let out_of_range: Circuit =
            serde_json::from_str(&json.replace("\"qubits\":[0,1]", "\"qubits\":[0,5]")).unwrap();
        assert_eq!(
            out_of_range.validate().unwrap_err(),
            IrError::QubitOutOfRange {
                qubit: 5,
                num_qubits: 2
            }
        );

        let wrong_arity: Circuit =
            serde_json::from_str(&json.replace("\"qubits\":[0]", "\"qubits\":[0,1]")).unwrap();
        assert!(matches!(
            wrong_arity.validate().unwrap_err(),
            IrError::ArityMismatch { gate: "h", expected: 1, actual: 2 }
        ));
    }

    #[test]
    fn test_serde_roundtrip_preserves_structure() {
        let mut circuit = Circuit::with_size("s", 1);
        circuit.rx(ParameterExpression::symbol("a"), QubitId(0)).unwrap();
        let json = serde_json::to_string(&circuit).unwrap();
        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, circuit);
    }
}
