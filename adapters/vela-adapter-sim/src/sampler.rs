//! Shot sampling from a simulated statevector.
//!
//! Every measurement in a sampled circuit must be terminal: once a qubit is
//! measured no later gate may touch it. Under that rule one statevector
//! simulation gives the joint outcome distribution, and each shot is a single
//! inverse-CDF draw from it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::debug;

use vela_ir::{Circuit, InstructionKind, QubitId};

use crate::counts::{Counts, MeasurementResult};
use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;

/// Default register limit (2^24 amplitudes, 256 MiB).
pub const DEFAULT_MAX_QUBITS: u32 = 24;

/// Largest register the sampler will ever allocate.
pub const MAX_SUPPORTED_QUBITS: u32 = 30;

/// Seedable statevector sampler.
///
/// Owns its generator, so two samplers never share random state.
#[derive(Debug, Clone)]
pub struct StatevectorSampler {
    rng: StdRng,
    max_qubits: u32,
}

impl StatevectorSampler {
    /// Create a sampler. `None` seeds from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self::from_rng(rng)
    }

    /// Create a sampler around an existing generator.
    pub fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            max_qubits: DEFAULT_MAX_QUBITS,
        }
    }

    /// Set the register limit, capped at [`MAX_SUPPORTED_QUBITS`].
    pub fn with_max_qubits(mut self, limit: u32) -> Self {
        self.max_qubits = limit.min(MAX_SUPPORTED_QUBITS);
        self
    }

    /// Current register limit.
    pub fn max_qubits(&self) -> u32 {
        self.max_qubits
    }

    /// Check that `circuit` can be sampled without allocating anything.
    pub fn check(&self, circuit: &Circuit) -> SimResult<()> {
        let n = circuit.num_qubits();
        if n == 0 {
            return Err(SimError::InvalidCircuit("circuit has no qubits".into()));
        }
        if n > self.max_qubits {
            return Err(SimError::QubitLimit {
                requested: n,
                limit: self.max_qubits,
            });
        }

        circuit.validate()?;

        let mut measured = vec![false; n as usize];
        for (index, instr) in circuit.instructions().iter().enumerate() {
            match &instr.kind {
                InstructionKind::Gate(gate) => {
                    if let Some(name) = gate.parameter().and_then(|p| p.symbol_name()) {
                        return Err(SimError::UnboundParameter {
                            name: name.to_string(),
                            instruction: index,
                        });
                    }
                    if let Some(q) = instr.qubits.iter().find(|q| measured[q.index()]) {
                        return Err(SimError::InvalidCircuit(format!(
                            "gate '{}' at instruction {} acts on {} after it was measured",
                            gate.name(),
                            index,
                            q
                        )));
                    }
                }
                InstructionKind::Measure { .. } => {
                    for q in &instr.qubits {
                        measured[q.index()] = true;
                    }
                }
            }
        }

        if circuit.measurement_keys().next().is_none() {
            return Err(SimError::InvalidCircuit(format!(
                "circuit '{}' has no measurements",
                circuit.name()
            )));
        }
        Ok(())
    }

    /// Simulate the unitary part of `circuit` from `|0...0⟩`.
    pub fn simulate(&self, circuit: &Circuit) -> SimResult<Statevector> {
        self.check(circuit)?;
        let mut state = Statevector::zero_state(circuit.num_qubits() as usize);
        for (index, instr) in circuit.instructions().iter().enumerate() {
            if let InstructionKind::Gate(gate) = &instr.kind {
                state.apply(gate, &instr.qubits, index)?;
            }
        }
        Ok(state)
    }

    /// Run `circuit` `shots` times and histogram every measurement key.
    pub fn sample(&mut self, circuit: &Circuit, shots: u32) -> SimResult<MeasurementResult> {
        if shots == 0 {
            return Err(SimError::InvalidShots(shots));
        }
        let state = self.simulate(circuit)?;
        debug!(
            circuit = circuit.name(),
            qubits = circuit.num_qubits(),
            shots,
            "sampling statevector"
        );

        let cdf: Vec<f64> = state
            .probabilities()
            .into_iter()
            .scan(0.0, |acc, p| {
                *acc += p;
                Some(*acc)
            })
            .collect();
        let total = cdf.last().copied().unwrap_or(1.0);

        let registers: Vec<(&str, &[QubitId])> = circuit.measurement_keys().collect();
        let mut histograms: BTreeMap<String, Counts> = registers
            .iter()
            .map(|(key, qubits)| (key.to_string(), Counts::new(qubits.len())))
            .collect();

        for _ in 0..shots {
            let r = self.rng.gen_range(0.0..total);
            let outcome = cdf.partition_point(|&c| c <= r).min(cdf.len() - 1);
            for (key, qubits) in &registers {
                let bits: String = qubits
                    .iter()
                    .map(|q| if (outcome >> q.index()) & 1 == 1 { '1' } else { '0' })
                    .collect();
                if let Some(counts) = histograms.get_mut(*key) {
                    counts.increment(bits);
                }
            }
        }

        Ok(MeasurementResult::new(shots, histograms))
    }
}
