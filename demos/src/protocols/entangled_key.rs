//! Entangled-pair key agreement.
//!
//! Each round prepares the Bell state `(|00⟩ + |11⟩)/√2`, lets both parties
//! pick a measurement basis at random and measures once. Rounds where the
//! bases agree contribute one bit to the sifted key. In a noiseless
//! simulation sifted bits always agree; a non-zero mismatch rate would point
//! at an eavesdropper.
//!
//! Error correction and privacy amplification are out of scope.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use vela_adapter_sim::{SimError, StatevectorSampler};
use vela_ir::{Circuit, IrError, QubitId};

/// Measurement key for Alice's qubit.
pub const ALICE_KEY: &str = "alice";

/// Measurement key for Bob's qubit.
pub const BOB_KEY: &str = "bob";

/// Offset separating the sampler's seed from the basis generator's.
const SAMPLER_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

/// Errors raised by the key exchange.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// At least one round is required.
    #[error("key exchange needs at least one round")]
    NoRounds,

    /// Circuit construction failed.
    #[error("circuit construction failed: {0}")]
    Circuit(#[from] IrError),

    /// The simulator rejected a round.
    #[error("simulation failed: {0}")]
    Simulation(#[from] SimError),

    /// A round produced no outcome for a party.
    #[error("round {round} has no '{key}' outcome")]
    MissingOutcome { round: usize, key: &'static str },
}

/// Measurement basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Basis {
    /// Computational basis.
    Z,
    /// Hadamard basis.
    X,
}

impl Basis {
    fn random(rng: &mut StdRng) -> Self {
        if rng.gen_range(0..2) == 1 { Basis::X } else { Basis::Z }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Basis::Z => write!(f, "Z"),
            Basis::X => write!(f, "X"),
        }
    }
}

/// One measured pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundRecord {
    pub alice_basis: Basis,
    pub bob_basis: Basis,
    pub alice_bit: u8,
    pub bob_bit: u8,
}

impl RoundRecord {
    /// True when both parties measured in the same basis.
    pub fn is_sifted(&self) -> bool {
        self.alice_basis == self.bob_basis
    }
}

/// Outcome of a full exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyExchangeReport {
    /// Every round, in order.
    pub rounds: Vec<RoundRecord>,
    /// Alice's bits from matching-basis rounds.
    pub alice_key: Vec<u8>,
    /// Bob's bits from matching-basis rounds.
    pub bob_key: Vec<u8>,
    /// Fraction of sifted positions where the keys differ.
    pub mismatch_rate: f64,
}

impl KeyExchangeReport {
    fn from_rounds(rounds: Vec<RoundRecord>) -> Self {
        let (alice_key, bob_key): (Vec<u8>, Vec<u8>) = rounds
            .iter()
            .filter(|r| r.is_sifted())
            .map(|r| (r.alice_bit, r.bob_bit))
            .unzip();
        let mismatches = alice_key.iter().zip(&bob_key).filter(|(a, b)| a != b).count();
        let mismatch_rate = if alice_key.is_empty() {
            0.0
        } else {
            mismatches as f64 / alice_key.len() as f64
        };
        Self {
            rounds,
            alice_key,
            bob_key,
            mismatch_rate,
        }
    }

    /// True when both sifted keys are identical.
    pub fn keys_match(&self) -> bool {
        self.alice_key == self.bob_key
    }
}

/// Entangled-pair key agreement simulation.
#[derive(Debug, Clone)]
pub struct EntangledKeyExchange {
    rounds: usize,
    bases: StdRng,
    sampler: StatevectorSampler,
}

impl EntangledKeyExchange {
    /// Create an exchange of `rounds` pairs. `None` seeds from OS entropy.
    pub fn new(rounds: usize, seed: Option<u64>) -> Result<Self, ProtocolError> {
        if rounds == 0 {
            return Err(ProtocolError::NoRounds);
        }
        let (bases, sampler) = match seed {
            Some(s) => (
                StdRng::seed_from_u64(s),
                StatevectorSampler::new(Some(s ^ SAMPLER_STREAM)),
            ),
            None => (StdRng::from_entropy(), StatevectorSampler::new(None)),
        };
        Ok(Self {
            rounds,
            bases,
            sampler,
        })
    }

    /// Bell pair measured in the given bases.
    pub fn round_circuit(alice: Basis, bob: Basis) -> Result<Circuit, IrError> {
        let (a, b) = (QubitId(0), QubitId(1));
        let mut circuit = Circuit::with_size("entangled_pair", 2);
        circuit.h(a)?.cx(a, b)?;
        if alice == Basis::X {
            circuit.h(a)?;
        }
        if bob == Basis::X {
            circuit.h(b)?;
        }
        circuit.measure(&[a], ALICE_KEY)?.measure(&[b], BOB_KEY)?;
        Ok(circuit)
    }

    /// Run every round and sift the keys.
    pub fn run(&mut self) -> Result<KeyExchangeReport, ProtocolError> {
        self.run_with_progress(|_| {})
    }

    /// Like [`run`](Self::run), calling `on_round` with the index of each
    /// round once it has been measured.
    pub fn run_with_progress<F>(
        &mut self,
        mut on_round: F,
    ) -> Result<KeyExchangeReport, ProtocolError>
    where
        F: FnMut(usize),
    {
        let mut records = Vec::with_capacity(self.rounds);
        for round in 0..self.rounds {
            let alice_basis = Basis::random(&mut self.bases);
            let bob_basis = Basis::random(&mut self.bases);
            let circuit = Self::round_circuit(alice_basis, bob_basis)?;
            let result = self.sampler.sample(&circuit, 1)?;

            let bit = |key: &'static str| -> Result<u8, ProtocolError> {
                result
                    .histogram(key)
                    .and_then(|counts| {
                        counts
                            .sorted()
                            .first()
                            .map(|(bits, _)| u8::from(bits.starts_with('1')))
                    })
                    .ok_or(ProtocolError::MissingOutcome { round, key })
            };
            let record = RoundRecord {
                alice_basis,
                bob_basis,
                alice_bit: bit(ALICE_KEY)?,
                bob_bit: bit(BOB_KEY)?,
            };
            debug!(
                round,
                alice = %record.alice_basis,
                bob = %record.bob_basis,
                alice_bit = record.alice_bit,
                bob_bit = record.bob_bit,
                "measured pair"
            );
            records.push(record);
            on_round(round);
        }

        let report = KeyExchangeReport::from_rounds(records);
        info!(
            rounds = self.rounds,
            sifted = report.alice_key.len(),
            mismatch_rate = report.mismatch_rate,
            "key exchange finished"
        );
        Ok(report)
    }
}
