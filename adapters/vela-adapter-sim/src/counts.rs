//! Measurement histograms.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{SimError, SimResult};

/// Outcome histogram for one measurement key.
///
/// Keys are bitstrings whose `j`-th character is the `j`-th measured qubit.
/// Entries are kept in bitstring order so iteration and serialization are
/// reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    num_bits: usize,
    counts: BTreeMap<String, u64>,
}

impl Counts {
    /// An empty histogram over `num_bits`-bit outcomes.
    pub fn new(num_bits: usize) -> Self {
        Self {
            num_bits,
            counts: BTreeMap::new(),
        }
    }

    /// Width of every outcome.
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Add `count` occurrences of `bitstring`.
    ///
    /// A zero count is validated but records nothing, so every key present
    /// was observed at least once.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) -> SimResult<()> {
        let bitstring = bitstring.into();
        if bitstring.len() != self.num_bits || !bitstring.bytes().all(|b| b == b'0' || b == b'1') {
            return Err(SimError::InvalidBitstring {
                bitstring,
                expected_bits: self.num_bits,
            });
        }
        if count > 0 {
            *self.counts.entry(bitstring).or_insert(0) += count;
        }
        Ok(())
    }

    pub(crate) fn increment(&mut self, bitstring: String) {
        *self.counts.entry(bitstring).or_insert(0) += 1;
    }

    /// Occurrences of `bitstring` (zero if never observed).
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate in bitstring order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Entries by descending count, ties in bitstring order.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Empirical probability of `bitstring`.
    pub fn probability(&self, bitstring: &str) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.get(bitstring) as f64 / total as f64
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self
            .sorted()
            .into_iter()
            .map(|(bits, count)| format!("{bits}: {count}"))
            .collect();
        write!(f, "{{{}}}", entries.join(", "))
    }
}

/// Histograms for every measurement key of a sampled circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementResult {
    /// Number of circuit executions.
    pub shots: u32,
    histograms: BTreeMap<String, Counts>,
}

impl MeasurementResult {
    pub(crate) fn new(shots: u32, histograms: BTreeMap<String, Counts>) -> Self {
        Self { shots, histograms }
    }

    /// Histogram recorded under `key`.
    pub fn histogram(&self, key: &str) -> Option<&Counts> {
        self.histograms.get(key)
    }

    /// Take ownership of the histogram recorded under `key`.
    pub fn into_histogram(mut self, key: &str) -> Option<Counts> {
        self.histograms.remove(key)
    }

    /// Measurement keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.histograms.keys().map(String::as_str)
    }
}
