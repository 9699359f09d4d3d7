//! Seed extraction from sampled histograms.

use tracing::debug;
use vela_adapter_sim::Counts;

use crate::error::{HybridError, HybridResult};

/// Most frequent outcome and its count.
///
/// Ties go to the lexicographically smallest bitstring. Zero counts, which a
/// deserialized histogram may still carry, are never chosen.
pub fn most_frequent(counts: &Counts) -> Option<(&str, u64)> {
    counts
        .iter()
        .filter(|&(_, count)| count > 0)
        .fold(None::<(&str, u64)>, |best, (bits, count)| match best {
            Some((_, c)) if c >= count => best,
            _ => Some((bits, count)),
        })
}

/// Convert the most frequent outcome into a control vector.
///
/// Character `j` of the bitstring becomes control `j`: `'1'` maps to `1.0`
/// and `'0'` to `0.0`.
pub fn extract_seed(counts: &Counts) -> HybridResult<Vec<f64>> {
    let (bits, count) = most_frequent(counts).ok_or(HybridError::EmptyHistogram)?;
    debug!(bitstring = bits, count, "extracted seed");
    Ok(bits
        .bytes()
        .map(|b| if b == b'1' { 1.0 } else { 0.0 })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(entries: &[(&str, u64)]) -> Counts {
        let mut counts = Counts::new(entries[0].0.len());
        for (bits, n) in entries {
            counts.insert(*bits, *n).unwrap();
        }
        counts
    }

    #[test]
    fn test_most_frequent_wins() {
        let c = counts(&[("101", 7), ("010", 2), ("111", 1)]);
        assert_eq!(extract_seed(&c).unwrap(), vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_ties_take_smallest_bitstring() {
        let c = counts(&[("11", 5), ("01", 5), ("10", 3)]);
        assert_eq!(most_frequent(&c), Some(("01", 5)));
        assert_eq!(extract_seed(&c).unwrap(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_single_outcome() {
        let c = counts(&[("0110", 1)]);
        assert_eq!(extract_seed(&c).unwrap(), vec![0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_unobserved_outcome_never_seeds() {
        let mut c = Counts::new(2);
        c.insert("00", 0).unwrap();
        c.insert("11", 1).unwrap();
        assert_eq!(extract_seed(&c).unwrap(), vec![1.0, 1.0]);

        let mut only_zero = Counts::new(2);
        only_zero.insert("01", 0).unwrap();
        assert!(matches!(extract_seed(&only_zero), Err(HybridError::EmptyHistogram)));

        let json = serde_json::json!({"num_bits": 2, "counts": {"00": 0, "10": 1}});
        let decoded: Counts = serde_json::from_value(json).unwrap();
        assert_eq!(most_frequent(&decoded), Some(("10", 1)));
    }

    #[test]
    fn test_empty_histogram() {
        assert!(matches!(
            extract_seed(&Counts::new(3)),
            Err(HybridError::EmptyHistogram)
        ));
    }
}
