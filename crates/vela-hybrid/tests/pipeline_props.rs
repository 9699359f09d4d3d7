use proptest::prelude::*;
use vela_adapter_sim::{Counts, StatevectorSampler};
use vela_hybrid::circuits::RESULT_KEY;
use vela_hybrid::{AnsatzParameters, Mission, ThrustModel, extract_seed, variational_ansatz};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn fuel_is_non_negative_for_forward_thrust(
        k in 0.0f64..5.0,
        v0 in -10.0f64..10.0,
        thrusts in prop::collection::vec(0.0f64..10.0, 0..20),
    ) {
        let mission = Mission::new(ThrustModel::new(k), v0, 0.0);
        prop_assert!(mission.objective(&thrusts) >= 0.0);
    }

    #[test]
    fn trajectory_ends_at_final_velocity(
        thrusts in prop::collection::vec(-1.0f64..1.0, 1..12),
        target in -5.0f64..5.0,
    ) {
        let mission = Mission::new(ThrustModel::new(0.01), 0.0, target);
        let trajectory = mission.trajectory(&thrusts);
        prop_assert_eq!(trajectory.len(), thrusts.len() + 1);
        let last = trajectory[thrusts.len()];
        prop_assert!((mission.constraint(&thrusts) - (last - target)).abs() < 1e-12);
    }

    #[test]
    fn ansatz_histograms_match_register(
        n in 1u32..6,
        depth in 1u32..3,
        shots in 1u32..200,
        seed in any::<u64>(),
        alpha in -3.0f64..3.0,
        beta in -3.0f64..3.0,
    ) {
        let circuit = variational_ansatz(n, depth).unwrap();
        let params = AnsatzParameters::new(alpha, beta, vec![0.01; n as usize]);
        let bound = circuit.bind(&params.binding());

        let result = StatevectorSampler::new(Some(seed)).sample(&bound, shots).unwrap();
        let counts = result.histogram(RESULT_KEY).unwrap();
        prop_assert_eq!(counts.total(), u64::from(shots));
        for (bits, _) in counts.iter() {
            prop_assert_eq!(bits.len(), n as usize);
        }
    }

    #[test]
    fn seed_extraction_is_deterministic(
        entries in prop::collection::btree_map("[01]{4}", 1u64..50, 1..10),
    ) {
        let mut counts = Counts::new(4);
        for (bits, n) in &entries {
            counts.insert(bits.as_str(), *n).unwrap();
        }
        let first = extract_seed(&counts).unwrap();
        prop_assert_eq!(&first, &extract_seed(&counts).unwrap());

        let best = entries.values().copied().max().unwrap();
        let winner: String = first.iter().map(|b| if *b == 1.0 { '1' } else { '0' }).collect();
        prop_assert_eq!(counts.get(&winner), best);
    }
}
