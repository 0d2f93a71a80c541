//! Property tests for the coefficient engine, normalizer and decoder.

use naka_chains::abi::decode_page;
use naka_core::snapshot::StateSnapshot;
use naka_core::types::{StakeDistribution, Threshold, Weight};
use naka_core::NetworkId;
use naka_stake::{coefficient, compute_coefficient, normalize_decimal};
use naka_tests::helpers::page_bytes;
use num_bigint::BigUint;
use proptest::prelude::*;

fn distribution(stakes: &[u64]) -> StakeDistribution {
    StakeDistribution::from_weights(stakes.iter().map(|s| Weight::from(*s)))
}

fn threshold() -> impl Strategy<Value = Threshold> {
    (1u64..=10_000).prop_map(|centi| Threshold::new(centi, 100).unwrap())
}

proptest! {
    #[test]
    fn coefficient_is_within_bounds(stakes in prop::collection::vec(1u64..1_000_000, 1..200), t in threshold()) {
        let dist = distribution(&stakes);
        let c = coefficient(&dist, t).unwrap();
        prop_assert!(c >= 1);
        prop_assert!(c <= dist.len());
    }

    #[test]
    fn coefficient_ignores_input_order(mut stakes in prop::collection::vec(1u64..1_000, 1..100), t in threshold()) {
        let forward = coefficient(&distribution(&stakes), t).unwrap();
        stakes.reverse();
        let backward = coefficient(&distribution(&stakes), t).unwrap();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn coefficient_is_idempotent(stakes in prop::collection::vec(1u64..1_000_000, 1..100)) {
        let dist = distribution(&stakes);
        let t = Threshold::default();
        prop_assert_eq!(coefficient(&dist, t), coefficient(&dist, t));
    }

    #[test]
    fn prefix_is_minimal(stakes in prop::collection::vec(1u64..10_000, 1..100), t in threshold()) {
        let dist = distribution(&stakes);
        let c = coefficient(&dist, t).unwrap();
        let bound = dist.total() * t.numerator();
        let scale = 100u64 * t.denominator();
        let prefix = |n: usize| dist.weights()[..n].iter().sum::<BigUint>() * scale;
        if c < dist.len() {
            prop_assert!(prefix(c) > bound);
        }
        prop_assert!(prefix(c - 1) <= bound);
    }

    #[test]
    fn scaling_all_weights_preserves_coefficient(stakes in prop::collection::vec(1u64..1_000, 1..50), k in 1u64..1_000_000) {
        let base = distribution(&stakes);
        let scaled = StakeDistribution::from_weights(base.weights().iter().map(|w| w * k));
        let t = Threshold::default();
        prop_assert_eq!(
            compute_coefficient(base.weights(), base.total(), t),
            compute_coefficient(scaled.weights(), scaled.total(), t)
        );
    }

    #[test]
    fn decimal_strings_round_trip(v in any::<u128>()) {
        prop_assert_eq!(normalize_decimal(&v.to_string()).unwrap(), BigUint::from(v));
    }

    #[test]
    fn decoder_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..600)) {
        let _ = decode_page(&bytes);
    }

    #[test]
    fn decoded_page_never_exceeds_buffer(done in any::<bool>(), items in prop::collection::vec(any::<u64>(), 0..20), cut in 0usize..32 * 24) {
        let mut buf = page_bytes(done, 7, &items);
        buf.truncate(cut.max(128));
        let page = decode_page(&buf).unwrap();
        prop_assert_eq!(page.done, done);
        prop_assert!(page.items.len() <= items.len());
        prop_assert!(page.items.len() * 32 + 128 <= buf.len());
    }

    #[test]
    fn successor_keeps_only_reported_networks(
        first in prop::collection::btree_map(0usize..33, 0usize..100, 0..33),
        second in prop::collection::btree_map(0usize..33, 0usize..100, 0..33),
    ) {
        let to_results = |m: &std::collections::BTreeMap<usize, usize>| {
            m.iter().map(|(i, v)| (NetworkId::ALL[*i], *v)).collect::<Vec<_>>()
        };
        let s1 = StateSnapshot::new().successor(to_results(&first));
        let s2 = s1.successor(to_results(&second));

        prop_assert_eq!(s2.len(), second.len());
        for (i, v) in &second {
            let id = NetworkId::ALL[*i];
            let rec = s2.get(id).unwrap();
            prop_assert_eq!(rec.current, *v);
            prop_assert_eq!(rec.previous, first.get(i).copied().unwrap_or(0));
        }
    }
}
