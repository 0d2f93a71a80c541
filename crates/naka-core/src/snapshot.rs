//! Per-cycle coefficient state.
//!
//! A [`StateSnapshot`] is immutable: each refresh cycle derives a brand-new
//! snapshot from the previous one with [`StateSnapshot::successor`]. Networks
//! whose adapter failed during the cycle are simply absent from the result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::network::NetworkId;

/// Coefficient pair kept for one network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CoefficientRecord {
    /// Value of `current` in the prior snapshot, or 0 if the network was absent.
    pub previous: usize,
    /// Value computed in this cycle.
    pub current: usize,
}

/// Mapping from network to its coefficient record for one refresh cycle.
///
/// Serializes as a JSON object keyed by ticker:
///
/// ```
/// use naka_core::{NetworkId, StateSnapshot};
/// let snap = StateSnapshot::default().successor([(NetworkId::Atom, 7)]);
/// let json = serde_json::to_string(&snap).unwrap();
/// assert_eq!(json, r#"{"ATOM":{"previous":0,"current":7}}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateSnapshot {
    records: BTreeMap<NetworkId, CoefficientRecord>,
}

impl StateSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the next snapshot from this one.
    ///
    /// Only networks present in `results` appear in the new snapshot; each
    /// gets `previous` from this snapshot's `current` (0 when absent).
    pub fn successor<I>(&self, results: I) -> Self
    where
        I: IntoIterator<Item = (NetworkId, usize)>,
    {
        let records = results
            .into_iter()
            .map(|(id, current)| {
                let previous = self.records.get(&id).map_or(0, |r| r.current);
                (id, CoefficientRecord { previous, current })
            })
            .collect();
        Self { records }
    }

    pub fn get(&self, id: NetworkId) -> Option<&CoefficientRecord> {
        self.records.get(&id)
    }

    pub fn contains(&self, id: NetworkId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in ticker order.
    pub fn iter(&self) -> impl Iterator<Item = (NetworkId, &CoefficientRecord)> {
        self.records.iter().map(|(id, r)| (*id, r))
    }
}

impl FromIterator<(NetworkId, CoefficientRecord)> for StateSnapshot {
    fn from_iter<T: IntoIterator<Item = (NetworkId, CoefficientRecord)>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(previous: usize, current: usize) -> CoefficientRecord {
        CoefficientRecord { previous, current }
    }

    #[test]
    fn successor_shifts_current_into_previous() {
        let prev: StateSnapshot = [(NetworkId::Atom, record(5, 7))].into_iter().collect();
        let next = prev.successor([(NetworkId::Atom, 9), (NetworkId::Sol, 3)]);

        assert_eq!(next.get(NetworkId::Atom), Some(&record(7, 9)));
        assert_eq!(next.get(NetworkId::Sol), Some(&record(0, 3)));
        assert_eq!(next.len(), 2);
    }

    #[test]
    fn successor_omits_networks_without_results() {
        let prev: StateSnapshot = [
            (NetworkId::Atom, record(5, 7)),
            (NetworkId::Dot, record(1, 2)),
        ]
        .into_iter()
        .collect();
        let next = prev.successor([(NetworkId::Atom, 8)]);

        assert!(!next.contains(NetworkId::Dot));
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn successor_leaves_original_untouched() {
        let prev: StateSnapshot = [(NetworkId::Eth, record(2, 3))].into_iter().collect();
        let before = prev.clone();
        let _ = prev.successor([(NetworkId::Eth, 4)]);
        assert_eq!(prev, before);
    }

    #[test]
    fn empty_successor_is_empty() {
        let prev: StateSnapshot = [(NetworkId::Eth, record(2, 3))].into_iter().collect();
        assert!(prev.successor(Vec::new()).is_empty());
    }

    #[test]
    fn iter_is_in_ticker_order() {
        let snap = StateSnapshot::new().successor([
            (NetworkId::Xno, 1),
            (NetworkId::Ada, 2),
            (NetworkId::Mon, 3),
        ]);
        let ids: Vec<NetworkId> = snap.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![NetworkId::Ada, NetworkId::Mon, NetworkId::Xno]);
    }

    #[test]
    fn json_round_trip() {
        let snap = StateSnapshot::new().successor([(NetworkId::Nam, 12)]);
        let json = serde_json::to_string(&snap).unwrap();
        let back: StateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }

    proptest! {
        #[test]
        fn successor_previous_always_matches_prior_current(
            prior in proptest::collection::vec(0usize..500, NetworkId::ALL.len()),
            next in proptest::collection::vec(proptest::option::of(1usize..500), NetworkId::ALL.len()),
        ) {
            let prev = StateSnapshot::new().successor(
                NetworkId::ALL.iter().copied().zip(prior.iter().copied()),
            );
            let results: Vec<(NetworkId, usize)> = NetworkId::ALL
                .iter()
                .copied()
                .zip(next.iter().copied())
                .filter_map(|(id, v)| v.map(|v| (id, v)))
                .collect();
            let snap = prev.successor(results.clone());

            prop_assert_eq!(snap.len(), results.len());
            for (id, value) in results {
                let rec = snap.get(id).unwrap();
                prop_assert_eq!(rec.current, value);
                prop_assert_eq!(rec.previous, prev.get(id).unwrap().current);
            }
        }
    }
}
