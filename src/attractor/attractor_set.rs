use crate::state::State;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A set of attractors compared by exact member states, regardless of the order in which
/// attractors (or their states) were discovered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttractorSet(BTreeSet<BTreeSet<State>>);

impl AttractorSet {
    pub fn from_sets<I, S>(sets: I) -> AttractorSet
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = State>,
    {
        AttractorSet(
            sets.into_iter()
                .map(|it| it.into_iter().collect())
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, attractor: &BTreeSet<State>) -> bool {
        self.0.contains(attractor)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BTreeSet<State>> + '_ {
        self.0.iter()
    }

    /// Number of attractors present in both sets.
    pub fn matches(&self, other: &AttractorSet) -> usize {
        self.0.intersection(&other.0).count()
    }

    /// Attractor sizes in descending order.
    pub fn sizes(&self) -> Vec<usize> {
        let mut result: Vec<usize> = self.0.iter().map(|it| it.len()).collect();
        result.sort_unstable_by(|a, b| b.cmp(a));
        result
    }

    /// Every state that belongs to some attractor.
    pub fn states(&self) -> BTreeSet<State> {
        self.0.iter().flatten().copied().collect()
    }
}

impl FromIterator<Vec<State>> for AttractorSet {
    fn from_iter<T: IntoIterator<Item = Vec<State>>>(iter: T) -> Self {
        AttractorSet::from_sets(iter)
    }
}
