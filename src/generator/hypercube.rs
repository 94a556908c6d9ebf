use crate::state::State;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeSet;

/// Build a cycle of at most `size` states where consecutive states (including the last
/// and the first) are Hamming neighbors.
///
/// The cycle starts in a random state of `available` and then takes random unused
/// neighbors. If the walk cannot be closed, it is trimmed to its longest closable prefix.
/// The result has at least two states, or is empty when no cycle exists.
pub fn build_hamming_cycle<R: Rng>(
    rng: &mut R,
    available: &[State],
    size: usize,
    used: &BTreeSet<State>,
) -> Vec<State> {
    let Some(first) = available.choose(rng).copied() else {
        return Vec::new();
    };
    let mut cycle = vec![first];
    let mut in_cycle = BTreeSet::from([first]);
    for _ in 1..size {
        let Some(current) = cycle.last().copied() else {
            break;
        };
        let candidates: Vec<State> = current
            .hamming_neighbors()
            .filter(|it| !used.contains(it) && !in_cycle.contains(it))
            .collect();
        let Some(next) = candidates.choose(rng).copied() else {
            break;
        };
        cycle.push(next);
        in_cycle.insert(next);
    }

    if cycle.len() < 2 {
        return Vec::new();
    }
    // The second state is always a neighbor of the first one, so this finds at least 2.
    let closable = (2..=cycle.len())
        .rev()
        .find(|len| cycle[len - 1].hamming_distance(&first) == 1)
        .unwrap_or(2);
    cycle.truncate(closable);
    cycle
}

/// Order `states` into a path that prefers Hamming neighbors.
///
/// Every next state is a random unvisited neighbor of the current one. When there is no
/// such neighbor, the closest unvisited state (by Hamming distance) is taken instead, so
/// consecutive states are not guaranteed to be neighbors.
pub fn build_hamming_path<R: Rng>(rng: &mut R, states: &BTreeSet<State>) -> Vec<State> {
    let all: Vec<State> = states.iter().copied().collect();
    let Some(first) = all.choose(rng).copied() else {
        return Vec::new();
    };
    let mut remaining = states.clone();
    remaining.remove(&first);
    let mut path = vec![first];
    let mut current = first;
    while !remaining.is_empty() {
        let candidates: Vec<State> = current
            .hamming_neighbors()
            .filter(|it| remaining.contains(it))
            .collect();
        let next = match candidates.choose(rng) {
            Some(next) => *next,
            None => match remaining
                .iter()
                .min_by_key(|it| current.hamming_distance(it))
            {
                Some(next) => *next,
                None => break,
            },
        };
        remaining.remove(&next);
        path.push(next);
        current = next;
    }
    path
}
