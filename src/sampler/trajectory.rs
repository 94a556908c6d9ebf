use crate::sampler::SamplerContext;
use crate::state::State;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// A down-sampled walk tagged with its attractor occupancy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub states: Vec<State>,
    pub ratio: f64,
}

/// Round a ratio to four decimal places.
pub fn round_ratio(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Simulate one trajectory with the `period` and `length` of `context.config`.
pub fn simulate<R: Rng>(context: &SamplerContext, rng: &mut R) -> Trajectory {
    let relation = context.relation.as_ref();
    let period = context.config.period;
    let length = context.config.length;
    let steps = (length - 1) * period;

    let start = rng.gen_range(0..relation.num_states() as u64);
    let mut current = State::from_bits(start, relation.width());
    let mut states = Vec::with_capacity(length);
    states.push(current);
    for step in 1..=steps {
        current = match relation.successors(current).choose(rng) {
            Some(next) => *next,
            None => current,
        };
        if step % period == 0 {
            states.push(current);
        }
    }

    let in_attractor = states
        .iter()
        .filter(|it| context.is_attractor[it.index()])
        .count();
    let ratio = round_ratio(in_attractor as f64 / states.len() as f64);
    Trajectory { states, ratio }
}
