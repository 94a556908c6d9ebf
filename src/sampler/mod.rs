//! Random-walk trajectories filtered by their attractor occupancy.
//!
//! A trajectory is a walk of `(length - 1) * period + 1` steps from a uniformly chosen
//! state, where every step picks a uniformly random successor (or stays at a fixed point).
//! Every `period`-th state is kept, so the sampled trajectory has exactly `length` states.
//! Its *ratio* is the fraction of sampled states that belong to some attractor, rounded to
//! four decimal places.
//!
//! Two sampling modes are available:
//!
//! - [`RejectionSampler`] simulates trajectories until `size` of them are within
//!   `tolerance` of `target_ratio`, or until the attempt budget is exhausted.
//! - [`TrajectoryPool`] simulates a fixed number of trajectories once; many
//!   `(target_ratio, size)` selections can then be drawn from it without re-simulation.
//!   Pools for many `(period, length)` pairs are built in parallel by [`build_pools`].
//!
//! Neither mode fails when there are too few matching trajectories: the [`SampleReport`]
//! carries whatever was found and the shortfall is logged.

mod pool;
mod rejection;
mod trajectory;

#[cfg(test)]
mod tests;

use crate::error::FormatError;
use crate::state::State;
use crate::transition::TransitionRelation;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use pool::{TrajectoryPool, build_pools};
pub use rejection::{RejectionSampler, RejectionState, RejectionStep, sample};
pub use trajectory::{Trajectory, round_ratio, simulate};

/// Default number of attempts of the rejection sampler.
pub const DEFAULT_ATTEMPT_BUDGET: usize = 10_000;

/// Ratios closer than this are considered equal when checking the tolerance.
const RATIO_EPSILON: f64 = 1e-9;

/// Sampling parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SamplerConfig {
    /// Keep every `period`-th state of the raw walk.
    pub period: usize,
    /// Number of states of every sampled trajectory.
    pub length: usize,
    pub target_ratio: f64,
    pub tolerance: f64,
    /// Number of requested trajectories.
    pub size: usize,
    /// Rejection sampling only: maximal number of simulated trajectories.
    pub max_attempts: usize,
    pub seed: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        SamplerConfig {
            period: 1,
            length: 10,
            target_ratio: 0.5,
            tolerance: 0.1,
            size: 10,
            max_attempts: DEFAULT_ATTEMPT_BUDGET,
            seed: 0,
        }
    }
}

impl SamplerConfig {
    pub fn validate(&self) -> Result<(), FormatError> {
        if self.period == 0 || self.length == 0 {
            return Err(FormatError::Config(format!(
                "`period` and `length` must be positive, got {} and {}",
                self.period, self.length
            )));
        }
        if !(0.0..=1.0).contains(&self.target_ratio) || self.tolerance < 0.0 {
            return Err(FormatError::Config(format!(
                "invalid ratio target {} with tolerance {}",
                self.target_ratio, self.tolerance
            )));
        }
        Ok(())
    }

    /// Is a trajectory with `ratio` acceptable?
    pub fn accepts(&self, ratio: f64) -> bool {
        accepts(ratio, self.target_ratio, self.tolerance)
    }
}

fn accepts(ratio: f64, target_ratio: f64, tolerance: f64) -> bool {
    (ratio - target_ratio).abs() <= tolerance + RATIO_EPSILON
}

/// Shared, read-only input of all samplers.
#[derive(Clone, Debug)]
pub struct SamplerContext {
    pub relation: Arc<TransitionRelation>,
    /// Attractor membership, indexed by state.
    pub is_attractor: Arc<Vec<bool>>,
    pub config: SamplerConfig,
}

impl SamplerContext {
    pub fn new(
        relation: Arc<TransitionRelation>,
        attractor_states: &[State],
        config: SamplerConfig,
    ) -> Result<SamplerContext, FormatError> {
        config.validate()?;
        let mut is_attractor = vec![false; relation.num_states()];
        for state in attractor_states {
            if state.width() != relation.width() {
                return Err(FormatError::StateWidth {
                    state: state.to_string(),
                    found: state.width(),
                    expected: relation.width(),
                });
            }
            is_attractor[state.index()] = true;
        }
        Ok(SamplerContext {
            relation,
            is_attractor: Arc::new(is_attractor),
            config,
        })
    }

    /// The same context with a different configuration.
    pub fn with_config(&self, config: SamplerConfig) -> Result<SamplerContext, FormatError> {
        config.validate()?;
        Ok(SamplerContext {
            relation: self.relation.clone(),
            is_attractor: self.is_attractor.clone(),
            config,
        })
    }
}

/// Outcome of one sampling request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SampleReport {
    pub requested: usize,
    /// Simulated trajectories (rejection sampling) or pool size (pool selection).
    pub attempts: usize,
    /// Number of matching trajectories that were available.
    pub matching: usize,
    pub trajectories: Vec<Trajectory>,
}

impl SampleReport {
    pub fn is_complete(&self) -> bool {
        self.trajectories.len() >= self.requested
    }

    /// Number of missing trajectories.
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.trajectories.len())
    }
}
