use crate::error::PipelineError;
use crate::sampler::{SampleReport, SamplerContext, Trajectory, accepts, simulate};
use cancel_this::{Cancellable, is_cancelled};
use log::{debug, info, warn};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rayon::prelude::*;

/// Trajectories simulated once for a fixed `(period, length)` pair.
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectoryPool {
    pub period: usize,
    pub length: usize,
    pub trajectories: Vec<Trajectory>,
}

impl TrajectoryPool {
    /// Simulate `pool_size` trajectories with the `period` and `length` of `context.config`.
    pub fn build<R: Rng>(
        context: &SamplerContext,
        pool_size: usize,
        rng: &mut R,
    ) -> Cancellable<TrajectoryPool> {
        let mut trajectories = Vec::with_capacity(pool_size);
        for i in 0..pool_size {
            if i % 256 == 0 {
                is_cancelled!()?;
            }
            trajectories.push(simulate(context, rng));
        }
        debug!(
            "Built pool of {} trajectories (period={}; length={}).",
            pool_size, context.config.period, context.config.length
        );
        Ok(TrajectoryPool {
            period: context.config.period,
            length: context.config.length,
            trajectories,
        })
    }

    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    /// Number of pooled trajectories within `tolerance` of `target_ratio`.
    pub fn count_matching(&self, target_ratio: f64, tolerance: f64) -> usize {
        self.trajectories
            .iter()
            .filter(|it| accepts(it.ratio, target_ratio, tolerance))
            .count()
    }

    /// Draw `size` distinct matching trajectories uniformly at random.
    ///
    /// If fewer than `size` trajectories match, all of them are returned (in pool order)
    /// and the report is incomplete.
    pub fn select<R: Rng>(
        &self,
        target_ratio: f64,
        tolerance: f64,
        size: usize,
        rng: &mut R,
    ) -> SampleReport {
        let matching: Vec<&Trajectory> = self
            .trajectories
            .iter()
            .filter(|it| accepts(it.ratio, target_ratio, tolerance))
            .collect();
        let trajectories: Vec<Trajectory> = if matching.len() < size {
            warn!(
                "Only {}/{} pooled trajectories match ratio {} (period={}; length={}).",
                matching.len(),
                size,
                target_ratio,
                self.period,
                self.length
            );
            matching.iter().map(|it| (*it).clone()).collect()
        } else {
            sample(rng, matching.len(), size)
                .into_vec()
                .into_iter()
                .map(|i| matching[i].clone())
                .collect()
        };
        SampleReport {
            requested: size,
            attempts: self.trajectories.len(),
            matching: matching.len(),
            trajectories,
        }
    }
}

/// Build one pool per `(period, length)` pair in parallel.
///
/// Pool `i` uses a generator seeded with `seed + i`, so the result does not depend on the
/// number of threads.
pub fn build_pools(
    context: &SamplerContext,
    pairs: &[(usize, usize)],
    pool_size: usize,
    seed: u64,
) -> Result<Vec<TrajectoryPool>, PipelineError> {
    let pools = pairs
        .par_iter()
        .enumerate()
        .map(|(i, (period, length))| -> Result<TrajectoryPool, PipelineError> {
            let mut config = context.config.clone();
            config.period = *period;
            config.length = *length;
            let context = context.with_config(config)?;
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
            Ok(TrajectoryPool::build(&context, pool_size, &mut rng)?)
        })
        .collect::<Result<Vec<_>, PipelineError>>()?;
    info!(
        "Built {} trajectory pools of {} trajectories.",
        pools.len(),
        pool_size
    );
    Ok(pools)
}
