use crate::sampler::{SampleReport, SamplerContext, Trajectory, simulate};
use cancel_this::{Cancellable, is_cancelled};
use computation_process::Incomplete::Suspended;
use computation_process::{Completable, Generator, GeneratorStep, Stateful};
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Yields accepted trajectories until `size` are found or the attempt budget runs out.
///
/// Every item is paired with the (one-based) attempt in which it was simulated.
pub type RejectionSampler =
    Generator<SamplerContext, RejectionState, (usize, Trajectory), RejectionStep>;

/// Number of simulated trajectories between two suspensions.
const ATTEMPTS_PER_STEP: usize = 64;

pub struct RejectionState {
    rng: StdRng,
    attempts: usize,
    accepted: usize,
}

pub struct RejectionStep;

impl From<&SamplerContext> for RejectionState {
    fn from(value: &SamplerContext) -> Self {
        RejectionState {
            rng: StdRng::seed_from_u64(value.config.seed),
            attempts: 0,
            accepted: 0,
        }
    }
}

impl GeneratorStep<SamplerContext, RejectionState, (usize, Trajectory)> for RejectionStep {
    fn step(
        context: &SamplerContext,
        state: &mut RejectionState,
    ) -> Completable<Option<(usize, Trajectory)>> {
        is_cancelled!()?;
        let config = &context.config;
        for _ in 0..ATTEMPTS_PER_STEP {
            if state.accepted >= config.size || state.attempts >= config.max_attempts {
                debug!(
                    "Rejection sampling done; accepted={}; attempts={}.",
                    state.accepted, state.attempts
                );
                return Ok(None);
            }
            state.attempts += 1;
            let trajectory = simulate(context, &mut state.rng);
            if config.accepts(trajectory.ratio) {
                state.accepted += 1;
                return Ok(Some((state.attempts, trajectory)));
            }
        }
        Err(Suspended)
    }
}

/// Run the rejection sampler to completion.
pub fn sample(context: &SamplerContext) -> Cancellable<SampleReport> {
    let initial = RejectionState::from(context);
    let mut trajectories = Vec::new();
    let mut last_attempt = 0;
    for item in RejectionSampler::configure(context.clone(), initial) {
        let (attempt, trajectory) = item?;
        last_attempt = attempt;
        trajectories.push(trajectory);
    }
    // An incomplete sample means the whole budget was spent.
    let attempts = if trajectories.len() < context.config.size {
        context.config.max_attempts
    } else {
        last_attempt
    };
    let report = SampleReport {
        requested: context.config.size,
        attempts,
        matching: trajectories.len(),
        trajectories,
    };
    if report.is_complete() {
        info!(
            "Sampled {} trajectories (ratio={}) in {} attempts.",
            report.trajectories.len(),
            context.config.target_ratio,
            report.attempts
        );
    } else {
        warn!(
            "Sampled only {}/{} trajectories (ratio={}) in {} attempts.",
            report.trajectories.len(),
            report.requested,
            context.config.target_ratio,
            report.attempts
        );
    }
    Ok(report)
}
