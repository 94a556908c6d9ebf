use crate::attractor::analyze;
use crate::network::BooleanNetwork;
use crate::sampler::{
    SamplerConfig, SamplerContext, TrajectoryPool, build_pools, round_ratio, sample, simulate,
};
use crate::test_utils::example_networks::{rotation_network, toggle_network};
use crate::test_utils::init_logger;
use crate::transition::{UpdateMode, build_relation};
use cancel_this::Cancellable;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;

fn mk_context(
    network: &BooleanNetwork,
    mode: UpdateMode,
    config: SamplerConfig,
) -> Cancellable<SamplerContext> {
    let relation = Arc::new(build_relation(network, mode)?);
    let attractors = analyze(relation.clone())?.attractor_states();
    Ok(SamplerContext::new(relation, &attractors, config).unwrap())
}

fn test_all_attractor_network_accepts_everything_impl() -> Cancellable<()> {
    init_logger();
    // Under synchronous update, every state of the rotation network is in an attractor.
    let config = SamplerConfig {
        target_ratio: 1.0,
        tolerance: 0.0,
        size: 25,
        length: 7,
        period: 3,
        ..Default::default()
    };
    let context = mk_context(&rotation_network(), UpdateMode::Synchronous, config)?;
    let report = sample(&context)?;
    assert!(report.is_complete());
    assert_eq!(report.attempts, 25);
    for trajectory in &report.trajectories {
        assert_eq!(trajectory.states.len(), 7);
        assert_eq!(trajectory.ratio, 1.0);
    }
    Ok(())
}

fn test_unreachable_ratio_exhausts_budget_impl() -> Cancellable<()> {
    init_logger();
    // Async toggle: every walk enters a fixed point after at most one step.
    let config = SamplerConfig {
        target_ratio: 0.0,
        tolerance: 0.0,
        length: 3,
        size: 4,
        max_attempts: 50,
        ..Default::default()
    };
    let context = mk_context(&toggle_network(), UpdateMode::Asynchronous, config)?;
    let report = sample(&context)?;
    assert!(!report.is_complete());
    assert_eq!(report.shortfall(), 4);
    assert_eq!(report.attempts, 50);
    assert!(report.trajectories.is_empty());
    Ok(())
}

// ========== Tests ==========

#[test]
fn test_all_attractor_network_accepts_everything() -> Cancellable<()> {
    test_all_attractor_network_accepts_everything_impl()
}

#[test]
fn test_unreachable_ratio_exhausts_budget() -> Cancellable<()> {
    test_unreachable_ratio_exhausts_budget_impl()
}

#[test]
fn test_period_down_sampling() {
    init_logger();
    let config = SamplerConfig {
        period: 2,
        length: 5,
        ..Default::default()
    };
    // Sync toggle: `00 <-> 11` and two fixed points, so every second state repeats.
    let context = mk_context(&toggle_network(), UpdateMode::Synchronous, config).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..20 {
        let trajectory = simulate(&context, &mut rng);
        assert_eq!(trajectory.states.len(), 5);
        assert!(trajectory.states.iter().all(|it| *it == trajectory.states[0]));
        assert_eq!(trajectory.ratio, 1.0);
    }
}

#[test]
fn test_ratio_is_rounded() {
    init_logger();
    assert_eq!(round_ratio(2.0 / 3.0), 0.6667);
    assert_eq!(round_ratio(0.12344), 0.1234);

    let config = SamplerConfig {
        length: 3,
        ..Default::default()
    };
    let context = mk_context(&toggle_network(), UpdateMode::Asynchronous, config).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let trajectory = simulate(&context, &mut rng);
        assert!(trajectory.ratio == 1.0 || trajectory.ratio == 0.6667);
    }
}

#[test]
fn test_rejection_sampling_is_seeded() {
    init_logger();
    let config = SamplerConfig {
        target_ratio: 0.6667,
        tolerance: 0.0,
        length: 3,
        size: 5,
        seed: 11,
        ..Default::default()
    };
    let context = mk_context(&toggle_network(), UpdateMode::Asynchronous, config).unwrap();
    let a = sample(&context).unwrap();
    let b = sample(&context).unwrap();
    assert_eq!(a, b);
    assert!(a.is_complete());
    assert!(a.attempts >= 5);
}

#[test]
fn test_pool_selection() {
    init_logger();
    let config = SamplerConfig {
        length: 3,
        ..Default::default()
    };
    let context = mk_context(&toggle_network(), UpdateMode::Asynchronous, config).unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    let pool = TrajectoryPool::build(&context, 200, &mut rng).unwrap();
    assert_eq!(pool.len(), 200);
    let full = pool.count_matching(1.0, 0.0);
    let partial = pool.count_matching(0.6667, 0.0);
    assert_eq!(full + partial, 200);

    let report = pool.select(1.0, 0.0, 5, &mut rng);
    assert!(report.is_complete());
    assert_eq!(report.matching, full);
    assert!(report.trajectories.iter().all(|it| it.ratio == 1.0));

    // Not enough matches: everything that matches is returned, nothing is invented.
    let report = pool.select(0.0, 0.1, 3, &mut rng);
    assert_eq!(report.matching, 0);
    assert_eq!(report.shortfall(), 3);
    let report = pool.select(0.6667, 0.0, 1000, &mut rng);
    assert_eq!(report.trajectories.len(), partial);
}

#[test]
fn test_parallel_pools_are_deterministic() {
    init_logger();
    let config = SamplerConfig::default();
    let context = mk_context(&rotation_network(), UpdateMode::Asynchronous, config).unwrap();
    let pairs = [(1, 5), (2, 5), (1, 10), (3, 4)];
    let a = build_pools(&context, &pairs, 50, 100).unwrap();
    let b = build_pools(&context, &pairs, 50, 100).unwrap();
    assert_eq!(a, b);
    for (pool, (period, length)) in a.iter().zip(pairs) {
        assert_eq!((pool.period, pool.length), (period, length));
        assert!(pool.trajectories.iter().all(|it| it.states.len() == length));
    }
    assert!(build_pools(&context, &[(0, 5)], 10, 0).is_err());
}

#[test]
fn test_config_validation() {
    let config: SamplerConfig =
        serde_json::from_str(r#"{ "period": 5, "target_ratio": 0.3 }"#).unwrap();
    assert_eq!(config.period, 5);
    assert_eq!(config.max_attempts, 10_000);
    assert!(config.validate().is_ok());
    assert!(config.accepts(0.35));
    assert!(!config.accepts(0.41));

    let invalid = SamplerConfig {
        length: 0,
        ..Default::default()
    };
    assert!(invalid.validate().is_err());
    let invalid = SamplerConfig {
        target_ratio: 1.5,
        ..Default::default()
    };
    assert!(invalid.validate().is_err());
}
