//! Comparison of learned models with the ground truth network.
//!
//! Three aspects are measured:
//!
//! - **Structure**: precision, recall and F1 score of the learned `(parent, child)` edges
//!   against the dependencies observed in the true dynamics ([`EdgeMetrics`]).
//! - **Dynamics**: the fraction of states whose synchronous successor is the same in both
//!   networks ([`transition_accuracy`]).
//! - **Attractors**: the number of true attractors that appear in the learned dynamics
//!   as exactly the same state set ([`AttractorRecovery`]).


use crate::attractor::{AttractorSet, analyze};
use crate::error::{FormatError, PipelineError};
use crate::learned::LearnedModel;
use crate::network::BooleanNetwork;
use crate::reconstruct::{ObservedFunctions, reconstruct_network};
use crate::state::State;
use crate::transition::{TransitionRelation, UpdateMode, build_relation};
use log::info;
use serde::Serialize;
use std::collections::BTreeSet;

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f1_score(precision: f64, recall: f64) -> f64 {
    if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgeMetrics {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl EdgeMetrics {
    pub fn compare<T: Ord>(truth: &BTreeSet<T>, learned: &BTreeSet<T>) -> EdgeMetrics {
        let tp = truth.intersection(learned).count();
        let fp = learned.len() - tp;
        let fn_ = truth.len() - tp;
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        EdgeMetrics {
            true_positives: tp,
            false_positives: fp,
            false_negatives: fn_,
            precision,
            recall,
            f1: f1_score(precision, recall),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AttractorRecovery {
    pub correct: usize,
    pub true_count: usize,
    pub learned_count: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl AttractorRecovery {
    pub fn compare(truth: &AttractorSet, learned: &AttractorSet) -> AttractorRecovery {
        let correct = truth.matches(learned);
        let precision = ratio(correct, learned.len());
        let recall = ratio(correct, truth.len());
        AttractorRecovery {
            correct,
            true_count: truth.len(),
            learned_count: learned.len(),
            precision,
            recall,
            f1: f1_score(precision, recall),
        }
    }
}

fn sync_next(network: &BooleanNetwork, state: State) -> State {
    let mut next = state;
    for var in 0..network.num_vars() {
        next = next.set(var, network.next_value(var, state));
    }
    next
}

/// Fraction of states where both networks agree on the synchronous successor.
pub fn transition_accuracy(
    truth: &BooleanNetwork,
    learned: &BooleanNetwork,
) -> Result<f64, FormatError> {
    if truth.variables() != learned.variables() {
        return Err(FormatError::Network(
            "compared networks have different variables".to_string(),
        ));
    }
    let width = truth.num_vars();
    let correct = State::all(width)
        .filter(|state| sync_next(truth, *state) == sync_next(learned, *state))
        .count();
    Ok(ratio(correct, 1usize << width))
}

/// Everything a learned model is compared against.
#[derive(Clone, Debug)]
pub struct GroundTruth {
    pub network: BooleanNetwork,
    /// Observed `(regulator, target)` dependencies, by name.
    pub edges: BTreeSet<(String, String)>,
    pub sync_attractors: AttractorSet,
    pub async_attractors: AttractorSet,
}

impl GroundTruth {
    /// Ground truth of a network with explicit rules.
    pub fn from_network(network: &BooleanNetwork) -> Result<GroundTruth, PipelineError> {
        let relation = build_relation(network, UpdateMode::Asynchronous)?;
        GroundTruth::from_relation(&relation, network.variables())
    }

    /// Ground truth of a network that is only known through its relation.
    pub fn from_relation(
        relation: &TransitionRelation,
        names: &[String],
    ) -> Result<GroundTruth, PipelineError> {
        let network = reconstruct_network(relation, names)?;
        let edges = ObservedFunctions::from_relation(relation)
            .regulations()
            .into_iter()
            .map(|(regulator, target)| (names[regulator].clone(), names[target].clone()))
            .collect();
        let sync = build_relation(&network, UpdateMode::Synchronous)?;
        let sync_attractors = analyze(sync)?.attractor_set();
        let async_attractors = if relation.mode() == UpdateMode::Asynchronous {
            analyze(relation.clone())?.attractor_set()
        } else {
            analyze(build_relation(&network, UpdateMode::Asynchronous)?)?.attractor_set()
        };
        Ok(GroundTruth {
            network,
            edges,
            sync_attractors,
            async_attractors,
        })
    }

    pub fn attractors(&self, mode: UpdateMode) -> &AttractorSet {
        match mode {
            UpdateMode::Synchronous => &self.sync_attractors,
            UpdateMode::Asynchronous => &self.async_attractors,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Evaluation {
    pub edges: EdgeMetrics,
    pub transition_accuracy: f64,
    pub attractors: AttractorRecovery,
}

/// Evaluate a learned model. Attractors are compared in the given update mode, which
/// should be the mode the training trajectories were sampled in.
pub fn evaluate(
    truth: &GroundTruth,
    learned: &LearnedModel,
    mode: UpdateMode,
) -> Result<Evaluation, PipelineError> {
    let network = learned.to_network(truth.network.variables())?;
    let edges = EdgeMetrics::compare(&truth.edges, &learned.edges());
    let transition_accuracy = transition_accuracy(&truth.network, &network)?;
    let relation = build_relation(&network, mode)?;
    let learned_attractors = analyze(relation)?.attractor_set();
    let attractors = AttractorRecovery::compare(truth.attractors(mode), &learned_attractors);
    info!(
        "Evaluated learned model: F1={:.3}; accuracy={:.3}; attractors={}/{}.",
        edges.f1, transition_accuracy, attractors.correct, attractors.true_count
    );
    Ok(Evaluation {
        edges,
        transition_accuracy,
        attractors,
    })
}
