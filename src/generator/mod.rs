//! Synthetic networks with controlled structural properties.
//!
//! Three strategies are available (see [`GeneratorKind`]):
//!
//! - **Attractor-targeted**: builds the transition relation directly. A requested number of
//!   disjoint attractor cycles is placed on the hypercube, a set of parentless (source)
//!   states is reserved, and all remaining states are wired into one strongly connected
//!   backbone with a single entry edge into every attractor.
//! - **Dependency-limited**: every variable gets a random truth table over at most
//!   `num_deps` variables. The asynchronous relation then follows from the rules.
//! - **Simple**: attractor-targeted generation without parentless states and without
//!   extra backbone edges.
//!
//! Generation is fully determined by [`NetworkConfig::seed`]. Targets that cannot be met
//! degrade to the best achievable structure; the gaps are reported by
//! [`StructureReport::shortfalls`] and logged as warnings.

mod attractor_targeted;
mod dependency_limited;
mod hypercube;
mod structure;


use crate::MAX_EXPLICIT_VARIABLES;
use crate::error::{FormatError, PipelineError};
use crate::network::{BooleanNetwork, NetworkDefinition};
use crate::scc::SccConfig;
use crate::state::State;
use crate::transition::TransitionRelation;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

pub use hypercube::{build_hamming_cycle, build_hamming_path};
pub use structure::{StructureReport, analyze_network};

/// Generation strategy, resolved once per generated network.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratorKind {
    #[default]
    AttractorTargeted,
    DependencyLimited,
    Simple,
}

/// Parameters of a single generated network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    pub kind: GeneratorKind,
    pub seed: u64,
    pub num_vars: usize,
    /// Attractor-targeted only: number of reserved source states.
    pub num_parentless: usize,
    /// Attractor-targeted and simple: number of attractor cycles.
    pub num_attractors: usize,
    /// Attractor-targeted and simple: requested length of every attractor cycle.
    pub attractor_size: usize,
    /// Dependency-limited only: maximal number of inputs of every rule.
    pub num_deps: usize,
    /// Dependency-limited only: bounds on the number of true rows of every truth table.
    pub min_true_outputs: usize,
    pub max_true_outputs: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            kind: GeneratorKind::default(),
            seed: 0,
            num_vars: 7,
            num_parentless: 8,
            num_attractors: 3,
            attractor_size: 4,
            num_deps: 3,
            min_true_outputs: 2,
            max_true_outputs: 6,
        }
    }
}

impl NetworkConfig {
    pub fn new(kind: GeneratorKind, num_vars: usize, seed: u64) -> NetworkConfig {
        NetworkConfig {
            kind,
            num_vars,
            seed,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), FormatError> {
        if self.num_vars == 0 || self.num_vars > MAX_EXPLICIT_VARIABLES {
            return Err(FormatError::Config(format!(
                "`num_vars` must be between 1 and {MAX_EXPLICIT_VARIABLES}, got {}",
                self.num_vars
            )));
        }
        if self.min_true_outputs > self.max_true_outputs {
            return Err(FormatError::Config(format!(
                "`min_true_outputs` ({}) exceeds `max_true_outputs` ({})",
                self.min_true_outputs, self.max_true_outputs
            )));
        }
        Ok(())
    }
}

/// The common output of all generator strategies.
#[derive(Clone, Debug)]
pub struct GeneratedNetwork {
    pub config: NetworkConfig,
    /// Ground-truth asynchronous transition relation.
    pub relation: Arc<TransitionRelation>,
    /// Update rules, if the strategy produces them.
    pub network: Option<BooleanNetwork>,
    /// Sum-of-products rendering of `network`, keyed by variable name.
    pub expressions: BTreeMap<String, String>,
    /// Attractor cycles placed by the generator (empty for dependency-limited networks).
    pub planned_attractors: Vec<Vec<State>>,
    /// Source states reserved by the generator.
    pub planned_parentless: Vec<State>,
    /// Structure of `relation` as realized.
    pub report: StructureReport,
}

impl GeneratedNetwork {
    /// The network definition artifact of this network.
    pub fn to_definition(&self, name: &str) -> NetworkDefinition {
        let mut definition = match &self.network {
            Some(network) => NetworkDefinition::from_network(network, Some(self.relation.as_ref())),
            None => NetworkDefinition {
                mode: Some(self.relation.mode()),
                transitions: self.relation.to_string_lists(),
                ..Default::default()
            },
        };
        definition.name = Some(name.to_string());
        definition
    }
}

/// Generate a network according to `config`.
pub fn generate(config: &NetworkConfig) -> Result<GeneratedNetwork, PipelineError> {
    config.validate()?;
    info!(
        "Generating {:?} network; num_vars={}; seed={}.",
        config.kind, config.num_vars, config.seed
    );
    let mut rng = StdRng::seed_from_u64(config.seed);
    let (relation, network, planned_attractors, planned_parentless) = match config.kind {
        GeneratorKind::AttractorTargeted => {
            let plan = attractor_targeted::generate(config, &mut rng, true)?;
            (plan.relation, None, plan.attractors, plan.parentless)
        }
        GeneratorKind::Simple => {
            let plan = attractor_targeted::generate(config, &mut rng, false)?;
            (plan.relation, None, plan.attractors, plan.parentless)
        }
        GeneratorKind::DependencyLimited => {
            let (network, relation) = dependency_limited::generate(config, &mut rng)?;
            (relation, Some(network), Vec::new(), Vec::new())
        }
    };

    let relation = Arc::new(relation);
    let report = analyze_network(SccConfig::from(&relation))?;
    for shortfall in report.shortfalls(config) {
        warn!("GenerationShortfall (seed={}): {shortfall}.", config.seed);
    }

    let expressions = match &network {
        Some(network) => dependency_limited::sop_expressions(network),
        None => BTreeMap::new(),
    };

    Ok(GeneratedNetwork {
        config: config.clone(),
        relation,
        network,
        expressions,
        planned_attractors,
        planned_parentless,
        report,
    })
}
