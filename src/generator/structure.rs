use crate::attractor::analyze;
use crate::generator::{GeneratorKind, NetworkConfig};
use crate::scc::SccConfig;
use cancel_this::Cancellable;
use serde::{Deserialize, Serialize};

/// Realized structure of a transition relation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureReport {
    pub num_states: usize,
    pub num_transitions: usize,
    /// States without any incoming edge.
    pub parentless_states: usize,
    /// States without any outgoing edge.
    pub fixed_points: usize,
    pub num_sccs: usize,
    /// Sizes of all SCCs, descending.
    pub scc_sizes: Vec<usize>,
    pub num_attractors: usize,
    /// Sizes of all attractors, descending.
    pub attractor_sizes: Vec<usize>,
}

/// Compute the [`StructureReport`] of a relation.
pub fn analyze_network(config: impl Into<SccConfig>) -> Cancellable<StructureReport> {
    let config = config.into();
    let relation = config.relation.clone();
    let classification = analyze(config)?;

    let mut scc_sizes: Vec<usize> = classification.sccs().iter().map(|it| it.len()).collect();
    scc_sizes.sort_unstable_by(|a, b| b.cmp(a));
    let mut attractor_sizes: Vec<usize> = classification.attractors().map(|it| it.len()).collect();
    attractor_sizes.sort_unstable_by(|a, b| b.cmp(a));

    Ok(StructureReport {
        num_states: relation.num_states(),
        num_transitions: relation.num_edges(),
        parentless_states: relation.in_degrees().iter().filter(|it| **it == 0).count(),
        fixed_points: relation.states().filter(|it| relation.is_fixed_point(*it)).count(),
        num_sccs: scc_sizes.len(),
        scc_sizes,
        num_attractors: attractor_sizes.len(),
        attractor_sizes,
    })
}

impl StructureReport {
    /// Requested-versus-realized gaps for the structural targets of `config`.
    ///
    /// Only targets the strategy actually plans are checked, and only a *shortfall* is
    /// reported: extra attractors created by the random wiring are not a gap.
    pub fn shortfalls(&self, config: &NetworkConfig) -> Vec<String> {
        let mut result = Vec::new();
        if config.kind == GeneratorKind::DependencyLimited {
            return result;
        }
        if self.num_attractors < config.num_attractors {
            result.push(format!(
                "attractors: requested {}, realized {}",
                config.num_attractors, self.num_attractors
            ));
        }
        let undersized = self
            .attractor_sizes
            .iter()
            .filter(|it| **it < config.attractor_size.min(self.num_states))
            .count();
        if undersized > 0 {
            result.push(format!(
                "attractor size: requested {}, realized sizes {:?}",
                config.attractor_size, self.attractor_sizes
            ));
        }
        if config.kind == GeneratorKind::AttractorTargeted
            && self.parentless_states < config.num_parentless
        {
            result.push(format!(
                "parentless states: requested {}, realized {}",
                config.num_parentless, self.parentless_states
            ));
        }
        result
    }
}
