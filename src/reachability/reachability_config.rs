use crate::transition::TransitionRelation;
use std::sync::Arc;

/// A "flat" configuration object for explicit reachability problems.
#[derive(Clone, Debug)]
pub struct ReachabilityConfig {
    /// The relation explored by forward reachability.
    pub relation: Arc<TransitionRelation>,
    /// The reversed relation explored by backward reachability.
    pub reversed: Arc<TransitionRelation>,
    /// Cancel the procedure if it exceeds the specified number of iterations (default:
    /// `usize::MAX`). One iteration is one BFS layer.
    pub max_iterations: usize,
}

impl From<Arc<TransitionRelation>> for ReachabilityConfig {
    fn from(value: Arc<TransitionRelation>) -> Self {
        ReachabilityConfig::new(value)
    }
}

impl From<&Arc<TransitionRelation>> for ReachabilityConfig {
    fn from(value: &Arc<TransitionRelation>) -> Self {
        ReachabilityConfig::new(value.clone())
    }
}

impl From<TransitionRelation> for ReachabilityConfig {
    fn from(value: TransitionRelation) -> Self {
        ReachabilityConfig::new(Arc::new(value))
    }
}

impl From<&TransitionRelation> for ReachabilityConfig {
    fn from(value: &TransitionRelation) -> Self {
        ReachabilityConfig::new(Arc::new(value.clone()))
    }
}

impl ReachabilityConfig {
    /// Create a new [`ReachabilityConfig`]. The reversed relation is computed eagerly and
    /// shared by all clones of the config.
    pub fn new(relation: Arc<TransitionRelation>) -> ReachabilityConfig {
        ReachabilityConfig {
            reversed: Arc::new(relation.reversed()),
            relation,
            max_iterations: usize::MAX,
        }
    }

    /// Limit the number of BFS layers.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> ReachabilityConfig {
        self.max_iterations = max_iterations;
        self
    }
}
