use crate::transition::TransitionRelation;
use std::sync::Arc;

/// A configuration object for explicit SCC detection.
#[derive(Clone, Debug)]
pub struct SccConfig {
    /// The relation whose components are computed. It is shared, never copied.
    pub relation: Arc<TransitionRelation>,
    /// Number of edges explored by a single generator step before it suspends
    /// (default: `65536`).
    pub step_budget: usize,
}

impl From<Arc<TransitionRelation>> for SccConfig {
    fn from(value: Arc<TransitionRelation>) -> Self {
        SccConfig::new(value)
    }
}

impl From<&Arc<TransitionRelation>> for SccConfig {
    fn from(value: &Arc<TransitionRelation>) -> Self {
        SccConfig::new(value.clone())
    }
}

impl From<TransitionRelation> for SccConfig {
    fn from(value: TransitionRelation) -> Self {
        SccConfig::new(Arc::new(value))
    }
}

impl SccConfig {
    pub fn new(relation: Arc<TransitionRelation>) -> SccConfig {
        SccConfig {
            relation,
            step_budget: 1 << 16,
        }
    }
}
