use crate::MAX_EXPLICIT_VARIABLES;
use crate::error::FormatError;
use crate::state::State;
use crate::transition::UpdateMode;
use std::collections::BTreeMap;

/// An explicit transition relation over the full state space of `width` variables.
///
/// Successor lists are sorted, free of duplicates and never contain the source state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionRelation {
    width: usize,
    mode: UpdateMode,
    successors: Vec<Vec<State>>,
}

impl TransitionRelation {
    /// Assemble a relation from already normalized successor lists (indexed by state).
    pub(crate) fn from_parts(
        width: usize,
        mode: UpdateMode,
        successors: Vec<Vec<State>>,
    ) -> TransitionRelation {
        debug_assert_eq!(successors.len(), 1usize << width);
        TransitionRelation {
            width,
            mode,
            successors,
        }
    }

    /// Build a relation from explicit successor lists.
    ///
    /// States that are not listed have no successors. Self-edges are removed and
    /// duplicates are merged. All states must have exactly `width` variables.
    pub fn from_successor_lists<I>(
        width: usize,
        mode: UpdateMode,
        entries: I,
    ) -> Result<TransitionRelation, FormatError>
    where
        I: IntoIterator<Item = (State, Vec<State>)>,
    {
        if width == 0 || width > MAX_EXPLICIT_VARIABLES {
            return Err(FormatError::Network(format!(
                "explicit relations support 1 to {MAX_EXPLICIT_VARIABLES} variables, got {width}"
            )));
        }
        let mut successors = vec![Vec::new(); 1usize << width];
        for (source, targets) in entries {
            check_width(&source, width)?;
            let slot = &mut successors[source.index()];
            for target in targets {
                check_width(&target, width)?;
                if target != source {
                    slot.push(target);
                }
            }
        }
        for list in successors.iter_mut() {
            list.sort_unstable();
            list.dedup();
        }
        Ok(TransitionRelation::from_parts(width, mode, successors))
    }

    /// Parse a relation from `state -> successors` string lists.
    pub fn from_string_lists(
        mode: UpdateMode,
        entries: &BTreeMap<String, Vec<String>>,
    ) -> Result<TransitionRelation, FormatError> {
        let Some(first) = entries.keys().next() else {
            return Err(FormatError::Network("empty transition listing".to_string()));
        };
        let width = first.len();
        let mut parsed = Vec::with_capacity(entries.len());
        for (source, targets) in entries {
            let source = State::parse_with_width(source, width)?;
            let targets = targets
                .iter()
                .map(|it| State::parse_with_width(it, width))
                .collect::<Result<Vec<_>, _>>()?;
            parsed.push((source, targets));
        }
        TransitionRelation::from_successor_lists(width, mode, parsed)
    }

    /// Render the relation as `state -> successors` string lists (all states included).
    pub fn to_string_lists(&self) -> BTreeMap<String, Vec<String>> {
        self.iter()
            .map(|(state, succ)| {
                (
                    state.to_string(),
                    succ.iter().map(|it| it.to_string()).collect(),
                )
            })
            .collect()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn mode(&self) -> UpdateMode {
        self.mode
    }

    pub fn num_states(&self) -> usize {
        self.successors.len()
    }

    pub fn num_edges(&self) -> usize {
        self.successors.iter().map(|it| it.len()).sum()
    }

    /// All states in ascending order.
    pub fn states(&self) -> impl Iterator<Item = State> + '_ {
        State::all(self.width)
    }

    pub fn successors(&self, state: State) -> &[State] {
        &self.successors[state.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (State, &[State])> + '_ {
        self.states()
            .zip(self.successors.iter())
            .map(|(state, succ)| (state, succ.as_slice()))
    }

    pub fn is_fixed_point(&self, state: State) -> bool {
        self.successors(state).is_empty()
    }

    /// One deterministic step: the first successor, or the state itself at a fixed point.
    pub fn sync_step(&self, state: State) -> State {
        self.successors(state).first().copied().unwrap_or(state)
    }

    /// The relation with every edge reversed.
    pub fn reversed(&self) -> TransitionRelation {
        let mut predecessors = vec![Vec::new(); self.num_states()];
        for (source, targets) in self.iter() {
            for target in targets {
                predecessors[target.index()].push(source);
            }
        }
        // Sources are visited in ascending order, so every list is already sorted.
        TransitionRelation::from_parts(self.width, self.mode, predecessors)
    }

    /// Number of incoming edges of every state, indexed by state.
    pub fn in_degrees(&self) -> Vec<usize> {
        let mut result = vec![0; self.num_states()];
        for targets in &self.successors {
            for target in targets {
                result[target.index()] += 1;
            }
        }
        result
    }
}

fn check_width(state: &State, width: usize) -> Result<(), FormatError> {
    if state.width() != width {
        return Err(FormatError::StateWidth {
            state: state.to_string(),
            found: state.width(),
            expected: width,
        });
    }
    Ok(())
}
