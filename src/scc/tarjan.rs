use crate::log_states;
use crate::scc::SccConfig;
use crate::state::State;
use crate::transition::TransitionRelation;
use cancel_this::is_cancelled;
use computation_process::Incomplete::Suspended;
use computation_process::{Completable, GeneratorStep};
use log::{debug, trace};

const UNVISITED: u32 = u32::MAX;

/// Internal state of the iterative Tarjan's algorithm.
///
/// The native call stack of the recursive formulation is replaced by `call_stack`, where
/// each frame stores the visited state and the position of the next successor to explore.
pub struct TarjanState {
    index: Vec<u32>,
    lowlink: Vec<u32>,
    on_stack: Vec<bool>,
    stack: Vec<State>,
    call_stack: Vec<(State, usize)>,
    next_root: u64,
    counter: u32,
}

/// Step implementation of the iterative Tarjan's algorithm.
pub struct TarjanStep;

impl From<&TransitionRelation> for TarjanState {
    fn from(value: &TransitionRelation) -> Self {
        let count = value.num_states();
        TarjanState {
            index: vec![UNVISITED; count],
            lowlink: vec![UNVISITED; count],
            on_stack: vec![false; count],
            stack: Vec::new(),
            call_stack: Vec::new(),
            next_root: 0,
            counter: 0,
        }
    }
}

impl From<&SccConfig> for TarjanState {
    fn from(value: &SccConfig) -> Self {
        TarjanState::from(value.relation.as_ref())
    }
}

impl TarjanState {
    fn visit(&mut self, state: State) {
        let i = state.index();
        self.index[i] = self.counter;
        self.lowlink[i] = self.counter;
        self.counter += 1;
        self.on_stack[i] = true;
        self.stack.push(state);
        self.call_stack.push((state, 0));
    }

    /// Pop the component rooted in `root` from the Tarjan stack.
    fn pop_component(&mut self, root: State) -> Vec<State> {
        let mut component = Vec::new();
        while let Some(member) = self.stack.pop() {
            self.on_stack[member.index()] = false;
            component.push(member);
            if member == root {
                break;
            }
        }
        component.sort_unstable();
        component
    }

    fn next_unvisited_root(&mut self, width: usize) -> Option<State> {
        let count = self.index.len() as u64;
        while self.next_root < count && self.index[self.next_root as usize] != UNVISITED {
            self.next_root += 1;
        }
        if self.next_root == count {
            None
        } else {
            Some(State::from_bits(self.next_root, width))
        }
    }
}

impl GeneratorStep<SccConfig, TarjanState, Vec<State>> for TarjanStep {
    fn step(context: &SccConfig, state: &mut TarjanState) -> Completable<Option<Vec<State>>> {
        is_cancelled!()?;

        let relation = context.relation.as_ref();
        let mut budget = context.step_budget.max(1);
        loop {
            let Some(&(current, child)) = state.call_stack.last() else {
                // Nothing is being explored. Start a new depth-first search, or finish.
                let Some(root) = state.next_unvisited_root(relation.width()) else {
                    debug!("Tarjan SCC finished after visiting {} states.", state.counter);
                    return Ok(None);
                };
                trace!("Starting depth-first search in `{root}`.");
                state.visit(root);
                continue;
            };

            let successors = relation.successors(current);
            let v = current.index();
            if child < successors.len() {
                let top = state.call_stack.len() - 1;
                state.call_stack[top].1 += 1;
                let next = successors[child];
                let w = next.index();
                if state.index[w] == UNVISITED {
                    state.visit(next);
                } else if state.on_stack[w] {
                    state.lowlink[v] = state.lowlink[v].min(state.index[w]);
                }
            } else {
                state.call_stack.pop();
                if let Some(&(parent, _)) = state.call_stack.last() {
                    let p = parent.index();
                    state.lowlink[p] = state.lowlink[p].min(state.lowlink[v]);
                }
                if state.lowlink[v] == state.index[v] {
                    let component = state.pop_component(current);
                    trace!("Found SCC ({}).", log_states(&component));
                    return Ok(Some(component));
                }
            }

            budget -= 1;
            if budget == 0 {
                debug!(
                    "Tarjan SCC suspended; visited={}; depth={}.",
                    state.counter,
                    state.call_stack.len()
                );
                return Err(Suspended);
            }
        }
    }
}
