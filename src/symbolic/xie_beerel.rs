use crate::symbolic::SymbolicConfig;
use biodivine_lib_param_bn::biodivine_std::traits::Set;
use biodivine_lib_param_bn::symbolic_async_graph::{GraphColoredVertices, SymbolicAsyncGraph};
use cancel_this::{Cancellable, is_cancelled};
use computation_process::Incomplete::Suspended;
use computation_process::{Completable, GeneratorStep};
use log::{debug, info};

/// Internal state of the Xie-Beerel attractor algorithm.
pub struct XieBeerelState {
    computing: Step,
    /// Not yet explored states. This set is always forward-closed.
    remaining: GraphColoredVertices,
}

/// Step implementation for the Xie-Beerel attractor algorithm.
pub struct XieBeerelStep;

enum Step {
    Idle,
    Basin(Step1),
    Attractor(Step2),
}

struct Step1 {
    pivot: GraphColoredVertices,
    basin: GraphColoredVertices,
}

struct Step2 {
    basin: GraphColoredVertices,
    attractor: GraphColoredVertices,
}

/// Successors of `set` (outside of `set`) using the greatest variable that has any.
fn saturation_post(
    config: &SymbolicConfig,
    set: &GraphColoredVertices,
) -> Cancellable<GraphColoredVertices> {
    for var in config.variables.iter().rev() {
        is_cancelled!()?;
        let step = config.graph.var_post_out(*var, set);
        if !step.is_empty() {
            return Ok(step);
        }
    }
    Ok(config.graph.mk_empty_colored_vertices())
}

/// Predecessors of `set` (outside of `set`, inside `universe`) using the greatest variable
/// that has any.
fn saturation_pre(
    config: &SymbolicConfig,
    set: &GraphColoredVertices,
    universe: &GraphColoredVertices,
) -> Cancellable<GraphColoredVertices> {
    for var in config.variables.iter().rev() {
        is_cancelled!()?;
        let step = config.graph.var_pre_out(*var, set).intersect(universe);
        if !step.is_empty() {
            return Ok(step);
        }
    }
    Ok(config.graph.mk_empty_colored_vertices())
}

impl GeneratorStep<SymbolicConfig, XieBeerelState, GraphColoredVertices> for XieBeerelStep {
    fn step(
        context: &SymbolicConfig,
        state: &mut XieBeerelState,
    ) -> Completable<Option<GraphColoredVertices>> {
        match &mut state.computing {
            Step::Idle => {
                if state.remaining.is_empty() {
                    return Ok(None);
                }

                info!(
                    "Start next iteration. Remaining {} states.",
                    state.remaining.exact_cardinality()
                );

                let pivot = state.remaining.pick_vertex();
                state.computing = Step::Basin(Step1 {
                    basin: pivot.clone(),
                    pivot,
                });
                Err(Suspended)
            }
            Step::Basin(step) => {
                let pre = saturation_pre(context, &step.basin, &state.remaining)?;
                if pre.is_empty() {
                    debug!("Basin done ({} states).", step.basin.exact_cardinality());
                    state.computing = Step::Attractor(Step2 {
                        basin: step.basin.clone(),
                        attractor: step.pivot.clone(),
                    });
                } else {
                    step.basin = step.basin.union(&pre);
                }
                Err(Suspended)
            }
            Step::Attractor(step) => {
                let successors = saturation_post(context, &step.attractor)?;
                let escaped = !successors.minus(&step.basin).is_empty();
                if successors.is_empty() || escaped {
                    // The pivot is in an attractor iff its forward set stays in its basin.
                    let attractor = if escaped {
                        debug!("Pivot escapes its basin; no attractor in this basin.");
                        None
                    } else {
                        info!(
                            "Attractor with {} states found.",
                            step.attractor.exact_cardinality()
                        );
                        Some(step.attractor.clone())
                    };
                    state.remaining = state.remaining.minus(&step.basin);
                    state.computing = Step::Idle;
                    match attractor {
                        Some(attractor) => Ok(Some(attractor)),
                        None => Err(Suspended),
                    }
                } else {
                    step.attractor = step.attractor.union(&successors);
                    Err(Suspended)
                }
            }
        }
    }
}

impl From<&SymbolicAsyncGraph> for XieBeerelState {
    fn from(value: &SymbolicAsyncGraph) -> Self {
        XieBeerelState::from(value.mk_unit_colored_vertices())
    }
}

impl From<GraphColoredVertices> for XieBeerelState {
    fn from(value: GraphColoredVertices) -> Self {
        XieBeerelState {
            computing: Step::Idle,
            remaining: value,
        }
    }
}
