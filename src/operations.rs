//! The regular algebra on finite automata. Every operation leaves its operands untouched and returns a fresh
//! [`Graph`] whose states are numbered in the order in which they were created.

use crate::prelude::*;

mod combinators;

mod product;

mod complement;

mod trim;

mod language;

/// Contains the partition refinement used for minimization. This is feature gated behind the `minimize` feature.
#[cfg(feature = "minimize")]
mod minimize;

/// Checks that `graph` is a finite automaton with an initial state and returns the latter.
pub(crate) fn require_finite(graph: &Graph, operation: &'static str) -> Result<StateId, StructuralError> {
    if graph.kind() != MachineKind::Finite {
        return Err(StructuralError::UnsupportedKind {
            operation,
            kind: graph.kind(),
        });
    }
    graph.require_initial()
}

/// Checks that both operands are finite automata with initial states.
pub(crate) fn require_finite_pair(
    left: &Graph,
    right: &Graph,
    operation: &'static str,
) -> Result<(StateId, StateId), StructuralError> {
    if left.kind() != right.kind() {
        return Err(StructuralError::KindMismatch {
            left: left.kind(),
            right: right.kind(),
        });
    }
    Ok((
        require_finite(left, operation)?,
        require_finite(right, operation)?,
    ))
}

/// Checks that `graph` is a deterministic finite automaton with an initial state and returns the latter.
pub(crate) fn require_deterministic(
    graph: &Graph,
    operation: &'static str,
) -> Result<StateId, StructuralError> {
    let initial = require_finite(graph, operation)?;
    if !graph.is_deterministic() {
        return Err(StructuralError::NotDeterministic);
    }
    Ok(initial)
}
