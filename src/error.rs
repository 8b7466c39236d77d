use thiserror::Error;

use crate::graph::{MachineKind, StateId};

/// Reported when an operation requires a precondition that the graph it is applied to does not meet.
/// These are never worked around silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// The graph has no designated initial state.
    #[error("the graph has no initial state")]
    NoInitialState,
    /// The operation needs a deterministic graph without silent transitions.
    #[error("the graph is not deterministic")]
    NotDeterministic,
    /// A binary operation was given graphs of different kinds.
    #[error("cannot combine a {left} graph with a {right} graph")]
    KindMismatch {
        /// Kind of the left operand.
        left: MachineKind,
        /// Kind of the right operand.
        right: MachineKind,
    },
    /// The operation is only defined for some kinds of machines.
    #[error("{operation} is not supported for {kind} graphs")]
    UnsupportedKind {
        /// Name of the rejected operation.
        operation: &'static str,
        /// Kind of the graph it was applied to.
        kind: MachineKind,
    },
    /// A transition label does not fit the kind of the graph.
    #[error("label does not fit a {kind} graph")]
    LabelMismatch {
        /// Kind of the graph the label was meant for.
        kind: MachineKind,
    },
    /// The given state does not exist (anymore).
    #[error("state {0:?} does not exist")]
    UnknownState(StateId),
}
