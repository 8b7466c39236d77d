use crate::{Show, StateId};

use super::Label;

/// A state of a [`crate::Graph`]. States are only ever identified by their [`StateId`], the label is
/// purely for display and may be shared by several states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub(crate) id: StateId,
    pub(crate) label: String,
    pub(crate) initial: bool,
    pub(crate) accepting: bool,
}

impl State {
    pub(crate) fn new(id: StateId, label: String) -> Self {
        Self {
            id,
            label,
            initial: false,
            accepting: false,
        }
    }

    /// The stable id of the state.
    pub fn id(&self) -> StateId {
        self.id
    }

    /// The display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether this is the initial state of its graph.
    pub fn is_initial(&self) -> bool {
        self.initial
    }

    /// Whether the state is accepting.
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }
}

/// A transition between an ordered pair of states. There is at most one of these per pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub(crate) origin: StateId,
    pub(crate) target: StateId,
    pub(crate) label: Label,
}

impl Transition {
    /// Where the transition starts.
    pub fn origin(&self) -> StateId {
        self.origin
    }

    /// Where the transition leads.
    pub fn target(&self) -> StateId {
        self.target
    }

    /// The symbols or operations the transition carries.
    pub fn label(&self) -> &Label {
        &self.label
    }
}

impl Show for Transition {
    fn show(&self) -> String {
        format!(
            "({}, {}, {})",
            self.origin.show(),
            self.label.show(),
            self.target.show()
        )
    }
}
