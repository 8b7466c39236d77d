use tracing::debug;

use super::{require_finite, require_finite_pair};
use crate::prelude::*;

fn copied(ids: &[Option<StateId>], q: StateId) -> StateId {
    ids[q.index()].expect("every existing state is copied")
}

impl Graph {
    /// Builds a finite automaton accepting every word accepted by `self` or by `other`. A fresh initial state
    /// is connected to the initial states of copies of both operands with silent transitions.
    pub fn union(&self, other: &Graph) -> Result<Graph, StructuralError> {
        let (left, right) = require_finite_pair(self, other, "union")?;
        let mut out = Graph::finite();
        let start = out.add_state("s");
        out.set_initial(start)?;
        let left_ids = out.embed(self);
        let right_ids = out.embed(other);
        out.add_symbol(start, EPSILON, copied(&left_ids, left))?;
        out.add_symbol(start, EPSILON, copied(&right_ids, right))?;
        debug!("built union with {} states", out.size());
        Ok(out)
    }

    /// Builds a finite automaton accepting every word `uv` such that `u` is accepted by `self` and `v` is
    /// accepted by `other`. The accepting states of `self` lose their flag and move silently into `other`.
    pub fn concatenate(&self, other: &Graph) -> Result<Graph, StructuralError> {
        let (left, right) = require_finite_pair(self, other, "concatenation")?;
        let mut out = Graph::finite();
        let left_ids = out.embed(self);
        let right_ids = out.embed(other);
        out.set_initial(copied(&left_ids, left))?;
        let bridge = copied(&right_ids, right);
        for f in self.accepting_states() {
            let f = copied(&left_ids, f);
            out.set_accepting(f, false)?;
            out.add_symbol(f, EPSILON, bridge)?;
        }
        debug!("built concatenation with {} states", out.size());
        Ok(out)
    }

    /// Builds a finite automaton accepting the empty word and every finite concatenation of words accepted by
    /// `self`. A fresh accepting initial state leads silently into a copy of `self`, whose accepting states
    /// lead silently back to the copied initial state.
    pub fn star(&self) -> Result<Graph, StructuralError> {
        let initial = require_finite(self, "kleene star")?;
        let mut out = Graph::finite();
        let start = out.add_state("s");
        out.set_initial(start)?;
        out.set_accepting(start, true)?;
        let ids = out.embed(self);
        let again = copied(&ids, initial);
        out.add_symbol(start, EPSILON, again)?;
        for f in self.accepting_states() {
            out.add_symbol(copied(&ids, f), EPSILON, again)?;
        }
        debug!("built kleene star with {} states", out.size());
        Ok(out)
    }
}
