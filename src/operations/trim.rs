use std::collections::VecDeque;

use tracing::debug;

use crate::{math::Set, prelude::*};

impl Graph {
    /// Returns the states that can be reached from the initial state, in the order in which a breadth-first
    /// search discovers them. All transitions are followed regardless of their labels.
    pub fn reachable_states(&self) -> Result<Vec<StateId>, StructuralError> {
        let initial = self.require_initial()?;
        let mut seen = Set::from_iter([initial]);
        let mut order = vec![initial];
        let mut queue = VecDeque::from([initial]);
        while let Some(q) = queue.pop_front() {
            for t in self.edges_from(q) {
                if seen.insert(t.target()) {
                    order.push(t.target());
                    queue.push_back(t.target());
                }
            }
        }
        Ok(order)
    }

    /// Returns the set of states from which some accepting state can be reached.
    pub fn productive_states(&self) -> Set<StateId> {
        let mut predecessors: Vec<Vec<StateId>> = vec![vec![]; self.id_bound()];
        for t in self.transitions() {
            predecessors[t.target().index()].push(t.origin());
        }
        let mut productive: Set<StateId> = self.accepting_states().collect();
        let mut stack: Vec<StateId> = productive.iter().copied().collect();
        while let Some(q) = stack.pop() {
            for &p in &predecessors[q.index()] {
                if productive.insert(p) {
                    stack.push(p);
                }
            }
        }
        productive
    }

    /// Removes every state that cannot be reached from the initial state.
    pub fn remove_inaccessible(&self) -> Result<Graph, StructuralError> {
        let reachable: Set<StateId> = self.reachable_states()?.into_iter().collect();
        Ok(self.restricted_to(|q| reachable.contains(&q)))
    }

    /// Removes every state from which no accepting state can be reached. The initial state is kept in any
    /// case, so the result stays runnable even if it accepts nothing.
    pub fn remove_useless(&self) -> Result<Graph, StructuralError> {
        let initial = self.require_initial()?;
        let productive = self.productive_states();
        Ok(self.restricted_to(|q| q == initial || productive.contains(&q)))
    }

    /// Removes inaccessible states and useless states, see [`Graph::remove_inaccessible`] and
    /// [`Graph::remove_useless`].
    pub fn remove_inaccessible_and_useless(&self) -> Result<Graph, StructuralError> {
        let out = self.remove_inaccessible()?.remove_useless()?;
        debug!("trimmed {} states down to {}", self.size(), out.size());
        Ok(out)
    }
}
