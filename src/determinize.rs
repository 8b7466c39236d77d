use std::collections::VecDeque;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{math::Bijection, prelude::*};

/// The result of the subset construction: the deterministic graph together with the bijection between
/// covering sets of original states and the states of the new graph.
#[derive(Debug, Clone)]
pub struct Determinization {
    /// The deterministic graph.
    pub graph: Graph,
    /// Associates every state of `graph` with the set of original states it covers.
    pub covering: Bijection<StateSet, StateId>,
}

impl Determinization {
    /// Returns the set of original states covered by `state`.
    pub fn covered_by(&self, state: StateId) -> Option<&StateSet> {
        self.covering.get_by_right(&state)
    }
}

fn covering_label(graph: &Graph, set: &StateSet) -> String {
    format!(
        "{{{}}}",
        set.iter()
            .filter_map(|q| graph.state(q))
            .map(|q| q.label())
            .join(", ")
    )
}

/// Returns the state of `dfa` covering `set`, creating and enqueueing it if the set was not seen before.
fn discover(
    nfa: &Graph,
    set: StateSet,
    dfa: &mut Graph,
    covering: &mut Bijection<StateSet, StateId>,
    queue: &mut VecDeque<StateId>,
) -> StateId {
    if let Some(&id) = covering.get_by_left(&set) {
        return id;
    }
    let id = dfa.add_state(covering_label(nfa, &set));
    if set.iter().any(|q| nfa.is_accepting(q)) {
        dfa.set_accepting(id, true)
            .expect("state was just created");
    }
    trace!("discovered {} covering {:?}", id.show(), set);
    assert!(
        covering.insert_no_overwrite(set, id).is_ok(),
        "covering set collision for {id:?}"
    );
    queue.push_back(id);
    id
}

impl Graph {
    /// Performs the subset construction, producing an equivalent deterministic graph without silent
    /// transitions. The initial state covers the epsilon-closure of the original initial state, new states are
    /// created in the order in which they are discovered by a breadth-first search that tries the symbols
    /// of the alphabet in ascending order. The result may be partial, i.e. some state may lack a transition on
    /// some symbol; use [`Graph::totalize`] to add a sink.
    pub fn subset_construction(&self) -> Result<Determinization, StructuralError> {
        if self.kind() != MachineKind::Finite {
            return Err(StructuralError::UnsupportedKind {
                operation: "determinization",
                kind: self.kind(),
            });
        }
        let initial = self.require_initial()?;
        let closures = self.epsilon_closures();
        let alphabet = self.alphabet().iter().copied().collect_vec();

        let mut dfa = Graph::finite();
        let mut covering: Bijection<StateSet, StateId> = Bijection::new();
        let mut queue = VecDeque::new();

        let start = closures
            .get(initial)
            .cloned()
            .unwrap_or_else(|| StateSet::from_iter([initial]));
        let start = discover(self, start, &mut dfa, &mut covering, &mut queue);
        dfa.set_initial(start).expect("state was just created");

        while let Some(current) = queue.pop_front() {
            let set = covering
                .get_by_right(&current)
                .cloned()
                .expect("every queued state covers a set");
            for &symbol in &alphabet {
                let mut target = StateSet::new();
                for q in set.iter() {
                    for &p in self.successors(q, symbol) {
                        target.insert(p);
                    }
                }
                if target.is_empty() {
                    continue;
                }
                let target = closures.close(&target);
                let target = discover(self, target, &mut dfa, &mut covering, &mut queue);
                dfa.add_symbol(current, symbol, target)
                    .expect("both states were created by the construction");
            }
        }

        debug!(
            "subset construction turned {} states into {}",
            self.size(),
            dfa.size()
        );
        Ok(Determinization {
            graph: dfa,
            covering,
        })
    }

    /// Returns an equivalent deterministic graph without silent transitions, see [`Graph::subset_construction`].
    pub fn determinize(&self) -> Result<Graph, StructuralError> {
        self.subset_construction().map(|d| d.graph)
    }
}
