use std::fmt::Debug;

use bit_set::BitSet;
use itertools::Itertools;
use tracing::trace;

use crate::{math::Map, prelude::*};

/// A set of states of some graph, used as the covering set of a state produced by the subset construction.
/// Equality, hashing and ordering are structural, so two sets with the same members are the same key
/// no matter in which order they were built.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateSet(BitSet);

impl StateSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `state`, returns true if it was not present before.
    pub fn insert(&mut self, state: StateId) -> bool {
        self.0.insert(state.index())
    }

    /// Returns true if `state` is a member.
    pub fn contains(&self, state: StateId) -> bool {
        self.0.contains(state.index())
    }

    /// Adds all members of `other` to `self`.
    pub fn union_with(&mut self, other: &StateSet) {
        self.0.union_with(&other.0)
    }

    /// The number of members.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no members.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the members in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.0.iter().map(StateId::from_index)
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<T: IntoIterator<Item = StateId>>(iter: T) -> Self {
        let mut set = StateSet::new();
        for q in iter {
            set.insert(q);
        }
        set
    }
}

impl Debug for StateSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.iter().map(|q| q.show()).join(", "))
    }
}

impl Show for StateSet {
    fn show(&self) -> String {
        format!("{self:?}")
    }
}

/// The epsilon-closure of every state of a graph. Closures are interned: states whose closures are equal
/// share one [`StateSet`].
#[derive(Clone, Debug)]
pub struct EpsilonClosures {
    closures: Vec<StateSet>,
    of: Vec<Option<usize>>,
}

impl EpsilonClosures {
    /// Computes the closures of all states of `graph` by a reachability search over its silent transitions.
    /// Only symbol labels can be silent, operations of stack and tape machines are never followed here.
    pub fn compute(graph: &Graph) -> Self {
        let mut closures = vec![];
        let mut interned: Map<StateSet, usize> = Map::default();
        let mut of = vec![None; graph.id_bound()];

        let silent = graph.kind() == MachineKind::Finite;

        for q in graph.state_ids() {
            let mut closure = StateSet::from_iter([q]);
            let mut stack = if silent { vec![q] } else { vec![] };
            while let Some(p) = stack.pop() {
                for &r in graph.successors(p, EPSILON) {
                    if closure.insert(r) {
                        stack.push(r);
                    }
                }
            }
            let pos = *interned.entry(closure).or_insert_with_key(|closure| {
                closures.push(closure.clone());
                closures.len() - 1
            });
            of[q.index()] = Some(pos);
        }
        trace!(
            "computed epsilon closures of {} states, {} distinct",
            graph.size(),
            closures.len()
        );

        Self { closures, of }
    }

    /// Returns the closure of `state`, or `None` if the state does not exist.
    pub fn get(&self, state: StateId) -> Option<&StateSet> {
        self.of
            .get(state.index())
            .copied()
            .flatten()
            .map(|pos| &self.closures[pos])
    }

    /// Returns the union of the closures of all members of `set`.
    pub fn close(&self, set: &StateSet) -> StateSet {
        let mut out = set.clone();
        for q in set.iter() {
            if let Some(closure) = self.get(q) {
                out.union_with(closure);
            }
        }
        out
    }

    /// The number of distinct closures.
    pub fn distinct(&self) -> usize {
        self.closures.len()
    }
}

impl Graph {
    /// The epsilon-closure table of the graph, computed once and kept until the next mutation.
    pub fn epsilon_closures(&self) -> &EpsilonClosures {
        self.derived
            .closures
            .get_or_init(|| EpsilonClosures::compute(self))
    }

    /// The set of states reachable from `state` using only silent transitions, including `state` itself.
    pub fn epsilon_closure<X: Into<StateId>>(&self, state: X) -> Option<&StateSet> {
        self.epsilon_closures().get(state.into())
    }
}
