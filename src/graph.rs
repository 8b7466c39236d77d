use std::cell::OnceCell;
use std::collections::BTreeSet;
use std::fmt::Display;

use tracing::trace;

use crate::{closure::EpsilonClosures, error::StructuralError, math::Map};

mod id;
pub use id::{DefaultIdType, StateId};

mod label;
pub use label::{Direction, Effect, Label, MachineKind, Operation, Symbol, EPSILON};

mod state;
pub use state::{State, Transition};

mod builder;
pub use builder::GraphBuilder;

mod table;

/// Views that are computed on demand from the states and transitions. Every structural mutation
/// resets them, so they can never be observed in a stale state.
#[derive(Clone, Default)]
pub(crate) struct Derived {
    alphabet: OnceCell<BTreeSet<Symbol>>,
    relation: OnceCell<Map<(StateId, Symbol), Vec<StateId>>>,
    outgoing: OnceCell<Vec<Vec<usize>>>,
    pub(crate) closures: OnceCell<EpsilonClosures>,
}

/// An automaton graph: an arena of [`State`]s together with labeled [`Transition`]s and at most one
/// initial state.
///
/// States are addressed through their [`StateId`], which stays valid until the state is removed. Between
/// any ordered pair of states there is at most one transition, adding another one merges the labels.
///
/// # Example
/// ```
/// use automata_engine::prelude::*;
///
/// let mut g = Graph::finite();
/// let q0 = g.add_state("q0");
/// let q1 = g.add_state("q1");
/// g.set_initial(q0).unwrap();
/// g.set_accepting(q1, true).unwrap();
/// g.add_symbol(q0, 'a', q1).unwrap();
/// g.add_symbol(q0, 'b', q1).unwrap();
/// assert_eq!(g.transitions().count(), 1);
/// assert!(g.run_deterministic("a").unwrap().accepted());
/// ```
#[derive(Clone)]
pub struct Graph {
    kind: MachineKind,
    states: Vec<Option<State>>,
    transitions: Vec<Transition>,
    pairs: Map<(StateId, StateId), usize>,
    initial: Option<StateId>,
    pub(crate) derived: Derived,
}

impl Graph {
    /// Creates an empty graph for machines of the given kind.
    pub fn new(kind: MachineKind) -> Self {
        Self {
            kind,
            states: vec![],
            transitions: vec![],
            pairs: Map::default(),
            initial: None,
            derived: Derived::default(),
        }
    }

    /// Creates an empty finite automaton.
    pub fn finite() -> Self {
        Self::new(MachineKind::Finite)
    }

    /// Creates an empty pushdown automaton.
    pub fn pushdown() -> Self {
        Self::new(MachineKind::Pushdown)
    }

    /// Creates an empty Turing machine.
    pub fn turing() -> Self {
        Self::new(MachineKind::Turing)
    }

    /// The kind of machine this graph models.
    pub fn kind(&self) -> MachineKind {
        self.kind
    }

    /// Drops all derived views. Every mutating method does this on its own, so calling it is only
    /// necessary to free memory.
    pub fn invalidate_caches(&mut self) {
        self.derived = Derived::default();
    }

    /// Returns the state with the given id, if it exists.
    pub fn state<X: Into<StateId>>(&self, id: X) -> Option<&State> {
        self.states.get(id.into().index()).and_then(|s| s.as_ref())
    }

    /// Returns true if the state exists.
    pub fn contains<X: Into<StateId>>(&self, id: X) -> bool {
        self.state(id).is_some()
    }

    /// Iterates over all states in creation order.
    pub fn states(&self) -> impl Iterator<Item = &State> + '_ {
        self.states.iter().flatten()
    }

    /// Iterates over the ids of all states in creation order.
    pub fn state_ids(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states().map(|s| s.id)
    }

    /// The number of states.
    pub fn size(&self) -> usize {
        self.states().count()
    }

    /// One more than the largest id that was ever handed out.
    pub(crate) fn id_bound(&self) -> usize {
        self.states.len()
    }

    /// Returns the id of the first state with the given label.
    pub fn find_state(&self, label: &str) -> Option<StateId> {
        self.states().find(|s| s.label == label).map(|s| s.id)
    }

    /// The initial state, if there is one.
    pub fn initial(&self) -> Option<StateId> {
        self.initial
    }

    pub(crate) fn require_initial(&self) -> Result<StateId, StructuralError> {
        self.initial.ok_or(StructuralError::NoInitialState)
    }

    /// Iterates over the ids of all accepting states.
    pub fn accepting_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states().filter(|s| s.accepting).map(|s| s.id)
    }

    /// Returns true if the state exists and is accepting.
    pub fn is_accepting<X: Into<StateId>>(&self, id: X) -> bool {
        self.state(id).map(|s| s.accepting).unwrap_or(false)
    }

    fn check(&self, id: StateId) -> Result<StateId, StructuralError> {
        if self.contains(id) {
            Ok(id)
        } else {
            Err(StructuralError::UnknownState(id))
        }
    }

    fn state_mut(&mut self, id: StateId) -> Result<&mut State, StructuralError> {
        self.states
            .get_mut(id.index())
            .and_then(|s| s.as_mut())
            .ok_or(StructuralError::UnknownState(id))
    }

    /// Adds a new state with the given label and returns its id. The state is neither initial nor accepting.
    pub fn add_state<L: Into<String>>(&mut self, label: L) -> StateId {
        let id = StateId::from_index(self.states.len());
        self.states.push(Some(State::new(id, label.into())));
        self.invalidate_caches();
        id
    }

    /// Makes `id` the initial state. The previous initial state, if any, loses its flag.
    pub fn set_initial<X: Into<StateId>>(&mut self, id: X) -> Result<(), StructuralError> {
        let id = self.check(id.into())?;
        if let Some(previous) = self.initial.take() {
            self.state_mut(previous)?.initial = false;
        }
        self.state_mut(id)?.initial = true;
        self.initial = Some(id);
        self.invalidate_caches();
        Ok(())
    }

    /// Removes the initial state designation.
    pub fn clear_initial(&mut self) {
        if let Some(previous) = self.initial.take() {
            if let Ok(state) = self.state_mut(previous) {
                state.initial = false;
            }
        }
        self.invalidate_caches();
    }

    /// Sets whether `id` is accepting.
    pub fn set_accepting<X: Into<StateId>>(
        &mut self,
        id: X,
        accepting: bool,
    ) -> Result<(), StructuralError> {
        self.state_mut(id.into())?.accepting = accepting;
        self.invalidate_caches();
        Ok(())
    }

    /// Changes the display label of `id`.
    pub fn rename_state<X: Into<StateId>, L: Into<String>>(
        &mut self,
        id: X,
        label: L,
    ) -> Result<(), StructuralError> {
        self.state_mut(id.into())?.label = label.into();
        Ok(())
    }

    /// Removes a state together with every transition that starts or ends in it. If it was the initial
    /// state, the graph has no initial state afterwards.
    pub fn remove_state<X: Into<StateId>>(&mut self, id: X) -> Result<State, StructuralError> {
        let id = self.check(id.into())?;
        let Some(state) = self.states[id.index()].take() else {
            return Err(StructuralError::UnknownState(id));
        };
        if self.initial == Some(id) {
            self.initial = None;
        }
        let before = self.transitions.len();
        self.transitions.retain(|t| t.origin != id && t.target != id);
        trace!(
            "removed state {:?} and {} incident transitions",
            id,
            before - self.transitions.len()
        );
        self.reindex();
        self.invalidate_caches();
        Ok(state)
    }

    fn reindex(&mut self) {
        self.pairs = self
            .transitions
            .iter()
            .enumerate()
            .map(|(i, t)| ((t.origin, t.target), i))
            .collect();
    }

    /// Adds a transition from `origin` to `target`. If the two states are already connected in this
    /// direction, the label is merged into the existing transition instead.
    pub fn add_transition<X: Into<StateId>, Y: Into<StateId>>(
        &mut self,
        origin: X,
        target: Y,
        label: Label,
    ) -> Result<(), StructuralError> {
        let origin = self.check(origin.into())?;
        let target = self.check(target.into())?;
        if !label.fits(self.kind) {
            return Err(StructuralError::LabelMismatch { kind: self.kind });
        }
        if label.is_empty() {
            return Ok(());
        }
        match self.pairs.get(&(origin, target)) {
            Some(&pos) => {
                let kind = self.kind;
                self.transitions[pos].label.merge(label, kind)?;
            }
            None => {
                self.pairs.insert((origin, target), self.transitions.len());
                self.transitions.push(Transition {
                    origin,
                    target,
                    label,
                });
            }
        }
        self.invalidate_caches();
        Ok(())
    }

    /// Adds a transition on a single symbol, see [`Graph::add_transition`].
    pub fn add_symbol<X: Into<StateId>, Y: Into<StateId>>(
        &mut self,
        origin: X,
        symbol: Symbol,
        target: Y,
    ) -> Result<(), StructuralError> {
        self.add_transition(origin, target, Label::symbol(symbol))
    }

    /// Adds a transition with a single operation, see [`Graph::add_transition`].
    pub fn add_operation<X: Into<StateId>, Y: Into<StateId>>(
        &mut self,
        origin: X,
        operation: Operation,
        target: Y,
    ) -> Result<(), StructuralError> {
        self.add_transition(origin, target, Label::operation(operation))
    }

    /// Removes the transition from `origin` to `target` and returns it.
    pub fn remove_transition<X: Into<StateId>, Y: Into<StateId>>(
        &mut self,
        origin: X,
        target: Y,
    ) -> Option<Transition> {
        let pos = self.pairs.get(&(origin.into(), target.into())).copied()?;
        let removed = self.transitions.remove(pos);
        self.reindex();
        self.invalidate_caches();
        Some(removed)
    }

    /// Removes `symbol` from the transition between `origin` and `target`. For stack and tape machines, all
    /// operations reading `symbol` are removed. A transition whose label becomes empty is removed as well.
    /// Returns true if anything changed.
    pub fn remove_symbol<X: Into<StateId>, Y: Into<StateId>>(
        &mut self,
        origin: X,
        symbol: Symbol,
        target: Y,
    ) -> bool {
        let (origin, target) = (origin.into(), target.into());
        let Some(&pos) = self.pairs.get(&(origin, target)) else {
            return false;
        };
        let changed = match &mut self.transitions[pos].label {
            Label::Symbols(symbols) => symbols.remove(&symbol),
            Label::Operations(ops) => {
                let before = ops.len();
                ops.retain(|op| op.read != symbol);
                before != ops.len()
            }
        };
        if self.transitions[pos].label.is_empty() {
            self.remove_transition(origin, target);
        }
        self.invalidate_caches();
        changed
    }

    /// Iterates over all transitions in creation order.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition> + '_ {
        self.transitions.iter()
    }

    /// Returns the transition from `origin` to `target`, if there is one.
    pub fn transition<X: Into<StateId>, Y: Into<StateId>>(
        &self,
        origin: X,
        target: Y,
    ) -> Option<&Transition> {
        self.pairs
            .get(&(origin.into(), target.into()))
            .map(|&pos| &self.transitions[pos])
    }

    /// Iterates over the transitions leaving `state` in creation order.
    pub fn edges_from<X: Into<StateId>>(&self, state: X) -> impl Iterator<Item = &Transition> + '_ {
        let outgoing = self.derived.outgoing.get_or_init(|| {
            let mut outgoing = vec![vec![]; self.id_bound()];
            for (i, t) in self.transitions.iter().enumerate() {
                outgoing[t.origin.index()].push(i);
            }
            outgoing
        });
        outgoing
            .get(state.into().index())
            .into_iter()
            .flatten()
            .map(|&pos| &self.transitions[pos])
    }

    /// The set of all input symbols mentioned on any transition, without [`EPSILON`].
    pub fn alphabet(&self) -> &BTreeSet<Symbol> {
        self.derived.alphabet.get_or_init(|| {
            self.transitions
                .iter()
                .flat_map(|t| t.label.reads())
                .filter(|&s| s != EPSILON)
                .collect()
        })
    }

    fn relation(&self) -> &Map<(StateId, Symbol), Vec<StateId>> {
        self.derived.relation.get_or_init(|| {
            let mut relation: Map<(StateId, Symbol), Vec<StateId>> = Map::default();
            for t in &self.transitions {
                for symbol in t.label.reads() {
                    let targets = relation.entry((t.origin, symbol)).or_default();
                    if !targets.contains(&t.target) {
                        targets.push(t.target);
                    }
                }
            }
            relation
        })
    }

    /// The states that can be reached from `state` with a transition reading `symbol`, in creation order
    /// of the transitions. Passing [`EPSILON`] gives the silent successors.
    pub fn successors<X: Into<StateId>>(&self, state: X, symbol: Symbol) -> &[StateId] {
        self.relation()
            .get(&(state.into(), symbol))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// A finite automaton is deterministic if it has no silent transitions and no state has two transitions
    /// sharing a symbol. Stack and tape machines are never considered deterministic here.
    pub fn is_deterministic(&self) -> bool {
        self.kind == MachineKind::Finite
            && !self.transitions.iter().any(|t| t.label.is_silent())
            && self.relation().values().all(|targets| targets.len() <= 1)
    }

    /// Returns true if every state has a transition for every symbol of the alphabet.
    pub fn is_total(&self) -> bool {
        self.state_ids().all(|q| {
            self.alphabet()
                .iter()
                .all(|&a| !self.successors(q, a).is_empty())
        })
    }

    /// Copies all states and transitions of `other` into `self`, without the initial designation.
    /// Returns the ids the copied states received, indexed by the position of the original id.
    pub(crate) fn embed(&mut self, other: &Graph) -> Vec<Option<StateId>> {
        let mut ids = vec![None; other.id_bound()];
        for state in other.states() {
            let id = self.add_state(state.label.clone());
            if let Some(copy) = self.states[id.index()].as_mut() {
                copy.accepting = state.accepting;
            }
            ids[state.id.index()] = Some(id);
        }
        for t in other.transitions() {
            if let (Some(origin), Some(target)) = (ids[t.origin.index()], ids[t.target.index()]) {
                self.add_transition(origin, target, t.label.clone())
                    .expect("labels of a graph of the same kind always fit");
            }
        }
        ids
    }

    /// Returns a fresh graph containing only the states for which `keep` holds, renumbered in creation
    /// order. The initial state is kept if it is among them.
    pub(crate) fn restricted_to<F: Fn(StateId) -> bool>(&self, keep: F) -> Graph {
        let mut out = Graph::new(self.kind);
        let mut ids = vec![None; self.id_bound()];
        for state in self.states().filter(|s| keep(s.id)) {
            let id = out.add_state(state.label.clone());
            if let Some(copy) = out.states[id.index()].as_mut() {
                copy.accepting = state.accepting;
            }
            ids[state.id.index()] = Some(id);
        }
        for t in &self.transitions {
            if let (Some(origin), Some(target)) = (ids[t.origin.index()], ids[t.target.index()]) {
                out.add_transition(origin, target, t.label.clone())
                    .expect("labels of a graph of the same kind always fit");
            }
        }
        if let Some(initial) = self.initial.and_then(|q| ids[q.index()]) {
            out.set_initial(initial)
                .expect("initial state was just added");
        }
        out
    }
}

impl Display for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.transition_table())
    }
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} graph\n{}", self.kind, self.transition_table())
    }
}
