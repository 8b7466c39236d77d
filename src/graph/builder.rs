use itertools::Itertools;

use crate::prelude::*;

use super::DefaultIdType;

/// Helper struct for the construction of graphs from tuples. It stores a list of transitions, a list of accepting
/// states and optionally labels for the states. States are numbered `0..n` where `n - 1` is the largest number
/// mentioned anywhere, and are labeled `q0, q1, ...` unless a label is given.
///
/// # Example
///
/// We want to create a finite automaton with two states `0` and `1` over the symbols `a` and `b`, where `0` is
/// initial, `1` is accepting, and reading `b` toggles between the two states.
/// ```
/// use automata_engine::prelude::*;
///
/// let g = GraphBuilder::finite()
///     .with_accepting([1])
///     .with_transitions([(0, 'a', 0), (0, 'b', 1), (1, 'a', 1), (1, 'b', 0)])
///     .into_graph(0);
/// assert!(!g.run_deterministic("abab").unwrap().accepted());
/// assert!(g.run_deterministic("aab").unwrap().accepted());
/// ```
pub struct GraphBuilder {
    kind: MachineKind,
    labels: Vec<(DefaultIdType, String)>,
    accepting: Vec<DefaultIdType>,
    transitions: Vec<(DefaultIdType, Label, DefaultIdType)>,
    states: DefaultIdType,
}

impl GraphBuilder {
    /// Creates an empty builder for graphs of the given kind.
    pub fn new(kind: MachineKind) -> Self {
        Self {
            kind,
            labels: vec![],
            accepting: vec![],
            transitions: vec![],
            states: 0,
        }
    }

    /// Creates an empty builder for finite automata.
    pub fn finite() -> Self {
        Self::new(MachineKind::Finite)
    }

    /// Creates an empty builder for pushdown automata.
    pub fn pushdown() -> Self {
        Self::new(MachineKind::Pushdown)
    }

    /// Creates an empty builder for Turing machines.
    pub fn turing() -> Self {
        Self::new(MachineKind::Turing)
    }

    fn mention(&mut self, q: DefaultIdType) {
        self.states = self.states.max(q + 1);
    }

    /// Makes sure that at least `n` states are created, even if some of them are never mentioned.
    pub fn with_states(mut self, n: DefaultIdType) -> Self {
        self.states = self.states.max(n);
        self
    }

    /// Marks the given states as accepting.
    pub fn with_accepting<I: IntoIterator<Item = DefaultIdType>>(mut self, iter: I) -> Self {
        for q in iter {
            self.mention(q);
            self.accepting.push(q);
        }
        self
    }

    /// Gives the state `q` a display label.
    pub fn with_label<L: Into<String>>(mut self, q: DefaultIdType, label: L) -> Self {
        self.mention(q);
        self.labels.push((q, label.into()));
        self
    }

    /// Adds transitions on single symbols, given as `(origin, symbol, target)`.
    pub fn with_transitions<I: IntoIterator<Item = (DefaultIdType, Symbol, DefaultIdType)>>(
        mut self,
        iter: I,
    ) -> Self {
        for (p, a, q) in iter {
            self.mention(p);
            self.mention(q);
            self.transitions.push((p, Label::symbol(a), q));
        }
        self
    }

    /// Adds transitions carrying a single operation, given as `(origin, operation, target)`.
    pub fn with_operations<I: IntoIterator<Item = (DefaultIdType, Operation, DefaultIdType)>>(
        mut self,
        iter: I,
    ) -> Self {
        for (p, op, q) in iter {
            self.mention(p);
            self.mention(q);
            self.transitions.push((p, Label::operation(op), q));
        }
        self
    }

    /// Builds the graph without an initial state.
    ///
    /// # Panics
    /// If a transition does not fit the kind of the builder.
    pub fn into_graph_without_initial(self) -> Graph {
        let mut graph = Graph::new(self.kind);
        for q in 0..self.states {
            let label = self
                .labels
                .iter()
                .rev()
                .find_map(|(p, l)| if *p == q { Some(l.clone()) } else { None })
                .unwrap_or_else(|| format!("q{q}"));
            graph.add_state(label);
        }
        for q in self.accepting.into_iter().unique() {
            graph
                .set_accepting(q, true)
                .expect("all mentioned states were created");
        }
        for (p, label, q) in self.transitions {
            if let Err(e) = graph.add_transition(p, q, label) {
                panic!("could not add transition from {p} to {q}: {e}");
            }
        }
        graph
    }

    /// Builds the graph and makes `initial` its initial state.
    ///
    /// # Panics
    /// If `initial` was never mentioned or a transition does not fit the kind of the builder.
    pub fn into_graph(self, initial: DefaultIdType) -> Graph {
        let mut graph = self.into_graph_without_initial();
        if let Err(e) = graph.set_initial(initial) {
            panic!("initial state {initial} does not exist: {e}");
        }
        graph
    }
}
