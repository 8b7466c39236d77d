//! Equivalence and simulation engine for finite automata, pushdown automata and Turing machines.
//!
//! Everything revolves around a [`Graph`], which is an arena of states connected by labeled transitions.
//! The label of a transition depends on the [`MachineKind`] of the graph: for finite automata it is a set of
//! input symbols (where [`EPSILON`] marks a silent move), for stack and tape machines it is a set of
//! [`Operation`]s, each of which reads an input symbol, inspects the top of the auxiliary memory and applies an
//! [`Effect`] to it. Between any ordered pair of states there is at most one transition, adding a second one
//! merges the labels.
//!
//! On top of the graph model, the crate provides
//! - epsilon-closures and the subset construction (see [`Graph::determinize`]), producing an equivalent
//!   deterministic graph without silent transitions,
//! - the regular algebra on finite automata: [`Graph::union`], [`Graph::concatenate`], [`Graph::star`],
//!   [`Graph::intersection`], [`Graph::complement`] and minimization,
//! - a configuration-tree search which decides acceptance for non-deterministic machines under a step budget
//!   and reconstructs an accepting path for playback (see [`Graph::simulate`]),
//! - a linear runner for deterministic finite automata (see [`Graph::run_deterministic`]).
//!
//! None of the operations mutate their input, results are always fresh graphs.
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use automata_engine::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        closure::{EpsilonClosures, StateSet},
        determinize::Determinization,
        error::StructuralError,
        graph::{
            Direction, Effect, Graph, GraphBuilder, Label, MachineKind, Operation, State, StateId,
            Symbol, Transition, EPSILON,
        },
        math,
        runner::DeterministicRun,
        simulation::{
            Acceptance, Configuration, ConfigurationTree, Halt, Memory, Outcome, Report,
            SearchOrder, SimulationConfig, Step, Tape, Trace, DEFAULT_BUDGET,
        },
        Show, Word,
    };
}

/// Mathematical helpers such as set and map aliases, partitions and bijections.
pub mod math;

/// Error types which are reported when an operation is applied to a graph that does not meet its preconditions.
pub mod error;

/// The graph model, i.e. states, transitions and their labels.
pub mod graph;
pub use graph::{Graph, MachineKind, StateId, Symbol, EPSILON};

/// Epsilon-closures and covering sets.
pub mod closure;

/// Subset construction.
pub mod determinize;

/// Regular operations on finite automata.
pub mod operations;

/// The configuration-tree search for non-deterministic machines.
pub mod simulation;

/// Linear runs of deterministic finite automata.
pub mod runner;

/// Generation of random graphs.
#[cfg(feature = "random")]
pub mod random;

use itertools::Itertools;

/// Anything that can be read as a finite sequence of input symbols.
pub trait Word {
    /// Returns the symbols of `self` in order.
    fn symbols(&self) -> Vec<Symbol>;
}

impl Word for str {
    fn symbols(&self) -> Vec<Symbol> {
        self.chars().collect()
    }
}

impl Word for String {
    fn symbols(&self) -> Vec<Symbol> {
        self.chars().collect()
    }
}

impl Word for [Symbol] {
    fn symbols(&self) -> Vec<Symbol> {
        self.to_vec()
    }
}

impl Word for Vec<Symbol> {
    fn symbols(&self) -> Vec<Symbol> {
        self.clone()
    }
}

impl<W: Word + ?Sized> Word for &W {
    fn symbols(&self) -> Vec<Symbol> {
        W::symbols(*self)
    }
}

/// Helper trait which can be used to display states, transitions and such.
pub trait Show {
    /// Returns a human readable representation of `self`, for a state index that should be
    /// for example q0, q1, q2, ... and for a transition (q0, a, q1) it should be (q0, a, q1).
    /// This is mainly used for debugging and for rendering transition tables.
    fn show(&self) -> String;

    /// Show a collection of the thing, for a collection of states this should be {q0, q1, q2, ...}.
    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        format!("{{{}}}", iter.into_iter().map(|x| x.show()).join(", "))
    }
}

impl Show for char {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for usize {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl Show for bool {
    fn show(&self) -> String {
        match self {
            true => "+",
            false => "-",
        }
        .to_string()
    }
}

impl<S: Show> Show for [S] {
    fn show(&self) -> String {
        format!("\"{}\"", self.iter().map(|x| x.show()).join(""))
    }
}

impl<S: Show> Show for Vec<S> {
    fn show(&self) -> String {
        S::show_collection(self.iter())
    }
}

impl<S: Show> Show for std::collections::BTreeSet<S> {
    fn show(&self) -> String {
        S::show_collection(self.iter())
    }
}

impl<S: Show, T: Show> Show for (S, T) {
    fn show(&self) -> String {
        format!("({}, {})", self.0.show(), self.1.show())
    }
}

impl<S: Show + ?Sized> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}
