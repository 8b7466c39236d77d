use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, trace, warn};

use crate::{math::Set, prelude::*};

/// The number of configurations a simulation may create unless configured otherwise.
pub const DEFAULT_BUDGET: usize = 10_000;

/// When a configuration with no remaining input counts as accepting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Acceptance {
    /// The current state is accepting.
    #[default]
    FinalState,
    /// The auxiliary memory is empty, i.e. the stack is empty or the whole tape is blank. Finite automata have
    /// no memory, for them this behaves like [`Acceptance::FinalState`].
    EmptyMemory,
}

/// The order in which the configuration tree is expanded. In both orders the children of a configuration are
/// generated by trying the transitions leaving its state in creation order and the symbols or operations of
/// each transition in ascending order, which makes the reported accepting path reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchOrder {
    /// Level by level, finds an accepting path with the fewest moves.
    #[default]
    BreadthFirst,
    /// Always expands the most recently created configuration first, following the first applicable move.
    DepthFirst,
}

/// Configuration of a single simulation run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// When a configuration accepts.
    pub acceptance: Acceptance,
    /// The maximal number of configurations that may be created.
    pub budget: usize,
    /// How the tree is expanded.
    pub order: SearchOrder,
    /// The stack contents a pushdown automaton starts with, the first symbol is on top.
    pub initial_stack: Vec<Symbol>,
    /// Skip configurations that are equal to one that was created before.
    pub memoize: bool,
    /// A flag that stops the search once it is set.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            acceptance: Acceptance::default(),
            budget: DEFAULT_BUDGET,
            order: SearchOrder::default(),
            initial_stack: vec![],
            memoize: false,
            cancel: None,
        }
    }
}

impl SimulationConfig {
    /// Sets the acceptance mode.
    pub fn with_acceptance(mut self, acceptance: Acceptance) -> Self {
        self.acceptance = acceptance;
        self
    }

    /// Sets the step budget.
    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    /// Sets the search order.
    pub fn with_order(mut self, order: SearchOrder) -> Self {
        self.order = order;
        self
    }

    /// Sets the initial stack, the first symbol of `stack` is on top.
    pub fn with_initial_stack<W: Word>(mut self, stack: W) -> Self {
        self.initial_stack = stack.symbols();
        self
    }

    /// Enables or disables skipping of repeated configurations.
    pub fn memoized(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    /// Installs a cancellation flag.
    pub fn with_cancellation(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }
}

/// A tape that is infinite in both directions. Only non-blank cells are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Tape {
    cells: BTreeMap<i64, Symbol>,
    head: i64,
}

impl Tape {
    /// The position of the head.
    pub fn head(&self) -> i64 {
        self.head
    }

    /// The symbol under the head, [`EPSILON`] if the cell is blank.
    pub fn read(&self) -> Symbol {
        self.cells.get(&self.head).copied().unwrap_or(EPSILON)
    }

    /// Writes `symbol` under the head, [`EPSILON`] erases the cell.
    pub fn write(&mut self, symbol: Symbol) {
        if symbol == EPSILON {
            self.cells.remove(&self.head);
        } else {
            self.cells.insert(self.head, symbol);
        }
    }

    /// Moves the head.
    pub fn shift(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.head -= 1,
            Direction::Right => self.head += 1,
            Direction::Stay => {}
        }
    }

    /// Returns true if every cell is blank.
    pub fn is_blank(&self) -> bool {
        self.cells.is_empty()
    }

    /// The non-blank part of the tape (including the head position), blanks are shown as `_`.
    pub fn contents(&self) -> String {
        let low = self.cells.keys().next().copied().unwrap_or(self.head).min(self.head);
        let high = self.cells.keys().next_back().copied().unwrap_or(self.head).max(self.head);
        (low..=high)
            .map(|i| self.cells.get(&i).copied().unwrap_or('_'))
            .collect()
    }
}

/// The auxiliary memory of a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Memory {
    /// Finite automata have no memory.
    None,
    /// A stack, the last element is the top.
    Stack(Vec<Symbol>),
    /// A tape with a head.
    Tape(Tape),
}

impl Memory {
    fn initial(kind: MachineKind, stack: &[Symbol]) -> Self {
        match kind {
            MachineKind::Finite => Memory::None,
            MachineKind::Pushdown => Memory::Stack(stack.iter().rev().copied().collect()),
            MachineKind::Turing => Memory::Tape(Tape::default()),
        }
    }

    /// The symbol on top of the stack or under the head, [`EPSILON`] if there is none.
    pub fn top(&self) -> Symbol {
        match self {
            Memory::None => EPSILON,
            Memory::Stack(stack) => stack.last().copied().unwrap_or(EPSILON),
            Memory::Tape(tape) => tape.read(),
        }
    }

    /// Returns true if the stack is empty or the tape is blank. Always true without memory.
    pub fn is_empty(&self) -> bool {
        match self {
            Memory::None => true,
            Memory::Stack(stack) => stack.is_empty(),
            Memory::Tape(tape) => tape.is_blank(),
        }
    }

    /// Applies `operation` if its expected top matches, returning the resulting memory.
    fn apply(&self, operation: &Operation) -> Option<Memory> {
        if self.top() != operation.top {
            return None;
        }
        match (self, &operation.effect) {
            (Memory::Stack(stack), Effect::Replace(push)) => {
                let mut stack = stack.clone();
                if operation.top != EPSILON {
                    stack.pop();
                }
                stack.extend(push.iter().rev());
                Some(Memory::Stack(stack))
            }
            (Memory::Tape(tape), Effect::Write { symbol, direction }) => {
                let mut tape = tape.clone();
                tape.write(*symbol);
                tape.shift(*direction);
                Some(Memory::Tape(tape))
            }
            _ => None,
        }
    }
}

impl Show for Memory {
    fn show(&self) -> String {
        match self {
            Memory::None => "-".to_string(),
            Memory::Stack(stack) if stack.is_empty() => EPSILON.to_string(),
            Memory::Stack(stack) => stack.iter().rev().collect(),
            Memory::Tape(tape) => format!("{}@{}", tape.contents(), tape.head()),
        }
    }
}

/// The move that produced a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Step {
    /// The state the move started in.
    pub origin: StateId,
    /// The input symbol that was consumed, [`EPSILON`] if none.
    pub read: Symbol,
    /// The operation that was applied, `None` for finite automata.
    pub operation: Option<Operation>,
}

/// A snapshot of a run: the current state, how much of the input was consumed, the memory, and how the
/// configuration came to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// The current state.
    pub state: StateId,
    /// The number of consumed input symbols.
    pub position: usize,
    /// The auxiliary memory.
    pub memory: Memory,
    /// The move that produced this configuration, `None` for the root.
    pub via: Option<Step>,
    /// The index of the parent configuration in its tree.
    pub parent: Option<usize>,
}

/// The tree of configurations that a search has created so far. Configurations are stored in an arena in
/// creation order, the root has index `0`.
#[derive(Debug, Clone)]
pub struct ConfigurationTree {
    input: Vec<Symbol>,
    nodes: Vec<Configuration>,
}

impl ConfigurationTree {
    fn new(input: Vec<Symbol>, root: Configuration) -> Self {
        Self {
            input,
            nodes: vec![root],
        }
    }

    /// The input word the tree was built for.
    pub fn input(&self) -> &[Symbol] {
        &self.input
    }

    /// The number of configurations.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true, the tree always contains its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the configuration with the given index.
    pub fn get(&self, index: usize) -> Option<&Configuration> {
        self.nodes.get(index)
    }

    /// The input that `configuration` has not consumed yet.
    pub fn remaining(&self, configuration: &Configuration) -> &[Symbol] {
        &self.input[configuration.position.min(self.input.len())..]
    }

    /// The indices of all configurations on the way from the root to `index`, root first. Returns `None` if
    /// there is no configuration with that index.
    pub fn path_to(&self, index: usize) -> Option<Vec<usize>> {
        let mut path = vec![];
        let mut current = Some(index);
        while let Some(i) = current {
            path.push(i);
            current = self.nodes.get(i)?.parent;
        }
        path.reverse();
        Some(path)
    }

    /// Extracts the path from the root to `index` as a trace for playback.
    pub fn trace_to(&self, index: usize) -> Option<Trace> {
        let steps = self
            .path_to(index)?
            .into_iter()
            .map(|i| self.nodes[i].clone())
            .collect();
        Some(Trace {
            input: self.input.clone(),
            steps,
        })
    }

    fn push(&mut self, configuration: Configuration) -> usize {
        self.nodes.push(configuration);
        self.nodes.len() - 1
    }
}

/// An accepting path through the configuration tree, root first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    input: Vec<Symbol>,
    steps: Vec<Configuration>,
}

impl Trace {
    /// The number of configurations on the path.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Never true, a trace always contains the root.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterates over the configurations from the root to the accepting one.
    pub fn iter(&self) -> std::slice::Iter<'_, Configuration> {
        self.steps.iter()
    }

    /// The sequence of visited states.
    pub fn states(&self) -> Vec<StateId> {
        self.steps.iter().map(|c| c.state).collect()
    }

    /// The input that the `i`-th configuration has not consumed yet.
    pub fn remaining(&self, i: usize) -> Option<&[Symbol]> {
        self.steps
            .get(i)
            .map(|c| &self.input[c.position.min(self.input.len())..])
    }

    /// The accepting configuration.
    pub fn last(&self) -> Option<&Configuration> {
        self.steps.last()
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Configuration;
    type IntoIter = std::slice::Iter<'a, Configuration>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl Show for Trace {
    fn show(&self) -> String {
        self.steps
            .iter()
            .map(|c| {
                format!(
                    "({}, {}, {})",
                    c.state.show(),
                    self.input[c.position.min(self.input.len())..]
                        .iter()
                        .collect::<String>(),
                    c.memory.show()
                )
            })
            .join(" ⊢ ")
    }
}

/// Why a search stopped without a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// More configurations would have been needed than the budget allows, the machine appears not to halt.
    BudgetExceeded,
    /// The cancellation flag was set.
    Cancelled,
}

/// The verdict of a simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The input is accepted, the trace leads from the root to the first accepting configuration found.
    Accepted(Trace),
    /// Every branch of the configuration tree was explored and none accepted.
    Rejected,
    /// The search stopped before it could decide.
    Undecided(Halt),
}

impl Outcome {
    /// Returns true if the input was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_))
    }

    /// Returns true if the input was rejected after a complete search.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected)
    }

    /// Returns true if no decision was reached.
    pub fn is_undecided(&self) -> bool {
        matches!(self, Outcome::Undecided(_))
    }

    /// Collapses the outcome into a boolean, `None` if undecided.
    pub fn decision(&self) -> Option<bool> {
        match self {
            Outcome::Accepted(_) => Some(true),
            Outcome::Rejected => Some(false),
            Outcome::Undecided(_) => None,
        }
    }

    /// The accepting trace, if there is one.
    pub fn trace(&self) -> Option<&Trace> {
        match self {
            Outcome::Accepted(trace) => Some(trace),
            _ => None,
        }
    }
}

/// The outcome of a simulation together with the number of configurations that were created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// The verdict.
    pub outcome: Outcome,
    /// How many configurations were created, the root included.
    pub explored: usize,
}

/// Whether the search stops at the first accepting configuration or keeps exploring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    FirstAccept,
    Exhaustive,
}

struct Search<'a> {
    graph: &'a Graph,
    config: &'a SimulationConfig,
    tree: ConfigurationTree,
    frontier: VecDeque<usize>,
    seen: Set<(StateId, usize, Memory)>,
    accepting: Vec<usize>,
}

impl<'a> Search<'a> {
    fn new<W: Word>(
        graph: &'a Graph,
        word: W,
        config: &'a SimulationConfig,
    ) -> Result<Self, StructuralError> {
        let initial = graph.require_initial()?;
        let root = Configuration {
            state: initial,
            position: 0,
            memory: Memory::initial(graph.kind(), &config.initial_stack),
            via: None,
            parent: None,
        };
        let mut seen = Set::default();
        if config.memoize {
            seen.insert((root.state, root.position, root.memory.clone()));
        }
        Ok(Self {
            graph,
            config,
            tree: ConfigurationTree::new(word.symbols(), root),
            frontier: VecDeque::from([0]),
            seen,
            accepting: vec![],
        })
    }

    fn accepts(&self, configuration: &Configuration) -> bool {
        if configuration.position < self.tree.input.len() {
            return false;
        }
        match (self.config.acceptance, self.graph.kind()) {
            (Acceptance::FinalState, _) | (_, MachineKind::Finite) => {
                self.graph.is_accepting(configuration.state)
            }
            (Acceptance::EmptyMemory, _) => configuration.memory.is_empty(),
        }
    }

    /// Generates the children of the configuration at `index` in move order.
    fn children(&self, index: usize) -> Vec<Configuration> {
        let current = &self.tree.nodes[index];
        let next = self.tree.input.get(current.position).copied();
        let consumes = |read: Symbol| -> Option<usize> {
            if read == EPSILON {
                Some(current.position)
            } else if Some(read) == next {
                Some(current.position + 1)
            } else {
                None
            }
        };
        let mut children = vec![];
        for t in self.graph.edges_from(current.state) {
            match t.label() {
                Label::Symbols(symbols) => {
                    for &read in symbols {
                        if let Some(position) = consumes(read) {
                            children.push(Configuration {
                                state: t.target(),
                                position,
                                memory: current.memory.clone(),
                                via: Some(Step {
                                    origin: current.state,
                                    read,
                                    operation: None,
                                }),
                                parent: Some(index),
                            });
                        }
                    }
                }
                Label::Operations(ops) => {
                    for op in ops {
                        let Some(position) = consumes(op.read) else {
                            continue;
                        };
                        let Some(memory) = current.memory.apply(op) else {
                            continue;
                        };
                        children.push(Configuration {
                            state: t.target(),
                            position,
                            memory,
                            via: Some(Step {
                                origin: current.state,
                                read: op.read,
                                operation: Some(op.clone()),
                            }),
                            parent: Some(index),
                        });
                    }
                }
            }
        }
        children
    }

    fn run(&mut self, stop: Stop) -> Option<Halt> {
        while let Some(index) = match self.config.order {
            SearchOrder::BreadthFirst => self.frontier.pop_front(),
            SearchOrder::DepthFirst => self.frontier.pop_back(),
        } {
            if self.config.cancelled() {
                warn!("simulation cancelled after {} configurations", self.tree.len());
                return Some(Halt::Cancelled);
            }
            if self.accepts(&self.tree.nodes[index]) {
                trace!("configuration {index} accepts");
                self.accepting.push(index);
                if stop == Stop::FirstAccept {
                    return None;
                }
            }

            let mut children = self.children(index);
            if self.config.memoize {
                children.retain(|c| self.seen.insert((c.state, c.position, c.memory.clone())));
            }
            if self.config.order == SearchOrder::DepthFirst {
                children.reverse();
            }
            for child in children {
                if self.tree.len() >= self.config.budget {
                    warn!(
                        "step budget of {} configurations exhausted, the machine appears not to halt",
                        self.config.budget
                    );
                    return Some(Halt::BudgetExceeded);
                }
                let child = self.tree.push(child);
                self.frontier.push_back(child);
            }
        }
        None
    }
}

impl Graph {
    /// Decides whether the machine accepts `word` by searching its configuration tree, stopping at the first
    /// accepting configuration. Works for all kinds of machines, finite automata are treated as machines
    /// without memory. If more configurations than `config.budget` would be needed, the outcome is
    /// [`Outcome::Undecided`], never [`Outcome::Rejected`].
    pub fn simulate<W: Word>(
        &self,
        word: W,
        config: &SimulationConfig,
    ) -> Result<Report, StructuralError> {
        let mut search = Search::new(self, word, config)?;
        let halt = search.run(Stop::FirstAccept);
        let accepted = search
            .accepting
            .first()
            .and_then(|&index| search.tree.trace_to(index));
        let outcome = match (accepted, halt) {
            (Some(trace), _) => Outcome::Accepted(trace),
            (None, Some(halt)) => Outcome::Undecided(halt),
            (None, None) => Outcome::Rejected,
        };
        debug!(
            "simulated {} configurations: {}",
            search.tree.len(),
            match outcome.decision() {
                Some(true) => "accepted",
                Some(false) => "rejected",
                None => "undecided",
            }
        );
        Ok(Report {
            outcome,
            explored: search.tree.len(),
        })
    }

    /// Runs [`Graph::simulate`] with the given acceptance mode and budget and default settings otherwise.
    pub fn run<W: Word>(
        &self,
        word: W,
        acceptance: Acceptance,
        budget: usize,
    ) -> Result<Outcome, StructuralError> {
        let config = SimulationConfig::default()
            .with_acceptance(acceptance)
            .with_budget(budget);
        Ok(self.simulate(word, &config)?.outcome)
    }

    /// Runs [`Graph::simulate`] with the default configuration.
    pub fn accepts<W: Word>(&self, word: W) -> Result<Outcome, StructuralError> {
        Ok(self.simulate(word, &SimulationConfig::default())?.outcome)
    }

    /// Builds the whole configuration tree for `word` up to the budget without stopping at accepting
    /// configurations. Returns the tree, the indices of all accepting configurations in the order in which they
    /// were reached, and the reason the search was cut short, if it was.
    pub fn configuration_tree<W: Word>(
        &self,
        word: W,
        config: &SimulationConfig,
    ) -> Result<(ConfigurationTree, Vec<usize>, Option<Halt>), StructuralError> {
        let mut search = Search::new(self, word, config)?;
        let halt = search.run(Stop::Exhaustive);
        Ok((search.tree, search.accepting, halt))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    use crate::prelude::*;
    use crate::tests::{contains_zero_one, ends_with};

    /// Accepts `{ a^n b^n | n >= 0 }` by final state, starting with `Z` on the stack.
    fn anbn() -> Graph {
        GraphBuilder::pushdown()
            .with_accepting([2])
            .with_operations([
                (0, Operation::replace('a', 'Z', "AZ"), 0),
                (0, Operation::replace('a', 'A', "AA"), 0),
                (0, Operation::replace(EPSILON, 'Z', "Z"), 1),
                (0, Operation::replace(EPSILON, 'A', "A"), 1),
                (1, Operation::replace('b', 'A', ""), 1),
                (1, Operation::replace(EPSILON, 'Z', ""), 2),
            ])
            .into_graph(0)
    }

    /// Accepts even-length palindromes over `{a, b}` by empty stack, starting with an empty stack.
    fn even_palindromes() -> Graph {
        let mut g = GraphBuilder::pushdown().with_states(2).into_graph(0);
        for top in [EPSILON, 'a', 'b'] {
            let keep = if top == EPSILON {
                String::new()
            } else {
                top.to_string()
            };
            for sym in ['a', 'b'] {
                g.add_operation(0u32, Operation::replace(sym, top, &format!("{sym}{keep}")), 0u32)
                    .unwrap();
            }
            g.add_operation(0u32, Operation::replace(EPSILON, top, &keep), 1u32)
                .unwrap();
        }
        for sym in ['a', 'b'] {
            g.add_operation(1u32, Operation::replace(sym, sym, ""), 1u32)
                .unwrap();
        }
        g
    }

    fn stack(word: &str) -> SimulationConfig {
        SimulationConfig::default().with_initial_stack(word)
    }

    #[test_log::test]
    fn running_example_as_nfa() {
        let g = contains_zero_one();
        assert!(g.accepts("001011").unwrap().is_accepted());
        assert!(g.accepts("01").unwrap().is_accepted());
        assert!(g.accepts("10").unwrap().is_rejected());
        assert!(g.accepts("").unwrap().is_rejected());
    }

    #[test_log::test]
    fn nondeterministic_guessing() {
        let g = ends_with("00");
        let report = g.simulate("1100", &SimulationConfig::default()).unwrap();
        let trace = report.outcome.trace().unwrap();
        assert_eq!(
            trace.states(),
            vec![
                StateId::from(0u32),
                0u32.into(),
                0u32.into(),
                1u32.into(),
                2u32.into()
            ]
        );
        assert_eq!(trace.remaining(0), Some(&['1', '1', '0', '0'][..]));
        assert_eq!(trace.remaining(4), Some(&[][..]));
        assert!(report.explored > trace.len());
        assert!(g.accepts("0011").unwrap().is_rejected());
    }

    #[test_log::test]
    fn silent_moves_consume_nothing() {
        let g = GraphBuilder::finite()
            .with_accepting([2])
            .with_transitions([(0, EPSILON, 1), (1, 'a', 2)])
            .into_graph(0);
        let outcome = g.accepts("a").unwrap();
        let trace = outcome.trace().unwrap();
        assert_eq!(trace.len(), 3);
        assert_eq!(trace.iter().nth(1).unwrap().via.as_ref().unwrap().read, EPSILON);
        assert!(g.accepts("").unwrap().is_rejected());
        assert!(g.accepts("aa").unwrap().is_rejected());
    }

    #[test_log::test]
    fn pushdown_by_final_state() {
        let g = anbn();
        for (w, expected) in [
            ("", true),
            ("ab", true),
            ("aabb", true),
            ("aaabbb", true),
            ("a", false),
            ("abb", false),
            ("aab", false),
            ("ba", false),
        ] {
            assert_eq!(
                g.simulate(w, &stack("Z")).unwrap().outcome.decision(),
                Some(expected),
                "{w}"
            );
        }
        // without the bottom marker nothing moves
        assert!(g.accepts("ab").unwrap().is_rejected());
        assert!(g.accepts("").unwrap().is_rejected());
    }

    #[test_log::test]
    fn pushdown_by_empty_stack() {
        let g = even_palindromes();
        let config = SimulationConfig::default().with_acceptance(Acceptance::EmptyMemory);
        for (w, expected) in [
            ("", true),
            ("aa", true),
            ("abba", true),
            ("abaaba", true),
            ("ab", false),
            ("aba", false),
            ("abab", false),
        ] {
            assert_eq!(
                g.simulate(w, &config).unwrap().outcome.decision(),
                Some(expected),
                "{w}"
            );
        }
        let outcome = g.run("abba", Acceptance::EmptyMemory, 1000).unwrap();
        let last = outcome.trace().unwrap().last().unwrap();
        assert_eq!(last.memory, Memory::Stack(vec![]));
        assert_eq!(last.state, StateId::from(1u32));
    }

    #[test_log::test]
    fn turing_machine_on_tape() {
        // copies the input onto the tape, then walks back over it and erases it again
        let g = GraphBuilder::turing()
            .with_accepting([2])
            .with_operations([
                (0, Operation::write('a', EPSILON, 'a', Direction::Right), 0),
                (0, Operation::write('b', EPSILON, 'b', Direction::Right), 0),
                (0, Operation::write(EPSILON, EPSILON, EPSILON, Direction::Left), 1),
                (1, Operation::write(EPSILON, 'a', EPSILON, Direction::Left), 1),
                (1, Operation::write(EPSILON, 'b', EPSILON, Direction::Left), 1),
                (1, Operation::write(EPSILON, EPSILON, EPSILON, Direction::Stay), 2),
            ])
            .into_graph(0);
        let by_state = g.accepts("abb").unwrap();
        let trace = by_state.trace().unwrap();
        assert_eq!(trace.last().unwrap().state, StateId::from(2u32));
        assert!(trace.last().unwrap().memory.is_empty());
        let after_copy = trace.iter().nth(3).unwrap();
        assert_eq!(after_copy.memory.show(), "abb_@3");

        let by_memory = g.run("ab", Acceptance::EmptyMemory, 100).unwrap();
        // erasing the copy leaves the tape blank again
        assert!(by_memory.is_accepted());
    }

    #[test_log::test]
    fn silent_loop_is_undecided() {
        let g = GraphBuilder::finite()
            .with_transitions([(0, EPSILON, 0), (0, 'a', 1)])
            .into_graph(0);
        let outcome = g.run("b", Acceptance::FinalState, 1000).unwrap();
        assert_eq!(outcome, Outcome::Undecided(Halt::BudgetExceeded));
        assert_eq!(outcome.decision(), None);

        let pushing = GraphBuilder::pushdown()
            .with_operations([(0, Operation::replace(EPSILON, EPSILON, "A"), 0)])
            .with_operations([(0, Operation::replace(EPSILON, 'A', "AA"), 0)])
            .into_graph(0);
        let report = pushing
            .simulate("", &SimulationConfig::default().with_budget(1000))
            .unwrap();
        assert!(report.outcome.is_undecided());
        assert!(report.explored <= 1000);
    }

    #[test_log::test]
    fn memoization_detects_repeats() {
        let g = GraphBuilder::finite()
            .with_transitions([(0, EPSILON, 0), (0, 'a', 1)])
            .into_graph(0);
        let config = SimulationConfig::default().memoized(true);
        assert!(g.simulate("b", &config).unwrap().outcome.is_rejected());
    }

    #[test_log::test]
    fn accepting_path_is_reproducible() {
        let g = ends_with("00").union(&ends_with("0")).unwrap();
        let first = g.accepts("100").unwrap();
        for _ in 0..3 {
            assert_eq!(g.clone().accepts("100").unwrap(), first);
        }
        // breadth first finds the shortest accepting path
        let bfs = first.trace().unwrap().len();
        let dfs = g
            .simulate(
                "100",
                &SimulationConfig::default().with_order(SearchOrder::DepthFirst),
            )
            .unwrap();
        assert!(dfs.outcome.is_accepted());
        assert!(dfs.outcome.trace().unwrap().len() >= bfs);
    }

    #[test_log::test]
    fn depth_first_follows_first_move() {
        let g = GraphBuilder::finite()
            .with_accepting([1, 2])
            .with_transitions([(0, 'a', 1), (0, 'a', 2)])
            .into_graph(0);
        for order in [SearchOrder::BreadthFirst, SearchOrder::DepthFirst] {
            let report = g
                .simulate("a", &SimulationConfig::default().with_order(order))
                .unwrap();
            assert_eq!(
                report.outcome.trace().unwrap().last().unwrap().state,
                StateId::from(1u32)
            );
        }
    }

    #[test_log::test]
    fn full_tree_collects_all_accepting_leaves() {
        let g = GraphBuilder::finite()
            .with_accepting([1, 2])
            .with_transitions([(0, 'a', 1), (0, 'a', 2)])
            .into_graph(0);
        let (tree, accepting, halt) = g
            .configuration_tree("a", &SimulationConfig::default())
            .unwrap();
        assert_eq!(tree.len(), 3);
        assert_eq!(accepting, vec![1, 2]);
        assert_eq!(halt, None);
        assert_eq!(tree.path_to(2), Some(vec![0, 2]));
        assert_eq!(tree.path_to(3), None);
        assert!(tree.trace_to(7).is_none());
        assert!(tree.remaining(tree.get(2).unwrap()).is_empty());
        assert_eq!(
            tree.trace_to(1).unwrap().states(),
            vec![StateId::from(0u32), 1u32.into()]
        );
    }

    #[test_log::test]
    fn cancellation_stops_the_search() {
        let flag = Arc::new(AtomicBool::new(true));
        let config = SimulationConfig::default().with_cancellation(flag);
        let report = contains_zero_one().simulate("01", &config).unwrap();
        assert_eq!(report.outcome, Outcome::Undecided(Halt::Cancelled));
    }

    #[test_log::test]
    fn no_initial_state_is_reported() {
        let mut g = contains_zero_one();
        g.clear_initial();
        assert_eq!(
            g.accepts("01").unwrap_err(),
            StructuralError::NoInitialState
        );
    }

    #[test_log::test]
    fn trace_shows_configurations() {
        let outcome = anbn().simulate("ab", &stack("Z")).unwrap().outcome;
        assert_eq!(
            outcome.trace().unwrap().show(),
            "(q0, ab, Z) ⊢ (q0, b, AZ) ⊢ (q1, b, AZ) ⊢ (q1, , Z) ⊢ (q2, , ε)"
        );
    }
}
