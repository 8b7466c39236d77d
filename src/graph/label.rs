use std::collections::BTreeSet;
use std::fmt::Display;

use itertools::Itertools;

use crate::{error::StructuralError, Show};

/// Input, stack and tape symbols are plain characters.
pub type Symbol = char;

/// The distinguished empty symbol. On a transition of a finite automaton it marks a silent move, as the
/// read symbol of an [`Operation`] it means that no input is consumed, and as the expected top of the
/// auxiliary memory it requires the memory to be empty (for a tape: the cell under the head to be blank).
pub const EPSILON: Symbol = 'ε';

/// The kind of machine a [`crate::Graph`] models, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MachineKind {
    /// Finite automaton, transitions are labeled with sets of symbols.
    Finite,
    /// Pushdown automaton, transitions carry stack operations.
    Pushdown,
    /// Turing machine, transitions carry tape operations.
    Turing,
}

impl Display for MachineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MachineKind::Finite => write!(f, "finite"),
            MachineKind::Pushdown => write!(f, "pushdown"),
            MachineKind::Turing => write!(f, "turing"),
        }
    }
}

/// Head movement of a Turing machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Move one cell to the left.
    Left,
    /// Move one cell to the right.
    Right,
    /// Keep the head where it is.
    Stay,
}

impl Show for Direction {
    fn show(&self) -> String {
        match self {
            Direction::Left => "L",
            Direction::Right => "R",
            Direction::Stay => "S",
        }
        .to_string()
    }
}

/// What an [`Operation`] does to the auxiliary memory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Effect {
    /// Pops the expected top (unless it is [`EPSILON`]) and pushes the given symbols, the first one ends up on top.
    Replace(Vec<Symbol>),
    /// Overwrites the cell under the head and moves the head afterwards.
    Write {
        /// The symbol that is written, [`EPSILON`] erases the cell.
        symbol: Symbol,
        /// Where the head goes after writing.
        direction: Direction,
    },
}

/// A single alternative move of a stack or tape machine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Operation {
    /// The input symbol that is consumed, [`EPSILON`] consumes nothing.
    pub read: Symbol,
    /// The symbol expected on top of the memory.
    pub top: Symbol,
    /// The effect on the memory.
    pub effect: Effect,
}

impl Operation {
    /// Creates a stack operation that reads `read`, expects `top` and replaces it with `push`. Occurrences of
    /// [`EPSILON`] in `push` are dropped, so `"ε"` pushes nothing.
    pub fn replace(read: Symbol, top: Symbol, push: &str) -> Self {
        Self {
            read,
            top,
            effect: Effect::Replace(push.chars().filter(|&c| c != EPSILON).collect()),
        }
    }

    /// Creates a tape operation that reads `read`, expects `top` under the head, writes `symbol` and moves
    /// in `direction`.
    pub fn write(read: Symbol, top: Symbol, symbol: Symbol, direction: Direction) -> Self {
        Self {
            read,
            top,
            effect: Effect::Write { symbol, direction },
        }
    }

    /// Returns true if `self` can be used in a graph of the given kind.
    pub fn fits(&self, kind: MachineKind) -> bool {
        matches!(
            (kind, &self.effect),
            (MachineKind::Pushdown, Effect::Replace(_)) | (MachineKind::Turing, Effect::Write { .. })
        )
    }
}

impl Show for Operation {
    fn show(&self) -> String {
        match &self.effect {
            Effect::Replace(push) if push.is_empty() => {
                format!("{}, {}/{}", self.read, self.top, EPSILON)
            }
            Effect::Replace(push) => {
                format!("{}, {}/{}", self.read, self.top, push.iter().collect::<String>())
            }
            Effect::Write { symbol, direction } => format!(
                "{}, {}/{},{}",
                self.read,
                self.top,
                symbol,
                direction.show()
            ),
        }
    }
}

/// The payload of a transition. Both variants are sets, so the same symbol or operation is never stored twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Label {
    /// Input symbols of a finite automaton, [`EPSILON`] marks a silent move.
    Symbols(BTreeSet<Symbol>),
    /// Alternative operations of a stack or tape machine.
    Operations(BTreeSet<Operation>),
}

impl Label {
    /// A label consisting of the single symbol `symbol`.
    pub fn symbol(symbol: Symbol) -> Self {
        Self::Symbols(BTreeSet::from([symbol]))
    }

    /// A label consisting of the given symbols.
    pub fn symbols<I: IntoIterator<Item = Symbol>>(symbols: I) -> Self {
        Self::Symbols(symbols.into_iter().collect())
    }

    /// A label consisting of the single operation `operation`.
    pub fn operation(operation: Operation) -> Self {
        Self::Operations(BTreeSet::from([operation]))
    }

    /// Returns true if `self` can label a transition in a graph of the given kind.
    pub fn fits(&self, kind: MachineKind) -> bool {
        match self {
            Label::Symbols(_) => kind == MachineKind::Finite,
            Label::Operations(ops) => {
                kind != MachineKind::Finite && ops.iter().all(|op| op.fits(kind))
            }
        }
    }

    /// Returns true if the label contains no symbol or operation at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Label::Symbols(symbols) => symbols.is_empty(),
            Label::Operations(ops) => ops.is_empty(),
        }
    }

    /// Returns true if this is a symbol label that contains [`EPSILON`]. Operations are never considered silent
    /// here, since whether they apply depends on the memory.
    pub fn is_silent(&self) -> bool {
        matches!(self, Label::Symbols(symbols) if symbols.contains(&EPSILON))
    }

    /// Iterates over the input symbols that are read by `self`, including [`EPSILON`].
    pub fn reads(&self) -> Box<dyn Iterator<Item = Symbol> + '_> {
        match self {
            Label::Symbols(symbols) => Box::new(symbols.iter().copied()),
            Label::Operations(ops) => Box::new(ops.iter().map(|op| op.read)),
        }
    }

    /// Merges `other` into `self` through set union.
    pub(crate) fn merge(&mut self, other: Label, kind: MachineKind) -> Result<(), StructuralError> {
        match (self, other) {
            (Label::Symbols(mine), Label::Symbols(theirs)) => mine.extend(theirs),
            (Label::Operations(mine), Label::Operations(theirs)) => mine.extend(theirs),
            _ => return Err(StructuralError::LabelMismatch { kind }),
        }
        Ok(())
    }
}

impl Show for Label {
    fn show(&self) -> String {
        match self {
            Label::Symbols(symbols) => symbols.iter().join(", "),
            Label::Operations(ops) => ops.iter().map(|op| op.show()).join(" | "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn operations_fit_their_kind() {
        let push = Operation::replace('a', 'Z', "AZ");
        let write = Operation::write('a', EPSILON, 'x', Direction::Right);
        assert!(push.fits(MachineKind::Pushdown));
        assert!(!push.fits(MachineKind::Turing));
        assert!(write.fits(MachineKind::Turing));
        assert!(!Label::operation(push.clone()).fits(MachineKind::Finite));
        assert!(Label::symbol('a').fits(MachineKind::Finite));
        assert!(!Label::symbol('a').fits(MachineKind::Pushdown));
        assert_eq!(Operation::replace('a', 'Z', "ε").effect, Effect::Replace(vec![]));
    }

    #[test_log::test]
    fn merging_is_set_union() {
        let mut label = Label::symbols(['a', 'b']);
        label
            .merge(Label::symbols(['b', 'c']), MachineKind::Finite)
            .unwrap();
        assert_eq!(label, Label::symbols(['a', 'b', 'c']));
        assert!(label
            .merge(
                Label::operation(Operation::replace('a', 'Z', "")),
                MachineKind::Finite
            )
            .is_err());
        assert_eq!(label.show(), "a, b, c");
        assert!(Label::symbols([EPSILON, 'a']).is_silent());
    }
}
