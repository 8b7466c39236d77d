use tracing::trace;

use crate::{operations::require_deterministic, prelude::*};

/// The result of running a deterministic finite automaton on a finite word. The run either consumed the whole
/// word or got stuck at a state that lacks a transition for the next symbol, in which case the word is
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterministicRun {
    path: Vec<StateId>,
    consumed: usize,
    stuck: bool,
    accepted: bool,
}

impl DeterministicRun {
    /// Returns true if the whole word was consumed and the reached state is accepting.
    pub fn accepted(&self) -> bool {
        self.accepted
    }

    /// The visited states, starting with the initial one.
    pub fn path(&self) -> &[StateId] {
        &self.path
    }

    /// The last state of the run.
    pub fn reached(&self) -> StateId {
        *self
            .path
            .last()
            .expect("a run always contains the initial state")
    }

    /// The number of symbols that could be consumed.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Returns true if a missing transition ended the run early.
    pub fn is_stuck(&self) -> bool {
        self.stuck
    }
}

impl Graph {
    /// Runs a deterministic finite automaton on `word` in a single pass, without building a configuration tree.
    /// Fails if `self` is not a deterministic finite automaton with an initial state.
    pub fn run_deterministic<W: Word>(&self, word: W) -> Result<DeterministicRun, StructuralError> {
        let mut current = require_deterministic(self, "deterministic run")?;
        let input = word.symbols();
        let mut path = vec![current];
        for &sym in &input {
            match self.successors(current, sym).first() {
                Some(&next) => {
                    current = next;
                    path.push(current);
                }
                None => {
                    trace!("run stuck in {} on {sym}", current.show());
                    return Ok(DeterministicRun {
                        consumed: path.len() - 1,
                        path,
                        stuck: true,
                        accepted: false,
                    });
                }
            }
        }
        Ok(DeterministicRun {
            consumed: input.len(),
            path,
            stuck: false,
            accepted: self.is_accepting(current),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::tests::{contains_zero_one, ends_with};

    #[test_log::test]
    fn runs_follow_the_unique_path() {
        let g = contains_zero_one();
        let run = g.run_deterministic("1011").unwrap();
        assert!(run.accepted());
        assert!(!run.is_stuck());
        assert_eq!(run.consumed(), 4);
        assert_eq!(
            run.path(),
            &[
                StateId::from(0u32),
                0u32.into(),
                1u32.into(),
                2u32.into(),
                2u32.into()
            ]
        );
        assert_eq!(run.reached(), StateId::from(2u32));
    }

    #[test_log::test]
    fn missing_transitions_reject() {
        let g = GraphBuilder::finite()
            .with_accepting([1])
            .with_transitions([(0, 'a', 1)])
            .into_graph(0);
        let run = g.run_deterministic("ab").unwrap();
        assert!(run.is_stuck());
        assert!(!run.accepted());
        assert_eq!(run.consumed(), 1);
        assert_eq!(run.reached(), StateId::from(1u32));
        // symbols outside the alphabet get stuck right away
        assert_eq!(g.run_deterministic("x").unwrap().consumed(), 0);
    }

    #[test_log::test]
    fn only_for_deterministic_finite_automata() {
        assert_eq!(
            ends_with("0").run_deterministic("0").unwrap_err(),
            StructuralError::NotDeterministic
        );
        let mut g = contains_zero_one();
        g.clear_initial();
        assert_eq!(
            g.run_deterministic("0").unwrap_err(),
            StructuralError::NoInitialState
        );
        let pda = GraphBuilder::pushdown().with_states(1).into_graph(0);
        assert!(matches!(
            pda.run_deterministic("").unwrap_err(),
            StructuralError::UnsupportedKind { .. }
        ));
    }
}
