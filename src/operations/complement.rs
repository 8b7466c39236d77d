use std::collections::BTreeSet;

use itertools::Itertools;
use tracing::trace;

use super::require_deterministic;
use crate::prelude::*;

impl Graph {
    /// Makes a deterministic finite automaton total over its alphabet extended by `extra`. If some state lacks a
    /// transition on some symbol, a single rejecting sink state `∅` is added which loops on every symbol and
    /// catches all missing transitions. A graph that is already total is returned unchanged.
    pub fn totalize<I: IntoIterator<Item = Symbol>>(&self, extra: I) -> Result<Graph, StructuralError> {
        require_deterministic(self, "totalization")?;
        let symbols: BTreeSet<Symbol> = self
            .alphabet()
            .iter()
            .copied()
            .chain(extra)
            .filter(|&s| s != EPSILON)
            .collect();

        let missing = self
            .state_ids()
            .cartesian_product(symbols.iter().copied())
            .filter(|&(q, a)| self.successors(q, a).is_empty())
            .collect_vec();

        let mut out = self.clone();
        if missing.is_empty() {
            return Ok(out);
        }
        trace!("adding sink for {} missing transitions", missing.len());
        let sink = out.add_state("∅");
        out.add_transition(sink, sink, Label::symbols(symbols.iter().copied()))?;
        for (q, a) in missing {
            out.add_symbol(q, a, sink)?;
        }
        Ok(out)
    }

    /// Builds a deterministic finite automaton accepting exactly the words over the alphabet of `self` that
    /// `self` rejects. The input has to be deterministic, it is totalized before the accepting states
    /// are swapped.
    pub fn complement(&self) -> Result<Graph, StructuralError> {
        self.complement_over([])
    }

    /// Works like [`Graph::complement`], but the complement is taken with respect to the alphabet of `self`
    /// extended by `extra`.
    pub fn complement_over<I: IntoIterator<Item = Symbol>>(
        &self,
        extra: I,
    ) -> Result<Graph, StructuralError> {
        let mut out = self.totalize(extra)?;
        let flags = out
            .states()
            .map(|s| (s.id(), !s.is_accepting()))
            .collect_vec();
        for (q, accepting) in flags {
            out.set_accepting(q, accepting)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::tests::{accepts, contains_zero_one};

    #[test_log::test]
    fn totalize_adds_sink_only_when_needed() {
        let partial = GraphBuilder::finite()
            .with_accepting([1])
            .with_transitions([(0, 'a', 1)])
            .into_graph(0);
        let total = partial.totalize([]).unwrap();
        assert_eq!(total.size(), 3);
        assert!(total.is_total());
        assert!(total.is_deterministic());
        assert_eq!(total.totalize([]).unwrap().size(), 3);

        let wider = partial.totalize(['b']).unwrap();
        assert_eq!(wider.alphabet().iter().collect::<String>(), "ab");
        assert!(wider.is_total());
    }

    #[test_log::test]
    fn complement_swaps_language() {
        let g = contains_zero_one();
        let not = g.complement().unwrap();
        for w in ["", "0", "1", "10", "110", "01", "001011", "1101"] {
            assert_eq!(accepts(&not, w), !accepts(&g, w), "{w}");
        }
    }

    #[test_log::test]
    fn complement_is_an_involution() {
        let partial = GraphBuilder::finite()
            .with_accepting([2])
            .with_transitions([(0, 'a', 1), (1, 'b', 2), (2, 'a', 1)])
            .into_graph(0);
        let twice = partial.complement().unwrap().complement().unwrap();
        for w in ["", "a", "ab", "aba", "abab", "b", "abb"] {
            assert_eq!(accepts(&twice, w), accepts(&partial, w), "{w}");
        }
    }

    #[test_log::test]
    fn complement_needs_determinism() {
        let nfa = crate::tests::ends_with("00");
        assert_eq!(
            nfa.complement().unwrap_err(),
            StructuralError::NotDeterministic
        );
        let not = nfa.determinize().unwrap().complement().unwrap();
        assert!(accepts(&not, "01"));
        assert!(!accepts(&not, "100"));
    }
}
