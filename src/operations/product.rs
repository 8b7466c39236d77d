use std::collections::VecDeque;

use itertools::Itertools;
use tracing::debug;

use super::require_finite_pair;
use crate::{math::Map, prelude::*};

/// Indexes a state of a product by the states of both components.
type ProductIndex = (StateId, StateId);

fn deterministic(graph: &Graph) -> Result<std::borrow::Cow<'_, Graph>, StructuralError> {
    if graph.is_deterministic() {
        Ok(std::borrow::Cow::Borrowed(graph))
    } else {
        graph.determinize().map(std::borrow::Cow::Owned)
    }
}

impl Graph {
    /// Builds a finite automaton accepting exactly the words accepted by both `self` and `other`. Operands that
    /// are not deterministic are determinized first, then the product is explored breadth-first from the pair
    /// of initial states. A symbol that one side has no transition for does not match, so only symbols
    /// shared by both alphabets can appear in the result.
    pub fn intersection(&self, other: &Graph) -> Result<Graph, StructuralError> {
        require_finite_pair(self, other, "intersection")?;
        let left = deterministic(self)?;
        let right = deterministic(other)?;
        let (li, ri) = (left.require_initial()?, right.require_initial()?);
        let symbols = left
            .alphabet()
            .intersection(right.alphabet())
            .copied()
            .collect_vec();

        let mut out = Graph::finite();
        let mut ids: Map<ProductIndex, StateId> = Map::default();
        let mut queue = VecDeque::new();

        let mut visit = |pair: ProductIndex, out: &mut Graph, queue: &mut VecDeque<ProductIndex>| {
            if let Some(&id) = ids.get(&pair) {
                return Ok::<StateId, StructuralError>(id);
            }
            let (l, r) = pair;
            let label = format!(
                "({}, {})",
                left.state(l).map(|s| s.label()).unwrap_or_default(),
                right.state(r).map(|s| s.label()).unwrap_or_default()
            );
            let id = out.add_state(label);
            out.set_accepting(id, left.is_accepting(l) && right.is_accepting(r))?;
            ids.insert(pair, id);
            queue.push_back(pair);
            Ok(id)
        };

        let start = visit((li, ri), &mut out, &mut queue)?;
        out.set_initial(start)?;

        while let Some((l, r)) = queue.pop_front() {
            let source = visit((l, r), &mut out, &mut queue)?;
            for &symbol in &symbols {
                let (Some(&lt), Some(&rt)) = (
                    left.successors(l, symbol).first(),
                    right.successors(r, symbol).first(),
                ) else {
                    continue;
                };
                let target = visit((lt, rt), &mut out, &mut queue)?;
                out.add_symbol(source, symbol, target)?;
            }
        }

        debug!(
            "built product of {} and {} states with {} reachable states",
            left.size(),
            right.size(),
            out.size()
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::tests::{accepts, contains_zero_one, ends_with};

    #[test_log::test]
    fn no_word_ends_in_both() {
        let both = ends_with("00").intersection(&ends_with("11")).unwrap();
        assert!(both.is_deterministic());
        for w in ["1100", "0011", "00", "11", "", "0101"] {
            assert!(!accepts(&both, w), "{w}");
        }
        assert!(both.is_empty_language().unwrap());
    }

    #[test_log::test]
    fn intersection_of_overlapping_languages() {
        let both = contains_zero_one().intersection(&ends_with("00")).unwrap();
        assert!(accepts(&both, "0100"));
        assert!(accepts(&both, "01100"));
        assert!(!accepts(&both, "100"));
        assert!(!accepts(&both, "0101"));
        assert_eq!(both.state(0u32).unwrap().label(), "(q0, {q0})");
    }

    #[test_log::test]
    fn missing_symbols_do_not_match() {
        let a = GraphBuilder::finite()
            .with_accepting([0])
            .with_transitions([(0, 'a', 0), (0, 'b', 0)])
            .into_graph(0);
        let b = GraphBuilder::finite()
            .with_accepting([0])
            .with_transitions([(0, 'a', 0), (0, 'c', 0)])
            .into_graph(0);
        let both = a.intersection(&b).unwrap();
        assert_eq!(both.alphabet().iter().collect::<String>(), "a");
        assert!(accepts(&both, "aaa"));
        assert!(!accepts(&both, "ab"));
    }
}
