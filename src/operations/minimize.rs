use itertools::Itertools;
use tracing::{debug, trace};

use super::require_deterministic;
use crate::{
    math::{Map, Partition},
    prelude::*,
};

/// Moore-style partition refinement: starting from the split into accepting and rejecting states, classes are
/// split by the classes their successors lie in until the number of classes no longer changes. Missing
/// transitions lead into an implicit rejecting sink, which ends up in the same class as every explicit dead
/// state. The sink itself is not part of the returned partition.
fn moore_partition_refinement(graph: &Graph) -> Partition<StateId> {
    let states = graph.state_ids().collect_vec();
    let alphabet = graph.alphabet().iter().copied().collect_vec();
    let position: Map<StateId, usize> = states.iter().enumerate().map(|(i, &q)| (q, i)).collect();

    // the implicit sink sits behind all real states
    let sink = states.len();
    let targets = states
        .iter()
        .map(|&q| {
            alphabet
                .iter()
                .map(|&a| {
                    graph
                        .successors(q, a)
                        .first()
                        .map_or(sink, |p| position[p])
                })
                .collect_vec()
        })
        .chain(std::iter::once(vec![sink; alphabet.len()]))
        .collect_vec();

    let mut class = states
        .iter()
        .map(|&q| usize::from(graph.is_accepting(q)))
        .chain(std::iter::once(0))
        .collect_vec();
    let mut count = class.iter().unique().count();

    loop {
        let mut signatures: Map<(usize, Vec<usize>), usize> = Map::default();
        let mut refined = Vec::with_capacity(class.len());
        for (i, successors) in targets.iter().enumerate() {
            let signature = (
                class[i],
                successors.iter().map(|&t| class[t]).collect_vec(),
            );
            let next = signatures.len();
            refined.push(*signatures.entry(signature).or_insert(next));
        }
        let refined_count = signatures.len();
        trace!("refinement round produced {refined_count} classes from {count}");
        class = refined;
        if refined_count == count {
            break;
        }
        count = refined_count;
    }

    let mut classes: Vec<Vec<StateId>> = vec![vec![]; count];
    for (i, q) in states.into_iter().enumerate() {
        classes[class[i]].push(q);
    }
    Partition::new(classes)
}

impl Graph {
    /// Groups the states of a deterministic finite automaton into classes of behaviorally indistinguishable
    /// states, that is states which agree on acceptance for every possible suffix. A state without a transition
    /// on some symbol behaves like one whose transition leads into a dead state.
    pub fn indistinguishable_states(&self) -> Result<Partition<StateId>, StructuralError> {
        require_deterministic(self, "minimization")?;
        Ok(moore_partition_refinement(self))
    }

    /// Returns the smallest deterministic finite automaton equivalent to `self` by collapsing the classes of
    /// [`Graph::indistinguishable_states`]. The classes become states in the order of their lowest member.
    /// States that are unreachable or useless are kept, use [`Graph::minimize_trimmed`] to remove them first.
    pub fn minimize(&self) -> Result<Graph, StructuralError> {
        let initial = require_deterministic(self, "minimization")?;
        let partition = moore_partition_refinement(self);
        let class = partition.class_map();

        let mut out = Graph::finite();
        for members in &partition {
            let label = if members.len() == 1 {
                members
                    .iter()
                    .filter_map(|&q| self.state(q))
                    .map(|q| q.label().to_string())
                    .join("")
            } else {
                format!(
                    "{{{}}}",
                    members
                        .iter()
                        .filter_map(|&q| self.state(q))
                        .map(|q| q.label())
                        .join(", ")
                )
            };
            let id = out.add_state(label);
            out.set_accepting(id, members.iter().any(|&q| self.is_accepting(q)))?;
        }
        for t in self.transitions() {
            out.add_transition(
                class[&t.origin()],
                class[&t.target()],
                t.label().clone(),
            )?;
        }
        out.set_initial(class[&initial])?;

        debug!("minimized {} states to {}", self.size(), out.size());
        assert!(
            out.is_deterministic(),
            "collapsing indistinguishable states broke determinism"
        );
        Ok(out)
    }

    /// Removes inaccessible and useless states and minimizes the result.
    pub fn minimize_trimmed(&self) -> Result<Graph, StructuralError> {
        require_deterministic(self, "minimization")?;
        self.remove_inaccessible_and_useless()?.minimize()
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::tests::{accepts, contains_zero_one};

    pub fn wiki_dfa() -> Graph {
        GraphBuilder::finite()
            .with_accepting([2, 3, 4])
            .with_transitions([
                (0, 'a', 1),
                (0, 'b', 2),
                (1, 'a', 0),
                (1, 'b', 3),
                (2, 'a', 4),
                (2, 'b', 5),
                (3, 'a', 4),
                (3, 'b', 5),
                (4, 'a', 4),
                (4, 'b', 5),
                (5, 'a', 5),
                (5, 'b', 5),
            ])
            .into_graph(0)
    }

    #[test_log::test]
    fn wikipedia_example() {
        let dfa = wiki_dfa();
        let partition = dfa.indistinguishable_states().unwrap();
        assert_eq!(
            partition,
            math::Partition::new([
                vec![StateId::from(0u32), 1u32.into()],
                vec![2u32.into(), 3u32.into(), 4u32.into()],
                vec![5u32.into()],
            ])
        );
        let min = dfa.minimize().unwrap();
        assert_eq!(min.size(), 3);
        assert_eq!(min.state(0u32).unwrap().label(), "{q0, q1}");
        for w in ["", "a", "b", "ab", "aab", "ba", "bb", "abab", "aaaab"] {
            assert_eq!(accepts(&min, w), accepts(&dfa, w), "{w}");
        }
    }

    #[test_log::test]
    fn minimization_is_idempotent() {
        for dfa in [wiki_dfa(), contains_zero_one()] {
            let once = dfa.minimize().unwrap();
            let twice = once.minimize().unwrap();
            assert_eq!(once.size(), twice.size());
        }
        assert_eq!(contains_zero_one().minimize().unwrap().size(), 3);
    }

    #[test_log::test]
    fn trimmed_minimization_drops_unreachable_states() {
        let mut dfa = wiki_dfa();
        let lost = dfa.add_state("lost");
        dfa.add_symbol(lost, 'a', 0u32).unwrap();
        assert_eq!(dfa.minimize().unwrap().size(), 4);
        // the rejecting sink is useless as well
        assert_eq!(dfa.minimize_trimmed().unwrap().size(), 2);
    }

    #[test_log::test]
    fn missing_transitions_merge_with_dead_states() {
        // accepts exactly "a" and "b", q1 moves into the dead state q3 while q2 has no transition at all
        let partial = GraphBuilder::finite()
            .with_accepting([1, 2])
            .with_transitions([(0, 'a', 1), (0, 'b', 2), (1, 'a', 3), (3, 'a', 3)])
            .into_graph(0);
        assert_eq!(
            partial.indistinguishable_states().unwrap(),
            math::Partition::new([
                vec![StateId::from(0u32)],
                vec![1u32.into(), 2u32.into()],
                vec![3u32.into()],
            ])
        );
        let min = partial.minimize().unwrap();
        let total = partial.totalize([]).unwrap().minimize().unwrap();
        assert_eq!(min.size(), 3);
        assert!(min.size() <= total.size());
        assert!(min.is_deterministic());
        for w in ["", "a", "b", "aa", "ab", "ba", "bb", "aaa"] {
            assert_eq!(accepts(&min, w), accepts(&partial, w), "{w}");
            assert_eq!(accepts(&total, w), accepts(&partial, w), "{w}");
        }
        assert!(min.equivalent(&partial).unwrap());
        assert_eq!(partial.minimize_trimmed().unwrap().size(), 2);
    }

    #[test_log::test]
    fn minimization_needs_determinism() {
        let nfa = crate::tests::ends_with("11");
        assert_eq!(
            nfa.minimize().unwrap_err(),
            StructuralError::NotDeterministic
        );
        assert_eq!(nfa.determinize().unwrap().minimize().unwrap().size(), 3);
    }
}
