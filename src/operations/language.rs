use std::collections::VecDeque;

use super::{require_finite, require_finite_pair};
use crate::{math::Set, prelude::*};

impl Graph {
    /// Tries to construct a word that is accepted by `self`. The search runs breadth-first over the
    /// determinized graph trying symbols in ascending order, so the returned word is the length-lexicographically
    /// smallest accepted one. Returns `None` if the accepted language is empty.
    pub fn give_word(&self) -> Result<Option<Vec<Symbol>>, StructuralError> {
        require_finite(self, "emptiness check")?;
        let dfa = self.determinize()?;
        let initial = dfa.require_initial()?;
        let mut seen = Set::from_iter([initial]);
        let mut queue = VecDeque::from([(vec![], initial)]);
        while let Some((access, q)) = queue.pop_front() {
            if dfa.is_accepting(q) {
                return Ok(Some(access));
            }
            for &a in dfa.alphabet() {
                for &p in dfa.successors(q, a) {
                    if seen.insert(p) {
                        let mut next = access.clone();
                        next.push(a);
                        queue.push_back((next, p));
                    }
                }
            }
        }
        Ok(None)
    }

    /// Returns true if and only if `self` accepts no word at all.
    pub fn is_empty_language(&self) -> Result<bool, StructuralError> {
        Ok(self.give_word()?.is_none())
    }

    /// Checks whether `self` and `other` accept the same language. This is done by verifying that neither
    /// `self` without `other` nor `other` without `self` accepts anything, the complements being taken over
    /// the union of both alphabets.
    pub fn equivalent(&self, other: &Graph) -> Result<bool, StructuralError> {
        require_finite_pair(self, other, "equivalence check")?;
        let symbols = self
            .alphabet()
            .union(other.alphabet())
            .copied()
            .collect::<Vec<_>>();
        let left = self.determinize()?;
        let right = other.determinize()?;
        Ok(left
            .intersection(&right.complement_over(symbols.iter().copied())?)?
            .is_empty_language()?
            && right
                .intersection(&left.complement_over(symbols.iter().copied())?)?
                .is_empty_language()?)
    }
}
