use crate::prelude::*;
use tracing::debug;

/// Returns the first `symbols` letters of the latin alphabet, continuing past `z` with the following code
/// points if more are requested.
pub fn alphabet_of_size(symbols: usize) -> Vec<Symbol> {
    (0..symbols as u32)
        .filter_map(|i| char::from_u32('a' as u32 + i))
        .collect()
}

/// Uses a sprout-like algorithm to generate a random deterministic finite automaton over `symbols` distinct
/// symbols. `probability` determines the probability of a back edge to some existing state being inserted.
/// The algorithm is as follows:
/// 1. Start with a single state.
/// 2. For each symbol, go through the existing states in order and with probability `probability`
///    add a back edge to that state.
/// 3. If no back edge was added, we insert an edge to a new state.
/// 4. Repeat until all states and symbols have been treated.
///
/// Each state is accepting with probability one half.
pub fn generate_random_dfa(symbols: usize, probability: f64) -> Graph {
    let alphabet = alphabet_of_size(symbols);
    let mut dfa = Graph::finite();
    let mut current = dfa.add_state("q0").index();
    let mut symbol_position = 0;

    'outer: loop {
        if current >= dfa.size() {
            break 'outer;
        }
        if symbol_position >= alphabet.len() {
            symbol_position = 0;
            current += 1;
            continue 'outer;
        }

        let symbol = alphabet[symbol_position];
        symbol_position += 1;

        for target in 0..=current {
            if fastrand::f64() < probability {
                dfa.add_symbol(current, symbol, target)
                    .expect("both states exist");
                continue 'outer;
            }
        }

        let target = dfa.add_state(format!("q{}", dfa.size()));
        dfa.add_symbol(current, symbol, target)
            .expect("both states exist");
    }

    color_and_root(dfa)
}

/// Generates a random nondeterministic finite automaton with `size` states over `symbols` distinct symbols.
/// For every state and symbol, each possible target is connected with probability `density`. Additionally
/// every pair of states is joined by a silent transition with probability `epsilon`.
pub fn generate_random_nfa(symbols: usize, size: usize, density: f64, epsilon: f64) -> Graph {
    assert!(size > 0, "an automaton needs at least one state");
    let alphabet = alphabet_of_size(symbols);
    let mut nfa = Graph::finite();
    for q in 0..size {
        nfa.add_state(format!("q{q}"));
    }
    for p in 0..size {
        for q in 0..size {
            for &a in &alphabet {
                if fastrand::f64() < density {
                    nfa.add_symbol(p, a, q).expect("both states exist");
                }
            }
            if p != q && fastrand::f64() < epsilon {
                nfa.add_symbol(p, EPSILON, q).expect("both states exist");
            }
        }
    }
    color_and_root(nfa)
}

fn color_and_root(mut graph: Graph) -> Graph {
    let ids = graph.state_ids().collect::<Vec<_>>();
    for q in ids {
        graph
            .set_accepting(q, fastrand::bool())
            .expect("the state was just listed");
    }
    graph
        .set_initial(0u32)
        .expect("there is always a first state");
    debug!(
        "generated random automaton with {} states and {} transitions",
        graph.size(),
        graph.transitions().count()
    );
    graph
}

/// Generate a random `String` over `alphabet`.
/// The length of the `String` is drawn uniformly from the range `min_len..=max_len`.
pub fn generate_random_word(alphabet: &[Symbol], min_len: usize, max_len: usize) -> String {
    if alphabet.is_empty() {
        return String::new();
    }
    let length = fastrand::usize(min_len..=max_len);
    (0..length)
        .map(|_| alphabet[fastrand::usize(..alphabet.len())])
        .collect()
}

/// Generate a set of `number` distinct random `String`s over `alphabet`.
/// The length for each sampled word is drawn uniformly from the range `min_len..=max_len`, the caller has to
/// make sure that enough distinct words of these lengths exist.
pub fn generate_random_words(
    alphabet: &[Symbol],
    min_len: usize,
    max_len: usize,
    number: usize,
) -> math::Set<String> {
    let mut word_set = math::Set::default();
    while word_set.len() < number {
        word_set.insert(generate_random_word(alphabet, min_len, max_len));
    }
    word_set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::accepts;

    /// Membership through the configuration tree, memoization makes the search finite for finite automata.
    fn simulated(graph: &Graph, word: &str) -> bool {
        let config = SimulationConfig::default()
            .memoized(true)
            .with_budget(usize::MAX);
        graph
            .simulate(word, &config)
            .unwrap()
            .outcome
            .decision()
            .expect("memoized search over a finite automaton decides")
    }

    #[test_log::test]
    fn random_dfas_are_deterministic() {
        fastrand::seed(7);
        for _ in 0..20 {
            let dfa = generate_random_dfa(3, 0.4);
            assert!(dfa.is_deterministic());
            assert!(dfa.is_total());
            assert_eq!(dfa.reachable_states().unwrap().len(), dfa.size());
        }
    }

    #[test_log::test]
    fn determinization_preserves_the_language() {
        fastrand::seed(11);
        let alphabet = alphabet_of_size(2);
        for _ in 0..15 {
            let nfa = generate_random_nfa(2, 5, 0.25, 0.1);
            let dfa = nfa.determinize().unwrap();
            assert!(dfa.is_deterministic());
            for word in generate_random_words(&alphabet, 0, 6, 20) {
                assert_eq!(accepts(&dfa, &word), simulated(&nfa, &word), "{word}");
            }
        }
    }

    #[test_log::test]
    fn algebraic_laws_hold_on_random_automata() {
        fastrand::seed(23);
        let alphabet = alphabet_of_size(2);
        for _ in 0..15 {
            let dfa = generate_random_dfa(2, 0.5);
            let min = dfa.minimize().unwrap();
            assert!(min.size() <= dfa.size());
            assert_eq!(min.minimize().unwrap().size(), min.size());
            assert!(min.equivalent(&dfa).unwrap());

            let twice = dfa.complement().unwrap().complement().unwrap();
            assert!(twice.equivalent(&dfa).unwrap());

            let other = generate_random_nfa(2, 3, 0.3, 0.1);
            let union = dfa.union(&other).unwrap();
            let both = dfa.intersection(&other).unwrap();
            for word in generate_random_words(&alphabet, 0, 5, 15) {
                let (l, r) = (accepts(&dfa, &word), accepts(&other, &word));
                assert_eq!(accepts(&union, &word), l || r, "{word}");
                assert_eq!(accepts(&both, &word), l && r, "{word}");
            }
        }
    }

    #[test_log::test]
    fn words_have_requested_lengths() {
        let alphabet = alphabet_of_size(3);
        assert_eq!(alphabet, vec!['a', 'b', 'c']);
        for _ in 0..10 {
            let word = generate_random_word(&alphabet, 2, 4);
            assert!((2..=4).contains(&word.chars().count()));
            assert!(word.chars().all(|c| alphabet.contains(&c)));
        }
        assert_eq!(generate_random_words(&alphabet, 1, 1, 3).len(), 3);
    }
}
