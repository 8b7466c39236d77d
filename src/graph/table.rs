use itertools::Itertools;
use owo_colors::OwoColorize;

use crate::prelude::*;

impl Graph {
    fn decorate(&self, state: &State) -> String {
        let marker = if state.is_initial() { "→ " } else { "" };
        if state.is_accepting() {
            format!("{marker}{}", state.label().green())
        } else {
            format!("{marker}{}", state.label())
        }
    }

    fn targets_shown(&self, q: StateId, symbol: Symbol) -> String {
        let targets = self.successors(q, symbol);
        if targets.is_empty() {
            "-".to_string()
        } else {
            targets
                .iter()
                .filter_map(|&p| self.state(p))
                .map(|p| p.label())
                .join(", ")
        }
    }

    /// Returns a string representation of the transition table of the graph. For finite automata there is one
    /// column per symbol (and one for [`EPSILON`] if silent transitions exist), for stack and tape machines
    /// every state lists its outgoing operations. The initial state is marked with an arrow, accepting states
    /// are highlighted.
    pub fn transition_table(&self) -> String {
        let mut builder = tabled::builder::Builder::default();
        match self.kind() {
            MachineKind::Finite => {
                let silent = self.transitions().any(|t| t.label().is_silent());
                let columns = self
                    .alphabet()
                    .iter()
                    .copied()
                    .chain(silent.then_some(EPSILON))
                    .collect_vec();
                builder.push_record(
                    std::iter::once("State".to_string()).chain(columns.iter().map(|s| s.show())),
                );
                for state in self.states() {
                    let mut row = vec![self.decorate(state)];
                    for &sym in &columns {
                        row.push(self.targets_shown(state.id(), sym));
                    }
                    builder.push_record(row);
                }
            }
            MachineKind::Pushdown | MachineKind::Turing => {
                builder.push_record(["State".to_string(), "Transitions".to_string()]);
                for state in self.states() {
                    let moves = self
                        .edges_from(state.id())
                        .filter_map(|t| {
                            self.state(t.target())
                                .map(|p| format!("{} → {}", t.label().show(), p.label()))
                        })
                        .join("\n");
                    builder.push_record([self.decorate(state), moves]);
                }
            }
        }
        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}
