//! Automaton to DOT (Graphviz) conversion.
//!
//! The generated DOT output follows these conventions:
//! - **States** are circles labeled with their user-facing names
//! - **Accepting states** are double circles
//! - **Start state** is pointed to by an arrow from an invisible point node
//! - **Edges** between the same pair of states are merged into a single edge
//!   whose label lists all symbols; epsilon moves are labeled `ε` and dashed
//!
//! # Examples
//!
//! ```
//! use pumping_rs::automaton::{AutomatonDescription, AutomatonSpec};
//!
//! let desc = AutomatonDescription::new("q0")
//!     .state("q1")
//!     .accept("q0")
//!     .transition("q0", "a", "q1")
//!     .transition("q1", "b", "q0");
//! let spec = AutomatonSpec::new(&desc).unwrap();
//!
//! let dot = spec.to_dot().unwrap();
//! // Write to file and render with: dot -Tpng output.dot -o output.png
//! assert!(dot.starts_with("digraph {"));
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::automaton::AutomatonSpec;
use crate::types::{StateId, Symbol};

/// Configuration options for DOT output generation.
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for ordinary states (default: "circle")
    pub state_shape: &'static str,
    /// Shape for accepting states (default: "doublecircle")
    pub accept_shape: &'static str,
    /// Style for epsilon edges (default: "dashed")
    pub epsilon_edge_style: &'static str,
    /// Graph layout direction (default: "LR")
    pub rankdir: &'static str,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            state_shape: "circle",
            accept_shape: "doublecircle",
            epsilon_edge_style: "dashed",
            rankdir: "LR",
        }
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

impl AutomatonSpec {
    /// Converts the automaton to DOT format with default settings.
    pub fn to_dot(&self) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(&DotConfig::default())
    }

    /// Converts the automaton to DOT format with custom configuration.
    pub fn to_dot_with_config(&self, config: &DotConfig) -> Result<String, std::fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "digraph {{")?;
        writeln!(dot, "rankdir={};", config.rankdir)?;
        writeln!(dot, "__start [shape=point, label=\"\"];")?;

        for state in self.states() {
            let shape = if self.is_accepting(state) {
                config.accept_shape
            } else {
                config.state_shape
            };
            writeln!(
                dot,
                "{} [shape={}, label={}];",
                state.index(),
                shape,
                quote(self.state_name(state))
            )?;
        }
        writeln!(dot, "__start -> {};", self.start().index())?;

        // Merge parallel edges; epsilon edges are kept apart so they can be styled.
        let mut edges = BTreeMap::<(StateId, StateId, bool), Vec<String>>::new();
        for (source, symbol, target) in self.transitions() {
            edges
                .entry((source, target, symbol.is_epsilon()))
                .or_default()
                .push(symbol.to_string());
        }

        for ((source, target, epsilon), labels) in edges {
            if epsilon {
                writeln!(
                    dot,
                    "{} -> {} [label={}, style={}];",
                    source.index(),
                    target.index(),
                    quote(&Symbol::Epsilon.to_string()),
                    config.epsilon_edge_style
                )?;
            } else {
                writeln!(
                    dot,
                    "{} -> {} [label={}];",
                    source.index(),
                    target.index(),
                    quote(&labels.join(", "))
                )?;
            }
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}
