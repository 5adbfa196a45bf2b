//! Type-safe wrappers for automaton states and input symbols.
//!
//! State names from the user's description are interned into dense
//! [`StateId`]s at validation time, so the simulator only ever works with
//! indices. Symbols are single Unicode scalar values; epsilon moves use a
//! dedicated [`Symbol::Epsilon`] variant that can never collide with a
//! character.
use std::fmt;

/// Transition keys that denote an epsilon move in automaton descriptions.
pub const EPSILON_KEYS: [&str; 2] = ["", "eps"];

/// A dense state identifier (0-indexed).
///
/// # Invariants
///
/// - Identifiers are assigned in declaration order of the `states` list.
/// - An identifier is only meaningful for the automaton that produced it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct StateId(u32);

impl StateId {
    /// Creates a state identifier from a raw index.
    pub fn new(index: usize) -> Self {
        StateId(index as u32)
    }

    /// Returns the raw index as a `usize`.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<StateId> for usize {
    fn from(id: StateId) -> Self {
        id.index()
    }
}

/// A transition label.
///
/// `Epsilon` sorts before every character, so iterating a transition row
/// visits epsilon moves first.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Symbol {
    /// The empty-string move.
    Epsilon,
    /// A single code point.
    Char(char),
}

impl Symbol {
    /// Parses a transition key: `""` and `"eps"` are epsilon, any single code
    /// point is a character symbol, anything else is rejected.
    pub fn parse(key: &str) -> Option<Symbol> {
        if EPSILON_KEYS.contains(&key) {
            return Some(Symbol::Epsilon);
        }
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(Symbol::Char(c)),
            _ => None,
        }
    }

    /// Checks whether this is the epsilon symbol.
    pub fn is_epsilon(self) -> bool {
        matches!(self, Symbol::Epsilon)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Epsilon => write!(f, "ε"),
            Symbol::Char(c) => write!(f, "{}", c),
        }
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Symbol::Char(c)
    }
}

/// Number of code points in `s`.
///
/// All lengths in this crate are measured in code points, never in bytes.
pub fn code_point_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_id() {
        let id = StateId::new(3);
        assert_eq!(id.index(), 3);
        assert_eq!(usize::from(id), 3);
        assert_eq!(id.to_string(), "#3");
    }

    #[test]
    fn test_symbol_parse() {
        assert_eq!(Symbol::parse(""), Some(Symbol::Epsilon));
        assert_eq!(Symbol::parse("eps"), Some(Symbol::Epsilon));
        assert_eq!(Symbol::parse("a"), Some(Symbol::Char('a')));
        assert_eq!(Symbol::parse("😀"), Some(Symbol::Char('😀')));
        assert_eq!(Symbol::parse("ab"), None);
    }

    #[test]
    fn test_epsilon_sorts_first() {
        assert!(Symbol::Epsilon < Symbol::Char('\0'));
        assert!(Symbol::Epsilon.is_epsilon());
        assert!(!Symbol::from('a').is_epsilon());
    }

    #[test]
    fn test_code_point_len() {
        assert_eq!(code_point_len(""), 0);
        assert_eq!(code_point_len("abc"), 3);
        assert_eq!(code_point_len("😀😺"), 2);
    }
}
