//! Construction-time errors.
//!
//! Everything that can go wrong while turning a language description into a
//! membership oracle is reported here, before any string is tested. Faults
//! that happen *during* a test are data, see
//! [`MembershipResult`][crate::oracle::MembershipResult].

use std::fmt;

use thiserror::Error;

/// A single defect in an automaton description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid JSON: {0}")]
    Json(String),
    #[error("Automaton JSON must be an object")]
    NotAnObject,
    #[error("states must be a non-empty array")]
    StatesNotArray,
    #[error("states[{index}] must be a string state id")]
    StateNotString { index: usize },
    #[error("duplicate state {0}")]
    DuplicateState(String),
    #[error("start must be a string state id")]
    StartNotString,
    #[error("accepts must be an array of state ids")]
    AcceptsNotArray,
    #[error("accepts[{index}] must be a string state id")]
    AcceptNotString { index: usize },
    #[error("transitions must be an object")]
    TransitionsNotObject,
    #[error("transitions[{from}] must be an object")]
    TransitionRowNotObject { from: String },
    #[error("transitions[{from}][{symbol}] must be an array of targets")]
    TargetsNotArray { from: String, symbol: String },
    #[error("transitions[{from}][{symbol}] contains a non-string target")]
    TargetNotString { from: String, symbol: String },
    #[error("start state {0} must be in states")]
    UnknownStart(String),
    #[error("accept state {0} not in states")]
    UnknownAccept(String),
    #[error("transition from unknown state {0}")]
    UnknownSource(String),
    #[error("transition target {target} not in states")]
    UnknownTarget { target: String },
    #[error("transitions[{from}]: symbol {symbol:?} must be a single character, \"\" or \"eps\"")]
    InvalidSymbol { from: String, symbol: String },
}

/// The complete, de-duplicated list of defects found in one description.
///
/// Never empty: validation that finds nothing wrong returns `Ok`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub(crate) fn new() -> Self {
        ValidationErrors(Vec::new())
    }

    /// Records `error` unless an equal one was already recorded.
    pub(crate) fn push(&mut self, error: ValidationError) {
        if !self.0.contains(&error) {
            self.0.push(error);
        }
    }

    pub(crate) fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        ValidationErrors(vec![error])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Failure to build a membership oracle.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The automaton description is malformed.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    /// The regular expression does not compile.
    #[error("Invalid regular expression: {0}")]
    Regex(#[from] regex::Error),
    /// The custom predicate source does not compile.
    #[error("Code compile error: {0}")]
    Script(String),
}
