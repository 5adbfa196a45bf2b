//! The membership oracle: one contract over three language descriptions.
//!
//! Everything downstream (decomposition, contradiction search) talks to a
//! language only through [`Membership`]. A [`MembershipOracle`] is the closed
//! set of adapters behind that contract, built once from a
//! [`LanguageDescription`] by [`build_oracle`] and replaced wholesale when
//! the description changes.
//!
//! ```
//! use pumping_rs::oracle::{build_oracle, LanguageDescription, Membership};
//!
//! let oracle = build_oracle(&LanguageDescription::Regex("(ab)*".into())).unwrap();
//! assert!(oracle.test("abab").in_language);
//! assert!(!oracle.test("aba").in_language);
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::automaton::{AutomatonDescription, AutomatonSpec};
use crate::custom::CustomOracle;
use crate::error::BuildError;
use crate::regex_oracle::RegexOracle;

/// Default wall-clock budget for one custom-predicate call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(300);

/// Answer to "is this string in the language?".
///
/// `error` is set only when the answer could not be computed (custom
/// predicate fault or timeout). `in_language` is then `false`, which means
/// "no proof of membership", *not* "proven non-member"; use
/// [`verdict`][MembershipResult::verdict] to tell the two apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipResult {
    pub in_language: bool,
    pub error: Option<String>,
}

/// Three-valued reading of a [`MembershipResult`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Verdict {
    Member,
    NonMember,
    Unknown,
}

impl MembershipResult {
    pub fn accepted() -> Self {
        Self::from_bool(true)
    }

    pub fn rejected() -> Self {
        Self::from_bool(false)
    }

    pub fn from_bool(in_language: bool) -> Self {
        MembershipResult { in_language, error: None }
    }

    /// A failed test: `in_language` is false and `error` carries the reason.
    pub fn fault(error: impl Into<String>) -> Self {
        MembershipResult {
            in_language: false,
            error: Some(error.into()),
        }
    }

    pub fn is_fault(&self) -> bool {
        self.error.is_some()
    }

    pub fn verdict(&self) -> Verdict {
        match (self.in_language, &self.error) {
            (_, Some(_)) => Verdict::Unknown,
            (true, None) => Verdict::Member,
            (false, None) => Verdict::NonMember,
        }
    }
}

/// Which mechanism describes the language.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OracleKind {
    Regex,
    Automaton,
    Custom,
}

impl fmt::Display for OracleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleKind::Regex => write!(f, "regex"),
            OracleKind::Automaton => write!(f, "automaton"),
            OracleKind::Custom => write!(f, "custom"),
        }
    }
}

/// Descriptor of an oracle. `state_count` and `deterministic` are only known
/// for automata.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OracleMeta {
    pub kind: OracleKind,
    pub state_count: Option<usize>,
    pub deterministic: Option<bool>,
}

impl OracleMeta {
    pub fn new(kind: OracleKind) -> Self {
        OracleMeta {
            kind,
            state_count: None,
            deterministic: None,
        }
    }

    /// A pumping length derived from the description, if there is one.
    ///
    /// For automata this is the state count (at least 2); regexes and custom
    /// predicates have no natural bound and leave `p` to the caller.
    pub fn suggested_pumping_length(&self) -> Option<usize> {
        self.state_count.map(|n| n.max(2))
    }
}

impl fmt::Display for OracleMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mode: {}", self.kind)?;
        if let Some(n) = self.state_count {
            write!(f, " • states: {}", n)?;
        }
        if let Some(d) = self.deterministic {
            write!(f, " • {}", if d { "deterministic" } else { "nondeterministic" })?;
        }
        Ok(())
    }
}

/// The membership contract.
///
/// `test` may block (custom predicates), but never longer than the oracle's
/// time budget, and never panics.
pub trait Membership {
    fn test(&self, input: &str) -> MembershipResult;
    fn meta(&self) -> OracleMeta;
}

impl<T: Membership + ?Sized> Membership for &T {
    fn test(&self, input: &str) -> MembershipResult {
        (**self).test(input)
    }

    fn meta(&self) -> OracleMeta {
        (**self).meta()
    }
}

impl<T: Membership + ?Sized> Membership for Arc<T> {
    fn test(&self, input: &str) -> MembershipResult {
        (**self).test(input)
    }

    fn meta(&self) -> OracleMeta {
        (**self).meta()
    }
}

/// Membership by automaton simulation.
#[derive(Debug, Clone)]
pub struct AutomatonOracle {
    spec: Arc<AutomatonSpec>,
}

impl AutomatonOracle {
    pub fn new(spec: AutomatonSpec) -> Self {
        AutomatonOracle { spec: Arc::new(spec) }
    }

    /// The shared, immutable automaton.
    pub fn spec(&self) -> &Arc<AutomatonSpec> {
        &self.spec
    }
}

impl Membership for AutomatonOracle {
    fn test(&self, input: &str) -> MembershipResult {
        MembershipResult::from_bool(self.spec.simulate(input))
    }

    fn meta(&self) -> OracleMeta {
        OracleMeta {
            kind: OracleKind::Automaton,
            state_count: Some(self.spec.num_states()),
            deterministic: Some(self.spec.is_deterministic()),
        }
    }
}

/// A language, described one of three ways.
#[derive(Debug, Clone)]
pub enum LanguageDescription {
    /// A regular expression, matched against whole strings.
    Regex(String),
    /// An automaton given structurally.
    Automaton(AutomatonDescription),
    /// An automaton given as JSON text.
    AutomatonJson(String),
    /// A rhai predicate body (see [`script`][crate::script]).
    Custom(String),
}

/// Oracle construction settings.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Wall-clock budget per custom-predicate call (default: 300 ms)
    pub timeout: Duration,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// A ready-to-use membership oracle.
#[derive(Debug, Clone)]
pub enum MembershipOracle {
    Regex(RegexOracle),
    Automaton(AutomatonOracle),
    Custom(CustomOracle),
}

impl Membership for MembershipOracle {
    fn test(&self, input: &str) -> MembershipResult {
        match self {
            MembershipOracle::Regex(o) => o.test(input),
            MembershipOracle::Automaton(o) => o.test(input),
            MembershipOracle::Custom(o) => o.test(input),
        }
    }

    fn meta(&self) -> OracleMeta {
        match self {
            MembershipOracle::Regex(o) => o.meta(),
            MembershipOracle::Automaton(o) => o.meta(),
            MembershipOracle::Custom(o) => o.meta(),
        }
    }
}

impl From<RegexOracle> for MembershipOracle {
    fn from(oracle: RegexOracle) -> Self {
        MembershipOracle::Regex(oracle)
    }
}

impl From<AutomatonOracle> for MembershipOracle {
    fn from(oracle: AutomatonOracle) -> Self {
        MembershipOracle::Automaton(oracle)
    }
}

impl From<CustomOracle> for MembershipOracle {
    fn from(oracle: CustomOracle) -> Self {
        MembershipOracle::Custom(oracle)
    }
}

/// Builds an oracle with the default [`OracleConfig`].
pub fn build_oracle(description: &LanguageDescription) -> Result<MembershipOracle, BuildError> {
    build_oracle_with_config(description, &OracleConfig::default())
}

/// Builds an oracle. Every malformed description is rejected here; there is
/// no partially usable oracle.
pub fn build_oracle_with_config(
    description: &LanguageDescription,
    config: &OracleConfig,
) -> Result<MembershipOracle, BuildError> {
    let oracle: MembershipOracle = match description {
        LanguageDescription::Regex(source) => RegexOracle::new(source)?.into(),
        LanguageDescription::Automaton(desc) => AutomatonOracle::new(AutomatonSpec::new(desc)?).into(),
        LanguageDescription::AutomatonJson(text) => AutomatonOracle::new(AutomatonSpec::from_json(text)?).into(),
        LanguageDescription::Custom(source) => CustomOracle::from_script(source, config.timeout)?.into(),
    };
    debug!("build_oracle: {}", oracle.meta());
    Ok(oracle)
}
