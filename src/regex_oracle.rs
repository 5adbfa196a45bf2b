//! Membership by regular expression.

use regex::Regex;

use crate::oracle::{Membership, MembershipResult, OracleKind, OracleMeta};

/// Tests whole strings against a regular expression.
///
/// The pattern is wrapped as `^(?:pattern)$`, so `test` decides full-string
/// membership, never substring matches. Matching is Unicode-aware: classes
/// and quantifiers work on code points.
#[derive(Debug, Clone)]
pub struct RegexOracle {
    source: String,
    regex: Regex,
}

impl RegexOracle {
    /// Compiles `source`. Malformed patterns are rejected here, never at test time.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        // Compile the bare pattern first: something like `a)|(b` is only
        // valid once wrapped, and must still be rejected.
        Regex::new(source)?;
        let regex = Regex::new(&format!("^(?:{})$", source))?;
        Ok(RegexOracle {
            source: source.to_owned(),
            regex,
        })
    }

    /// The pattern as supplied by the user, without anchors.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Membership for RegexOracle {
    fn test(&self, input: &str) -> MembershipResult {
        MembershipResult::from_bool(self.regex.is_match(input))
    }

    fn meta(&self) -> OracleMeta {
        OracleMeta::new(OracleKind::Regex)
    }
}
