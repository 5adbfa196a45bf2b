//! Rhai-scripted membership predicates.
//!
//! A predicate is the *body* of a function of `s` (the input string) and
//! `helpers`; its value, either the last expression or a top-level `return`,
//! is the membership answer:
//!
//! ```rhai
//! // Equal number of a's and b's
//! if helpers.len(s) == 0 { return false; }
//! helpers.count(s, "a") == helpers.count(s, "b")
//! ```
//!
//! Scripts run inside an embedded rhai engine: no file system, no network,
//! no host access beyond the two helpers. Evaluation polls the call's
//! [`CancelToken`] through the engine's progress hook, so an abandoned
//! (timed-out) script stops at its next operation.
//!
//! Non-boolean results are coerced: `()` is false, integers are true when
//! non-zero, floats when non-zero and not NaN, strings when non-empty,
//! anything else is true.

use rhai::{Dynamic, Engine, EvalAltResult, Scope, AST};

use crate::cancel::CancelToken;
use crate::custom::{Helpers, PredicateRuntime};
use crate::error::BuildError;

/// A compiled rhai predicate.
#[derive(Debug, Clone)]
pub struct ScriptPredicate {
    ast: AST,
}

impl ScriptPredicate {
    /// Parses `source`. Syntax errors are build errors, not runtime faults.
    pub fn compile(source: &str) -> Result<Self, BuildError> {
        let engine = Self::engine(None);
        let ast = engine.compile(source).map_err(|e| BuildError::Script(e.to_string()))?;
        Ok(ScriptPredicate { ast })
    }

    /// A fresh engine with `helpers.len` / `helpers.count` registered.
    fn engine(cancel: Option<CancelToken>) -> Engine {
        let mut engine = Engine::new();
        engine
            .register_type_with_name::<Helpers>("Helpers")
            .register_fn("len", |h: &mut Helpers, s: &str| h.len(s) as i64)
            .register_fn("count", |h: &mut Helpers, s: &str, ch: &str| h.count(s, ch) as i64)
            .register_fn("count", |h: &mut Helpers, s: &str, ch: char| h.count_char(s, ch) as i64);

        if let Some(token) = cancel {
            engine.on_progress(move |_| {
                if token.is_cancelled() {
                    Some(Dynamic::UNIT)
                } else {
                    None
                }
            });
        }
        engine
    }
}

impl PredicateRuntime for ScriptPredicate {
    fn evaluate(&self, input: &str, helpers: &Helpers, cancel: &CancelToken) -> Result<bool, String> {
        let engine = Self::engine(Some(cancel.clone()));
        let mut scope = Scope::new();
        scope.push("s", input.to_string());
        scope.push("helpers", *helpers);
        let value: Dynamic = engine
            .eval_ast_with_scope(&mut scope, &self.ast)
            .map_err(|e| match *e {
                EvalAltResult::ErrorRuntime(ref thrown, _) => thrown.to_string(),
                ref other => other.to_string(),
            })?;
        Ok(truthy(&value))
    }
}

fn truthy(value: &Dynamic) -> bool {
    if let Ok(b) = value.as_bool() {
        b
    } else if value.is_unit() {
        false
    } else if let Ok(n) = value.as_int() {
        n != 0
    } else if let Ok(f) = value.as_float() {
        f != 0.0 && !f.is_nan()
    } else if value.is_string() {
        value.clone().into_immutable_string().is_ok_and(|s| !s.is_empty())
    } else {
        true
    }
}

/// Ready-made predicates for classic example languages.
pub mod templates {
    /// `a^n b^n`, n ≥ 1.
    pub const AN_BN: &str = r#"
// Language: a^n b^n
let n = helpers.len(s);
if n == 0 || n % 2 != 0 { return false; }
let half = n / 2;
for i in 0..n {
    let expected = if i < half { 'a' } else { 'b' };
    if s[i] != expected { return false; }
}
true
"#;

    /// `a^n b^n c^n`, n ≥ 1.
    pub const AN_BN_CN: &str = r#"
// Language: a^n b^n c^n
let n = helpers.len(s);
if n == 0 || n % 3 != 0 { return false; }
let k = n / 3;
for i in 0..n {
    let expected = if i < k { 'a' } else if i < 2 * k { 'b' } else { 'c' };
    if s[i] != expected { return false; }
}
true
"#;

    /// `(ab)*`.
    pub const AB_STAR: &str = r#"
// Language: (ab)*
let n = helpers.len(s);
if n % 2 != 0 { return false; }
for i in 0..n {
    let expected = if i % 2 == 0 { 'a' } else { 'b' };
    if s[i] != expected { return false; }
}
true
"#;

    /// n 😀 followed by n 😺, n ≥ 1.
    pub const EMOJI: &str = r#"
// Strings of n 😀 followed by n 😺
let n = helpers.len(s);
if n == 0 || n % 2 != 0 { return false; }
let half = n / 2;
for i in 0..n {
    let expected = if i < half { '😀' } else { '😺' };
    if s[i] != expected { return false; }
}
true
"#;
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn eval(source: &str, input: &str) -> Result<bool, String> {
        ScriptPredicate::compile(source)
            .unwrap()
            .evaluate(input, &Helpers, &CancelToken::new())
    }

    #[test]
    fn test_helpers_visible() {
        assert_eq!(eval("helpers.len(s) == 2", "😀😺"), Ok(true));
        assert_eq!(eval(r#"helpers.count(s, "a")"#, "banana"), Ok(true));
        assert_eq!(eval(r#"helpers.count(s, "z")"#, "banana"), Ok(false));
        assert_eq!(eval("helpers.count(s, 'n') == 2", "banana"), Ok(true));
    }

    #[test]
    fn test_truthiness() {
        assert_eq!(eval("()", "x"), Ok(false));
        assert_eq!(eval("0", "x"), Ok(false));
        assert_eq!(eval("7", "x"), Ok(true));
        assert_eq!(eval(r#""""#, "x"), Ok(false));
        assert_eq!(eval("s", "x"), Ok(true));
        assert_eq!(eval("[]", "x"), Ok(true));
    }

    #[test]
    fn test_float_truthiness() {
        assert_eq!(eval("0.0", "x"), Ok(false));
        assert_eq!(eval("-0.0", "x"), Ok(false));
        assert_eq!(eval("0.5", "x"), Ok(true));
        assert!(!truthy(&Dynamic::from_float(f64::NAN)));
        assert!(truthy(&Dynamic::from_float(f64::INFINITY)));
    }

    #[test]
    fn test_top_level_return() {
        assert_eq!(eval("if s == \"\" { return true; } false", ""), Ok(true));
        assert_eq!(eval("if s == \"\" { return true; } false", "a"), Ok(false));
    }

    #[test]
    fn test_compile_error() {
        let err = ScriptPredicate::compile("let = ;").unwrap_err();
        assert!(matches!(err, BuildError::Script(_)));
    }

    #[test]
    fn test_runtime_error() {
        let err = eval(r#"throw "boom""#, "x").unwrap_err();
        assert!(err.contains("boom"));
    }

    #[test]
    fn test_cancelled_script_stops() {
        let predicate = ScriptPredicate::compile("loop { }").unwrap();
        let token = CancelToken::new();
        token.cancel();
        assert!(predicate.evaluate("x", &Helpers, &token).is_err());
    }

    #[test]
    fn test_templates() {
        assert_eq!(eval(templates::AN_BN, "aabb"), Ok(true));
        assert_eq!(eval(templates::AN_BN, "abb"), Ok(false));
        assert_eq!(eval(templates::AN_BN, "ba"), Ok(false));
        assert_eq!(eval(templates::AN_BN, ""), Ok(false));

        assert_eq!(eval(templates::AN_BN_CN, "abc"), Ok(true));
        assert_eq!(eval(templates::AN_BN_CN, "aabbcc"), Ok(true));
        assert_eq!(eval(templates::AN_BN_CN, "aabcc"), Ok(false));

        assert_eq!(eval(templates::AB_STAR, ""), Ok(true));
        assert_eq!(eval(templates::AB_STAR, "abab"), Ok(true));
        assert_eq!(eval(templates::AB_STAR, "aba"), Ok(false));

        assert_eq!(eval(templates::EMOJI, "😀😀😺😺"), Ok(true));
        assert_eq!(eval(templates::EMOJI, "😀😺😺"), Ok(false));
        assert_eq!(eval(templates::EMOJI, "😺😀"), Ok(false));
    }
}
