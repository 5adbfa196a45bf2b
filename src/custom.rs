//! Membership by an arbitrary, externally supplied predicate.
//!
//! The predicate is foreign code: it may loop forever, fail, or panic. A
//! [`CustomOracle`] runs every call on a fresh worker thread and races it
//! against the configured time budget. Whatever happens inside the predicate
//! is folded into a [`MembershipResult`]; the caller never sees a panic and
//! never waits longer than the budget.
//!
//! How the predicate is isolated is up to the [`PredicateRuntime`]
//! implementation. This crate ships a rhai-based runtime in
//! [`script`][crate::script]; hosts can plug in Rust closures with
//! [`FnPredicate`].

use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{bounded, RecvTimeoutError};
use log::{debug, warn};

use crate::cancel::CancelToken;
use crate::error::BuildError;
use crate::oracle::{Membership, MembershipResult, OracleKind, OracleMeta, DEFAULT_TIMEOUT};
use crate::script::ScriptPredicate;

/// Error text reported when a predicate exceeds its time budget.
pub const TIMEOUT_ERROR: &str = "Timeout";

/// String primitives handed to every predicate invocation.
///
/// Both operate on code points, so `"😀"` has length 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct Helpers;

impl Helpers {
    /// Length of `s` in code points.
    pub fn len(&self, s: &str) -> usize {
        s.chars().count()
    }

    /// Number of occurrences of the single code point `ch` in `s`.
    ///
    /// Returns 0 when `ch` is not exactly one code point.
    pub fn count(&self, s: &str, ch: &str) -> usize {
        let mut chars = ch.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.count_char(s, c),
            _ => 0,
        }
    }

    /// Number of occurrences of `c` in `s`.
    pub fn count_char(&self, s: &str, c: char) -> usize {
        s.chars().filter(|&x| x == c).count()
    }
}

/// The sandboxed-execution collaborator behind a [`CustomOracle`].
///
/// `evaluate` runs on a worker thread. It returns `Ok(membership)` or
/// `Err(message)` for a fault. Implementations should poll `cancel` where they
/// can: once it is set, nobody is waiting for the answer any more.
pub trait PredicateRuntime: Send + Sync + 'static {
    fn evaluate(&self, input: &str, helpers: &Helpers, cancel: &CancelToken) -> Result<bool, String>;
}

/// A [`PredicateRuntime`] backed by a plain Rust closure.
///
/// A closure cannot be interrupted: when a call times out, [`CustomOracle`]
/// reports the fault and stops waiting, but the worker thread keeps running
/// the closure to completion in the background. A closure that never returns
/// leaks one thread per timed-out call, so a search over such a predicate
/// accumulates one spinning thread per trial. Use a cooperative runtime such
/// as [`ScriptPredicate`] for untrusted code.
pub struct FnPredicate<F>(F);

impl<F> FnPredicate<F>
where
    F: Fn(&str, &Helpers) -> Result<bool, String> + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        FnPredicate(f)
    }
}

impl<F> PredicateRuntime for FnPredicate<F>
where
    F: Fn(&str, &Helpers) -> Result<bool, String> + Send + Sync + 'static,
{
    fn evaluate(&self, input: &str, helpers: &Helpers, _cancel: &CancelToken) -> Result<bool, String> {
        (self.0)(input, helpers)
    }
}

/// Membership oracle over a time-bounded external predicate.
#[derive(Clone)]
pub struct CustomOracle {
    runtime: Arc<dyn PredicateRuntime>,
    timeout: Duration,
}

impl CustomOracle {
    pub fn new(runtime: impl PredicateRuntime, timeout: Duration) -> Self {
        CustomOracle {
            runtime: Arc::new(runtime),
            timeout,
        }
    }

    /// Wraps a Rust closure with the default 300 ms budget.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&str, &Helpers) -> Result<bool, String> + Send + Sync + 'static,
    {
        Self::new(FnPredicate::new(f), DEFAULT_TIMEOUT)
    }

    /// Compiles a rhai predicate; syntax errors are reported as [`BuildError::Script`].
    pub fn from_script(source: &str, timeout: Duration) -> Result<Self, BuildError> {
        Ok(Self::new(ScriptPredicate::compile(source)?, timeout))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for CustomOracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomOracle").field("timeout", &self.timeout).finish_non_exhaustive()
    }
}

impl Membership for CustomOracle {
    /// Races the predicate against the time budget.
    ///
    /// The worker is abandoned on timeout (its token is cancelled so a
    /// cooperative runtime stops early); a panic in the predicate drops the
    /// channel sender and is reported as a runtime fault.
    fn test(&self, input: &str) -> MembershipResult {
        let (tx, rx) = bounded(1);
        let cancel = CancelToken::new();

        let runtime = Arc::clone(&self.runtime);
        let owned = input.to_owned();
        let token = cancel.clone();
        let spawned = thread::Builder::new()
            .name("pumping-predicate".into())
            .spawn(move || {
                let result = runtime.evaluate(&owned, &Helpers, &token);
                // The receiver is gone if we already timed out.
                let _ = tx.send(result);
            });
        if let Err(e) = spawned {
            return MembershipResult::fault(format!("Runtime error: {}", e));
        }

        match rx.recv_timeout(self.timeout) {
            Ok(Ok(member)) => MembershipResult::from_bool(member),
            Ok(Err(message)) => {
                warn!("predicate fault on {:?}: {}", input, message);
                MembershipResult::fault(format!("Runtime error: {}", message))
            }
            Err(RecvTimeoutError::Timeout) => {
                cancel.cancel();
                warn!("predicate timed out after {:?} on {:?}", self.timeout, input);
                MembershipResult::fault(TIMEOUT_ERROR)
            }
            Err(RecvTimeoutError::Disconnected) => {
                debug!("predicate worker exited without a result");
                MembershipResult::fault("Runtime error: predicate panicked")
            }
        }
    }

    fn meta(&self) -> OracleMeta {
        OracleMeta::new(OracleKind::Custom)
    }
}
