//! Searching for a pumping-lemma contradiction.
//!
//! The search walks decompositions in enumeration order and, for each one,
//! the configured pump counts in order, testing `x·y^i·z` against the oracle
//! one call at a time. The first pumped string that is *not* in the language
//! is returned as a [`Proof`]: earlier decompositions win, then earlier `i`.
//!
//! Running out of candidates yields no proof. That is a normal outcome and
//! says nothing about whether the language is regular.
//!
//! ```
//! use pumping_rs::custom::CustomOracle;
//! use pumping_rs::search::{find_contradiction, DEFAULT_PUMP_COUNTS};
//!
//! // a^n b^n
//! let oracle = CustomOracle::from_fn(|s, h| {
//!     let n = h.len(s);
//!     Ok(n > 0 && n % 2 == 0 && s.chars().take(n / 2).all(|c| c == 'a') && s.chars().skip(n / 2).all(|c| c == 'b'))
//! });
//!
//! let proof = find_contradiction(&oracle, "aabb", 2, &DEFAULT_PUMP_COUNTS).unwrap();
//! assert_eq!(proof.decomposition.y, "a");
//! assert_eq!(proof.i, 0);
//! assert_eq!(proof.pumped, "abb");
//! ```

use std::fmt;

use log::{debug, warn};

use crate::cancel::CancelToken;
use crate::decomposition::{decompositions, Decomposition};
use crate::oracle::{Membership, MembershipResult, Verdict};

/// Pump counts tried by default. `i = 1` reproduces `s` and is skipped.
pub const DEFAULT_PUMP_COUNTS: [usize; 3] = [0, 2, 3];

/// What a faulted oracle call (custom predicate error or timeout) means to the search.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum FaultPolicy {
    /// Record the trial and move on; a fault never becomes a proof.
    #[default]
    Inconclusive,
    /// Treat the fault as "not in the language".
    CountAsRejection,
    /// Stop searching at the first fault.
    Abort,
}

/// Search settings.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Pump counts to try for every decomposition, in order (default: `[0, 2, 3]`)
    pub pump_counts: Vec<usize>,
    /// Handling of faulted oracle calls (default: [`FaultPolicy::Inconclusive`])
    pub fault_policy: FaultPolicy,
    /// Test `s` itself first and refuse to search when it is not a member (default: false)
    pub check_candidate: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            pump_counts: DEFAULT_PUMP_COUNTS.to_vec(),
            fault_policy: FaultPolicy::default(),
            check_candidate: false,
        }
    }
}

/// A single `(decomposition, i)` test and its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PumpTrial {
    pub decomposition: Decomposition,
    pub i: usize,
    pub pumped: String,
    pub result: MembershipResult,
}

/// A falsifying witness: pumping `y` of `decomposition` `i` times leaves the language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
    pub p: usize,
    pub s: String,
    pub decomposition: Decomposition,
    pub i: usize,
    pub pumped: String,
    pub result: MembershipResult,
}

impl fmt::Display for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.decomposition;
        write!(
            f,
            "Contradiction found: with p = {}, s = \"{}\", choose decomposition x = \"{}\", y = \"{}\", z = \"{}\" \
             (|xy| ≤ p, |y| > 0). For i = {}, the pumped string becomes \"{}\", which is not in L.",
            self.p, self.s, d.x, d.y, d.z, self.i, self.pumped
        )?;
        if let Some(error) = &self.result.error {
            write!(f, " (oracle reported: {})", error)?;
        }
        Ok(())
    }
}

/// How a search ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A witness was found.
    Contradiction(Proof),
    /// Every `(decomposition, i)` was tried without a witness. `faults` lists
    /// the trials skipped under [`FaultPolicy::Inconclusive`].
    Exhausted { trials: usize, faults: Vec<PumpTrial> },
    /// Stopped at a fault under [`FaultPolicy::Abort`].
    Aborted { trials: usize, fault: PumpTrial },
    /// The cancel token fired before the search finished.
    Cancelled { trials: usize },
    /// `s` itself is not (known to be) in the language; nothing was searched.
    CandidateRejected { result: MembershipResult },
}

impl SearchOutcome {
    pub fn proof(&self) -> Option<&Proof> {
        match self {
            SearchOutcome::Contradiction(proof) => Some(proof),
            _ => None,
        }
    }

    pub fn into_proof(self) -> Option<Proof> {
        match self {
            SearchOutcome::Contradiction(proof) => Some(proof),
            _ => None,
        }
    }

    /// Number of pumped strings tested; not tracked for a found contradiction.
    pub fn trials(&self) -> usize {
        match self {
            SearchOutcome::Contradiction(_) | SearchOutcome::CandidateRejected { .. } => 0,
            SearchOutcome::Exhausted { trials, .. }
            | SearchOutcome::Aborted { trials, .. }
            | SearchOutcome::Cancelled { trials } => *trials,
        }
    }
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchOutcome::Contradiction(proof) => write!(f, "{}", proof),
            SearchOutcome::Exhausted { faults, .. } => {
                write!(
                    f,
                    "No contradiction was found for the tested decompositions and i values. \
                     This does not prove that L is regular; the pumping lemma is a one-way test."
                )?;
                if !faults.is_empty() {
                    write!(f, " {} pumped string(s) could not be tested.", faults.len())?;
                }
                Ok(())
            }
            SearchOutcome::Aborted { fault, .. } => write!(
                f,
                "Search aborted: testing \"{}\" (i = {}) failed: {}",
                fault.pumped,
                fault.i,
                fault.result.error.as_deref().unwrap_or("unknown error")
            ),
            SearchOutcome::Cancelled { trials } => write!(f, "Search cancelled after {} trial(s).", trials),
            SearchOutcome::CandidateRejected { result } => match &result.error {
                Some(error) => write!(f, "The candidate string could not be tested: {}", error),
                None => write!(f, "The candidate string is not in L, so it cannot be pumped."),
            },
        }
    }
}

/// Configurable contradiction search over any [`Membership`] oracle.
pub struct ContradictionSearch<'a, O: ?Sized> {
    oracle: &'a O,
    config: SearchConfig,
    cancel: Option<CancelToken>,
}

impl<'a, O: Membership + ?Sized> ContradictionSearch<'a, O> {
    pub fn new(oracle: &'a O) -> Self {
        ContradictionSearch {
            oracle,
            config: SearchConfig::default(),
            cancel: None,
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_pump_counts(mut self, pump_counts: &[usize]) -> Self {
        self.config.pump_counts = pump_counts.to_vec();
        self
    }

    pub fn with_fault_policy(mut self, fault_policy: FaultPolicy) -> Self {
        self.config.fault_policy = fault_policy;
        self
    }

    /// The token is checked before every oracle call.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    /// Runs the search for candidate `s` under pumping length `p`.
    pub fn run(&self, s: &str, p: usize) -> SearchOutcome {
        debug!(
            "find_contradiction(s = {:?}, p = {}, pump_counts = {:?}, policy = {:?})",
            s, p, self.config.pump_counts, self.config.fault_policy
        );

        if self.config.check_candidate {
            if self.is_cancelled() {
                return SearchOutcome::Cancelled { trials: 0 };
            }
            let result = self.oracle.test(s);
            if result.verdict() != Verdict::Member {
                debug!("candidate {:?} rejected: {:?}", s, result);
                return SearchOutcome::CandidateRejected { result };
            }
        }

        let mut trials = 0;
        let mut faults = Vec::new();
        for decomposition in decompositions(s, p) {
            for &i in &self.config.pump_counts {
                if self.is_cancelled() {
                    debug!("search cancelled after {} trials", trials);
                    return SearchOutcome::Cancelled { trials };
                }

                let pumped = decomposition.pump(i);
                let result = self.oracle.test(&pumped);
                trials += 1;

                if result.in_language {
                    continue;
                }
                if result.is_fault() {
                    match self.config.fault_policy {
                        FaultPolicy::CountAsRejection => {}
                        FaultPolicy::Inconclusive => {
                            warn!("skipping inconclusive trial {} with i = {}", decomposition, i);
                            faults.push(PumpTrial {
                                decomposition: decomposition.clone(),
                                i,
                                pumped,
                                result,
                            });
                            continue;
                        }
                        FaultPolicy::Abort => {
                            warn!("aborting search at {} with i = {}", decomposition, i);
                            return SearchOutcome::Aborted {
                                trials,
                                fault: PumpTrial {
                                    decomposition,
                                    i,
                                    pumped,
                                    result,
                                },
                            };
                        }
                    }
                }

                debug!("contradiction: {} with i = {} gives {:?}", decomposition, i, pumped);
                return SearchOutcome::Contradiction(Proof {
                    p,
                    s: s.to_owned(),
                    decomposition,
                    i,
                    pumped,
                    result,
                });
            }
        }

        debug!("no contradiction after {} trials", trials);
        SearchOutcome::Exhausted { trials, faults }
    }
}

/// Searches with the default fault policy and the given pump counts.
///
/// Returns `None` when no witness exists among the tried candidates, which
/// does not mean the language is regular.
pub fn find_contradiction<O: Membership + ?Sized>(
    oracle: &O,
    s: &str,
    p: usize,
    candidate_is: &[usize],
) -> Option<Proof> {
    ContradictionSearch::new(oracle)
        .with_pump_counts(candidate_is)
        .run(s, p)
        .into_proof()
}

/// Tests a single, user-chosen `(decomposition, i)`.
pub fn test_pump<O: Membership + ?Sized>(oracle: &O, decomposition: &Decomposition, i: usize) -> PumpTrial {
    let pumped = decomposition.pump(i);
    let result = oracle.test(&pumped);
    PumpTrial {
        decomposition: decomposition.clone(),
        i,
        pumped,
        result,
    }
}
