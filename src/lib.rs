//! # pumping-rs: Pumping Lemma explorer
//!
//! **`pumping-rs`** searches for pumping-lemma contradictions: given a language, a candidate
//! string `s` and a pumping length `p`, it looks for a split `s = x·y·z` with `|xy| ≤ p`, `|y| > 0`
//! and a pump count `i` such that `x·y^i·z` falls out of the language.
//!
//! ## Languages
//!
//! A language is anything that answers membership questions, see [`Membership`][crate::oracle::Membership]:
//!
//! - **Regex**: a full-match regular expression ([`regex_oracle`]).
//! - **Automaton**: a DFA, NFA or ε-NFA given as JSON or built in code ([`automaton`]).
//! - **Custom**: an arbitrary predicate, either a rhai script ([`script`]) or a Rust closure ([`custom`]).
//!   Custom predicates run time-bounded on a worker thread; errors, panics and timeouts are
//!   reported as faults instead of crashing the search.
//!
//! ## Basic Usage
//!
//! ```rust
//! use pumping_rs::oracle::{build_oracle, LanguageDescription, Membership};
//! use pumping_rs::script::templates;
//! use pumping_rs::search::ContradictionSearch;
//!
//! // 1. Describe the language
//! let oracle = build_oracle(&LanguageDescription::Custom(templates::AN_BN.to_string())).unwrap();
//! assert!(oracle.test("aabb").in_language);
//!
//! // 2. Search for a witness
//! let outcome = ContradictionSearch::new(&oracle).run("aabb", 2);
//! let proof = outcome.proof().unwrap();
//! assert_eq!(proof.pumped, "abb");
//! println!("{}", proof);
//! ```
//!
//! Finding no witness is a normal outcome and does **not** mean the language is regular.
//!
//! ## Core Components
//!
//! - **[`oracle`]**: The [`Membership`][crate::oracle::Membership] trait and [`build_oracle`][crate::oracle::build_oracle].
//! - **[`automaton`]**: Validation and ε-closure simulation of finite automata.
//! - **[`decomposition`]**: Ordered enumeration of `x·y·z` splits.
//! - **[`search`]**: The contradiction search.
//! - **[`dot`]**: Graphviz export for automata.

pub mod automaton;
pub mod cancel;
pub mod custom;
pub mod decomposition;
pub mod dot;
pub mod error;
pub mod oracle;
pub mod regex_oracle;
pub mod script;
pub mod search;
pub mod state_set;
pub mod types;
