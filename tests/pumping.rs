//! End-to-end tests for the pumping-lemma explorer.
//!
//! Tests cover the automaton simulator, the three oracle kinds, decomposition
//! enumeration and the contradiction search.

use std::time::{Duration, Instant};

use test_log::test;

use pumping_rs::automaton::{simulate, AutomatonDescription, AutomatonSpec};
use pumping_rs::custom::{CustomOracle, FnPredicate, TIMEOUT_ERROR};
use pumping_rs::error::{BuildError, ValidationError};
use pumping_rs::oracle::{
    build_oracle, build_oracle_with_config, LanguageDescription, Membership, MembershipResult, OracleConfig,
    OracleKind,
};
use pumping_rs::regex_oracle::RegexOracle;
use pumping_rs::script::templates;
use pumping_rs::search::{find_contradiction, ContradictionSearch, SearchOutcome, DEFAULT_PUMP_COUNTS};

fn alternating() -> AutomatonSpec {
    let desc = AutomatonDescription::new("q0")
        .state("q1")
        .accept("q0")
        .transition("q0", "a", "q1")
        .transition("q1", "b", "q0");
    AutomatonSpec::new(&desc).unwrap()
}

/// `a*b` with a detour through ε-moves: q0 -ε-> q1, q1 -a-> q0, q1 -b-> q2.
fn epsilon_nfa() -> AutomatonSpec {
    let json = r#"{
        "states": ["q0", "q1", "q2"],
        "start": "q0",
        "accepts": ["q2"],
        "transitions": {
            "q0": { "eps": ["q1"] },
            "q1": { "a": ["q0"], "b": ["q2"] }
        }
    }"#;
    AutomatonSpec::from_json(json).unwrap()
}

/// Single-state stepping for a deterministic automaton without ε-moves.
fn run_dfa(spec: &AutomatonSpec, input: &str) -> bool {
    let mut state = spec.start();
    for c in input.chars() {
        match spec.targets(state, c.into()) {
            [next] => state = *next,
            [] => return false,
            _ => panic!("not deterministic"),
        }
    }
    spec.is_accepting(state)
}

// ─── Automaton Tests ───────────────────────────────────────────────────────────

#[test]
fn automaton_scenario() {
    let spec = alternating();
    assert!(simulate(&spec, ""));
    assert!(simulate(&spec, "ab"));
    assert!(!simulate(&spec, "a"));
    assert!(simulate(&spec, "abab"));
    assert!(!simulate(&spec, "ba"));
    assert!(spec.is_deterministic());
}

#[test]
fn automaton_epsilon_moves() {
    let spec = epsilon_nfa();
    // ε is just another key here: one target per key.
    assert!(spec.is_deterministic());
    assert!(spec.has_epsilon());
    assert!(simulate(&spec, "b"));
    assert!(simulate(&spec, "aaab"));
    assert!(!simulate(&spec, "aaa"));
    assert!(!simulate(&spec, "ba"));
}

#[test]
fn automaton_unknown_symbol_rejects() {
    let spec = alternating();
    assert!(!simulate(&spec, "abz"));
    assert!(!simulate(&spec, "😀"));
}

#[test]
fn automaton_validation_collects_errors() {
    let desc = AutomatonDescription {
        states: vec!["q0".to_string()],
        start: "nowhere".to_string(),
        accepts: vec!["gone".to_string()],
        ..Default::default()
    }
    .transition("q0", "ab", "q0");
    let errors = AutomatonSpec::new(&desc).unwrap_err();
    assert!(errors.contains(&ValidationError::UnknownStart("nowhere".into())));
    assert!(errors.contains(&ValidationError::UnknownAccept("gone".into())));
    assert!(errors.len() >= 3);
}

#[test]
fn automaton_json_round_trip() {
    let spec = epsilon_nfa();
    let desc = AutomatonDescription::from_json(
        r#"{"states":["s"],"start":"s","accepts":["s"],"transitions":{"s":{"x":["s"]}}}"#,
    )
    .unwrap();
    let again = AutomatonDescription::from_json(&desc.to_json().unwrap()).unwrap();
    assert_eq!(desc, again);
    assert!(spec.to_dot().unwrap().starts_with("digraph"));
}

#[test]
fn automaton_deterministic_matches_single_state_run() {
    let spec = alternating();
    for input in ["", "a", "b", "ab", "aba", "abab", "abba", "bab"] {
        assert_eq!(simulate(&spec, input), run_dfa(&spec, input), "input = {:?}", input);
    }
}

// ─── Oracle Tests ──────────────────────────────────────────────────────────────

#[test]
fn regex_anchoring() {
    let star = RegexOracle::new("a*").unwrap();
    let plus = RegexOracle::new("a+").unwrap();
    assert!(star.test("").in_language);
    assert!(!plus.test("").in_language);
    assert!(!star.test("ab").in_language);
    assert!(!plus.test("ba").in_language);
}

#[test]
fn regex_alternation_is_anchored_as_a_whole() {
    let oracle = RegexOracle::new("a|b").unwrap();
    assert!(oracle.test("a").in_language);
    assert!(!oracle.test("ab").in_language);
}

#[test]
fn regex_build_error() {
    let err = build_oracle(&LanguageDescription::Regex("(a".to_string())).unwrap_err();
    assert!(matches!(err, BuildError::Regex(_)));
}

#[test]
fn automaton_oracle_meta() {
    let json = alternating_json();
    let oracle = build_oracle(&LanguageDescription::AutomatonJson(json)).unwrap();
    let meta = oracle.meta();
    assert_eq!(meta.kind, OracleKind::Automaton);
    assert_eq!(meta.state_count, Some(2));
    assert_eq!(meta.deterministic, Some(true));
    assert_eq!(meta.suggested_pumping_length(), Some(2));
}

fn alternating_json() -> String {
    r#"{"states":["q0","q1"],"start":"q0","accepts":["q0"],"transitions":{"q0":{"a":["q1"]},"q1":{"b":["q0"]}}}"#
        .to_string()
}

#[test]
fn custom_script_oracle() {
    let oracle = build_oracle(&LanguageDescription::Custom(templates::AN_BN.to_string())).unwrap();
    assert_eq!(oracle.meta().kind, OracleKind::Custom);
    assert_eq!(oracle.test("aabb"), MembershipResult::accepted());
    assert_eq!(oracle.test("aab"), MembershipResult::rejected());
}

#[test]
fn custom_script_compile_error() {
    let err = build_oracle(&LanguageDescription::Custom("fn (".to_string())).unwrap_err();
    assert!(err.to_string().starts_with("Code compile error"));
}

#[test]
fn custom_timeout_resolves_within_budget() {
    let config = OracleConfig {
        timeout: Duration::from_millis(100),
    };
    let oracle = build_oracle_with_config(&LanguageDescription::Custom("loop { }".to_string()), &config).unwrap();
    let started = Instant::now();
    let result = oracle.test("x");
    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(result.error.as_deref(), Some(TIMEOUT_ERROR));
    assert!(!result.in_language);
}

#[test]
fn custom_closure_never_returning() {
    let oracle = CustomOracle::new(
        FnPredicate::new(|_, _| {
            std::thread::sleep(Duration::from_secs(10));
            Ok(true)
        }),
        Duration::from_millis(50),
    );
    let started = Instant::now();
    assert_eq!(oracle.test("x"), MembershipResult::fault(TIMEOUT_ERROR));
    assert!(started.elapsed() < Duration::from_secs(3));
}

// ─── Search Tests ──────────────────────────────────────────────────────────────

/// `s` matches `^(a+)(b+)$` with equal group lengths.
fn an_bn_closure() -> CustomOracle {
    CustomOracle::from_fn(|s, _| {
        let a = s.chars().take_while(|&c| c == 'a').count();
        let b = s.chars().skip(a).take_while(|&c| c == 'b').count();
        Ok(a > 0 && a == b && a + b == s.chars().count())
    })
}

#[test]
fn contradiction_scenario() {
    let oracle = an_bn_closure();
    let proof = find_contradiction(&oracle, "aabb", 2, &DEFAULT_PUMP_COUNTS).unwrap();
    assert!(proof.decomposition.y.chars().all(|c| c == 'a'));
    assert!(proof.i == 0 || proof.i == 2);
    assert!(!oracle.test(&proof.pumped).in_language);
    assert_eq!(proof.pumped, proof.decomposition.pump(proof.i));
}

#[test]
fn contradiction_with_script_template() {
    let oracle = build_oracle(&LanguageDescription::Custom(templates::AN_BN_CN.to_string())).unwrap();
    let outcome = ContradictionSearch::new(&oracle).run("aabbcc", 2);
    let proof = outcome.proof().unwrap();
    assert_eq!(proof.decomposition.y, "a");
    assert_eq!(proof.i, 0);
    assert_eq!(proof.pumped, "abbcc");
}

#[test]
fn contradiction_on_emoji() {
    let oracle = build_oracle(&LanguageDescription::Custom(templates::EMOJI.to_string())).unwrap();
    let proof = find_contradiction(&oracle, "😀😀😺😺", 2, &DEFAULT_PUMP_COUNTS).unwrap();
    assert_eq!(proof.decomposition.y, "😀");
    assert_eq!(proof.pumped, "😀😺😺");
}

#[test]
fn negative_scenario() {
    let oracle = RegexOracle::new("a*").unwrap();
    assert!(find_contradiction(&oracle, "aaaa", 4, &[0, 2, 3]).is_none());
    let outcome = ContradictionSearch::new(&oracle).run("aaaa", 4);
    assert!(matches!(outcome, SearchOutcome::Exhausted { ref faults, .. } if faults.is_empty()));
    assert!(outcome.to_string().contains("does not prove"));
}

#[test]
fn regular_automaton_has_no_witness() {
    // a*, with a dead state so the suggested pumping length is 2.
    let oracle = build_oracle(&LanguageDescription::Automaton(
        AutomatonDescription::new("q0")
            .state("dead")
            .accept("q0")
            .transition("q0", "a", "q0")
            .transition("q0", "b", "dead"),
    ))
    .unwrap();
    let p = oracle.meta().suggested_pumping_length().unwrap();
    assert_eq!(p, 2);
    assert!(find_contradiction(&oracle, "aaa", p, &DEFAULT_PUMP_COUNTS).is_none());
}

// ─── Properties ────────────────────────────────────────────────────────────────

mod properties {
    use proptest::prelude::*;

    use pumping_rs::automaton::simulate;
    use pumping_rs::decomposition::{decomposition_count, enumerate, pump};
    use pumping_rs::oracle::Membership;
    use pumping_rs::regex_oracle::RegexOracle;
    use pumping_rs::state_set::StateSet;
    use pumping_rs::types::StateId;

    use super::{alternating, epsilon_nfa};

    proptest! {
        #[test]
        fn enumerate_count_and_bounds(s in "[ab😀]{0,8}", p in 0usize..10) {
            let len = s.chars().count();
            let m = len.min(p);
            let splits = enumerate(&s, p);
            let expected: usize = (0..=m).map(|i| m - i).sum();
            prop_assert_eq!(splits.len(), expected);
            prop_assert_eq!(splits.len(), decomposition_count(len, p));
            for d in &splits {
                prop_assert!(d.i_start < d.i_end && d.i_end <= m);
                prop_assert_eq!(format!("{}{}{}", d.x, d.y, d.z), s.clone());
                prop_assert_eq!(d.pump(1), s.clone());
                prop_assert_eq!(d.x.chars().count(), d.i_start);
                prop_assert_eq!(d.y_len(), d.y.chars().count());
            }
        }

        #[test]
        fn pump_length(x in "[a-c]{0,4}", y in "[a-c]{1,4}", z in "[a-c]{0,4}", i in 0usize..5) {
            let pumped = pump(&x, &y, &z, i);
            prop_assert_eq!(pumped.len(), x.len() + i * y.len() + z.len());
        }

        #[test]
        fn epsilon_closure_idempotent(seeds in proptest::collection::vec(0usize..3, 0..3)) {
            let spec = epsilon_nfa();
            let set: StateSet = seeds.into_iter().map(StateId::new).collect();
            let once = spec.epsilon_closure(&set);
            let twice = spec.epsilon_closure(&once);
            prop_assert!(set.is_subset(&once));
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn regex_and_automaton_agree(input in "[ab]{0,8}") {
            let spec = alternating();
            let regex = RegexOracle::new("(ab)*").unwrap();
            prop_assert_eq!(simulate(&spec, &input), regex.test(&input).in_language);
        }
    }
}
