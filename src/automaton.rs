//! Finite automata: description, validation, and simulation.
//!
//! An automaton arrives as an [`AutomatonDescription`] (the JSON shape users
//! write by hand) and is validated once into an immutable [`AutomatonSpec`].
//! Validation interns state names into dense [`StateId`]s and merges the two
//! epsilon spellings (`""` and `"eps"`) into [`Symbol::Epsilon`].
//!
//! # Simulation
//!
//! [`AutomatonSpec::simulate`] runs the classic subset simulation: the active
//! state set starts as the epsilon-closure of `{start}`; each input code point
//! moves every active state along matching transitions and the result is
//! closed again. The input is accepted iff the final set contains an
//! accepting state. DFAs are the special case where every set has at most
//! one element.
//!
//! ```
//! use pumping_rs::automaton::AutomatonSpec;
//!
//! let spec = AutomatonSpec::from_json(r#"{
//!     "states": ["q0", "q1"],
//!     "start": "q0",
//!     "accepts": ["q0"],
//!     "transitions": { "q0": { "a": ["q1"] }, "q1": { "b": ["q0"] } }
//! }"#).unwrap();
//!
//! assert!(spec.simulate(""));
//! assert!(spec.simulate("abab"));
//! assert!(!spec.simulate("a"));
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ValidationError, ValidationErrors};
use crate::state_set::StateSet;
use crate::types::{StateId, Symbol};

/// Automaton as written by the user.
///
/// Mirrors the JSON structure
/// `{ states: string[], start: string, accepts: string[], transitions: { [state]: { [symbol]: string[] } } }`.
/// Nothing is checked here beyond the shape; see [`AutomatonSpec::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatonDescription {
    pub states: Vec<String>,
    pub start: String,
    pub accepts: Vec<String>,
    pub transitions: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl AutomatonDescription {
    /// Starts a description whose only state is `start`.
    pub fn new(start: impl Into<String>) -> Self {
        let start = start.into();
        AutomatonDescription {
            states: vec![start.clone()],
            start,
            ..Default::default()
        }
    }

    /// Declares a state (no-op if already declared).
    pub fn state(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.states.contains(&name) {
            self.states.push(name);
        }
        self
    }

    /// Marks a declared state as accepting.
    pub fn accept(mut self, name: impl Into<String>) -> Self {
        self.accepts.push(name.into());
        self
    }

    /// Adds a transition `from --symbol--> to`. Use `""` or `"eps"` for epsilon.
    pub fn transition(mut self, from: impl Into<String>, symbol: impl Into<String>, to: impl Into<String>) -> Self {
        self.transitions
            .entry(from.into())
            .or_default()
            .entry(symbol.into())
            .or_default()
            .push(to.into());
        self
    }

    /// Parses the JSON text of an automaton, reporting every shape defect.
    pub fn from_json(text: &str) -> Result<Self, ValidationErrors> {
        let value: Value = serde_json::from_str(text).map_err(|e| ValidationError::Json(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Extracts a description from an already-parsed JSON value.
    pub fn from_value(value: &Value) -> Result<Self, ValidationErrors> {
        let Some(obj) = value.as_object() else {
            return Err(ValidationError::NotAnObject.into());
        };

        let mut errors = ValidationErrors::new();

        let states = string_array(obj.get("states"), &mut errors, ValidationError::StatesNotArray, |index| {
            ValidationError::StateNotString { index }
        });
        if obj.get("states").and_then(Value::as_array).is_some_and(|a| a.is_empty()) {
            errors.push(ValidationError::StatesNotArray);
        }

        let start = match obj.get("start").and_then(Value::as_str) {
            Some(s) => s.to_owned(),
            None => {
                errors.push(ValidationError::StartNotString);
                String::new()
            }
        };

        let accepts = string_array(obj.get("accepts"), &mut errors, ValidationError::AcceptsNotArray, |index| {
            ValidationError::AcceptNotString { index }
        });

        let mut transitions = BTreeMap::new();
        match obj.get("transitions").and_then(Value::as_object) {
            None => errors.push(ValidationError::TransitionsNotObject),
            Some(rows) => {
                for (from, row) in rows {
                    let Some(row) = row.as_object() else {
                        errors.push(ValidationError::TransitionRowNotObject { from: from.clone() });
                        continue;
                    };
                    let mut out_row = BTreeMap::new();
                    for (symbol, targets) in row {
                        let Some(targets) = targets.as_array() else {
                            errors.push(ValidationError::TargetsNotArray {
                                from: from.clone(),
                                symbol: symbol.clone(),
                            });
                            continue;
                        };
                        let mut out_targets = Vec::with_capacity(targets.len());
                        for target in targets {
                            match target.as_str() {
                                Some(t) => out_targets.push(t.to_owned()),
                                None => errors.push(ValidationError::TargetNotString {
                                    from: from.clone(),
                                    symbol: symbol.clone(),
                                }),
                            }
                        }
                        out_row.insert(symbol.clone(), out_targets);
                    }
                    transitions.insert(from.clone(), out_row);
                }
            }
        }

        errors.into_result(AutomatonDescription {
            states,
            start,
            accepts,
            transitions,
        })
    }

    /// Pretty-printed JSON of this description.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn string_array(
    value: Option<&Value>,
    errors: &mut ValidationErrors,
    not_array: ValidationError,
    not_string: impl Fn(usize) -> ValidationError,
) -> Vec<String> {
    let Some(items) = value.and_then(Value::as_array) else {
        errors.push(not_array);
        return Vec::new();
    };
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item.as_str() {
            Some(s) => out.push(s.to_owned()),
            None => errors.push(not_string(index)),
        }
    }
    out
}

/// A validated, immutable finite automaton (DFA, NFA, or ε-NFA).
///
/// # Invariants
///
/// - `start` and every accepting state are declared states.
/// - Every transition source and target is a declared state.
/// - Target lists are sorted and free of duplicates.
///
/// There is no way to mutate an automaton after validation, so it can be shared
/// freely (e.g. behind an `Arc`) between concurrent simulations.
#[derive(Debug, Clone)]
pub struct AutomatonSpec {
    names: Vec<String>,
    index: HashMap<String, StateId>,
    start: StateId,
    accepting: StateSet,
    transitions: Vec<BTreeMap<Symbol, Vec<StateId>>>,
}

impl AutomatonSpec {
    /// Validates `desc`, collecting every defect rather than stopping at the first.
    pub fn new(desc: &AutomatonDescription) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if desc.states.is_empty() {
            errors.push(ValidationError::StatesNotArray);
        }

        let mut names = Vec::with_capacity(desc.states.len());
        let mut index = HashMap::with_capacity(desc.states.len());
        for name in &desc.states {
            if index.contains_key(name) {
                errors.push(ValidationError::DuplicateState(name.clone()));
            } else {
                index.insert(name.clone(), StateId::new(names.len()));
                names.push(name.clone());
            }
        }
        let n = names.len();

        let start = index.get(&desc.start).copied();
        if start.is_none() {
            errors.push(ValidationError::UnknownStart(desc.start.clone()));
        }

        let mut accepting = StateSet::new(n);
        for name in &desc.accepts {
            match index.get(name) {
                Some(&id) => {
                    accepting.insert(id);
                }
                None => errors.push(ValidationError::UnknownAccept(name.clone())),
            }
        }

        let mut transitions: Vec<BTreeMap<Symbol, Vec<StateId>>> = vec![BTreeMap::new(); n];
        for (from, row) in &desc.transitions {
            let source = index.get(from).copied();
            if source.is_none() {
                errors.push(ValidationError::UnknownSource(from.clone()));
            }
            for (key, targets) in row {
                let symbol = Symbol::parse(key);
                if symbol.is_none() {
                    errors.push(ValidationError::InvalidSymbol {
                        from: from.clone(),
                        symbol: key.clone(),
                    });
                }
                for target in targets {
                    let Some(&target) = index.get(target) else {
                        errors.push(ValidationError::UnknownTarget { target: target.clone() });
                        continue;
                    };
                    if let (Some(source), Some(symbol)) = (source, symbol) {
                        let entry = transitions[source.index()].entry(symbol).or_default();
                        if !entry.contains(&target) {
                            entry.push(target);
                        }
                    }
                }
            }
        }
        for row in &mut transitions {
            row.values_mut().for_each(|targets| targets.sort_unstable());
        }

        match start {
            Some(start) if errors.is_empty() => Ok(AutomatonSpec {
                names,
                index,
                start,
                accepting,
                transitions,
            }),
            _ => Err(errors),
        }
    }

    /// Parses and validates JSON text in one go.
    pub fn from_json(text: &str) -> Result<Self, ValidationErrors> {
        Self::new(&AutomatonDescription::from_json(text)?)
    }

    /// Number of declared states.
    pub fn num_states(&self) -> usize {
        self.names.len()
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    /// The user-facing name of `state`.
    pub fn state_name(&self, state: StateId) -> &str {
        &self.names[state.index()]
    }

    /// Looks up a state by its user-facing name.
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.index.get(name).copied()
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepting.contains(state)
    }

    /// All states, in declaration order.
    pub fn states(&self) -> impl Iterator<Item = StateId> {
        (0..self.num_states()).map(StateId::new)
    }

    /// Targets of `state` on `symbol` (empty if there is no such transition).
    pub fn targets(&self, state: StateId, symbol: Symbol) -> &[StateId] {
        self.transitions
            .get(state.index())
            .and_then(|row| row.get(&symbol))
            .map_or(&[], Vec::as_slice)
    }

    /// All transitions as `(source, symbol, target)` triples, grouped by source.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, Symbol, StateId)> + '_ {
        self.transitions.iter().enumerate().flat_map(|(i, row)| {
            row.iter()
                .flat_map(move |(&symbol, targets)| targets.iter().map(move |&t| (StateId::new(i), symbol, t)))
        })
    }

    /// Every state/symbol pair has at most one target (epsilon counts as a symbol).
    pub fn is_deterministic(&self) -> bool {
        self.transitions
            .iter()
            .all(|row| row.values().all(|targets| targets.len() <= 1))
    }

    /// Whether any epsilon transition exists.
    pub fn has_epsilon(&self) -> bool {
        self.transitions.iter().any(|row| row.contains_key(&Symbol::Epsilon))
    }

    /// Characters that label at least one transition.
    pub fn alphabet(&self) -> BTreeSet<char> {
        self.transitions
            .iter()
            .flat_map(|row| row.keys())
            .filter_map(|symbol| match symbol {
                Symbol::Char(c) => Some(*c),
                Symbol::Epsilon => None,
            })
            .collect()
    }

    /// States reachable from `seeds` using only epsilon moves, seeds included.
    ///
    /// Worklist traversal; the visited set makes it terminate on epsilon cycles.
    pub fn epsilon_closure(&self, seeds: &StateSet) -> StateSet {
        let mut closure = seeds.clone();
        let mut stack: Vec<StateId> = seeds.iter().collect();
        while let Some(state) = stack.pop() {
            for &target in self.targets(state, Symbol::Epsilon) {
                if closure.insert(target) {
                    stack.push(target);
                }
            }
        }
        closure
    }

    /// States reachable from `current` by consuming exactly `symbol` (no closure).
    pub fn step(&self, current: &StateSet, symbol: char) -> StateSet {
        let mut next = StateSet::new(self.num_states());
        for state in current {
            next.extend(self.targets(state, Symbol::Char(symbol)).iter().copied());
        }
        next
    }

    /// The epsilon-closure of `{start}`.
    pub fn initial(&self) -> StateSet {
        self.epsilon_closure(&StateSet::singleton(self.num_states(), self.start))
    }

    /// Whether `set` contains an accepting state.
    pub fn accepts_any(&self, set: &StateSet) -> bool {
        set.intersects(&self.accepting)
    }

    /// Decides membership of `input`, one code point at a time.
    pub fn simulate(&self, input: &str) -> bool {
        debug!("simulate(input = {:?})", input);
        let mut current = self.initial();
        for c in input.chars() {
            if current.is_empty() {
                // Dead: every further step stays empty.
                break;
            }
            current = self.epsilon_closure(&self.step(&current, c));
        }
        self.accepts_any(&current)
    }

    /// Active state sets before the first symbol and after each consumed symbol.
    ///
    /// The result has `|input| + 1` entries (in code points).
    pub fn trace(&self, input: &str) -> Vec<StateSet> {
        let mut current = self.initial();
        let mut trace = vec![current.clone()];
        for c in input.chars() {
            current = self.epsilon_closure(&self.step(&current, c));
            trace.push(current.clone());
        }
        trace
    }
}

/// Decides whether `spec` accepts `input`. See [`AutomatonSpec::simulate`].
pub fn simulate(spec: &AutomatonSpec, input: &str) -> bool {
    spec.simulate(input)
}
