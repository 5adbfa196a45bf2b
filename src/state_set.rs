//! Compact set of automaton states.
//!
//! The simulator keeps the NFA's simultaneously active states in a
//! [`StateSet`]. States are dense indices, so a bit set backed by `u64` words
//! gives cheap membership, insertion, and ordered iteration.

use std::fmt;

use crate::types::StateId;

/// A set of [`StateId`]s backed by a vector of u64 words.
///
/// Each bit corresponds to a state index. The set grows as needed when
/// inserting states beyond the current capacity.
#[derive(Clone, Default)]
pub struct StateSet {
    /// Storage: each u64 holds 64 states
    words: Vec<u64>,
    /// Number of set bits (cached for O(1) len())
    count: usize,
}

impl StateSet {
    /// Number of bits per word.
    const BITS_PER_WORD: usize = 64;

    /// Creates a new empty set able to hold `capacity` states without growing.
    pub fn new(capacity: usize) -> Self {
        let num_words = capacity.div_ceil(Self::BITS_PER_WORD);
        Self {
            words: vec![0; num_words],
            count: 0,
        }
    }

    /// Creates a set containing exactly one state.
    pub fn singleton(capacity: usize, state: StateId) -> Self {
        let mut set = Self::new(capacity);
        set.insert(state);
        set
    }

    /// Returns the number of states in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    fn word_and_bit(index: usize) -> (usize, usize) {
        (index / Self::BITS_PER_WORD, index % Self::BITS_PER_WORD)
    }

    /// Returns true if `state` is in the set.
    #[inline]
    pub fn contains(&self, state: StateId) -> bool {
        let (word_idx, bit_idx) = Self::word_and_bit(state.index());
        match self.words.get(word_idx) {
            Some(word) => word & (1u64 << bit_idx) != 0,
            None => false,
        }
    }

    /// Adds `state` to the set. Returns true if it was not already present.
    #[inline]
    pub fn insert(&mut self, state: StateId) -> bool {
        let (word_idx, bit_idx) = Self::word_and_bit(state.index());

        if word_idx >= self.words.len() {
            self.words.resize(word_idx + 1, 0);
        }

        let mask = 1u64 << bit_idx;
        let was_clear = self.words[word_idx] & mask == 0;
        if was_clear {
            self.words[word_idx] |= mask;
            self.count += 1;
        }
        was_clear
    }

    /// Returns true if the two sets share at least one state.
    pub fn intersects(&self, other: &StateSet) -> bool {
        self.words.iter().zip(other.words.iter()).any(|(a, b)| a & b != 0)
    }

    /// Returns true if every state of `self` is also in `other`.
    pub fn is_subset(&self, other: &StateSet) -> bool {
        self.words.iter().enumerate().all(|(i, &word)| {
            let theirs = other.words.get(i).copied().unwrap_or(0);
            word & !theirs == 0
        })
    }

    /// Returns an iterator over the states in increasing index order.
    pub fn iter(&self) -> StateSetIter<'_> {
        StateSetIter {
            set: self,
            word_idx: 0,
            current_word: self.words.first().copied().unwrap_or(0),
        }
    }
}

impl PartialEq for StateSet {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.is_subset(other)
    }
}

impl Eq for StateSet {}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Extend<StateId> for StateSet {
    fn extend<I: IntoIterator<Item = StateId>>(&mut self, iter: I) {
        for state in iter {
            self.insert(state);
        }
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateId>>(iter: I) -> Self {
        let mut set = StateSet::default();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a StateSet {
    type Item = StateId;
    type IntoIter = StateSetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the states of a [`StateSet`].
pub struct StateSetIter<'a> {
    set: &'a StateSet,
    word_idx: usize,
    current_word: u64,
}

impl Iterator for StateSetIter<'_> {
    type Item = StateId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let bit_idx = self.current_word.trailing_zeros() as usize;
                self.current_word &= self.current_word - 1; // Clear lowest set bit
                return Some(StateId::new(self.word_idx * StateSet::BITS_PER_WORD + bit_idx));
            }

            self.word_idx += 1;
            if self.word_idx >= self.set.words.len() {
                return None;
            }
            self.current_word = self.set.words[self.word_idx];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[usize]) -> Vec<StateId> {
        raw.iter().copied().map(StateId::new).collect()
    }

    #[test]
    fn test_empty() {
        let set = StateSet::new(10);
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(!set.contains(StateId::new(0)));
        assert!(!set.contains(StateId::new(100)));
    }

    #[test]
    fn test_insert_contains() {
        let mut set = StateSet::new(100);
        assert!(set.insert(StateId::new(42)));
        assert!(set.contains(StateId::new(42)));
        assert!(!set.insert(StateId::new(42))); // Already present
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_auto_grow() {
        let mut set = StateSet::default();
        set.insert(StateId::new(1000));
        assert!(set.contains(StateId::new(1000)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_iter_order() {
        let set: StateSet = ids(&[65, 5, 64, 3, 10]).into_iter().collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), ids(&[3, 5, 10, 64, 65]));
    }

    #[test]
    fn test_equality_ignores_capacity() {
        let mut a = StateSet::new(4);
        let mut b = StateSet::new(200);
        a.insert(StateId::new(2));
        b.insert(StateId::new(2));
        assert_eq!(a, b);
        b.insert(StateId::new(150));
        assert_ne!(a, b);
    }

    #[test]
    fn test_intersects_and_subset() {
        let a: StateSet = ids(&[1, 2]).into_iter().collect();
        let b: StateSet = ids(&[2, 3]).into_iter().collect();
        let c: StateSet = ids(&[7]).into_iter().collect();
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(StateSet::singleton(4, StateId::new(2)).is_subset(&a));
        assert!(!a.is_subset(&b));
    }
}
