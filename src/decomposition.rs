//! Splitting a string into `x·y·z` under the pumping constraints.
//!
//! For a string `s` and pumping length `p`, the valid decompositions are all
//! `(i, j)` with `0 ≤ i < j ≤ min(p, |s|)`: `x = s[..i]`, `y = s[i..j]`,
//! `z = s[j..]`. That guarantees `|y| > 0` and `|xy| ≤ p`. Indices count code
//! points, so an emoji is one symbol.
//!
//! The order is part of the contract: increasing `i`, then increasing `j`.
//! Indexed selection and the contradiction search's tie-break both rely on it.
//!
//! ```
//! use pumping_rs::decomposition::enumerate;
//!
//! let splits = enumerate("abc", 2);
//! let ys: Vec<&str> = splits.iter().map(|d| d.y.as_str()).collect();
//! assert_eq!(ys, ["a", "ab", "b"]);
//! ```

use std::fmt;
use std::iter::FusedIterator;

/// One split `s = x·y·z`.
///
/// `i_start = |x|` and `i_end = |x| + |y|`, both in code points.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decomposition {
    pub x: String,
    pub y: String,
    pub z: String,
    pub i_start: usize,
    pub i_end: usize,
}

impl Decomposition {
    /// `x · y^i · z`.
    pub fn pump(&self, i: usize) -> String {
        pump(&self.x, &self.y, &self.z, i)
    }

    /// Length of `y` in code points.
    pub fn y_len(&self) -> usize {
        self.i_end - self.i_start
    }
}

impl fmt::Display for Decomposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |s: &str| if s.is_empty() { "ε".to_string() } else { s.to_string() };
        write!(f, "x = {}, y = {}, z = {}", show(&self.x), show(&self.y), show(&self.z))
    }
}

/// Upper bound on the up-front allocation in [`pump`]; larger results grow on demand.
const MAX_PREALLOC: usize = 1 << 20;

/// `x · y^i · z`.
pub fn pump(x: &str, y: &str, z: &str, i: usize) -> String {
    let capacity = pumped_len(x, y, z, i).unwrap_or(usize::MAX);
    let mut out = String::with_capacity(capacity.min(MAX_PREALLOC));
    out.push_str(x);
    if !y.is_empty() {
        for _ in 0..i {
            out.push_str(y);
        }
    }
    out.push_str(z);
    out
}

/// Byte length of `x · y^i · z`, or `None` if it does not fit in `usize`.
pub fn pumped_len(x: &str, y: &str, z: &str, i: usize) -> Option<usize> {
    y.len().checked_mul(i)?.checked_add(x.len())?.checked_add(z.len())
}

/// Number of decompositions of a string of `len` code points under bound `p`.
pub fn decomposition_count(len: usize, p: usize) -> usize {
    let m = len.min(p);
    m * (m + 1) / 2
}

/// Lazy, ordered iterator over the decompositions of a string.
#[derive(Debug, Clone)]
pub struct Decompositions {
    chars: Vec<char>,
    bound: usize,
    i: usize,
    j: usize,
}

impl Decompositions {
    pub fn new(s: &str, p: usize) -> Self {
        let chars: Vec<char> = s.chars().collect();
        let bound = chars.len().min(p);
        Decompositions { chars, bound, i: 0, j: 1 }
    }

    fn slice(&self, from: usize, to: usize) -> String {
        self.chars[from..to].iter().collect()
    }
}

impl Iterator for Decompositions {
    type Item = Decomposition;

    fn next(&mut self) -> Option<Self::Item> {
        if self.j > self.bound {
            // Row `i + 1` is empty once `i + 1 == bound`. Stay put once exhausted.
            if self.i + 1 >= self.bound {
                return None;
            }
            self.i += 1;
            self.j = self.i + 1;
        }
        let (i, j) = (self.i, self.j);
        self.j += 1;
        Some(Decomposition {
            x: self.slice(0, i),
            y: self.slice(i, j),
            z: self.slice(j, self.chars.len()),
            i_start: i,
            i_end: j,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let total = decomposition_count(self.bound, self.bound);
        // Pairs already produced: all rows before `i`, plus this row up to `j`.
        let before_row = self.i * self.bound - self.i * (self.i.saturating_sub(1)) / 2;
        let done = (before_row + self.j.saturating_sub(self.i + 1)).min(total);
        let left = total - done;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Decompositions {}

impl FusedIterator for Decompositions {}

/// All decompositions of `s` under bound `p`, in enumeration order.
pub fn enumerate(s: &str, p: usize) -> Vec<Decomposition> {
    Decompositions::new(s, p).collect()
}

/// Lazy counterpart of [`enumerate`].
pub fn decompositions(s: &str, p: usize) -> Decompositions {
    Decompositions::new(s, p)
}
