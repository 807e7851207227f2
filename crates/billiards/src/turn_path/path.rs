//! Reduced words in the free product Z * Z.
//!
//! `TurnPath` stores the normal form directly: no zero-degree turn and no two
//! adjacent turns around the same singularity. Every constructor funnels through
//! [`TurnPath::push`], the only reduction step.

use serde::{Deserialize, Serialize};
use std::ops::{Mul, MulAssign, Range};

use super::types::{BaseValues, Singularity, Turn};

/// Rejection reasons for turn sequences that are not already in normal form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TurnPathError {
    #[error("turn {index} has degree zero")]
    ZeroDegree { index: usize },
    #[error("turns {index} and {} share singularity {singularity}", .index + 1)]
    UnreducedPair {
        index: usize,
        singularity: Singularity,
    },
}

/// An element of the group of paths, as a reduced sequence of turns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Turn>", into = "Vec<Turn>")]
pub struct TurnPath {
    turns: Vec<Turn>,
}

impl TurnPath {
    /// The identity element.
    #[inline]
    pub const fn empty() -> Self {
        Self { turns: Vec::new() }
    }

    /// Positive generator around `s`.
    pub fn generator(s: Singularity) -> Self {
        Self::from_turn(Turn::new(1, s))
    }

    pub fn from_turn(turn: Turn) -> Self {
        let mut p = Self::empty();
        p.push(turn);
        p
    }

    /// Folds `turns` into a reduced path.
    pub fn new<I: IntoIterator<Item = Turn>>(turns: I) -> Self {
        let mut p = Self::empty();
        for t in turns {
            p.push(t);
        }
        p
    }

    /// Wraps turns that are known to be reduced (slices of a reduced path).
    #[inline]
    fn from_reduced(turns: Vec<Turn>) -> Self {
        debug_assert!(check_reduced(&turns).is_ok());
        Self { turns }
    }

    /// Appends one turn, merging with (or cancelling) the last turn when both
    /// rotate around the same singularity.
    ///
    /// # Panics
    /// If the merged degree does not fit in an `i64`.
    pub fn push(&mut self, turn: Turn) {
        if turn.degree == 0 {
            return;
        }
        if let Some(last) = self.turns.last_mut() {
            if last.singularity == turn.singularity {
                let Some(degree) = last.degree.checked_add(turn.degree) else {
                    panic!("turn degree overflow: {} + {}", last.degree, turn.degree);
                };
                if degree == 0 {
                    self.turns.pop();
                } else {
                    last.degree = degree;
                }
                return;
            }
        }
        self.turns.push(turn);
    }

    /// `self * turn` as a new value.
    pub fn appended(&self, turn: Turn) -> Self {
        let mut p = self.clone();
        p.push(turn);
        p
    }

    /// Group product `self * other`.
    pub fn multiply(&self, other: &TurnPath) -> Self {
        let mut p = self.clone();
        p *= other;
        p
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    #[inline]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[inline]
    pub fn first(&self) -> Option<Turn> {
        self.turns.first().copied()
    }

    #[inline]
    pub fn last(&self) -> Option<Turn> {
        self.turns.last().copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    /// Reverses the turn order and negates every degree.
    pub fn inverse(&self) -> Self {
        Self::from_reduced(self.turns.iter().rev().map(|t| t.inverse()).collect())
    }

    /// Negates every degree, keeping the order. Not the group inverse.
    pub fn transpose(&self) -> Self {
        Self::from_reduced(self.turns.iter().map(|t| t.inverse()).collect())
    }

    /// `self` raised to `n`.
    ///
    /// Squaring is sound here even though the group is not commutative:
    /// powers of one fixed element commute with each other, so
    /// `p^(2k) = p^k * p^k` and `p^(2k+1) = p^k * p^k * p`.
    ///
    /// # Panics
    /// If a resulting degree does not fit in an `i64`.
    pub fn pow(&self, n: i64) -> Self {
        if n < 0 {
            self.inverse().pow_unsigned(n.unsigned_abs())
        } else {
            self.pow_unsigned(n as u64)
        }
    }

    fn pow_unsigned(&self, n: u64) -> Self {
        if n == 0 || self.is_empty() {
            return Self::empty();
        }
        if n == 1 {
            return self.clone();
        }
        // Powers of a single generator never cancel, so scale the degree.
        if let [t] = self.turns.as_slice() {
            let Ok(degree) = i64::try_from(i128::from(t.degree) * i128::from(n)) else {
                panic!("turn degree overflow: {} * {n}", t.degree);
            };
            return Self::from_reduced(vec![Turn::new(degree, t.singularity)]);
        }
        let root = self.pow_unsigned(n / 2);
        let squared = root.multiply(&root);
        if n % 2 == 0 {
            squared
        } else {
            squared.multiply(self)
        }
    }

    /// `(p, q)` with `p.len() == index`, `q.len() == len - index` and `self == p * q`.
    ///
    /// Panics if `index > self.len()`.
    pub fn split(&self, index: usize) -> (Self, Self) {
        let (l, r) = self.turns.split_at(index);
        (Self::from_reduced(l.to_vec()), Self::from_reduced(r.to_vec()))
    }

    /// First `n` turns (clamped to the length).
    pub fn prefix(&self, n: usize) -> Self {
        let n = n.min(self.len());
        Self::from_reduced(self.turns[..n].to_vec())
    }

    /// Last `n` turns (clamped to the length).
    pub fn suffix(&self, n: usize) -> Self {
        let n = n.min(self.len());
        Self::from_reduced(self.turns[self.len() - n..].to_vec())
    }

    /// Contiguous sub-path; any slice of a reduced path is reduced.
    pub(crate) fn slice(&self, range: Range<usize>) -> Self {
        Self::from_reduced(self.turns[range].to_vec())
    }

    /// Moves the first `offset` turns to the end and re-reduces at the seam.
    pub fn rotated_left_by(&self, offset: usize) -> Self {
        if offset == 0 || offset >= self.len() {
            return self.clone();
        }
        self.suffix(self.len() - offset).multiply(&self.prefix(offset))
    }

    /// `g` with `g⁻¹ · self · g == self.rotated_left_by(offset)`.
    pub fn conjugate_for_left_rotation(&self, offset: usize) -> Self {
        self.prefix(offset)
    }

    /// Signed degree sum per singularity; a homomorphism onto Z².
    pub fn degree(&self) -> BaseValues<i64> {
        let mut d = BaseValues::new(0, 0);
        for t in &self.turns {
            d[t.singularity] += t.degree;
        }
        d
    }

    /// Absolute degree sum per singularity.
    pub fn weight(&self) -> BaseValues<i64> {
        let mut w = BaseValues::new(0, 0);
        for t in &self.turns {
            w[t.singularity] += t.degree.abs();
        }
        w
    }

    pub fn total_weight(&self) -> i64 {
        let w = self.weight();
        w.b0 + w.b1
    }
}

/// Checks the two normal-form invariants on a raw turn sequence.
pub fn check_reduced(turns: &[Turn]) -> Result<(), TurnPathError> {
    for (index, t) in turns.iter().enumerate() {
        if t.degree == 0 {
            return Err(TurnPathError::ZeroDegree { index });
        }
    }
    for (index, pair) in turns.windows(2).enumerate() {
        if pair[0].singularity == pair[1].singularity {
            return Err(TurnPathError::UnreducedPair {
                index,
                singularity: pair[0].singularity,
            });
        }
    }
    Ok(())
}

impl TryFrom<Vec<Turn>> for TurnPath {
    type Error = TurnPathError;

    fn try_from(turns: Vec<Turn>) -> Result<Self, Self::Error> {
        check_reduced(&turns)?;
        Ok(Self { turns })
    }
}

impl From<TurnPath> for Vec<Turn> {
    fn from(p: TurnPath) -> Self {
        p.turns
    }
}

impl From<Turn> for TurnPath {
    fn from(t: Turn) -> Self {
        Self::from_turn(t)
    }
}

impl FromIterator<Turn> for TurnPath {
    fn from_iter<I: IntoIterator<Item = Turn>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a TurnPath {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

impl MulAssign<Turn> for TurnPath {
    fn mul_assign(&mut self, t: Turn) {
        self.push(t);
    }
}

impl MulAssign<&TurnPath> for TurnPath {
    fn mul_assign(&mut self, other: &TurnPath) {
        for &t in &other.turns {
            self.push(t);
        }
    }
}

impl Mul<Turn> for &TurnPath {
    type Output = TurnPath;

    fn mul(self, t: Turn) -> TurnPath {
        self.appended(t)
    }
}

impl Mul<&TurnPath> for &TurnPath {
    type Output = TurnPath;

    fn mul(self, other: &TurnPath) -> TurnPath {
        self.multiply(other)
    }
}

impl Mul<TurnPath> for TurnPath {
    type Output = TurnPath;

    fn mul(mut self, other: TurnPath) -> TurnPath {
        self *= &other;
        self
    }
}
