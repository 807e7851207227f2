//! Generators of the path group: singularities, per-singularity pairs, turns.
//!
//! Kept small and explicit so `path` and `order` read without indirection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// One of the two singular points a turn rotates around.
///
/// B0 sits at the origin of the base edge, B1 at `(1, 0)`. Widdershins rotation
/// around B0 and clockwise rotation around B1 are the positive generators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Singularity {
    B0,
    B1,
}

impl Singularity {
    pub const ALL: [Singularity; 2] = [Singularity::B0, Singularity::B1];

    #[inline]
    pub fn other(self) -> Self {
        match self {
            Singularity::B0 => Singularity::B1,
            Singularity::B1 => Singularity::B0,
        }
    }
}

impl fmt::Display for Singularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Singularity::B0 => f.write_str("B0"),
            Singularity::B1 => f.write_str("B1"),
        }
    }
}

/// A pair of values indexed by [`Singularity`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseValues<T> {
    pub b0: T,
    pub b1: T,
}

impl<T> BaseValues<T> {
    #[inline]
    pub fn new(b0: T, b1: T) -> Self {
        Self { b0, b1 }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> BaseValues<U> {
        BaseValues {
            b0: f(self.b0),
            b1: f(self.b1),
        }
    }
}

impl<T> Index<Singularity> for BaseValues<T> {
    type Output = T;

    #[inline]
    fn index(&self, s: Singularity) -> &T {
        match s {
            Singularity::B0 => &self.b0,
            Singularity::B1 => &self.b1,
        }
    }
}

impl<T> IndexMut<Singularity> for BaseValues<T> {
    #[inline]
    fn index_mut(&mut self, s: Singularity) -> &mut T {
        match s {
            Singularity::B0 => &mut self.b0,
            Singularity::B1 => &mut self.b1,
        }
    }
}

/// The generator for `singularity` raised to `degree`.
///
/// A `Turn` value may carry degree 0 transiently (e.g. from user input); paths
/// never store one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Turn {
    pub degree: i64,
    pub singularity: Singularity,
}

impl Turn {
    #[inline]
    pub const fn new(degree: i64, singularity: Singularity) -> Self {
        Self {
            degree,
            singularity,
        }
    }

    #[inline]
    pub fn b0(degree: i64) -> Self {
        Self::new(degree, Singularity::B0)
    }

    #[inline]
    pub fn b1(degree: i64) -> Self {
        Self::new(degree, Singularity::B1)
    }

    /// `self` raised to `n`: scales the degree.
    ///
    /// # Panics
    /// If the scaled degree does not fit in an `i64`.
    #[inline]
    pub fn pow(self, n: i64) -> Self {
        match self.degree.checked_mul(n) {
            Some(degree) => Self::new(degree, self.singularity),
            None => panic!("turn degree overflow: {} * {n}", self.degree),
        }
    }

    #[inline]
    pub fn inverse(self) -> Self {
        self.pow(-1)
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.singularity, self.degree)
    }
}
