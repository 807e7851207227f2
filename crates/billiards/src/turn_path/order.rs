//! Orders on turns and paths, and the monoidal decomposition used to rank cycles.

use std::cmp::Ordering;

use super::path::TurnPath;
use super::types::Turn;

/// Total order on turns: absolute degree, then B0 before B1, then positive
/// before negative.
///
/// The choice only needs to be consistent; it groups paths we tend to want
/// next to each other when canonicalizing cycles.
pub fn compare_turn(a: &Turn, b: &Turn) -> Ordering {
    a.degree
        .abs()
        .cmp(&b.degree.abs())
        .then_with(|| a.singularity.cmp(&b.singularity))
        .then_with(|| b.degree.signum().cmp(&a.degree.signum()))
}

/// "Smaller is better" partial order on paths: fewer turns, then fewer
/// monoidal components. Distinct paths that tie on both are incomparable.
pub fn path_order(a: &TurnPath, b: &TurnPath) -> Option<Ordering> {
    if a == b {
        return Some(Ordering::Equal);
    }
    match a.len().cmp(&b.len()) {
        Ordering::Equal => {}
        ord => return Some(ord),
    }
    match a
        .monoidal_component_count()
        .cmp(&b.monoidal_component_count())
    {
        Ordering::Equal => None,
        ord => Some(ord),
    }
}

/// `true` iff `a` is strictly better than `b` under [`path_order`].
#[inline]
pub fn path_less_than(a: &TurnPath, b: &TurnPath) -> bool {
    path_order(a, b) == Some(Ordering::Less)
}

/// Start indices of the monoidal components (first one is always 0), followed
/// by the path length as the closing boundary.
fn sign_boundaries(turns: &[Turn]) -> Vec<usize> {
    let mut boundaries = vec![0];
    for (i, pair) in turns.windows(2).enumerate() {
        if pair[0].degree.signum() == pair[1].degree.signum() {
            boundaries.push(i + 1);
        }
    }
    boundaries.push(turns.len());
    boundaries
}

impl TurnPath {
    /// Splits the path into maximal runs; a new run starts wherever a turn has
    /// the same sign as the turn before it. The empty path has no components.
    pub fn monoidal_components(&self) -> Vec<TurnPath> {
        if self.is_empty() {
            return Vec::new();
        }
        sign_boundaries(self.turns())
            .windows(2)
            .map(|w| self.slice(w[0]..w[1]))
            .collect()
    }

    pub fn monoidal_component_count(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        sign_boundaries(self.turns()).len() - 1
    }

    /// The transpose equals some left rotation of the path.
    pub fn is_symmetric(&self) -> bool {
        let t = self.transpose();
        (0..self.len().max(1)).any(|k| self.rotated_left_by(k) == t)
    }

    /// The least left rotation, comparing length first and then turn by turn
    /// with [`compare_turn`].
    pub fn canonical_rotation(&self) -> TurnPath {
        (1..self.len())
            .map(|k| self.rotated_left_by(k))
            .fold(self.clone(), |best, cand| {
                if compare_lex(&cand, &best) == Ordering::Less {
                    cand
                } else {
                    best
                }
            })
    }
}

fn compare_lex(a: &TurnPath, b: &TurnPath) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| compare_turn(x, y))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    })
}
