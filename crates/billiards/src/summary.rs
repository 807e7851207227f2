//! Aggregate statistics over a cycle registry.

use std::collections::HashSet;
use std::fmt;

use crate::search::Registry;
use crate::turn_path::TurnPath;

/// Number of histogram buckets for odd component counts (0, 2, 4, ... 18).
pub const ODD_BUCKETS: usize = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Stat {
    pub average: f64,
    pub maximum: usize,
}

impl Stat {
    fn of(values: impl Iterator<Item = usize>) -> Self {
        let (mut n, mut total, mut maximum) = (0usize, 0usize, 0usize);
        for v in values {
            n += 1;
            total += v;
            maximum = maximum.max(v);
        }
        Self {
            average: if n == 0 { 0.0 } else { total as f64 / n as f64 },
            maximum,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CycleSummary {
    pub point_count: usize,
    pub known: usize,
    pub distinct: usize,
    /// Distinct after identifying cyclic rotations of the same word.
    pub distinct_up_to_rotation: usize,
    /// Distinct cycles whose transpose is a rotation of themselves.
    pub symmetric: usize,
    pub length: Stat,
    pub weight: Stat,
    pub segments: Stat,
    /// Distinct cycles bucketed by (odd-length components) / 2.
    pub odd_segments: [usize; ODD_BUCKETS],
    pub odd_overflow: usize,
}

/// Summarizes `cycles` for a set of `point_count` points.
///
/// Per-point statistics (length, weight, segments) count every known point;
/// the remaining counts are over distinct cycles.
pub fn summarize(point_count: usize, cycles: &Registry) -> CycleSummary {
    let distinct: HashSet<&TurnPath> = cycles.values().collect();
    let rotations: HashSet<TurnPath> = distinct.iter().map(|p| p.canonical_rotation()).collect();

    let mut odd_segments = [0; ODD_BUCKETS];
    let mut odd_overflow = 0;
    for path in &distinct {
        let odd = path
            .monoidal_components()
            .iter()
            .filter(|c| c.len() % 2 != 0)
            .count();
        match odd_segments.get_mut(odd / 2) {
            Some(bucket) => *bucket += 1,
            None => odd_overflow += 1,
        }
    }

    CycleSummary {
        point_count,
        known: cycles.len(),
        distinct: distinct.len(),
        distinct_up_to_rotation: rotations.len(),
        symmetric: distinct.iter().filter(|p| p.is_symmetric()).count(),
        length: Stat::of(cycles.values().map(TurnPath::len)),
        weight: Stat::of(cycles.values().map(|p| p.total_weight() as usize)),
        segments: Stat::of(cycles.values().map(TurnPath::monoidal_component_count)),
        odd_segments,
        odd_overflow,
    }
}

impl fmt::Display for CycleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "known cycles: {} / {}", self.known, self.point_count)?;
        writeln!(
            f,
            "distinct cycles: {} ({} up to rotation)",
            self.distinct, self.distinct_up_to_rotation
        )?;
        writeln!(f, "symmetric cycles: {}", self.symmetric)?;
        for (label, s) in [
            ("length", self.length),
            ("weight", self.weight),
            ("segments", self.segments),
        ] {
            writeln!(f, "{label}: average {:.2}, maximum {}", s.average, s.maximum)?;
        }
        write!(f, "odd segment counts:")?;
        for (i, n) in self.odd_segments.iter().enumerate() {
            write!(f, " {}:{n}", 2 * i)?;
        }
        write!(f, " more:{}", self.odd_overflow)
    }
}
