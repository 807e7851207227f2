//! Sample points ("apexes") and the coordinates derived from them.
//!
//! An apex `(x, y)` with `y > 0` is the third vertex of the triangle over the
//! base `B0 = (0, 0)`, `B1 = (1, 0)`. Rotation around `Bi` by one turn advances
//! the heading by twice the base angle at `Bi`.
//!
//! Coordinates are `f64`; serde_json writes them in shortest round-trip form,
//! so stored point sets reload bit-identically.

pub mod rand;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::turn_path::{BaseValues, Singularity, TurnPath};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Apex {
    pub x: f64,
    pub y: f64,
}

impl Apex {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn as_vec(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Finite and strictly above the base line.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.y > 0.0
    }

    /// Interior angles of the triangle at B0 and B1.
    pub fn interior_angles(&self) -> BaseValues<f64> {
        BaseValues::new(self.y.atan2(self.x), self.y.atan2(1.0 - self.x))
    }

    /// Heading advance per unit turn around each singularity.
    pub fn base_angles(&self) -> BaseValues<f64> {
        self.interior_angles().map(|a| 2.0 * a)
    }

    /// Interior angles divided by π/2.
    pub fn angles_over_half_pi(&self) -> BaseValues<f64> {
        self.interior_angles().map(|a| a * 2.0 / PI)
    }

    /// `π / (2θ)` per base angle θ: the "inverse angle" coordinates.
    pub fn polar(&self) -> BaseValues<f64> {
        self.interior_angles().map(|a| PI / (2.0 * a))
    }

    /// Cotangents of the base angles: `(x / y, (1 - x) / y)`.
    pub fn biradial(&self) -> BaseValues<f64> {
        BaseValues::new(self.x / self.y, (1.0 - self.x) / self.y)
    }
}

/// Squared distance in polar coordinates; the default ranking for propagation.
pub fn polar_distance(from: &Apex, to: &Apex) -> f64 {
    let (a, b) = (from.polar(), to.polar());
    let d0 = b.b0 - a.b0;
    let d1 = b.b1 - a.b1;
    d0 * d0 + d1 * d1
}

/// Squared distance in biradial (cotangent) coordinates.
pub fn biradial_distance(from: &Apex, to: &Apex) -> f64 {
    let (a, b) = (from.biradial(), to.biradial());
    let d0 = b.b0 - a.b0;
    let d1 = b.b1 - a.b1;
    d0 * d0 + d1 * d1
}

/// Coordinate system used to measure probe distances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Metric {
    #[default]
    Euclidean,
    Polar,
}

impl Metric {
    pub fn coords(self, apex: &Apex) -> Vector2<f64> {
        match self {
            Metric::Euclidean => apex.as_vec(),
            Metric::Polar => {
                let p = apex.polar();
                Vector2::new(p.b0, p.b1)
            }
        }
    }

    /// Euclidean distance between `target` and the apex mapped into this system.
    pub fn distance(self, apex: &Apex, target: Vector2<f64>) -> f64 {
        (self.coords(apex) - target).norm()
    }
}

/// Per-apex data handed to feasibility checks.
#[derive(Clone, Copy, Debug)]
pub struct ApexContext {
    pub apex: Apex,
    pub base_angles: BaseValues<f64>,
}

impl ApexContext {
    pub fn new(apex: Apex) -> Self {
        Self {
            apex,
            base_angles: apex.base_angles(),
        }
    }

    /// Net heading change along `path`, in radians.
    pub fn total_rotation(&self, path: &TurnPath) -> f64 {
        path.iter()
            .map(|t| self.base_angles[t.singularity] * t.degree as f64)
            .sum()
    }

    /// Planar offset of the unfolded path: one unit step per turn in the
    /// current heading (+ around B1, − around B0), then rotate by the turn.
    pub fn offset(&self, path: &TurnPath) -> Vector2<f64> {
        let mut acc = Vector2::zeros();
        let mut heading = 0.0f64;
        for t in path {
            let step = Vector2::new(heading.cos(), heading.sin());
            match t.singularity {
                Singularity::B1 => acc += step,
                Singularity::B0 => acc -= step,
            }
            heading += self.base_angles[t.singularity] * t.degree as f64;
        }
        acc
    }
}

/// Continued-fraction convergents `p/q` of `x`, at most `max_terms` of them.
pub fn convergents_of_f64(x: f64, max_terms: usize) -> Vec<(i64, i64)> {
    let mut terms = Vec::with_capacity(max_terms);
    let mut rest = x;
    for _ in 0..max_terms {
        if !rest.is_finite() || rest.abs() > i64::MAX as f64 {
            break;
        }
        let a = rest.floor();
        terms.push(a as i64);
        let frac = rest - a;
        if frac.abs() < 1e-12 {
            break;
        }
        rest = 1.0 / frac;
    }
    convergents(&terms)
}

/// Exact convergents of `num / den` (Euclid). Empty when `den == 0`.
pub fn convergents_of_ratio(num: i64, den: i64) -> Vec<(i64, i64)> {
    if den == 0 {
        return Vec::new();
    }
    let (mut n, mut d) = if den < 0 { (-num, -den) } else { (num, den) };
    let mut terms = Vec::new();
    while d != 0 {
        let a = n.div_euclid(d);
        terms.push(a);
        let r = n.rem_euclid(d);
        n = d;
        d = r;
    }
    convergents(&terms)
}

fn convergents(terms: &[i64]) -> Vec<(i64, i64)> {
    let (mut h1, mut h2) = (1i64, 0i64);
    let (mut k1, mut k2) = (0i64, 1i64);
    let mut out = Vec::with_capacity(terms.len());
    for &a in terms {
        let (Some(h), Some(k)) = (
            a.checked_mul(h1).and_then(|v| v.checked_add(h2)),
            a.checked_mul(k1).and_then(|v| v.checked_add(k2)),
        ) else {
            break;
        };
        out.push((h, k));
        (h2, h1) = (h1, h);
        (k2, k1) = (k1, k);
    }
    out
}
