//! Random apex sets on a dyadic grid.
//!
//! Samples are uniform in the open upper half-disk of radius 1/2 centred at
//! `(1/2, 0)` (the apexes of obtuse triangles over the unit base), snapped to
//! multiples of `2^-density`. Determinism uses a `(seed, index)` token mixed
//! into a single RNG, so sets are reproducible and individually replayable.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::Apex;

/// Coarser grids have no point strictly inside the half-disk.
pub const MIN_GRID_DENSITY: u32 = 2;

/// Grid densities beyond the f64 mantissa would not change the samples.
pub const MAX_GRID_DENSITY: u32 = 52;

/// Replay token: the same `(seed, index)` always yields the same apex.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    pub fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draws one apex for `tok` on the grid of spacing `2^-density`, with the
/// density clamped to `MIN_GRID_DENSITY..=MAX_GRID_DENSITY`.
pub fn draw_apex(grid_density: u32, tok: ReplayToken) -> Apex {
    let density = grid_density.clamp(MIN_GRID_DENSITY, MAX_GRID_DENSITY);
    let scale = (1u64 << density) as f64;
    let mut rng = tok.to_std_rng();
    loop {
        let x = (rng.gen::<f64>() * scale).round() / scale;
        let y = (rng.gen::<f64>() * 0.5 * scale).round() / scale;
        let dx = x - 0.5;
        if y > 0.0 && dx * dx + y * y < 0.25 {
            return Apex::new(x, y);
        }
    }
}

/// `count` apexes drawn with tokens `(seed, 0..count)`.
pub fn random_apexes(grid_density: u32, count: usize, seed: u64) -> Vec<Apex> {
    (0..count as u64)
        .map(|index| draw_apex(grid_density, ReplayToken { seed, index }))
        .collect()
}
