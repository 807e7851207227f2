//! Oracle interfaces consumed by the orchestrator, plus stand-in implementations.
//!
//! The true geometric feasibility test and the randomized trajectory search live
//! outside this crate. `ClosureOracle` and `RandomWalkSearch` are cheap
//! necessary-condition heuristics so the pipeline can run end to end.

use crate::apex::rand::ReplayToken;
use crate::apex::{Apex, ApexContext};
use crate::turn_path::{path_less_than, Singularity, Turn, TurnPath};
use rand::Rng;

use super::types::{CancelToken, SearchError, SearchOptions, SearchOutcome};

/// Decides whether a word is realizable as a cycle at an apex.
///
/// Stateless from the caller's view and safe to call from many workers.
pub trait FeasibilityOracle: Sync {
    fn is_feasible(&self, path: &TurnPath, ctx: &ApexContext) -> bool;
}

impl<F> FeasibilityOracle for F
where
    F: Fn(&TurnPath, &ApexContext) -> bool + Sync,
{
    fn is_feasible(&self, path: &TurnPath, ctx: &ApexContext) -> bool {
        self(path, ctx)
    }
}

/// Searches for a short cycle at one apex. Long-running implementations must
/// poll `cancel` themselves.
pub trait SearchOracle: Sync {
    fn search(&self, apex: &Apex, options: &SearchOptions, cancel: &CancelToken) -> SearchOutcome;
}

impl<F> SearchOracle for F
where
    F: Fn(&Apex, &SearchOptions, &CancelToken) -> SearchOutcome + Sync,
{
    fn search(&self, apex: &Apex, options: &SearchOptions, cancel: &CancelToken) -> SearchOutcome {
        self(apex, options, cancel)
    }
}

/// Tolerance for [`ClosureOracle`].
#[derive(Clone, Copy, Debug)]
pub struct ClosureCfg {
    pub eps: f64,
}

impl Default for ClosureCfg {
    fn default() -> Self {
        Self { eps: 1e-9 }
    }
}

/// Accepts non-empty words whose net rotation is zero in both generators and
/// whose unfolded offset vanishes.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClosureOracle {
    pub cfg: ClosureCfg,
}

impl FeasibilityOracle for ClosureOracle {
    fn is_feasible(&self, path: &TurnPath, ctx: &ApexContext) -> bool {
        if path.is_empty() {
            return false;
        }
        let d = path.degree();
        d.b0 == 0 && d.b1 == 0 && ctx.offset(path).norm() <= self.cfg.eps
    }
}

/// Random-walk sampler parameters.
#[derive(Clone, Copy, Debug)]
pub struct RandomWalkCfg {
    /// Largest absolute degree drawn for a single turn.
    pub max_degree: i64,
    pub seed: u64,
}

impl Default for RandomWalkCfg {
    fn default() -> Self {
        Self {
            max_degree: 3,
            seed: 0,
        }
    }
}

/// Draws alternating even-length words with zero net degree and keeps the best
/// one the feasibility oracle accepts.
#[derive(Clone, Debug)]
pub struct RandomWalkSearch<F> {
    cfg: RandomWalkCfg,
    feasibility: F,
}

impl<F: FeasibilityOracle> RandomWalkSearch<F> {
    pub fn new(cfg: RandomWalkCfg, feasibility: F) -> Result<Self, SearchError> {
        if cfg.max_degree < 1 {
            return Err(SearchError::InvalidOptions(
                "max_degree must be >= 1".into(),
            ));
        }
        Ok(Self { cfg, feasibility })
    }

    fn draw<R: Rng>(&self, rng: &mut R, len: usize) -> Option<TurnPath> {
        let mut s = if rng.gen() {
            Singularity::B1
        } else {
            Singularity::B0
        };
        let mut turns: Vec<Turn> = (0..len)
            .map(|_| {
                let d = rng.gen_range(1..=self.cfg.max_degree);
                let t = Turn::new(if rng.gen() { d } else { -d }, s);
                s = s.other();
                t
            })
            .collect();
        // Close the word: the last turn around each singularity cancels the rest.
        for sing in Singularity::ALL {
            let last = turns.iter().rposition(|t| t.singularity == sing)?;
            let others: i64 = turns
                .iter()
                .enumerate()
                .filter(|(i, t)| *i != last && t.singularity == sing)
                .map(|(_, t)| t.degree)
                .sum();
            if others == 0 {
                return None;
            }
            turns[last].degree = -others;
        }
        TurnPath::try_from(turns).ok()
    }
}

impl<F: FeasibilityOracle> SearchOracle for RandomWalkSearch<F> {
    fn search(&self, apex: &Apex, options: &SearchOptions, cancel: &CancelToken) -> SearchOutcome {
        let ctx = ApexContext::new(*apex);
        let mut rng = ReplayToken {
            seed: self.cfg.seed,
            index: apex.x.to_bits() ^ apex.y.to_bits().rotate_left(32),
        }
        .to_std_rng();
        let mut best: Option<TurnPath> = None;
        let mut attempts = 0;
        for _ in 0..options.attempt_count {
            if cancel.is_cancelled() {
                break;
            }
            let limit = best
                .as_ref()
                .map_or(options.max_path_length, |b| b.len().saturating_sub(1))
                .min(options.max_path_length);
            // Closing needs at least two turns per singularity.
            if limit < 4 {
                break;
            }
            attempts += 1;
            let len = 2 * rng.gen_range(2..=limit / 2);
            let Some(path) = self.draw(&mut rng, len) else {
                continue;
            };
            if !self.feasibility.is_feasible(&path, &ctx) {
                continue;
            }
            if best.as_ref().map_or(true, |b| path_less_than(&path, b)) {
                best = Some(path);
            }
            if options.stop_after_success {
                break;
            }
        }
        SearchOutcome {
            shortest_cycle: best,
            attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_oracle_rejects_unbalanced_and_empty_words() {
        let ctx = ApexContext::new(Apex::new(0.5, 0.5));
        let oracle = ClosureOracle::default();
        assert!(!oracle.is_feasible(&TurnPath::empty(), &ctx));
        let unbalanced: TurnPath = "B0:1 B1:1".parse().unwrap();
        assert!(!oracle.is_feasible(&unbalanced, &ctx));
    }

    #[test]
    fn closure_oracle_accepts_closed_word() {
        // Base angles are π/2 here, so B0:4 is a full turn and the two B1
        // steps retrace the two B0 steps.
        let ctx = ApexContext::new(Apex::new(0.5, 0.5));
        let word: TurnPath = "B0:4 B1:1 B0:-4 B1:-1".parse().unwrap();
        assert!(ctx.offset(&word).norm() < 1e-9);
        assert!(ClosureOracle::default().is_feasible(&word, &ctx));
        let open: TurnPath = "B0:1 B1:1 B0:-1 B1:-1".parse().unwrap();
        assert!(!ClosureOracle::default().is_feasible(&open, &ctx));
    }

    #[test]
    fn random_walk_draws_balanced_alternating_words() {
        let always = |_: &TurnPath, _: &ApexContext| true;
        let search = RandomWalkSearch::new(RandomWalkCfg::default(), always).unwrap();
        let opts = SearchOptions {
            attempt_count: 20,
            max_path_length: 8,
            stop_after_success: false,
            skip_known_points: false,
        };
        let out = search.search(&Apex::new(0.3, 0.2), &opts, &CancelToken::new());
        let cycle = out.shortest_cycle.expect("accepting oracle finds something");
        assert!(cycle.len() % 2 == 0 && cycle.len() >= 4 && cycle.len() <= 8);
        let d = cycle.degree();
        assert_eq!((d.b0, d.b1), (0, 0));
        assert!(out.attempts >= 1);
    }

    #[test]
    fn random_walk_is_reproducible_and_honors_cancel() {
        let always = |_: &TurnPath, _: &ApexContext| true;
        let search = RandomWalkSearch::new(RandomWalkCfg::default(), always).unwrap();
        let opts = SearchOptions::default();
        let apex = Apex::new(0.4, 0.1);
        let a = search.search(&apex, &opts, &CancelToken::new());
        let b = search.search(&apex, &opts, &CancelToken::new());
        assert_eq!(a, b);

        let cancel = CancelToken::new();
        cancel.cancel();
        let c = search.search(&apex, &opts, &cancel);
        assert_eq!(c.attempts, 0);
        assert!(c.shortest_cycle.is_none());
    }

    #[test]
    fn random_walk_rejects_bad_cfg() {
        let never = |_: &TurnPath, _: &ApexContext| false;
        let cfg = RandomWalkCfg {
            max_degree: 0,
            seed: 1,
        };
        assert!(RandomWalkSearch::new(cfg, never).is_err());
    }
}
