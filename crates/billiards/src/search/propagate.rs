//! Cycle propagation: reuse cycles from nearby source points.
//!
//! For each target the `neighbors` closest source points are ranked by the
//! caller's distance. Their recorded cycles are kept when they would improve on
//! the target's current entry, ordered shortest first and deduplicated, and the
//! first one the feasibility oracle accepts at the target wins.

use std::collections::HashSet;

use crate::apex::{Apex, ApexContext};
use crate::turn_path::{path_less_than, TurnPath};

use super::oracle::FeasibilityOracle;
use super::orchestrator::Orchestrator;
use super::types::{CancelToken, PropagateCfg, Registry, RunReport, SearchError};

/// Candidate cycles for `target`, best first, duplicates removed.
pub fn propagation_candidates<'r, D>(
    cfg: &PropagateCfg,
    target: &Apex,
    sources: &[Apex],
    source_cycles: &'r Registry,
    current: Option<&TurnPath>,
    distance: D,
) -> Vec<&'r TurnPath>
where
    D: Fn(&Apex, &Apex) -> f64,
{
    let mut ranked: Vec<(f64, usize)> = sources
        .iter()
        .enumerate()
        .map(|(i, s)| (distance(s, target), i))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut candidates: Vec<&TurnPath> = ranked
        .iter()
        .take(cfg.neighbors)
        .filter_map(|&(_, i)| source_cycles.get(&i))
        .filter(|p| current.map_or(true, |known| path_less_than(p, known)))
        .collect();
    candidates.sort_by_key(|p| (p.len(), p.monoidal_component_count()));

    let mut seen = HashSet::new();
    candidates.retain(|p| seen.insert(*p));
    candidates
}

impl Orchestrator<'_> {
    /// Copies cycles from `sources` onto `targets`.
    ///
    /// Sources are only read, so the outcome does not depend on worker count or
    /// scheduling. `target_cycles` is the starting registry for the targets.
    pub fn propagate<D, F>(
        &self,
        cfg: PropagateCfg,
        sources: &[Apex],
        source_cycles: &Registry,
        targets: &[Apex],
        target_cycles: Registry,
        distance: D,
        oracle: &F,
    ) -> Result<RunReport, SearchError>
    where
        D: Fn(&Apex, &Apex) -> f64 + Sync,
        F: FeasibilityOracle + ?Sized,
    {
        if cfg.neighbors == 0 {
            return Err(SearchError::InvalidOptions("neighbors must be > 0".into()));
        }
        tracing::info!(
            sources = sources.len(),
            known_sources = source_cycles.len(),
            targets = targets.len(),
            neighbors = cfg.neighbors,
            "propagating cycles"
        );
        let cancel: &CancelToken = self.cancel_token();
        self.dispatch(target_cycles, 0..targets.len(), |index, ledger| {
            let current = ledger.begin(index, cancel);
            if cancel.is_cancelled() {
                ledger.commit(index, None, cancel);
                return;
            }
            let target = &targets[index];
            let ctx = ApexContext::new(*target);
            let candidates = propagation_candidates(
                &cfg,
                target,
                sources,
                source_cycles,
                current.as_ref(),
                &distance,
            );
            let mut accepted = None;
            for path in candidates {
                if cancel.is_cancelled() {
                    break;
                }
                if oracle.is_feasible(path, &ctx) {
                    accepted = Some(path.clone());
                    break;
                }
            }
            ledger.commit(index, accepted, cancel);
        })
    }
}
