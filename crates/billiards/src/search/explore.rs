//! Exploration: run the search oracle on each point of one set.

use crate::apex::Apex;

use super::oracle::SearchOracle;
use super::orchestrator::Orchestrator;
use super::types::{ExploreCfg, Registry, RunReport, SearchError};

impl Orchestrator<'_> {
    /// Searches every point (or only `cfg.target`) and keeps the best cycle per
    /// point. Known points either get skipped or are searched with the length
    /// limit tightened to beat their current entry.
    pub fn explore<S>(
        &self,
        cfg: ExploreCfg,
        points: &[Apex],
        cycles: Registry,
        oracle: &S,
    ) -> Result<RunReport, SearchError>
    where
        S: SearchOracle + ?Sized,
    {
        cfg.options.validate()?;
        let indices = match cfg.target {
            Some(index) if index >= points.len() => {
                return Err(SearchError::IndexOutOfRange {
                    index,
                    len: points.len(),
                })
            }
            Some(index) => index..index + 1,
            None => 0..points.len(),
        };
        tracing::info!(
            points = indices.len(),
            known = cycles.len(),
            attempts = cfg.options.attempt_count,
            max_path_length = cfg.options.max_path_length,
            "exploring"
        );
        let cancel = self.cancel_token();
        self.dispatch(cycles, indices, |index, ledger| {
            let Some(options) = ledger.begin_explore(index, &cfg.options, cancel) else {
                return;
            };
            if cancel.is_cancelled() {
                ledger.commit(index, None, cancel);
                return;
            }
            let outcome = oracle.search(&points[index], &options, cancel);
            tracing::trace!(index, attempts = outcome.attempts, "oracle returned");
            ledger.commit(index, outcome.shortest_cycle, cancel);
        })
    }
}
