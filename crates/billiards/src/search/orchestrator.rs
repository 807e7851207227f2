//! Worker pool and dispatch shared by both search modes.

use rayon::{ThreadPool, ThreadPoolBuilder};

use super::ledger::Ledger;
use super::types::{CancelToken, NoProgress, ProgressSink, Registry, RunReport, SearchError};

/// Drives per-point tasks over a rayon pool and funnels every result through
/// one commit boundary.
///
/// Tasks are dispatched eagerly, in index order, one per point. Cancellation is
/// polled before each dispatch and again by the tasks themselves.
pub struct Orchestrator<'a> {
    parallelism: usize,
    cancel: CancelToken,
    sink: &'a dyn ProgressSink,
}

impl Orchestrator<'static> {
    pub fn new(cancel: CancelToken) -> Self {
        Self {
            parallelism: 0,
            cancel,
            sink: &NoProgress,
        }
    }
}

impl<'a> Orchestrator<'a> {
    /// Worker threads; 0 picks rayon's default (one per CPU).
    pub fn with_parallelism(mut self, threads: usize) -> Self {
        self.parallelism = threads;
        self
    }

    pub fn with_progress<'b>(self, sink: &'b dyn ProgressSink) -> Orchestrator<'b> {
        Orchestrator {
            parallelism: self.parallelism,
            cancel: self.cancel,
            sink,
        }
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    fn pool(&self) -> Result<ThreadPool, SearchError> {
        Ok(ThreadPoolBuilder::new()
            .num_threads(self.parallelism)
            .thread_name(|i| format!("cycle-search-{i}"))
            .build()?)
    }

    /// Runs `task(index, ledger)` for every index and returns the final state.
    pub(crate) fn dispatch<I, T>(
        &self,
        registry: Registry,
        indices: I,
        task: T,
    ) -> Result<RunReport, SearchError>
    where
        I: IntoIterator<Item = usize> + Send,
        T: Fn(usize, &Ledger<'_>) + Sync,
    {
        let pool = self.pool()?;
        let ledger = Ledger::new(registry, self.sink);
        let cancel = &self.cancel;
        let (ledger_ref, task_ref) = (&ledger, &task);
        let mut dispatched = 0usize;
        pool.scope_fifo(|s| {
            for index in indices {
                if cancel.is_cancelled() {
                    tracing::info!(dispatched, "cancelled; no further dispatch");
                    break;
                }
                dispatched += 1;
                s.spawn_fifo(move |_| task_ref(index, ledger_ref));
            }
        });
        let report = ledger.into_report();
        tracing::info!(
            dispatched,
            found = report.progress.found,
            updated = report.progress.updated,
            unchanged = report.progress.unchanged,
            failed = report.progress.failed,
            cancelled = report.progress.cancelled,
            skipped = report.progress.skipped,
            "run finished"
        );
        Ok(report)
    }
}
