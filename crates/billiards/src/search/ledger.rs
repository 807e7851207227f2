//! The single commit boundary: registry plus counters behind one mutex.
//!
//! Every read-decide-write on the registry happens inside `Ledger::with`, so
//! two workers can never both observe "no entry yet" and overwrite each other.

use std::sync::{Mutex, PoisonError};

use super::types::{
    CancelToken, CommitEvent, CommitKind, Progress, ProgressSink, Registry, RunReport,
    SearchOptions,
};
use crate::turn_path::{path_less_than, TurnPath};

struct LedgerState {
    registry: Registry,
    progress: Progress,
}

pub(crate) struct Ledger<'s> {
    state: Mutex<LedgerState>,
    sink: &'s dyn ProgressSink,
}

impl<'s> Ledger<'s> {
    pub(crate) fn new(registry: Registry, sink: &'s dyn ProgressSink) -> Self {
        Self {
            state: Mutex::new(LedgerState {
                registry,
                progress: Progress::default(),
            }),
            sink,
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut LedgerState) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Current best for `index`, and marks the point in flight.
    pub(crate) fn begin(&self, index: usize, cancel: &CancelToken) -> Option<TurnPath> {
        self.with(|st| {
            if !cancel.is_cancelled() {
                st.progress.active.insert(index);
                self.sink.on_start(index, &st.progress);
            }
            st.registry.get(&index).cloned()
        })
    }

    /// Start of an exploration: `None` when the point is skipped, otherwise the
    /// options tightened to beat the known cycle.
    pub(crate) fn begin_explore(
        &self,
        index: usize,
        options: &SearchOptions,
        cancel: &CancelToken,
    ) -> Option<SearchOptions> {
        self.with(|st| {
            let mut opts = *options;
            if let Some(known) = st.registry.get(&index) {
                if opts.skip_known_points {
                    st.progress.skipped += 1;
                    let event = CommitEvent {
                        index,
                        kind: CommitKind::Skipped,
                    };
                    self.sink.on_commit(&event, &st.progress);
                    return None;
                }
                opts.max_path_length = opts.max_path_length.min(known.len().saturating_sub(1));
            }
            if !cancel.is_cancelled() {
                st.progress.active.insert(index);
                self.sink.on_start(index, &st.progress);
            }
            Some(opts)
        })
    }

    /// Decides and records the result for `index` atomically.
    ///
    /// A proposal is stored when no entry exists or it is strictly better than
    /// the entry. Results already computed are committed even after
    /// cancellation; cancellation only relabels an empty result.
    pub(crate) fn commit(
        &self,
        index: usize,
        proposal: Option<TurnPath>,
        cancel: &CancelToken,
    ) -> CommitEvent {
        self.with(|st| {
            st.progress.active.remove(&index);
            let existing = st.registry.get(&index);
            let kind = match (proposal, existing) {
                (Some(new), None) => CommitKind::Found(new),
                (Some(new), Some(old)) if path_less_than(&new, old) => CommitKind::Updated {
                    old: old.clone(),
                    new,
                },
                (Some(_), Some(_)) => CommitKind::Unchanged,
                (None, _) if cancel.is_cancelled() => CommitKind::Cancelled,
                (None, Some(_)) => CommitKind::Unchanged,
                (None, None) => CommitKind::Failed,
            };
            match &kind {
                CommitKind::Found(new) => {
                    st.registry.insert(index, new.clone());
                    st.progress.found += 1;
                }
                CommitKind::Updated { new, .. } => {
                    st.registry.insert(index, new.clone());
                    st.progress.updated += 1;
                }
                CommitKind::Unchanged => st.progress.unchanged += 1,
                CommitKind::Failed => st.progress.failed += 1,
                CommitKind::Cancelled => st.progress.cancelled += 1,
                CommitKind::Skipped => st.progress.skipped += 1,
            }
            let event = CommitEvent { index, kind };
            tracing::debug!(index, kind = ?event.kind, "commit");
            self.sink.on_commit(&event, &st.progress);
            event
        })
    }

    pub(crate) fn into_report(self) -> RunReport {
        let st = self
            .state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        RunReport {
            registry: st.registry,
            progress: st.progress,
        }
    }
}
