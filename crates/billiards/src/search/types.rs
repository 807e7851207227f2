//! Options, outcomes, cancellation and progress types for the cycle search.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::turn_path::TurnPath;

/// Best known cycle per point index.
pub type Registry = BTreeMap<usize, TurnPath>;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("invalid search options: {0}")]
    InvalidOptions(String),
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("point index {index} out of range for {len} points")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Knobs handed to the search oracle for one point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub attempt_count: usize,
    pub max_path_length: usize,
    pub stop_after_success: bool,
    pub skip_known_points: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            attempt_count: 1000,
            max_path_length: 50,
            stop_after_success: true,
            skip_known_points: false,
        }
    }
}

impl SearchOptions {
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.attempt_count == 0 {
            return Err(SearchError::InvalidOptions(
                "attempt_count must be > 0".into(),
            ));
        }
        if self.max_path_length == 0 {
            return Err(SearchError::InvalidOptions(
                "max_path_length must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// What the search oracle found for one point.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub shortest_cycle: Option<TurnPath>,
    pub attempts: usize,
}

/// Cooperative cancellation flag shared by every worker and oracle.
///
/// Cloning shares the flag. Setting it never interrupts a running oracle call;
/// callers poll `is_cancelled` at their own checkpoints.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Running counters, updated only inside the commit critical section.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    /// First cycle recorded for a point.
    pub found: usize,
    /// Existing cycle replaced by a strictly better one.
    pub updated: usize,
    /// A cycle was known and nothing better turned up.
    pub unchanged: usize,
    /// No cycle known and none found.
    pub failed: usize,
    /// Task ended by cancellation without a result.
    pub cancelled: usize,
    /// Not searched because a cycle was already known.
    pub skipped: usize,
    /// Points whose oracle work is in flight.
    pub active: BTreeSet<usize>,
}

impl Progress {
    pub fn completed(&self) -> usize {
        self.found + self.updated + self.unchanged + self.failed
    }

    pub fn changed(&self) -> bool {
        self.found + self.updated > 0
    }
}

/// Decision taken for one point at commit time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitKind {
    Found(TurnPath),
    Updated { old: TurnPath, new: TurnPath },
    Unchanged,
    Failed,
    Cancelled,
    Skipped,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitEvent {
    pub index: usize,
    pub kind: CommitKind,
}

/// Receives a consistent snapshot after every commit.
///
/// Called from inside the critical section: implementations must not block on
/// other workers.
pub trait ProgressSink: Sync {
    fn on_start(&self, _index: usize, _progress: &Progress) {}

    fn on_commit(&self, event: &CommitEvent, progress: &Progress);
}

/// Sink that ignores all progress.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_commit(&self, _event: &CommitEvent, _progress: &Progress) {}
}

impl<F> ProgressSink for F
where
    F: Fn(&CommitEvent, &Progress) + Sync,
{
    fn on_commit(&self, event: &CommitEvent, progress: &Progress) {
        self(event, progress)
    }
}

/// Final state of one run: the registry to persist plus the counters.
#[derive(Clone, Debug, Default)]
pub struct RunReport {
    pub registry: Registry,
    pub progress: Progress,
}

/// Propagation parameters.
#[derive(Clone, Copy, Debug)]
pub struct PropagateCfg {
    /// Nearest source points considered per target.
    pub neighbors: usize,
}

impl Default for PropagateCfg {
    fn default() -> Self {
        Self { neighbors: 1 }
    }
}

/// Exploration parameters.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExploreCfg {
    pub options: SearchOptions,
    /// Restrict the run to a single point.
    pub target: Option<usize>,
}
