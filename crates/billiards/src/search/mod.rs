//! Parallel cycle search over point sets.
//!
//! Purpose
//! - Run one unit of work per point on a bounded worker pool and keep the
//!   shortest known periodic cycle per point in a shared registry.
//! - Two modes: `propagate` (reuse cycles from a nearby source set) and
//!   `explore` (ask a search oracle directly).
//!
//! Layout
//! - `types`: options, registry alias, progress counters, cancellation.
//! - `ledger`: the mutex-guarded registry and counters; the only place results
//!   are decided and written.
//! - `orchestrator`: worker pool and in-order dispatch.
//! - `propagate`, `explore`: the two modes as `Orchestrator` methods.
//! - `oracle`: feasibility and search oracle traits plus stand-ins.
//!
//! Guarantees
//! - A registry entry only ever changes to a strictly better cycle
//!   (`path_less_than`).
//! - Counters always equal the number of commits of each kind.
//! - After cancellation no new task starts; tasks already running finish or
//!   bail out at their next poll.

mod explore;
mod ledger;
pub mod oracle;
mod orchestrator;
mod propagate;
mod types;

pub use oracle::{
    ClosureCfg, ClosureOracle, FeasibilityOracle, RandomWalkCfg, RandomWalkSearch, SearchOracle,
};
pub use orchestrator::Orchestrator;
pub use propagate::propagation_candidates;
pub use types::{
    CancelToken, CommitEvent, CommitKind, ExploreCfg, NoProgress, Progress, ProgressSink,
    PropagateCfg, Registry, RunReport, SearchError, SearchOptions, SearchOutcome,
};
