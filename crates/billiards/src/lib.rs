//! Periodic billiard cycles in obtuse triangles.
//!
//! A triangle over the unit base is identified by its apex. Trajectories near
//! the two base vertices are recorded as words in the free product Z*Z
//! ([`turn_path`]); the crate keeps the shortest known cycle word per apex of a
//! sampled point set and grows that knowledge in parallel ([`search`]).
//!
//! Modules
//! - `turn_path`: word algebra, orders, text and serde forms.
//! - `apex`: per-apex geometry, coordinates and metrics, random point sets.
//! - `point_set`, `store`: point sets and their on-disk registries.
//! - `search`: propagation and exploration over a worker pool.
//! - `summary`: registry statistics.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API.

pub mod apex;
pub mod point_set;
pub mod search;
pub mod store;
pub mod summary;
pub mod turn_path;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::apex::{Apex, ApexContext, Metric};
    pub use crate::point_set::{Metadata, PointSet};
    pub use crate::search::{
        CancelToken, ClosureOracle, ExploreCfg, Orchestrator, PropagateCfg, RandomWalkCfg,
        RandomWalkSearch, Registry, SearchOptions,
    };
    pub use crate::store::DataManager;
    pub use crate::turn_path::{path_less_than, path_order, Singularity, Turn, TurnPath};
}
