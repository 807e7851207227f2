//! Turn paths: the word algebra behind trajectory cycles.
//!
//! Purpose
//! - Represent trajectories combinatorially as reduced words in the free
//!   product of two infinite cyclic groups, one generator per singularity.
//! - Provide the group operations plus the rotations, slices and metrics the
//!   cycle search needs to compare and canonicalize candidate words.
//!
//! Layout
//! - `types.rs`: `Singularity`, `BaseValues`, `Turn`.
//! - `path.rs`: `TurnPath` normal form and group operations.
//! - `order.rs`: turn order, the "shorter is better" path order, monoidal
//!   components, symmetry and canonical rotation.
//! - `text.rs`: display and parsing.

mod order;
mod path;
mod text;
mod types;

pub use order::{compare_turn, path_less_than, path_order};
pub use path::{check_reduced, TurnPath, TurnPathError};
pub use text::ParseTurnPathError;
pub use types::{BaseValues, Singularity, Turn};

#[cfg(test)]
mod tests;
