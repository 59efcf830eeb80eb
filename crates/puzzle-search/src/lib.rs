//! Implicit-graph search toolkit and the puzzles built on it.
//!
//! Two engines explore graphs whose states and edges are produced on demand
//! by caller-supplied functions:
//! - [`bfs`]: breadth-first traversal with goal test and discovery hook
//! - [`bounded`]: depth-first branch-and-bound with caller-side pruning
//!
//! Both deduplicate states through a caller-defined canonical key.

pub mod bfs;
pub mod bounded;
pub mod frontier;
pub mod puzzles;
pub mod runner;
pub mod stats;
pub mod visited;

// Re-export main types
pub use bfs::{Bfs, Traversal};
pub use bounded::{Bounded, BoundedSearch};
pub use frontier::{Frontier, Queue, Stack};
pub use puzzles::{Puzzle, PuzzleKind};
pub use runner::{run, Part, RunConfig, RunReport};
pub use stats::SearchStats;
pub use visited::VisitedSet;
