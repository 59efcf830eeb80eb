//! Counters collected while a search runs.

/// Work done by a single search call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States popped from the frontier and expanded.
    pub expanded: usize,
    /// Distinct keys discovered, the start state included.
    pub discovered: usize,
    /// Neighbors dropped because their key was already visited.
    pub duplicates: usize,
    /// Largest frontier size reached.
    pub max_frontier: usize,
}
