//! Breadth-first traversal over an implicit graph.
//!
//! The graph is never materialized: `neighbors` produces the successors of a
//! state on demand and `key` canonicalizes states for deduplication. Each
//! distinct key is discovered once, and `on_visit` receives it together with
//! the parent that discovered it first. Because the frontier is a FIFO queue
//! that parent is always one with the fewest hops from `start`, so callers can
//! build distance maps as `distance[state] = distance[parent] + 1`.
//!
//! The search does not terminate if the reachable key space is infinite or
//! if `key` is not stable for a given state.

use std::convert::Infallible;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::frontier::{Frontier, Queue};
use crate::stats::SearchStats;
use crate::visited::{identity, never, VisitedSet};

/// Default discovery hook.
pub fn ignore<S>(_state: &S, _parent: &S) {}

/// Outcome of a breadth-first search.
#[derive(Debug, Clone)]
pub struct Traversal<S> {
    /// First popped state satisfying the goal predicate, if any.
    pub end: Option<S>,
    pub stats: SearchStats,
}

/// Breadth-first search builder.
///
/// Only `start` and `neighbors` are required; the key defaults to the state
/// itself, the goal predicate to "never" (exhaustive traversal) and the
/// discovery hook to a no-op.
pub struct Bfs<S, N, K = fn(&S) -> S, E = fn(&S) -> bool, V = fn(&S, &S)> {
    start: S,
    neighbors: N,
    key: K,
    is_end: E,
    on_visit: V,
}

impl<S: Clone, N> Bfs<S, N> {
    pub fn new(start: S, neighbors: N) -> Self {
        Self {
            start,
            neighbors,
            key: identity::<S>,
            is_end: never::<S>,
            on_visit: ignore::<S>,
        }
    }
}

impl<S, N, K, E, V> Bfs<S, N, K, E, V> {
    /// Canonicalize states before deduplication.
    pub fn key<K2, Q>(self, key: K2) -> Bfs<S, N, K2, E, V>
    where
        K2: FnMut(&S) -> Q,
        Q: Hash + Eq,
    {
        Bfs {
            start: self.start,
            neighbors: self.neighbors,
            key,
            is_end: self.is_end,
            on_visit: self.on_visit,
        }
    }

    /// Stop at the first popped state for which `is_end` holds.
    pub fn is_end<E2>(self, is_end: E2) -> Bfs<S, N, K, E2, V>
    where
        E2: FnMut(&S) -> bool,
    {
        Bfs {
            start: self.start,
            neighbors: self.neighbors,
            key: self.key,
            is_end,
            on_visit: self.on_visit,
        }
    }

    /// Called as `on_visit(discovered, parent)` once per newly discovered key.
    pub fn on_visit<V2>(self, on_visit: V2) -> Bfs<S, N, K, E, V2>
    where
        V2: FnMut(&S, &S),
    {
        Bfs {
            start: self.start,
            neighbors: self.neighbors,
            key: self.key,
            is_end: self.is_end,
            on_visit,
        }
    }

    /// Run to completion and return the goal state, if one was reached.
    pub fn search<I, Q>(self) -> Option<S>
    where
        N: FnMut(&S) -> I,
        I: IntoIterator<Item = S>,
        K: FnMut(&S) -> Q,
        Q: Hash + Eq,
        E: FnMut(&S) -> bool,
        V: FnMut(&S, &S),
    {
        self.run().end
    }

    /// Like [`Bfs::search`], also reporting how much work was done.
    pub fn run<I, Q>(self) -> Traversal<S>
    where
        N: FnMut(&S) -> I,
        I: IntoIterator<Item = S>,
        K: FnMut(&S) -> Q,
        Q: Hash + Eq,
        E: FnMut(&S) -> bool,
        V: FnMut(&S, &S),
    {
        let Bfs {
            start,
            mut neighbors,
            key,
            is_end,
            on_visit,
        } = self;
        match traverse(
            start,
            |state: &S| Ok::<I, Infallible>(neighbors(state)),
            key,
            is_end,
            on_visit,
        ) {
            Ok(traversal) => traversal,
            Err(never) => match never {},
        }
    }

    /// Search with a fallible `neighbors`; its first error is returned as is.
    pub fn try_search<I, Q, Err>(self) -> Result<Option<S>, Err>
    where
        N: FnMut(&S) -> Result<I, Err>,
        I: IntoIterator<Item = S>,
        K: FnMut(&S) -> Q,
        Q: Hash + Eq,
        E: FnMut(&S) -> bool,
        V: FnMut(&S, &S),
    {
        Ok(self.try_run()?.end)
    }

    pub fn try_run<I, Q, Err>(self) -> Result<Traversal<S>, Err>
    where
        N: FnMut(&S) -> Result<I, Err>,
        I: IntoIterator<Item = S>,
        K: FnMut(&S) -> Q,
        Q: Hash + Eq,
        E: FnMut(&S) -> bool,
        V: FnMut(&S, &S),
    {
        traverse(
            self.start,
            self.neighbors,
            self.key,
            self.is_end,
            self.on_visit,
        )
    }
}

/// Breadth-first search with every caller function spelled out.
pub fn search<S, I, Q>(
    start: S,
    neighbors: impl FnMut(&S) -> I,
    key: impl FnMut(&S) -> Q,
    is_end: impl FnMut(&S) -> bool,
    on_visit: impl FnMut(&S, &S),
) -> Option<S>
where
    I: IntoIterator<Item = S>,
    Q: Hash + Eq,
{
    Bfs {
        start,
        neighbors,
        key,
        is_end,
        on_visit,
    }
    .search()
}

fn traverse<S, I, Q, Err>(
    start: S,
    mut neighbors: impl FnMut(&S) -> Result<I, Err>,
    mut key: impl FnMut(&S) -> Q,
    mut is_end: impl FnMut(&S) -> bool,
    mut on_visit: impl FnMut(&S, &S),
) -> Result<Traversal<S>, Err>
where
    I: IntoIterator<Item = S>,
    Q: Hash + Eq,
{
    let mut visited = VisitedSet::new();
    let mut frontier = Queue::new();
    let mut stats = SearchStats::default();

    visited.insert(key(&start));
    stats.discovered = 1;
    frontier.push(start);

    let mut end = None;
    while let Some(state) = frontier.pop() {
        if is_end(&state) {
            end = Some(state);
            break;
        }

        stats.expanded += 1;
        trace!(queued = frontier.len(), "expanding state");

        for next in neighbors(&state)? {
            if !visited.insert(key(&next)) {
                stats.duplicates += 1;
                continue;
            }
            stats.discovered += 1;
            on_visit(&next, &state);
            frontier.push(next);
        }
    }

    stats.max_frontier = frontier.high_water();
    debug!(
        found = end.is_some(),
        expanded = stats.expanded,
        discovered = stats.discovered,
        duplicates = stats.duplicates,
        max_frontier = stats.max_frontier,
        "breadth-first search finished"
    );

    Ok(Traversal { end, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;

    type Pos = (i32, i32);

    fn grid_neighbors(size: i32, wall_x: Option<i32>) -> impl FnMut(&Pos) -> Vec<Pos> {
        move |&(x, y): &Pos| {
            [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)]
                .into_iter()
                .filter(|&(nx, ny)| nx >= 0 && ny >= 0 && nx < size && ny < size)
                .filter(|&(nx, _)| Some(nx) != wall_x)
                .collect()
        }
    }

    /// 0 -> {1, 2}, 1 -> 3, 2 -> 3
    fn diamond(state: &u32) -> Vec<u32> {
        match state {
            0 => vec![1, 2],
            1 | 2 => vec![3],
            _ => vec![],
        }
    }

    #[test]
    fn test_grid_shortest_path() {
        let mut distances = HashMap::from([((0, 0), 0)]);

        let end = Bfs::new((0, 0), grid_neighbors(5, None))
            .is_end(|pos: &Pos| *pos == (4, 4))
            .on_visit(|pos: &Pos, parent: &Pos| {
                let hops = distances[parent] + 1;
                distances.insert(*pos, hops);
            })
            .search();

        assert_eq!(end, Some((4, 4)));
        assert_eq!(distances[&(4, 4)], 8);
    }

    #[test]
    fn test_unreachable_goal_exhausts_component() {
        let mut reached = 1;

        let traversal = Bfs::new((0, 0), grid_neighbors(5, Some(2)))
            .is_end(|pos: &Pos| *pos == (4, 4))
            .on_visit(|_: &Pos, _: &Pos| reached += 1)
            .run();

        assert_eq!(traversal.end, None);
        // 25 cells minus the 5-cell wall, split into two halves of 10.
        assert_eq!(reached, 10);
        assert_eq!(traversal.stats.discovered, 10);
        assert_eq!(traversal.stats.expanded, 10);
    }

    #[test]
    fn test_converging_paths_visit_once() {
        let mut visits = Vec::new();

        Bfs::new(0u32, diamond)
            .on_visit(|state: &u32, parent: &u32| visits.push((*state, *parent)))
            .search();

        assert_eq!(visits, vec![(1, 0), (2, 0), (3, 1)]);
    }

    #[test]
    fn test_stats_count_duplicates_and_frontier() {
        let traversal = Bfs::new(0u32, diamond).run();

        assert_eq!(
            traversal.stats,
            SearchStats {
                expanded: 4,
                discovered: 4,
                duplicates: 1,
                max_frontier: 2,
            }
        );
    }

    #[test]
    fn test_first_parent_has_fewest_hops() {
        // The long branch 1 -> 2 -> 3 -> 4 is enumerated before the short one 5 -> 4.
        let neighbors = |state: &u32| match state {
            0 => vec![1, 5],
            1 => vec![2],
            2 => vec![3],
            3 | 5 => vec![4],
            _ => vec![],
        };
        let mut hops = HashMap::from([(0u32, 0u32)]);
        let mut parents = HashMap::new();

        Bfs::new(0u32, neighbors)
            .on_visit(|state: &u32, parent: &u32| {
                let distance = hops[parent] + 1;
                hops.insert(*state, distance);
                parents.insert(*state, *parent);
            })
            .search();

        assert_eq!(parents[&4], 5);
        assert_eq!(hops[&4], 2);
        assert_eq!(hops[&3], 3);
    }

    #[test]
    fn test_goal_at_start_skips_expansion() {
        let traversal = Bfs::new(7u32, |_: &u32| -> Vec<u32> {
            unreachable!("start is the goal")
        })
        .is_end(|state: &u32| *state == 7)
        .run();

        assert_eq!(traversal.end, Some(7));
        assert_eq!(traversal.stats.expanded, 0);
    }

    #[test]
    fn test_custom_key_collapses_states() {
        // States carry a label that the key ignores.
        let neighbors = |&(n, label): &(u32, char)| match n {
            0 => vec![(1, 'a'), (2, 'b')],
            1 => vec![(3, 'x')],
            2 => vec![(3, 'y')],
            _ => vec![],
        };
        let mut seen = Vec::new();

        Bfs::new((0u32, 's'), neighbors)
            .key(|&(n, _): &(u32, char)| n)
            .on_visit(|state: &(u32, char), _: &(u32, char)| seen.push(*state))
            .search();

        assert_eq!(seen, vec![(1, 'a'), (2, 'b'), (3, 'x')]);
    }

    #[test]
    fn test_unstable_key_breaks_deduplication() {
        let counter = Cell::new(0u32);
        let mut visits_of_three = 0;

        Bfs::new(0u32, diamond)
            .key(|_: &u32| {
                counter.set(counter.get() + 1);
                counter.get()
            })
            .on_visit(|state: &u32, _: &u32| {
                if *state == 3 {
                    visits_of_three += 1;
                }
            })
            .search();

        assert_eq!(visits_of_three, 2);
    }

    #[test]
    fn test_neighbor_error_propagates() {
        let result = Bfs::new(0u32, |state: &u32| match state {
            0 => Ok(vec![1, 2]),
            1 => Err("no way out of 1"),
            _ => Ok(vec![]),
        })
        .try_search();

        assert_eq!(result, Err("no way out of 1"));
    }

    #[test]
    fn test_free_function_search() {
        let end = search(
            1u64,
            |n: &u64| vec![n * 2, n + 1],
            |n: &u64| *n,
            |n: &u64| *n == 10,
            ignore,
        );
        assert_eq!(end, Some(10));
    }
}
