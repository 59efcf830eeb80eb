//! Depth-first branch-and-bound over an implicit graph.
//!
//! The engine contributes traversal order (LIFO, one full path before
//! backtracking) and key-based deduplication. Pruning lives in the caller's
//! `neighbors` function, which sees the running accumulator (typically the
//! best score found so far) and should return only successors whose
//! optimistic bound still beats it. `on_visit` fires when a state is popped
//! and expanded, and is where the accumulator gets updated.
//!
//! Correctness depends on the bound being admissible: it must never
//! underestimate what a subtree can still achieve. An inadmissible bound
//! silently yields a suboptimal answer. [`BoundedSearch::assert_admissible`]
//! turns the cheapest detectable violations into a panic.

use std::convert::Infallible;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::frontier::{Frontier, Stack};
use crate::stats::SearchStats;
use crate::visited::{identity, never, VisitedSet};

/// Default expansion hook.
pub fn skip<S, A>(_state: &S, _accumulator: &mut A) {}

/// Runtime check applied to every successor pushed onto the stack.
pub trait BoundCheck<S> {
    fn check(&mut self, parent: &S, child: &S);
}

/// No checking.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unchecked;

impl<S> BoundCheck<S> for Unchecked {
    #[inline]
    fn check(&mut self, _parent: &S, _child: &S) {}
}

/// Asserts `value(child) <= bound(parent)`: a successor can never be worth
/// more than the optimistic estimate of the state that produced it.
pub struct Admissible<B, F, T> {
    bound: B,
    value: F,
    _score: PhantomData<fn() -> T>,
}

impl<S, B, F, T> BoundCheck<S> for Admissible<B, F, T>
where
    B: FnMut(&S) -> T,
    F: FnMut(&S) -> T,
    T: PartialOrd + Debug,
{
    fn check(&mut self, parent: &S, child: &S) {
        let bound = (self.bound)(parent);
        let value = (self.value)(child);
        assert!(
            value <= bound,
            "inadmissible bound: successor is worth {value:?} but its parent was bounded by {bound:?}"
        );
    }
}

/// Outcome of a bounded search.
#[derive(Debug, Clone)]
pub struct Bounded<S, A> {
    /// First popped state satisfying the goal predicate, if any.
    pub end: Option<S>,
    /// The accumulator after the last expansion.
    pub best: A,
    pub stats: SearchStats,
}

/// Branch-and-bound search builder.
///
/// `neighbors(state, &accumulator)` doubles as adjacency and pruning oracle;
/// `on_visit(state, &mut accumulator)` runs once per expanded state. Both run
/// strictly one after the other on the calling thread.
pub struct BoundedSearch<
    S,
    A,
    N,
    K = fn(&S) -> S,
    E = fn(&S) -> bool,
    V = fn(&S, &mut A),
    C = Unchecked,
> {
    start: S,
    accumulator: A,
    neighbors: N,
    key: K,
    is_end: E,
    on_visit: V,
    check: C,
}

impl<S: Clone, A, N> BoundedSearch<S, A, N> {
    pub fn new(start: S, accumulator: A, neighbors: N) -> Self {
        Self {
            start,
            accumulator,
            neighbors,
            key: identity::<S>,
            is_end: never::<S>,
            on_visit: skip::<S, A>,
            check: Unchecked,
        }
    }
}

impl<S, A, N, K, E, V, C> BoundedSearch<S, A, N, K, E, V, C> {
    pub fn key<K2, Q>(self, key: K2) -> BoundedSearch<S, A, N, K2, E, V, C>
    where
        K2: FnMut(&S) -> Q,
        Q: Hash + Eq,
    {
        BoundedSearch {
            start: self.start,
            accumulator: self.accumulator,
            neighbors: self.neighbors,
            key,
            is_end: self.is_end,
            on_visit: self.on_visit,
            check: self.check,
        }
    }

    pub fn is_end<E2>(self, is_end: E2) -> BoundedSearch<S, A, N, K, E2, V, C>
    where
        E2: FnMut(&S) -> bool,
    {
        BoundedSearch {
            start: self.start,
            accumulator: self.accumulator,
            neighbors: self.neighbors,
            key: self.key,
            is_end,
            on_visit: self.on_visit,
            check: self.check,
        }
    }

    pub fn on_visit<V2>(self, on_visit: V2) -> BoundedSearch<S, A, N, K, E, V2, C>
    where
        V2: FnMut(&S, &mut A),
    {
        BoundedSearch {
            start: self.start,
            accumulator: self.accumulator,
            neighbors: self.neighbors,
            key: self.key,
            is_end: self.is_end,
            on_visit,
            check: self.check,
        }
    }

    /// Panic as soon as a pushed successor's `value` exceeds its parent's `bound`.
    pub fn assert_admissible<B, F, T>(
        self,
        bound: B,
        value: F,
    ) -> BoundedSearch<S, A, N, K, E, V, Admissible<B, F, T>>
    where
        B: FnMut(&S) -> T,
        F: FnMut(&S) -> T,
        T: PartialOrd + Debug,
    {
        BoundedSearch {
            start: self.start,
            accumulator: self.accumulator,
            neighbors: self.neighbors,
            key: self.key,
            is_end: self.is_end,
            on_visit: self.on_visit,
            check: Admissible {
                bound,
                value,
                _score: PhantomData,
            },
        }
    }

    pub fn search<I, Q>(self) -> Bounded<S, A>
    where
        N: FnMut(&S, &A) -> I,
        I: IntoIterator<Item = S>,
        K: FnMut(&S) -> Q,
        Q: Hash + Eq,
        E: FnMut(&S) -> bool,
        V: FnMut(&S, &mut A),
        C: BoundCheck<S>,
    {
        let BoundedSearch {
            start,
            accumulator,
            mut neighbors,
            key,
            is_end,
            on_visit,
            check,
        } = self;
        match explore(
            start,
            accumulator,
            |state: &S, acc: &A| Ok::<I, Infallible>(neighbors(state, acc)),
            key,
            is_end,
            on_visit,
            check,
        ) {
            Ok(bounded) => bounded,
            Err(never) => match never {},
        }
    }

    /// Search with a fallible `neighbors`; its first error is returned as is
    /// and the accumulator is dropped.
    pub fn try_search<I, Q, Err>(self) -> Result<Bounded<S, A>, Err>
    where
        N: FnMut(&S, &A) -> Result<I, Err>,
        I: IntoIterator<Item = S>,
        K: FnMut(&S) -> Q,
        Q: Hash + Eq,
        E: FnMut(&S) -> bool,
        V: FnMut(&S, &mut A),
        C: BoundCheck<S>,
    {
        explore(
            self.start,
            self.accumulator,
            self.neighbors,
            self.key,
            self.is_end,
            self.on_visit,
            self.check,
        )
    }
}

/// Bounded search with every caller function spelled out.
pub fn search<S, A, I, Q>(
    start: S,
    accumulator: A,
    neighbors: impl FnMut(&S, &A) -> I,
    key: impl FnMut(&S) -> Q,
    is_end: impl FnMut(&S) -> bool,
    on_visit: impl FnMut(&S, &mut A),
) -> Bounded<S, A>
where
    I: IntoIterator<Item = S>,
    Q: Hash + Eq,
{
    BoundedSearch {
        start,
        accumulator,
        neighbors,
        key,
        is_end,
        on_visit,
        check: Unchecked,
    }
    .search()
}

fn explore<S, A, I, Q, Err>(
    start: S,
    mut accumulator: A,
    mut neighbors: impl FnMut(&S, &A) -> Result<I, Err>,
    mut key: impl FnMut(&S) -> Q,
    mut is_end: impl FnMut(&S) -> bool,
    mut on_visit: impl FnMut(&S, &mut A),
    mut check: impl BoundCheck<S>,
) -> Result<Bounded<S, A>, Err>
where
    I: IntoIterator<Item = S>,
    Q: Hash + Eq,
{
    let mut visited = VisitedSet::new();
    let mut frontier = Stack::new();
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
        on_visit(&state, &mut accumulator);
        trace!(stacked = frontier.len(), "expanding state");

        for next in neighbors(&state, &accumulator)? {
            if !visited.insert(key(&next)) {
                stats.duplicates += 1;
                continue;
            }
            check.check(&state, &next);
            stats.discovered += 1;
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
        "bounded search finished"
    );

    Ok(Bounded {
        end,
        best: accumulator,
        stats,
    })
}
