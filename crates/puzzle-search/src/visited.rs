//! Visited-state bookkeeping shared by both search engines.
//!
//! States are never compared directly. Every membership test goes through a
//! caller-supplied key function first, so two structurally different states
//! that map to the same key are the same node of the implicit graph.

use std::hash::Hash;

use rustc_hash::FxHashSet;

/// Default key function: the state is its own key.
pub fn identity<S: Clone>(state: &S) -> S {
    state.clone()
}

/// Default goal predicate: never stop early.
pub fn never<S>(_state: &S) -> bool {
    false
}

/// Set of canonical keys discovered during one search call.
///
/// Created empty when a search starts and dropped when it returns; keys are
/// only ever added.
#[derive(Debug, Clone)]
pub struct VisitedSet<K> {
    keys: FxHashSet<K>,
}

impl<K: Hash + Eq> VisitedSet<K> {
    pub fn new() -> Self {
        Self {
            keys: FxHashSet::default(),
        }
    }

    /// Record a key. Returns `true` if it had not been seen before.
    pub fn insert(&mut self, key: K) -> bool {
        self.keys.insert(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<K: Hash + Eq> Default for VisitedSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_reports_first_sighting_only() {
        let mut visited = VisitedSet::new();
        assert!(visited.is_empty());
        assert!(visited.insert((1, 2)));
        assert!(!visited.insert((1, 2)));
        assert!(visited.insert((2, 1)));
        assert_eq!(visited.len(), 2);
        assert!(visited.contains(&(2, 1)));
    }

    #[test]
    fn test_identity_key() {
        let state = vec![3, 1, 4];
        assert_eq!(identity(&state), state);
        assert!(!never(&state));
    }
}
