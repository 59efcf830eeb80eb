//! Frontier containers deciding the traversal order.
//!
//! A [`Queue`] yields states in discovery order (breadth-first), a [`Stack`]
//! yields the most recently pushed state first (depth-first). Both remember
//! the largest size they reached so searches can report it.

use std::collections::VecDeque;

/// Ordered collection of discovered but not yet expanded states.
pub trait Frontier<S> {
    fn push(&mut self, state: S);
    fn pop(&mut self) -> Option<S>;
    fn len(&self) -> usize;
    /// Largest number of states held at once.
    fn high_water(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// FIFO frontier.
#[derive(Debug, Clone)]
pub struct Queue<S> {
    items: VecDeque<S>,
    high_water: usize,
}

impl<S> Queue<S> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
            high_water: 0,
        }
    }
}

impl<S> Default for Queue<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Frontier<S> for Queue<S> {
    fn push(&mut self, state: S) {
        self.items.push_back(state);
        self.high_water = self.high_water.max(self.items.len());
    }

    fn pop(&mut self) -> Option<S> {
        self.items.pop_front()
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn high_water(&self) -> usize {
        self.high_water
    }
}

/// LIFO frontier.
#[derive(Debug, Clone)]
pub struct Stack<S> {
    items: Vec<S>,
    high_water: usize,
}

impl<S> Stack<S> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            high_water: 0,
        }
    }
}

impl<S> Default for Stack<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Frontier<S> for Stack<S> {
    fn push(&mut self, state: S) {
        self.items.push(state);
        self.high_water = self.high_water.max(self.items.len());
    }

    fn pop(&mut self) -> Option<S> {
        self.items.pop()
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn high_water(&self) -> usize {
        self.high_water
    }
}
