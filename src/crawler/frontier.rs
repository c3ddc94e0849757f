//! In-memory frontier for one walker run
//!
//! A FIFO queue paired with a membership set. The set remembers every
//! identifier ever enqueued during the run, including ones already popped,
//! so no identifier enters the queue twice and cyclic or shared comment
//! graphs drain in finite time.

use std::collections::{HashSet, VecDeque};

/// FIFO worklist of comment identifiers
#[derive(Debug, Default)]
pub struct Frontier {
    /// Identifiers waiting to be fetched, in discovery order
    queue: VecDeque<String>,

    /// Every identifier enqueued during this run
    seen: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier seeded with `initial`, dropping duplicates
    pub fn new(initial: impl IntoIterator<Item = String>) -> Self {
        let mut frontier = Self::default();
        for identifier in initial {
            frontier.push(identifier);
        }
        frontier
    }

    /// Appends an identifier unless it was enqueued before in this run
    ///
    /// Returns true if the identifier was added.
    pub fn push(&mut self, identifier: String) -> bool {
        if !self.seen.insert(identifier.clone()) {
            return false;
        }
        self.queue.push_back(identifier);
        true
    }

    /// Removes and returns the oldest queued identifier
    pub fn pop(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    /// Number of identifiers still waiting
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of identifiers enqueued over the whole run
    pub fn total_enqueued(&self) -> usize {
        self.seen.len()
    }
}
