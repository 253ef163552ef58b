use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Bounded log that reads most-recent-first.
///
/// Pushing past the cap evicts the oldest entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct History<T> {
    cap: usize,
    entries: VecDeque<T>,
}

impl<T> History<T> {
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            cap,
            entries: VecDeque::with_capacity(cap),
        }
    }

    pub fn push(&mut self, entry: T) {
        self.entries.push_front(entry);
        self.entries.truncate(self.cap);
    }

    pub fn latest(&self) -> Option<&T> {
        self.entries.front()
    }

    /// Entries from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Rebuilds from entries ordered newest first, keeping at most `cap`.
    pub fn from_newest_first(cap: usize, entries: impl IntoIterator<Item = T>) -> Self {
        let mut history = Self::new(cap);
        history.entries = entries.into_iter().take(history.cap).collect();
        history
    }
}
