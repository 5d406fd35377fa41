use std::collections::VecDeque;

use super::state::ProcessKey;

/// Processes that failed admission, in the order they were rejected. A
/// process rejected by several passes appears once per rejection. Nothing
/// drains it implicitly.
#[derive(Debug, Default, Clone)]
pub struct RejectedQueue {
    entries: VecDeque<ProcessKey>,
}

impl RejectedQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: ProcessKey) {
        self.entries.push_back(key);
    }

    pub fn pop(&mut self) -> Option<ProcessKey> {
        self.entries.pop_front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: ProcessKey) -> bool {
        self.entries.contains(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = ProcessKey> + '_ {
        self.entries.iter().copied()
    }
}

/// Round-robin run queue, local to one pass.
#[derive(Debug, Default)]
pub struct ReadyQueue {
    entries: VecDeque<ProcessKey>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, key: ProcessKey) {
        self.entries.push_back(key);
    }

    pub fn pop_front(&mut self) -> Option<ProcessKey> {
        self.entries.pop_front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ProcessKey> for ReadyQueue {
    fn from_iter<I: IntoIterator<Item = ProcessKey>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
