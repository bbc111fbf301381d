use std::collections::{HashSet, VecDeque};

/// FIFO queue of page paths waiting for their first fetch
///
/// The frontier remembers every path it has ever accepted, so a path is
/// queued at most once per discovery phase even after it has been popped
/// (and even if its fetch failed).
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    queue: VecDeque<String>,
    seen: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `path` unless it was already queued or handed out
    ///
    /// Returns `true` if the path was added.
    pub fn push(&mut self, path: &str) -> bool {
        if self.seen.contains(path) {
            return false;
        }
        self.seen.insert(path.to_string());
        self.queue.push_back(path.to_string());
        true
    }

    /// Removes and returns the oldest queued path
    pub fn pop(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    /// Marks `path` as handled without queueing it
    pub fn mark_seen(&mut self, path: &str) {
        self.seen.insert(path.to_string());
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
