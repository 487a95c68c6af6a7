// src/crawl/frontier.rs
// =============================================================================
// The frontier: a FIFO queue of URLs waiting to be fetched, plus the set of
// every URL ever enqueued.
//
// Invariant: a URL is in `seen` if and only if it was enqueued once, and it
// leaves `pending` exactly once. So nothing is ever fetched twice.
//
// Only the single control flow touches the frontier (between and inside
// batch completion handling), so no locking is needed.
// =============================================================================

use std::collections::{HashSet, VecDeque};

#[derive(Debug, Default)]
pub struct Frontier {
    pending: VecDeque<String>,
    seen: HashSet<String>,
    // Enqueue order, for stable output
    order: Vec<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `url` unless it was enqueued before. Returns true if it was new.
    pub fn enqueue(&mut self, url: String) -> bool {
        if !self.seen.insert(url.clone()) {
            return false;
        }
        self.order.push(url.clone());
        self.pending.push_back(url);
        true
    }

    /// Removes up to `max_size` URLs from the front, oldest first.
    pub fn dequeue_batch(&mut self, max_size: usize) -> Vec<String> {
        let take = max_size.min(self.pending.len());
        self.pending.drain(..take).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn seen_len(&self) -> usize {
        self.seen.len()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    /// Every URL ever enqueued, in enqueue order.
    pub fn into_visited(self) -> Vec<String> {
        self.order
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why both a VecDeque and a HashSet?
//    - VecDeque gives cheap push_back/pop_front, the FIFO we need for BFS
//    - HashSet gives O(1) "have we ever seen this URL?" checks
//    - Marking a URL seen when it is ENQUEUED (not when fetched) is what
//      keeps it from sitting in the queue twice
//
// 2. What does drain(..take) do?
//    - Removes a range from the front of the deque and yields the items
//    - Collecting it gives us the batch in the original order
// -----------------------------------------------------------------------------
