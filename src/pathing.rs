use crate::tiles::TilePosition;

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Priority queue for best-first searches over tile positions.
///
/// Candidates pop in ascending priority order (the caller's heuristic
/// distance to the search target). Ties pop in insertion order: each push
/// takes a monotonically increasing ticket used as the secondary key, so of
/// two candidates sharing the minimum priority the first one inserted wins.
/// Search outcomes therefore depend only on push order, never on heap
/// internals.
#[derive(Debug)]
pub struct CandidateQueue {
    heap: BinaryHeap<Reverse<(u32, u64, TilePosition)>>,
    next_ticket: u64,
}

impl CandidateQueue {
    pub fn new() -> CandidateQueue {
        CandidateQueue {
            heap: BinaryHeap::new(),
            next_ticket: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> CandidateQueue {
        CandidateQueue {
            heap: BinaryHeap::with_capacity(capacity),
            next_ticket: 0,
        }
    }

    pub fn push(&mut self, priority: u32, pos: TilePosition) {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.heap.push(Reverse((priority, ticket, pos)));
    }

    pub fn pop(&mut self) -> Option<TilePosition> {
        self.heap.pop().map(|Reverse((_, _, pos))| pos)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
