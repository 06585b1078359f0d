//! Delay queue for timed session flags
//!
//! Jump landing and the end of the re-hit window are not ad-hoc callbacks:
//! they are entries here, drained at the start of each tick. Clearing the
//! queue (on session reset) cancels everything still armed.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

/// Something that happens when its due time is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Expiry {
    /// Airborne player touches the ground again
    Land,
    /// Player can take damage again
    HitWindowClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    due_ms: u64,
    /// Insertion order breaks ties between equal due times
    seq: u64,
    expiry: Expiry,
}

#[derive(Debug, Clone, Default)]
pub struct DelayQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl DelayQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: u64, expiry: Expiry) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry { due_ms, seq, expiry }));
    }

    /// Pop the earliest entry due at or before `now_ms`
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Expiry> {
        match self.heap.peek() {
            Some(Reverse(entry)) if entry.due_ms <= now_ms => {
                let Reverse(entry) = self.heap.pop()?;
                Some(entry.expiry)
            }
            _ => None,
        }
    }

    /// Whether an entry of this kind is still armed
    pub fn is_pending(&self, expiry: Expiry) -> bool {
        self.heap.iter().any(|Reverse(e)| e.expiry == expiry)
    }

    pub fn next_due(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse(e)| e.due_ms)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
