//! `EventQueue` — per-child next-event-time index inside a coordinator.
//!
//! # Why this exists
//!
//! A coordinator must answer "what is the minimum next-event time over my
//! children, and which children sit at it?" after every step.  Scanning
//! all N children per step costs O(N) regardless of how many are active;
//! the queue keeps the answer in a binary heap for O(log N) updates and
//! O(1) amortized minimum queries.
//!
//! # Lazy invalidation
//!
//! Virtual-time types are only `PartialOrd` (the shipped impl is `f64`),
//! so a `BTreeMap` keyed by time is off the table.  Instead each child
//! carries an epoch counter: rescheduling bumps the epoch and pushes a
//! fresh heap entry, and entries whose epoch no longer matches are skimmed
//! off on the next query.  Passive children (infinite next-event time)
//! are simply not enqueued.
//!
//! Heap ordering falls back to "equal" for incomparable values; models
//! must never return NaN-like times (see [`SimTime`]).

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use pdevs_core::SimTime;

// ── Heap entry ────────────────────────────────────────────────────────────────

struct Entry<T> {
    time: T,
    child: usize,
    epoch: u64,
}

impl<T: SimTime> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: SimTime> Eq for Entry<T> {}

impl<T: SimTime> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: SimTime> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .partial_cmp(&other.time)
            .unwrap_or(Ordering::Equal)
            .then(self.child.cmp(&other.child))
            .then(self.epoch.cmp(&other.epoch))
    }
}

// ── EventQueue ────────────────────────────────────────────────────────────────

/// Min-oriented index mapping child handles to their next-event times.
pub struct EventQueue<T: SimTime> {
    heap: BinaryHeap<Reverse<Entry<T>>>,
    /// Authoritative next-event time per child, indexed by handle.
    time: Vec<T>,
    /// Current epoch per child; heap entries with an older epoch are stale.
    epoch: Vec<u64>,
}

impl<T: SimTime> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SimTime> EventQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            time: Vec::new(),
            epoch: Vec::new(),
        }
    }

    /// Number of registered children.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Register a new child with next-event time `t`; returns its handle.
    ///
    /// Handles are dense indices assigned in registration order.
    pub fn register(&mut self, t: T) -> usize {
        let child = self.time.len();
        self.time.push(t);
        self.epoch.push(0);
        if !t.is_passive() {
            self.heap.push(Reverse(Entry { time: t, child, epoch: 0 }));
        }
        child
    }

    /// Reschedule `child` to next-event time `t`.
    ///
    /// O(log N): the old heap entry is left in place and invalidated by
    /// the epoch bump.
    pub fn update(&mut self, child: usize, t: T) {
        self.epoch[child] += 1;
        self.time[child] = t;
        if !t.is_passive() {
            self.heap.push(Reverse(Entry {
                time: t,
                child,
                epoch: self.epoch[child],
            }));
        }
    }

    /// The authoritative next-event time of `child`.
    #[inline]
    pub fn time_of(&self, child: usize) -> T {
        self.time[child]
    }

    /// Minimum next-event time over all children, or
    /// [`SimTime::INFINITY`] when every child is passive.
    pub fn min_time(&mut self) -> T {
        self.skim_stale();
        match self.heap.peek() {
            Some(Reverse(e)) => e.time,
            None => T::INFINITY,
        }
    }

    /// Remove and return the handles of every child scheduled exactly at
    /// `now` — the imminent set for one step.
    ///
    /// The caller must advance each returned child and [`update`] it
    /// afterwards; until then the popped children have no heap entry.
    pub fn pop_imminent(&mut self, now: T) -> Vec<usize> {
        let mut imminent = Vec::new();
        loop {
            self.skim_stale();
            match self.heap.peek() {
                Some(Reverse(e)) if e.time == now => {
                    imminent.push(e.child);
                    self.heap.pop();
                }
                _ => break,
            }
        }
        imminent
    }

    /// Drop stale entries off the top of the heap.
    fn skim_stale(&mut self) {
        while let Some(Reverse(e)) = self.heap.peek() {
            if self.epoch[e.child] == e.epoch {
                break;
            }
            self.heap.pop();
        }
    }
}
