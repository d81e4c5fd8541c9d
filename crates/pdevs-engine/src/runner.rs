//! `Runner` — top-level simulation driver.

use pdevs_core::{Bag, DevsResult, SimTime};

use crate::{Component, Coordinator, SimObserver};

/// Owns the root [`Coordinator`] and the global clock, and advances the
/// whole model tree step by step.
///
/// The runner is the only externally driven control surface: callers
/// assemble a tree with [`CoupledBuilder`][crate::CoupledBuilder], hand
/// the built root to `Runner::new` together with a lifecycle observer,
/// and call [`run_until`][Self::run_until].
pub struct Runner<T: SimTime, O: SimObserver<T>> {
    root: Coordinator<T>,
    time: T,
    observer: O,
}

impl<T: SimTime, O: SimObserver<T>> Runner<T, O> {
    /// Take ownership of the root coordinator; the global clock starts at
    /// [`SimTime::ZERO`].
    pub fn new(root: Coordinator<T>, mut observer: O) -> Self {
        observer.on_setup(root.model_id(), T::ZERO);
        Self {
            root,
            time: T::ZERO,
            observer,
        }
    }

    /// The current global simulation time.
    pub fn current_time(&self) -> T {
        self.time
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Process every event up to and including `end_time`, then return
    /// the final global time.
    ///
    /// Each iteration executes one collect+advance step at the root's
    /// next-event time `t_next`, as long as `t_next <= end_time` — an
    /// event falling exactly on the boundary IS processed.  When the next
    /// event lies beyond `end_time` (or the tree is passive), the clock
    /// jumps to `end_time` and the run stops, so the returned value
    /// always equals `end_time` for a finite bound.
    pub fn run_until(&mut self, end_time: T) -> DevsResult<T> {
        self.observer.on_run_start(self.time);
        loop {
            let t_next = self.root.next_event_time();
            if t_next.is_passive() || t_next > end_time {
                self.time = end_time;
                break;
            }

            self.observer.on_global_time(self.time);
            self.observer.on_collect(self.root.model_id(), t_next);
            // Root-level outputs have nowhere further to go; drop them.
            let _boundary = self.root.collect_output(t_next)?;

            self.observer.on_advance(self.root.model_id(), self.time, t_next);
            self.root.advance(t_next, Bag::new())?;
            self.time = t_next;
        }
        self.observer.on_run_end(self.time);
        Ok(self.time)
    }
}
