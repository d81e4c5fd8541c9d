//! `Coordinator` — two-phase step execution over a coupled model.
//!
//! # Step anatomy at time `t`
//!
//! 1. **Collect** ([`Component::collect_output`]): pop the imminent set
//!    from the event queue, ask each imminent child for its output, and
//!    route every message — internal couplings stage bags for sibling
//!    children, external-output couplings accumulate into this
//!    coordinator's own output bag (returned to the parent).
//! 2. **Advance** ([`Component::advance`]): route the parent-supplied
//!    inputs along external-input couplings, then advance every child
//!    that is imminent or holds a staged bag, and recompute the minimum
//!    next-event time.
//!
//! Children untouched by a step are left entirely alone.  Because every
//! collect of a step completes before any advance, no transition can
//! observe a sibling's post-transition state from the same instant — the
//! P-DEVS simultaneity guarantee.
//!
//! With the `parallel` feature both phases fan the per-child calls out on
//! Rayon's thread pool; children own disjoint state and routing stays
//! sequential, so observable behavior is identical.

use std::mem;

use pdevs_core::{Bag, DevsError, DevsResult, PortSpec, SimTime};
use rustc_hash::FxHashMap;

use crate::{Component, EventQueue};

/// Executor for a coupled model: owns its children, the precomputed
/// routing tables, and the event-time index.  Built by
/// [`CoupledBuilder::build`][crate::CoupledBuilder::build].
pub struct Coordinator<T: SimTime> {
    id: String,
    children: Vec<Box<dyn Component<T>>>,
    input_ports: Vec<PortSpec>,
    output_ports: Vec<PortSpec>,

    // ── Routing tables (read-only after build) ────────────────────────────
    /// Indexed by source child: output port → internal destinations.
    routes_ic: Vec<FxHashMap<String, Vec<(usize, String)>>>,
    /// Indexed by source child: output port → own boundary output ports.
    routes_eoc: Vec<FxHashMap<String, Vec<String>>>,
    /// Own boundary input port → child destinations.
    routes_eic: FxHashMap<String, Vec<(usize, String)>>,

    // ── Step state ────────────────────────────────────────────────────────
    schedule: EventQueue<T>,
    /// Cached minimum next-event time over all children.
    next: T,
    /// Per-child input bags staged between the collect and advance phases.
    pending: Vec<Bag>,
    /// Per-child flag: imminent in the step currently in flight.
    imminent: Vec<bool>,
    /// Set by `collect_output`, cleared by `advance` — guards phase order.
    collected: bool,
}

impl<T: SimTime> Coordinator<T> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn assemble(
        id: String,
        children: Vec<Box<dyn Component<T>>>,
        input_ports: Vec<PortSpec>,
        output_ports: Vec<PortSpec>,
        routes_ic: Vec<FxHashMap<String, Vec<(usize, String)>>>,
        routes_eoc: Vec<FxHashMap<String, Vec<String>>>,
        routes_eic: FxHashMap<String, Vec<(usize, String)>>,
        schedule: EventQueue<T>,
        next: T,
    ) -> Self {
        let n = children.len();
        Self {
            id,
            children,
            input_ports,
            output_ports,
            routes_ic,
            routes_eoc,
            routes_eic,
            schedule,
            next,
            pending: vec![Bag::new(); n],
            imminent: vec![false; n],
            collected: false,
        }
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    fn timing_violation(&self, operation: &'static str, got: T) -> DevsError {
        DevsError::TimingViolation {
            model: self.id.clone(),
            operation,
            got: got.to_string(),
            next: self.next.to_string(),
        }
    }

    /// Ask every imminent child for its output.  Parallelized under the
    /// `parallel` feature; order of the returned pairs is immaterial
    /// because bags are unordered multisets.
    fn collect_imminent(&mut self, now: T) -> DevsResult<Vec<(usize, Bag)>> {
        #[cfg(not(feature = "parallel"))]
        {
            let imminent = &self.imminent;
            self.children
                .iter_mut()
                .enumerate()
                .filter(|(h, _)| imminent[*h])
                .map(|(h, child)| child.collect_output(now).map(|bag| (h, bag)))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let imminent = &self.imminent;
            self.children
                .par_iter_mut()
                .enumerate()
                .filter(|(h, _)| imminent[*h])
                .map(|(h, child)| child.collect_output(now).map(|bag| (h, bag)))
                .collect()
        }
    }

    /// Advance every flagged child with its staged bag.  The caller must
    /// reschedule the same children afterwards.
    fn advance_flagged(&mut self, now: T, todo: &[bool]) -> DevsResult<()> {
        #[cfg(not(feature = "parallel"))]
        {
            for (h, child) in self.children.iter_mut().enumerate() {
                if todo[h] {
                    child.advance(now, mem::take(&mut self.pending[h]))?;
                }
            }
            Ok(())
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            self.children
                .par_iter_mut()
                .zip(self.pending.par_iter_mut())
                .enumerate()
                .filter(|(h, _)| todo[*h])
                .map(|(_, (child, bag))| child.advance(now, mem::take(bag)))
                .collect::<DevsResult<()>>()
        }
    }
}

impl<T: SimTime> Component<T> for Coordinator<T> {
    fn model_id(&self) -> &str {
        &self.id
    }

    #[inline]
    fn next_event_time(&self) -> T {
        self.next
    }

    fn collect_output(&mut self, now: T) -> DevsResult<Bag> {
        if now != self.next {
            return Err(self.timing_violation("collect_output", now));
        }

        for h in self.schedule.pop_imminent(now) {
            self.imminent[h] = true;
        }
        let outputs = self.collect_imminent(now)?;

        // Route: internal couplings stage sibling bags, external-output
        // couplings climb to our own boundary.  Arc-cloned, so one emitted
        // message fans out without copying its payload.
        let mut own = Bag::new();
        for (h, output) in outputs {
            for (port, messages) in output.ports() {
                if let Some(dests) = self.routes_ic[h].get(port) {
                    for (to, to_port) in dests {
                        self.pending[*to].extend_raw(to_port, messages);
                    }
                }
                if let Some(self_ports) = self.routes_eoc[h].get(port) {
                    for self_port in self_ports {
                        own.extend_raw(self_port, messages);
                    }
                }
            }
        }

        self.collected = true;
        Ok(own)
    }

    fn advance(&mut self, now: T, inputs: Bag) -> DevsResult<()> {
        // Phase-order guards.  An imminent coordinator must have collected
        // first; a non-imminent one may only be advanced to deliver input.
        if now > self.next || (now == self.next && !self.collected) {
            return Err(self.timing_violation("advance", now));
        }
        if inputs.is_empty() && !self.collected {
            return Err(self.timing_violation("advance", now));
        }

        // Route parent-supplied inputs down along external-input couplings.
        for (port, messages) in inputs.ports() {
            if let Some(dests) = self.routes_eic.get(port) {
                for (to, to_port) in dests {
                    self.pending[*to].extend_raw(to_port, messages);
                }
            }
        }

        // A child takes part in this step iff it is imminent or was routed
        // at least one message.
        let todo: Vec<bool> = self
            .imminent
            .iter()
            .zip(&self.pending)
            .map(|(imm, bag)| *imm || !bag.is_empty())
            .collect();

        self.advance_flagged(now, &todo)?;

        for (h, touched) in todo.iter().enumerate() {
            if *touched {
                self.schedule.update(h, self.children[h].next_event_time());
            }
        }

        self.imminent.fill(false);
        self.collected = false;
        self.next = self.schedule.min_time();
        Ok(())
    }

    fn input_ports(&self) -> &[PortSpec] {
        &self.input_ports
    }

    fn output_ports(&self) -> &[PortSpec] {
        &self.output_ports
    }
}
