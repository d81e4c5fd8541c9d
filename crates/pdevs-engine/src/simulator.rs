//! `Simulator` — drives one atomic model.

use pdevs_core::{Bag, DevsError, DevsResult, PortSpec, SimTime};
use pdevs_model::AtomicModel;

use crate::Component;

/// Executor for a single [`AtomicModel`].
///
/// Tracks the model's local clock: the time of its last transition and the
/// absolute time of its next scheduled one (`last + time_advance`).  The
/// model's state stays private to the model; the simulator only invokes
/// the contract methods at protocol-mandated instants.
pub struct Simulator<T: SimTime> {
    id: String,
    model: Box<dyn AtomicModel<T>>,
    /// Time of the most recent transition (simulation start initially).
    last: T,
    /// Absolute next-event time; `INFINITY` while the model is passive.
    next: T,
    // Port declarations are read once at construction — models may build
    // them dynamically, and coupling validation needs stable slices.
    input_ports: Vec<PortSpec>,
    output_ports: Vec<PortSpec>,
}

impl<T: SimTime> Simulator<T> {
    /// Wrap `model` under the name `id`, with its local clock at
    /// [`SimTime::ZERO`].
    pub fn new(id: &str, model: Box<dyn AtomicModel<T>>) -> Self {
        let input_ports = model.input_ports();
        let output_ports = model.output_ports();
        let next = T::ZERO + model.time_advance();
        Self {
            id: id.to_string(),
            model,
            last: T::ZERO,
            next,
            input_ports,
            output_ports,
        }
    }

    fn timing_violation(&self, operation: &'static str, got: T) -> DevsError {
        DevsError::TimingViolation {
            model: self.id.clone(),
            operation,
            got: got.to_string(),
            next: self.next.to_string(),
        }
    }
}

impl<T: SimTime> Component<T> for Simulator<T> {
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
        Ok(self.model.output())
    }

    fn advance(&mut self, now: T, inputs: Bag) -> DevsResult<()> {
        let imminent = now == self.next;
        match (inputs.is_empty(), imminent) {
            // Scheduled autonomous event, no input.
            (true, true) => self.model.internal_transition(),
            // Input arrived before the scheduled event.
            (false, false) if now < self.next && self.last <= now => {
                self.model.external_transition(now - self.last, &inputs);
            }
            // Input arrived exactly at the scheduled event time.
            (false, true) => self.model.confluent_transition(&inputs),
            // Off-schedule call: kernel bug upstream.
            _ => return Err(self.timing_violation("advance", now)),
        }
        self.last = now;
        self.next = now + self.model.time_advance();
        Ok(())
    }

    fn input_ports(&self) -> &[PortSpec] {
        &self.input_ports
    }

    fn output_ports(&self) -> &[PortSpec] {
        &self.output_ports
    }
}
