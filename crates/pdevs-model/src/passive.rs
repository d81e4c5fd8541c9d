//! A passive placeholder model — never schedules, ignores all input.

use pdevs_core::{Bag, PortSpec, SimTime};

use crate::AtomicModel;

/// An [`AtomicModel`] that is permanently passive.
///
/// Useful as a placeholder in tests or as a sink that absorbs messages
/// without reacting.  Declares a single input port so it can legally be
/// the destination of a coupling.
pub struct Passive {
    input: PortSpec,
}

impl Passive {
    /// A passive sink whose sole input port is `port`, carrying `M`.
    pub fn sink<M: std::any::Any + Send + Sync>(port: &str) -> Self {
        Self {
            input: PortSpec::of::<M>(port),
        }
    }
}

impl<T: SimTime> AtomicModel<T> for Passive {
    fn input_ports(&self) -> Vec<PortSpec> {
        vec![self.input.clone()]
    }

    fn output_ports(&self) -> Vec<PortSpec> {
        vec![]
    }

    fn time_advance(&self) -> T {
        T::INFINITY
    }

    fn internal_transition(&mut self) {}

    fn external_transition(&mut self, _elapsed: T, _inputs: &Bag) {}

    fn output(&self) -> Bag {
        Bag::new()
    }
}
