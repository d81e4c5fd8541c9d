//! The `AtomicModel` trait — the main extension point for user code.

use pdevs_core::{Bag, PortSpec, SimTime};

/// One atomic behavioral unit: private state plus the four P-DEVS
/// functions over it.
///
/// # Required methods
///
/// Everything except [`confluent_transition`][Self::confluent_transition],
/// which defaults to "internal first, then external with zero elapsed
/// time".  Models whose semantics need the opposite order (or something
/// else entirely) override it; either way the policy is explicit per
/// model, never hidden in the engine.
///
/// # Timing contract
///
/// The engine guarantees the classical call pattern:
///
/// - [`output`][Self::output] is invoked only at the model's next-event
///   time, immediately *before* the internal or confluent transition of
///   the same instant, on the pre-transition state;
/// - [`external_transition`][Self::external_transition] receives
///   `elapsed`, the time since the model's previous transition, with
///   `0 <= elapsed < time_advance()`;
/// - after any transition, [`time_advance`][Self::time_advance] is called
///   once to reschedule.  Returning [`SimTime::INFINITY`] makes the model
///   passive until external input arrives.
///
/// # Ports
///
/// `input_ports`/`output_ports` are the model's declared boundary; they
/// are read once at registration time for coupling validation.  Messages
/// emitted on undeclared ports are discarded during routing.
pub trait AtomicModel<T: SimTime>: Send + 'static {
    /// Declared input ports.  Must be disjoint from `output_ports`.
    fn input_ports(&self) -> Vec<PortSpec>;

    /// Declared output ports.
    fn output_ports(&self) -> Vec<PortSpec>;

    /// Time until the next autonomous event, given the current state.
    fn time_advance(&self) -> T;

    /// The scheduled autonomous event fired with no external input pending.
    fn internal_transition(&mut self);

    /// External input arrived `elapsed` after the last transition, before
    /// the next scheduled internal event.
    fn external_transition(&mut self, elapsed: T, inputs: &Bag);

    /// External input arrived exactly at the scheduled internal-event time.
    ///
    /// Default policy: internal transition first, then external transition
    /// on the resulting state with zero elapsed time.
    fn confluent_transition(&mut self, inputs: &Bag) {
        self.internal_transition();
        self.external_transition(T::ZERO, inputs);
    }

    /// Messages emitted at the next-event instant, computed from the
    /// pre-transition state.
    fn output(&self) -> Bag;
}
