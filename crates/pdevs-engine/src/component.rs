//! The `Component` trait — the seam between the engine's two executors.
//!
//! A [`Simulator`][crate::Simulator] (one atomic model) and a
//! [`Coordinator`][crate::Coordinator] (one coupled model) both implement
//! this trait, so a coordinator's child set is a flat, heterogeneous
//! `Vec<Box<dyn Component<T>>>` — arbitrarily deep model trees without
//! compile-time nesting of executor types.

use pdevs_core::{Bag, DevsResult, PortSpec, SimTime};

/// One node of the executor tree: either a simulator wrapping an atomic
/// model or a coordinator wrapping a coupled one.
///
/// Every component has exactly one owner (its parent coordinator, or the
/// [`Runner`][crate::Runner] for the root).  Couplings route messages
/// between components; they never transfer ownership.
pub trait Component<T: SimTime>: Send {
    /// The model id, unique within the parent's child set.
    fn model_id(&self) -> &str;

    /// Absolute time of the next scheduled event, or
    /// [`SimTime::INFINITY`] when passive.
    ///
    /// Read-only and idempotent: repeated calls without an intervening
    /// [`advance`][Self::advance] return the same value.
    fn next_event_time(&self) -> T;

    /// Compute the output emitted at `now`.
    ///
    /// Valid only when `now == next_event_time()`; fails with
    /// [`TimingViolation`][pdevs_core::DevsError::TimingViolation]
    /// otherwise.  For a coordinator this runs the whole collect phase of
    /// its subtree and returns the messages that crossed its boundary via
    /// external-output couplings.
    fn collect_output(&mut self, now: T) -> DevsResult<Bag>;

    /// Apply one step's transition(s) at `now` with the routed `inputs`.
    ///
    /// For a simulator this is a single internal, external, or confluent
    /// transition; for a coordinator it is the advance phase over its
    /// children.  Must follow `collect_output(now)` whenever the component
    /// is imminent at `now`.
    fn advance(&mut self, now: T, inputs: Bag) -> DevsResult<()>;

    /// Declared input ports (the model's boundary, for coupling validation).
    fn input_ports(&self) -> &[PortSpec];

    /// Declared output ports.
    fn output_ports(&self) -> &[PortSpec];
}
