//! `pdevs-engine` — the hierarchical P-DEVS execution engine.
//!
//! # Two-phase step protocol
//!
//! ```text
//! one step at global time t:
//!   ① Collect — every imminent child (next-event time == t) computes its
//!               output from pre-transition state; messages are routed
//!               along internal couplings into per-destination bags, and
//!               along external-output couplings up to the parent.
//!   ② Advance — every child that is imminent or received a routed bag
//!               applies exactly one transition (internal, external, or
//!               confluent); next-event times are recomputed.
//! ```
//!
//! All collects of a step happen before any advance of that step.  This
//! barrier is what makes simultaneous events across siblings well-defined:
//! no transition ever observes a sibling's post-transition state from the
//! same instant.
//!
//! # Crate layout
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`component`] | `Component` trait — Simulator and Coordinator seam    |
//! | [`simulator`] | `Simulator` — drives one atomic model                 |
//! | [`schedule`]  | `EventQueue` — per-child next-event-time index        |
//! | [`coupled`]   | `CoupledBuilder` — validated assembly of a coupled model |
//! | [`coordinator`]| `Coordinator` — two-phase step over a child set      |
//! | [`runner`]    | `Runner` — top-level `run_until` driver               |
//! | [`observer`]  | `SimObserver`, `NoopObserver` lifecycle callbacks     |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Collect/advance phases run on Rayon's thread pool.      |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use pdevs_engine::{CoupledBuilder, NoopObserver, Runner};
//!
//! let mut top = CoupledBuilder::<f64>::new("top");
//! top.add_atomic("clock", TickGenerator::new(1.0))?;
//! let mut runner = Runner::new(top.build(), NoopObserver);
//! let reached = runner.run_until(60.0)?;
//! ```

pub mod component;
pub mod coordinator;
pub mod coupled;
pub mod observer;
pub mod runner;
pub mod schedule;
pub mod simulator;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use component::Component;
pub use coordinator::Coordinator;
pub use coupled::CoupledBuilder;
pub use observer::{NoopObserver, SimObserver};
pub use runner::Runner;
pub use schedule::EventQueue;
pub use simulator::Simulator;
