//! Kernel error taxonomy.
//!
//! Sub-crates may define their own error enums and convert `DevsError`
//! into them via `#[from]` impls, or use `DevsResult` directly.  Both
//! patterns are acceptable; prefer whichever keeps error sites clean.
//!
//! Assembly-time errors (`DuplicateEntity`, `UnknownReference`,
//! `UnknownPort`, `PortTypeMismatch`) abort only the offending
//! registration and leave previously registered entities untouched.
//! `TimingViolation` is a defensive invariant: it is unreachable through
//! correct engine logic and, if it ever surfaces, indicates a kernel bug —
//! halt the run, do not absorb it.

use thiserror::Error;

/// The shared error type for the `rust_pdevs` kernel.
#[derive(Debug, Error)]
pub enum DevsError {
    /// A model id was registered twice under the same parent.
    #[error("model '{0}' is already registered")]
    DuplicateEntity(String),

    /// A coupling or vicinity entry named a model the parent does not contain.
    #[error("model '{0}' is not a member of this coupled model")]
    UnknownReference(String),

    /// A coupling named a port the referenced model does not declare.
    #[error("model '{model}' has no {direction} port named '{port}'")]
    UnknownPort {
        model: String,
        port: String,
        /// `"input"` or `"output"`.
        direction: &'static str,
    },

    /// The two ends of a coupling carry different message types.
    #[error(
        "port type mismatch: {from_model}.{from_port} carries {from_type}, \
         {to_model}.{to_port} carries {to_type}"
    )]
    PortTypeMismatch {
        from_model: String,
        from_port: String,
        from_type: &'static str,
        to_model: String,
        to_port: String,
        to_type: &'static str,
    },

    /// A component was asked to act at a time other than its schedule allows.
    #[error("timing violation in '{model}': {operation} at {got}, next event is at {next}")]
    TimingViolation {
        model: String,
        /// `"collect_output"` or `"advance"`.
        operation: &'static str,
        got: String,
        next: String,
    },
}

/// Shorthand result type for all `pdevs-*` crates.
pub type DevsResult<T> = Result<T, DevsError>;
