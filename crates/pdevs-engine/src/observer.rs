//! Simulation observer trait for lifecycle reporting.
//!
//! The observer is a pure side channel: the [`Runner`][crate::Runner]
//! calls it unconditionally, but nothing an observer does (or fails to
//! do) can affect simulation results.  It is injected at runner
//! construction — there is no global sink.

use pdevs_core::SimTime;

/// Callbacks invoked by [`Runner::run_until`][crate::Runner::run_until]
/// at key points of the run.
///
/// All methods have default no-op implementations so implementors only
/// need to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl SimObserver<f64> for ProgressPrinter {
///     fn on_advance(&mut self, model: &str, from: f64, to: f64) {
///         println!("{model}: {from} -> {to}");
///     }
/// }
/// ```
pub trait SimObserver<T: SimTime> {
    /// Called once when the runner takes ownership of the root model.
    fn on_setup(&mut self, _root: &str, _time: T) {}

    /// Called at the top of each `run_until` invocation.
    fn on_run_start(&mut self, _time: T) {}

    /// Called once per processed step with the global time *before* the
    /// step executes.  Running a 1.0-period model until 3.0 therefore
    /// reports `0, 1, 2`.
    fn on_global_time(&mut self, _time: T) {}

    /// The root model is about to collect outputs at `time`.
    fn on_collect(&mut self, _model: &str, _time: T) {}

    /// The root model is advancing from `from` to `to`.
    fn on_advance(&mut self, _model: &str, _from: T, _to: T) {}

    /// Called once when `run_until` returns, with the final global time.
    fn on_run_end(&mut self, _time: T) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need a runner but
/// no lifecycle reporting.
pub struct NoopObserver;

impl<T: SimTime> SimObserver<T> for NoopObserver {}
