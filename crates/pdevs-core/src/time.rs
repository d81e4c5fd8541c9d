//! Simulation time model.
//!
//! # Design
//!
//! Virtual time is abstract: the kernel never assumes a unit or a
//! resolution, only that time values form a totally ordered additive set
//! with a distinguished "infinity" meaning *never* — the next-event time of
//! a passive component.  Everything the engine needs is captured by the
//! [`SimTime`] trait; the shipped implementation is plain `f64`, which is
//! what most discrete-event scenarios use (seconds, with
//! `f64::INFINITY` as the passive sentinel).
//!
//! Durations and absolute times share one type.  `time_advance` returns a
//! duration, `next = last + ta` turns it into an absolute time, and
//! `elapsed = now - last` goes back.  Keeping a single type mirrors the
//! classical DEVS formulation and avoids a second generic parameter on
//! every engine struct.

use std::fmt;
use std::ops::{Add, Sub};

/// The contract a virtual-time type must satisfy.
///
/// Implementors must guarantee:
///
/// - `ZERO + t == t` for all `t`;
/// - `INFINITY` is greater than every finite value and absorbs addition
///   (`t + INFINITY == INFINITY`);
/// - comparison is a total order over every value the simulation can
///   produce (NaN-like values must never be returned by a model's
///   `time_advance`).
pub trait SimTime:
    Copy
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + fmt::Debug
    + fmt::Display
    + Send
    + Sync
    + 'static
{
    /// The additive identity — the conventional simulation start time.
    const ZERO: Self;

    /// The "never" sentinel: next-event time of a passive component.
    const INFINITY: Self;

    /// Does this value denote a passive (never-scheduled) component?
    #[inline]
    fn is_passive(self) -> bool {
        self == Self::INFINITY
    }
}

impl SimTime for f64 {
    const ZERO: Self = 0.0;
    const INFINITY: Self = f64::INFINITY;
}
