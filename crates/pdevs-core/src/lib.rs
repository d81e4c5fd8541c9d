//! `pdevs-core` — foundational types for the `rust_pdevs` simulation kernel.
//!
//! This crate is a dependency of every other `pdevs-*` crate.  It
//! intentionally has no `pdevs-*` dependencies and minimal external ones
//! (only `rustc-hash` and `thiserror`).
//!
//! # What lives here
//!
//! | Module    | Contents                                            |
//! |-----------|-----------------------------------------------------|
//! | [`time`]  | `SimTime` trait, `f64` virtual-time implementation  |
//! | [`port`]  | `PortSpec` — named, typed port declarations         |
//! | [`bag`]   | `Message`, `Bag` — per-port message multisets       |
//! | [`error`] | `DevsError`, `DevsResult`                           |

pub mod bag;
pub mod error;
pub mod port;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use bag::{Bag, Message};
pub use error::{DevsError, DevsResult};
pub use port::PortSpec;
pub use time::SimTime;
