//! `pdevs-model` — the atomic-model contract.
//!
//! # Crate layout
//!
//! | Module      | Contents                                             |
//! |-------------|------------------------------------------------------|
//! | [`atomic`]  | `AtomicModel` trait — state, ports, transitions      |
//! | [`passive`] | `Passive` — placeholder model that never schedules   |
//!
//! # Design notes
//!
//! An atomic model owns its state privately: the engine never reads or
//! copies it, it only calls the trait methods at the times the P-DEVS
//! protocol dictates.  Output is computed from the *pre-transition* state
//! (`output` takes `&self` and is always called before the transition it
//! belongs to), which is what makes simultaneous events across sibling
//! models well-defined.

pub mod atomic;
pub mod passive;

#[cfg(test)]
mod tests;

pub use atomic::AtomicModel;
pub use passive::Passive;
