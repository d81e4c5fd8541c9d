//! `pdevs-cell` — Cell-DEVS topology synthesis.
//!
//! # Why this exists
//!
//! Spatial models couple every cell to every member of its neighborhood.
//! Declaring those edges by hand scales as O(cells × neighbors) and is the
//! single most error-prone part of assembling a cellular scenario.  This
//! crate inverts the declaration: each cell registers with a *vicinity
//! map* (neighbor id → vicinity value), and
//! [`CellScenario::couple_cells`] synthesizes the complete internal
//! coupling graph from the accumulated relations.
//!
//! # Crate layout
//!
//! | Module       | Contents                                           |
//! |--------------|----------------------------------------------------|
//! | [`scenario`] | `CellScenario` builder, `CellId` marker trait      |
//! | [`error`]    | `CellError`, `CellResult`                          |

pub mod error;
pub mod scenario;


pub use error::{CellError, CellResult};
pub use scenario::{CellId, CellScenario, VicinityMap};
