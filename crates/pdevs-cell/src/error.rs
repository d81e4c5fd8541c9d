//! Cell-subsystem error type.

use pdevs_core::DevsError;
use thiserror::Error;

/// Errors produced by `pdevs-cell`.
#[derive(Debug, Error)]
pub enum CellError {
    /// A cell id was registered twice in the same scenario.
    #[error("cell '{0}' is already registered in this scenario")]
    DuplicateCell(String),

    /// The factory produced a model that is not shaped like a cell.
    #[error(
        "cell '{id}' must declare exactly one input and one output port \
         (found {inputs} input(s), {outputs} output(s))"
    )]
    InvalidCellInterface {
        id: String,
        inputs: usize,
        outputs: usize,
    },

    /// An underlying assembly error (unknown reference, port mismatch, …).
    #[error(transparent)]
    Assembly(#[from] DevsError),
}

pub type CellResult<T> = Result<T, CellError>;
