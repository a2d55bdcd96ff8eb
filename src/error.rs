//! Error types for puzzle setup and pin resolution.
//!
//! An unsatisfiable puzzle is not an error: solving reports it as `Ok(None)`.

use crate::pieces::Coord;

/// Failures raised while building a puzzle or resolving a pinned piece.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PuzzleError {
    /// The rotation closure did not reach the expected group order.
    #[display("rotation closure produced {found} elements, expected {expected}")]
    IncompleteRotationGroup { found: usize, expected: usize },
    /// A grid must have at least one cell per axis.
    #[display("grid side must be at least 1")]
    EmptyGrid,
    /// The grid side exceeds the largest supported cube.
    #[display("grid side {side} exceeds the maximum of {max}")]
    GridTooLarge { side: usize, max: usize },
    /// A matrix row references a column that does not exist.
    #[display("row {row} covers cell {cell}, but the matrix has only {columns} columns")]
    CellOutOfRange {
        row: usize,
        cell: usize,
        columns: usize,
    },
    /// No rotation in the group carries this label.
    #[display("unknown rotation label {label:?}")]
    UnknownRotation { label: String },
    /// The rotation exists, but no valid placement uses it at this offset.
    #[display("no placement for rotation {label:?} at offset {offset:?}")]
    PlacementNotFound { label: String, offset: Coord },
}
