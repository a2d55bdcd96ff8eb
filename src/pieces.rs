//! Piece shape and the puzzle definition.
//!
//! The puzzle packs copies of a single four-cube piece into an N x N x N cube.
//! The piece is given in its canonical orientation as unit cube offsets from
//! an anchor cube at the origin.

use crate::error::PuzzleError;
use crate::geometry::RotationGroup;
use crate::grid::Grid;
use crate::placement::{enumerate_placements, find_placement, Placement};

/// A 3D coordinate representing a unit cube position.
pub type Coord = (i32, i32, i32);

/// Number of unit cubes in the piece.
pub const CUBES_PER_PIECE: usize = 4;

/// Unit cube offsets of a piece in its canonical orientation.
pub type PieceShape = [Coord; CUBES_PER_PIECE];

/// The L-shaped tetracube: a bar of three cubes along y with a foot along x.
pub const L_TETRACUBE: PieceShape = [(0, 0, 0), (0, 1, 0), (0, 2, 0), (1, 0, 0)];

/// Side length of the cube the pieces are packed into.
pub const DEFAULT_GRID_SIDE: usize = 6;

/// Everything the solver needs for one grid size: the rotation group and
/// every distinct placement of the piece inside the grid.
///
/// Placements are indexed by row id; a solution is a list of those ids.
#[derive(Debug, Clone)]
pub struct Puzzle {
    pub grid: Grid,
    pub shape: PieceShape,
    pub rotations: RotationGroup,
    pub placements: Vec<Placement>,
}

impl Puzzle {
    /// Creates the L-tetracube puzzle for a cube of the given side.
    pub fn new(side: usize) -> Result<Self, PuzzleError> {
        Self::with_shape(side, L_TETRACUBE)
    }

    pub fn with_shape(side: usize, shape: PieceShape) -> Result<Self, PuzzleError> {
        let grid = Grid::new(side)?;
        let rotations = RotationGroup::octahedral()?;
        let placements = enumerate_placements(&rotations, &shape, &grid);
        Ok(Self {
            grid,
            shape,
            rotations,
            placements,
        })
    }

    /// Resolves a rotation label and grid offset to the row id of that placement.
    pub fn pin_row(&self, label: &str, offset: Coord) -> Result<usize, PuzzleError> {
        find_placement(&self.placements, &self.rotations, label, offset)
    }

    /// Looks up the placements referenced by a solution, keeping its order.
    ///
    /// Unknown row ids are skipped.
    pub fn resolve(&self, solution: &[usize]) -> Vec<&Placement> {
        solution
            .iter()
            .filter_map(|&row| self.placements.get(row))
            .collect()
    }

    /// Number of pieces a complete packing needs, or `None` if the cell count
    /// is not a multiple of the piece size.
    pub fn pieces_needed(&self) -> Option<usize> {
        let cells = self.grid.cell_count();
        (cells % CUBES_PER_PIECE == 0).then_some(cells / CUBES_PER_PIECE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_row_resolves_identity_at_center() {
        let puzzle = Puzzle::new(DEFAULT_GRID_SIDE).unwrap();
        let row = puzzle.pin_row("Id", (2, 2, 2)).unwrap();
        assert_eq!(row, 52);
        let placement = &puzzle.placements[row];
        assert_eq!(placement.rotation_index, 0);
        assert_eq!(placement.offset, (2, 2, 2));
    }

    #[test]
    fn test_pin_row_unknown_label() {
        let puzzle = Puzzle::new(4).unwrap();
        assert_eq!(
            puzzle.pin_row("Rq(45)", (0, 0, 0)),
            Err(PuzzleError::UnknownRotation {
                label: "Rq(45)".to_string()
            })
        );
    }

    #[test]
    fn test_pin_row_offset_that_does_not_fit() {
        let puzzle = Puzzle::new(4).unwrap();
        // the bar sticks out of the top of the grid
        assert_eq!(
            puzzle.pin_row("Id", (0, 3, 0)),
            Err(PuzzleError::PlacementNotFound {
                label: "Id".to_string(),
                offset: (0, 3, 0)
            })
        );
    }

    #[test]
    fn test_zero_side_is_rejected() {
        assert_eq!(Puzzle::new(0).unwrap_err(), PuzzleError::EmptyGrid);
    }

    #[test]
    fn test_pieces_needed() {
        assert_eq!(Puzzle::new(6).unwrap().pieces_needed(), Some(54));
        assert_eq!(Puzzle::new(3).unwrap().pieces_needed(), None);
    }

    #[test]
    fn test_resolve_skips_unknown_rows() {
        let puzzle = Puzzle::new(4).unwrap();
        let resolved = puzzle.resolve(&[0, usize::MAX, 1]);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0], &puzzle.placements[0]);
        assert_eq!(resolved[1], &puzzle.placements[1]);
    }
}
