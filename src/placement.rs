//! Enumeration of every distinct way the piece fits inside the grid.
//!
//! Each placement becomes one row of the exact-cover matrix, and its position
//! in the enumerated list is its row id.

use rustc_hash::FxHashSet;

use crate::error::PuzzleError;
use crate::geometry::{RotationGroup, RotationMatrix};
use crate::grid::Grid;
use crate::pieces::{Coord, PieceShape, CUBES_PER_PIECE};

/// One position of the piece: the rotation applied, the translation, and the
/// cells it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Index into the rotation group.
    pub rotation_index: usize,
    pub rotation: RotationMatrix,
    /// Grid position of the piece's anchor cube.
    pub offset: Coord,
    /// Covered cell indices in ascending order.
    pub cells: [usize; CUBES_PER_PIECE],
}

/// Enumerates all valid placements of `shape` in `grid`.
///
/// Visits rotations in group order, and for each rotation every translation
/// in z, y, x order. Two placements covering the same cells are the same
/// physical position, so only the first one found is kept.
pub fn enumerate_placements(
    rotations: &RotationGroup,
    shape: &PieceShape,
    grid: &Grid,
) -> Vec<Placement> {
    let mut seen: FxHashSet<[usize; CUBES_PER_PIECE]> = FxHashSet::default();
    let mut placements = Vec::new();

    for (rotation_index, rotation) in rotations.iter().enumerate() {
        let oriented = shape.map(|cube| rotation.matrix.apply(cube));

        for offset in grid.translations() {
            let Some(cells) = try_create_placement(&oriented, offset, grid) else {
                continue;
            };
            if !seen.insert(cells) {
                continue;
            }
            placements.push(Placement {
                rotation_index,
                rotation: rotation.matrix,
                offset,
                cells,
            });
        }
    }

    log::debug!(
        "{} placements for a {}x{}x{} grid",
        placements.len(),
        grid.side(),
        grid.side(),
        grid.side()
    );
    placements
}

/// Translates an oriented piece by `offset` and flattens it to sorted cell indices.
///
/// Returns `None` if any cube would fall outside the grid.
fn try_create_placement(
    oriented: &PieceShape,
    offset: Coord,
    grid: &Grid,
) -> Option<[usize; CUBES_PER_PIECE]> {
    let mut cells = [0; CUBES_PER_PIECE];

    for (slot, &(x, y, z)) in cells.iter_mut().zip(oriented) {
        let absolute = (x + offset.0, y + offset.1, z + offset.2);
        if !grid.contains(absolute) {
            return None;
        }
        *slot = grid.index(absolute);
    }

    cells.sort_unstable();
    assert!(
        cells[CUBES_PER_PIECE - 1] < grid.cell_count(),
        "placement at {offset:?} produced out-of-bounds cells {cells:?}"
    );
    assert!(
        cells.windows(2).all(|pair| pair[0] < pair[1]),
        "placement at {offset:?} covers a cell twice: {cells:?}"
    );
    Some(cells)
}

/// Finds the row id of the placement with the given rotation label and offset.
pub fn find_placement(
    placements: &[Placement],
    rotations: &RotationGroup,
    label: &str,
    offset: Coord,
) -> Result<usize, PuzzleError> {
    let rotation_index =
        rotations
            .position_of(label)
            .ok_or_else(|| PuzzleError::UnknownRotation {
                label: label.to_string(),
            })?;

    placements
        .iter()
        .position(|p| p.rotation_index == rotation_index && p.offset == offset)
        .ok_or_else(|| PuzzleError::PlacementNotFound {
            label: label.to_string(),
            offset,
        })
}

/// Counts placements per rotation index.
pub fn placements_per_rotation(placements: &[Placement], rotation_count: usize) -> Vec<usize> {
    let mut counts = vec![0; rotation_count];
    for placement in placements {
        if let Some(count) = counts.get_mut(placement.rotation_index) {
            *count += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::L_TETRACUBE;

    fn placements_for(side: usize) -> (Grid, Vec<Placement>) {
        let grid = Grid::new(side).unwrap();
        let rotations = RotationGroup::octahedral().unwrap();
        let placements = enumerate_placements(&rotations, &L_TETRACUBE, &grid);
        (grid, placements)
    }

    #[test]
    fn test_placements_are_valid_6x6x6() {
        let (grid, placements) = placements_for(6);
        for placement in &placements {
            assert!(placement.cells.iter().all(|&c| c < grid.cell_count()));
            assert!(placement.cells.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[test]
    fn test_placement_count_6x6x6() {
        let (_, placements) = placements_for(6);
        assert_eq!(placements.len(), 2880);
        assert_eq!(placements_per_rotation(&placements, 24), vec![120; 24]);
    }

    #[test]
    fn test_placement_count_small_grids() {
        assert_eq!(placements_for(2).1.len(), 0);
        assert_eq!(placements_for(3).1.len(), 144);
        assert_eq!(placements_for(4).1.len(), 576);
    }

    #[test]
    fn test_enumeration_is_repeatable() {
        let (_, first) = placements_for(6);
        let (_, second) = placements_for(6);
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_duplicate_footprints() {
        let (_, placements) = placements_for(5);
        let unique: FxHashSet<[usize; CUBES_PER_PIECE]> =
            placements.iter().map(|p| p.cells).collect();
        assert_eq!(unique.len(), placements.len());
    }

    #[test]
    fn test_first_placement_is_canonical_at_origin() {
        let (_, placements) = placements_for(6);
        let first = &placements[0];
        assert_eq!(first.rotation_index, 0);
        assert_eq!(first.offset, (0, 0, 0));
        assert_eq!(first.cells, [0, 1, 6, 12]);
    }

    #[test]
    fn test_cells_match_rotated_shape() {
        let (grid, placements) = placements_for(6);
        for placement in placements.iter().step_by(37) {
            let mut expected = L_TETRACUBE.map(|cube| {
                let (x, y, z) = placement.rotation.apply(cube);
                let (ox, oy, oz) = placement.offset;
                grid.index((x + ox, y + oy, z + oz))
            });
            expected.sort_unstable();
            assert_eq!(placement.cells, expected);
        }
    }

    #[test]
    fn test_symmetric_shape_is_deduplicated() {
        // a straight bar looks the same under many rotations
        let grid = Grid::new(4).unwrap();
        let rotations = RotationGroup::octahedral().unwrap();
        let bar: PieceShape = [(0, 0, 0), (1, 0, 0), (2, 0, 0), (3, 0, 0)];
        let placements = enumerate_placements(&rotations, &bar, &grid);
        // 16 lines along each of the three axes
        assert_eq!(placements.len(), 48);
    }

    #[test]
    fn test_find_placement() {
        let (_, placements) = placements_for(4);
        let rotations = RotationGroup::octahedral().unwrap();
        let row = find_placement(&placements, &rotations, "Rx(90)", (0, 3, 0)).unwrap();
        assert_eq!(placements[row].rotation_index, 1);
        assert_eq!(placements[row].offset, (0, 3, 0));
    }
}
