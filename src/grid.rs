//! Grid representation and operations for the cube being packed.
//!
//! Cells are addressed by a flat index with x varying fastest:
//! `idx = x + y * N + z * N * N`. The same index is the column of the cell in
//! the exact-cover matrix.

use crate::error::PuzzleError;
use crate::pieces::Coord;
use crate::placement::Placement;

/// Symbols used to label pieces when printing a solution.
const PIECE_SYMBOLS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Largest supported side. Keeps `N^3` and the `i32` coordinates in range and
/// the placement table small enough to enumerate.
pub const MAX_GRID_SIDE: usize = 64;

/// A cubic lattice of side `N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    side: usize,
}

impl Grid {
    pub fn new(side: usize) -> Result<Self, PuzzleError> {
        if side == 0 {
            return Err(PuzzleError::EmptyGrid);
        }
        if side > MAX_GRID_SIDE {
            return Err(PuzzleError::GridTooLarge {
                side,
                max: MAX_GRID_SIDE,
            });
        }
        Ok(Self { side })
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Total number of cells, `N^3`.
    pub fn cell_count(&self) -> usize {
        self.side * self.side * self.side
    }

    /// Whether every coordinate lies in `[0, N)`.
    #[inline]
    pub fn contains(&self, (x, y, z): Coord) -> bool {
        let range = 0..self.side as i32;
        range.contains(&x) && range.contains(&y) && range.contains(&z)
    }

    /// Converts in-bounds coordinates to a linear cell index.
    #[inline]
    pub fn index(&self, (x, y, z): Coord) -> usize {
        x as usize + y as usize * self.side + z as usize * self.side * self.side
    }

    /// Converts a linear cell index to coordinates.
    #[inline]
    pub fn coords(&self, index: usize) -> Coord {
        let n = self.side;
        (
            (index % n) as i32,
            ((index / n) % n) as i32,
            (index / (n * n)) as i32,
        )
    }

    /// Every translation inside the grid, z outermost and x innermost.
    pub fn translations(&self) -> impl Iterator<Item = Coord> {
        let n = self.side as i32;
        (0..n).flat_map(move |z| (0..n).flat_map(move |y| (0..n).map(move |x| (x, y, z))))
    }

    /// Returns true if the cell sets together cover every cell exactly once.
    pub fn is_exact_partition<'a>(&self, cell_sets: impl IntoIterator<Item = &'a [usize]>) -> bool {
        let mut covered = vec![false; self.cell_count()];
        for cells in cell_sets {
            for &cell in cells {
                match covered.get_mut(cell) {
                    Some(seen) if !*seen => *seen = true,
                    _ => return false,
                }
            }
        }
        covered.into_iter().all(|seen| seen)
    }
}

/// Converts a solution to a flat grid of piece ordinals.
///
/// Each cell holds the position of its piece within `solution`, or `None` if
/// nothing covers it.
pub fn solution_to_grid(grid: &Grid, solution: &[&Placement]) -> Vec<Option<usize>> {
    let mut cells = vec![None; grid.cell_count()];

    for (ordinal, placement) in solution.iter().enumerate() {
        for &cell in &placement.cells {
            if let Some(slot) = cells.get_mut(cell) {
                *slot = Some(ordinal);
            }
        }
    }

    cells
}

/// Formats a solution as a human-readable string.
///
/// Displays the N z-slices side by side, one character per cell naming the
/// piece. Empty cells show as '.'.
pub fn format_solution(grid: &Grid, solution: &[&Placement]) -> String {
    let cells = solution_to_grid(grid, solution);
    let n = grid.side();

    // header: z=0, z=1, ..., z=N-1
    let mut header = String::new();
    for z in 0..n {
        if z > 0 {
            header.push_str("  ");
        }
        header.push_str(&format!("z={:<width$}", z, width = n));
    }
    let mut output = header.trim_end().to_string();
    output.push('\n');

    // rows from top (y=N-1) to bottom (y=0)
    for y in (0..n).rev() {
        for z in 0..n {
            if z > 0 {
                output.push_str("  ");
            }
            for x in 0..n {
                let display_char = match cells[x + y * n + z * n * n] {
                    None => '.',
                    Some(ordinal) => PIECE_SYMBOLS.get(ordinal).map_or('#', |&b| char::from(b)),
                };
                output.push(display_char);
            }
        }
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::RotationMatrix;

    fn placement(cells: [usize; 4]) -> Placement {
        Placement {
            rotation_index: 0,
            rotation: RotationMatrix::IDENTITY,
            offset: (0, 0, 0),
            cells,
        }
    }

    #[test]
    fn test_coordinate_conversion_roundtrip_6x6x6() {
        let grid = Grid::new(6).unwrap();
        for idx in 0..grid.cell_count() {
            let coord = grid.coords(idx);
            assert!(grid.contains(coord), "coords({idx}) out of range: {coord:?}");
            assert_eq!(grid.index(coord), idx, "Roundtrip failed for index {idx}");
        }
    }

    #[test]
    fn test_index_is_x_fastest() {
        let grid = Grid::new(6).unwrap();
        assert_eq!(grid.index((1, 0, 0)), 1);
        assert_eq!(grid.index((0, 1, 0)), 6);
        assert_eq!(grid.index((0, 0, 1)), 36);
        assert_eq!(grid.index((5, 5, 5)), 215);
    }

    #[test]
    fn test_contains_rejects_outside() {
        let grid = Grid::new(3).unwrap();
        assert!(grid.contains((2, 2, 2)));
        assert!(!grid.contains((3, 0, 0)));
        assert!(!grid.contains((0, -1, 0)));
    }

    #[test]
    fn test_translations_order() {
        let grid = Grid::new(2).unwrap();
        let offsets: Vec<Coord> = grid.translations().collect();
        assert_eq!(
            offsets,
            [
                (0, 0, 0),
                (1, 0, 0),
                (0, 1, 0),
                (1, 1, 0),
                (0, 0, 1),
                (1, 0, 1),
                (0, 1, 1),
                (1, 1, 1)
            ]
        );
    }

    #[test]
    fn test_exact_partition() {
        let grid = Grid::new(2).unwrap();
        let a = [0, 1, 2, 3];
        let b = [4, 5, 6, 7];
        let overlapping = [3, 4, 5, 6];
        assert!(grid.is_exact_partition([&a[..], &b[..]]));
        assert!(!grid.is_exact_partition([&a[..]]));
        assert!(!grid.is_exact_partition([&a[..], &b[..], &overlapping[..]]));
        assert!(!grid.is_exact_partition([&a[..], &b[..], &[8][..]]));
    }

    #[test]
    fn test_side_bounds() {
        assert_eq!(Grid::new(0), Err(PuzzleError::EmptyGrid));
        assert_eq!(Grid::new(MAX_GRID_SIDE).unwrap().side(), MAX_GRID_SIDE);
        assert_eq!(
            Grid::new(3_000_000),
            Err(PuzzleError::GridTooLarge {
                side: 3_000_000,
                max: MAX_GRID_SIDE
            })
        );
    }

    #[test]
    fn test_format_partial_solution() {
        let grid = Grid::new(2).unwrap();
        let first = placement([0, 1, 2, 3]);
        let output = format_solution(&grid, &[&first]);
        assert_eq!(output, "z=0   z=1\n00  ..\n00  ..\n");
    }
}
