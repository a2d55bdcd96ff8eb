//! Dancing Links search for the first exact cover.
//!
//! Key points:
//! - Minimum-remaining-values column choice, leftmost column on ties
//! - Depth-first, stops at the first complete cover
//! - Free mode fixes the first cell's piece to the canonical rotation, so
//!   solutions that only differ by rotating that piece are not revisited
//! - Pinned mode starts from a caller-chosen placement instead

use std::time::Instant;

use crate::dlx::{ExactCoverMatrix, NodeId};
use crate::error::PuzzleError;
use crate::geometry::CANONICAL_ROTATION;
use crate::pieces::Puzzle;
use crate::placement::Placement;

/// Row ids of the chosen placements, in the order they were picked.
pub type Solution = Vec<usize>;

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Number of column choices made.
    pub nodes: usize,
    /// Number of times a column had no rows left.
    pub dead_ends: usize,
}

/// One backtracking search over an exclusively owned matrix.
///
/// The matrix is left in whatever state the search ends in, so a `Search`
/// answers a single question; build a new one for the next solve.
#[derive(Debug)]
pub struct Search {
    matrix: ExactCoverMatrix,
    partial: Vec<usize>,
    stats: SearchStats,
}

impl Search {
    pub fn new(matrix: ExactCoverMatrix) -> Self {
        Self {
            matrix,
            partial: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Rows chosen on the current search path.
    pub fn partial(&self) -> &[usize] {
        &self.partial
    }

    /// Extends the current partial solution to a full exact cover, if one exists.
    pub fn solve(&mut self) -> Option<Solution> {
        let Some(column) = self.matrix.choose_column() else {
            // every column covered
            return Some(self.partial.clone());
        };
        self.stats.nodes += 1;

        if self.matrix.column_size(column) == 0 {
            self.stats.dead_ends += 1;
            return None;
        }

        self.matrix.cover(column);

        let head = self.matrix.header_of(column);
        let mut node = self.matrix.down(head);
        while node != head {
            if let Some(solution) = self.try_row(node) {
                return Some(solution);
            }
            node = self.matrix.down(node);
        }

        self.matrix.uncover(column);
        None
    }

    /// Accepts the row of `node` (whose own column is already covered) and
    /// searches on; backtracks if that fails.
    fn try_row(&mut self, node: NodeId) -> Option<Solution> {
        self.partial.push(self.matrix.row_of(node));
        self.matrix.cover_row_siblings(node);

        if let Some(solution) = self.solve() {
            return Some(solution);
        }

        self.matrix.uncover_row_siblings(node);
        self.partial.pop();
        None
    }

    /// Runs the search, either from a pinned placement or with the first
    /// cell's piece restricted to the canonical rotation.
    ///
    /// `placements` must be the list the matrix was built from. Returns `None`
    /// when no cover exists, including when `pinned_row` is not in the matrix.
    pub fn solve_with_symmetry(
        &mut self,
        placements: &[Placement],
        pinned_row: Option<usize>,
    ) -> Option<Solution> {
        match pinned_row {
            Some(row) => self.solve_pinned(row),
            None => self.solve_canonical_first(placements),
        }
    }

    fn solve_pinned(&mut self, row: usize) -> Option<Solution> {
        let Some(node) = self.matrix.find_row_node(row) else {
            log::debug!("pinned row {row} is not in the matrix");
            return None;
        };

        self.partial.push(row);
        self.matrix.cover(self.matrix.column_of(node));
        self.matrix.cover_row_siblings(node);

        // the pinned piece already fixes the orientation, no filtering needed
        self.solve()
    }

    fn solve_canonical_first(&mut self, placements: &[Placement]) -> Option<Solution> {
        let Some(first) = self.matrix.first_column() else {
            return Some(self.partial.clone());
        };
        self.stats.nodes += 1;
        self.matrix.cover(first);

        let head = self.matrix.header_of(first);
        let mut node = self.matrix.down(head);
        while node != head {
            let row = self.matrix.row_of(node);
            let canonical = placements
                .get(row)
                .is_some_and(|p| p.rotation_index == CANONICAL_ROTATION);

            if canonical {
                if let Some(solution) = self.try_row(node) {
                    return Some(solution);
                }
            }
            node = self.matrix.down(node);
        }

        self.matrix.uncover(first);
        None
    }
}

impl Puzzle {
    /// Finds the first packing, optionally containing the placement `pinned_row`.
    ///
    /// Builds a fresh matrix for every call. `Ok(None)` means no packing was
    /// found.
    pub fn solve(&self, pinned_row: Option<usize>) -> Result<Option<Solution>, PuzzleError> {
        let start = Instant::now();
        let matrix = ExactCoverMatrix::from_placements(&self.placements, self.grid.cell_count())?;

        let mut search = Search::new(matrix);
        let solution = search.solve_with_symmetry(&self.placements, pinned_row);
        let stats = search.stats();

        log::debug!(
            "search visited {} nodes, {} dead ends",
            stats.nodes,
            stats.dead_ends
        );
        match &solution {
            Some(rows) => log::info!(
                "found a {}-piece packing in {:.2?}",
                rows.len(),
                start.elapsed()
            ),
            None => log::info!("no packing found after {:.2?}", start.elapsed()),
        }

        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::DEFAULT_GRID_SIDE;

    fn matrix_for(puzzle: &Puzzle) -> ExactCoverMatrix {
        ExactCoverMatrix::from_placements(&puzzle.placements, puzzle.grid.cell_count()).unwrap()
    }

    fn assert_exact_cover(puzzle: &Puzzle, solution: &[usize]) {
        let cells = puzzle.resolve(solution).into_iter().map(|p| &p.cells[..]);
        assert!(
            puzzle.grid.is_exact_partition(cells),
            "solution does not tile the cube: {solution:?}"
        );
    }

    #[test]
    fn test_knuth_example_has_unique_cover() {
        let rows: [&[usize]; 6] = [
            &[2, 4, 5],
            &[0, 3, 6],
            &[1, 2, 5],
            &[0, 3],
            &[1, 6],
            &[3, 4, 6],
        ];
        let mut search = Search::new(ExactCoverMatrix::new(&rows, 7).unwrap());
        let mut solution = search.solve().unwrap();
        solution.sort_unstable();
        assert_eq!(solution, [0, 3, 4]);
    }

    #[test]
    fn test_unsatisfiable_is_none() {
        let rows: [&[usize]; 2] = [&[0, 1], &[1, 2]];
        let mut search = Search::new(ExactCoverMatrix::new(&rows, 3).unwrap());
        assert_eq!(search.solve(), None);
        assert!(search.partial().is_empty());
    }

    #[test]
    fn test_failed_search_restores_matrix() {
        let puzzle = Puzzle::new(3).unwrap();
        let original = matrix_for(&puzzle);
        let mut search = Search::new(original.clone());
        assert_eq!(search.solve(), None);
        assert_eq!(search.matrix, original);
    }

    #[test]
    fn test_free_mode_tiles_6x6x6() {
        let puzzle = Puzzle::new(DEFAULT_GRID_SIDE).unwrap();
        let solution = puzzle.solve(None).unwrap().expect("6x6x6 is packable");
        assert_eq!(solution.len(), 54);
        assert_exact_cover(&puzzle, &solution);
        // the first cell's piece uses the canonical orientation
        assert_eq!(puzzle.placements[solution[0]].rotation_index, CANONICAL_ROTATION);
        assert!(puzzle.placements[solution[0]].cells.contains(&0));
    }

    #[test]
    fn test_free_mode_first_solution_6x6x6() {
        let puzzle = Puzzle::new(DEFAULT_GRID_SIDE).unwrap();
        let solution = puzzle.solve(None).unwrap().unwrap();
        assert_eq!(&solution[..8], &[0, 4, 251, 1214, 149, 399, 419, 24]);
        assert_eq!(solution[53], 2258);
    }

    #[test]
    fn test_pinned_solution_contains_pin() {
        let puzzle = Puzzle::new(DEFAULT_GRID_SIDE).unwrap();
        let pin = puzzle.pin_row("Id", (2, 2, 2)).unwrap();
        let solution = puzzle.solve(Some(pin)).unwrap().expect("pinned packing exists");
        assert_eq!(solution[0], pin);
        assert_eq!(solution.len(), 54);
        assert_exact_cover(&puzzle, &solution);
    }

    #[test]
    fn test_pinned_non_canonical_rotation() {
        let puzzle = Puzzle::new(4).unwrap();
        let pin = puzzle.pin_row("Rx(90)*Ry(90)", (1, 1, 1)).unwrap();
        if let Some(solution) = puzzle.solve(Some(pin)).unwrap() {
            assert!(solution.contains(&pin));
            assert_exact_cover(&puzzle, &solution);
        }
    }

    #[test]
    fn test_unknown_pin_is_none() {
        let puzzle = Puzzle::new(4).unwrap();
        assert_eq!(puzzle.solve(Some(puzzle.placements.len())).unwrap(), None);
    }

    #[test]
    fn test_repeated_solves_agree() {
        let puzzle = Puzzle::new(DEFAULT_GRID_SIDE).unwrap();
        let first = puzzle.solve(None).unwrap();
        let second = puzzle.solve(None).unwrap();
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_cell_count_not_multiple_of_four() {
        let puzzle = Puzzle::new(3).unwrap();
        assert_eq!(puzzle.solve(None).unwrap(), None);
    }

    #[test]
    fn test_grid_without_placements() {
        let puzzle = Puzzle::new(2).unwrap();
        assert!(puzzle.placements.is_empty());
        assert_eq!(puzzle.solve(None).unwrap(), None);
    }

    #[test]
    fn test_4x4x4_solution() {
        let puzzle = Puzzle::new(4).unwrap();
        let solution = puzzle.solve(None).unwrap().unwrap();
        assert_eq!(
            solution,
            [0, 33, 21, 36, 91, 80, 180, 162, 509, 147, 385, 531, 35, 286, 575, 237]
        );
        assert_exact_cover(&puzzle, &solution);
    }

    #[test]
    fn test_stats_are_counted() {
        let puzzle = Puzzle::new(4).unwrap();
        let mut search = Search::new(matrix_for(&puzzle));
        assert!(search.solve_with_symmetry(&puzzle.placements, None).is_some());
        assert!(search.stats().nodes >= 16);
    }
}
