//! L-Tetracube Packing Solver Library
//!
//! Packs copies of the L-shaped tetracube into an N x N x N cube. The search
//! pipeline runs strictly forward:
//!
//! 1. [`geometry`] closes the three quarter turns into the 24 cube rotations
//! 2. [`placement`] enumerates every distinct in-bounds position of the piece
//! 3. [`dlx`] turns the placements into a Dancing Links exact-cover matrix
//! 4. [`solver`] searches that matrix for the first complete packing
//!
//! A solution is a list of placement row ids; [`Puzzle::resolve`] maps them
//! back to rotations and offsets.
//!
//! ```no_run
//! use tetracube::Puzzle;
//!
//! let puzzle = Puzzle::new(6)?;
//! if let Some(solution) = puzzle.solve(None)? {
//!     println!("{}", tetracube::grid::format_solution(&puzzle.grid, &puzzle.resolve(&solution)));
//! }
//! # Ok::<(), tetracube::PuzzleError>(())
//! ```

pub mod dlx;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod persistence;
pub mod pieces;
pub mod placement;
pub mod playback;
pub mod solver;

pub use error::PuzzleError;
pub use pieces::Puzzle;
pub use solver::{Search, SearchStats, Solution};
