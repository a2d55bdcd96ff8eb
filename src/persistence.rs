//! File I/O for saving and loading a packing.
//!
//! Binary format for `solution.bin` (little endian):
//! - u32: grid side
//! - u32: piece count
//! - repeat per piece:
//!   - u32: row id into the placement list of a puzzle with that side
//!
//! Row ids are only meaningful together with the placement enumeration order,
//! so loading re-enumerates the puzzle and validates the ids against it.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use crate::grid::format_solution;
use crate::pieces::Puzzle;

pub const SOLUTION_BIN: &str = "solution.bin";
pub const SOLUTION_TXT: &str = "solution.txt";

/// A packing read back from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSolution {
    pub side: usize,
    pub rows: Vec<usize>,
}

/// Saves a solution to both binary and text files in `dir`.
pub fn save(dir: &Path, puzzle: &Puzzle, solution: &[usize]) -> io::Result<()> {
    save_text(dir, puzzle, solution)?;
    save_binary(dir, puzzle.grid.side(), solution)?;
    Ok(())
}

/// Saves the solution in human-readable text format.
fn save_text(dir: &Path, puzzle: &Puzzle, solution: &[usize]) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(dir.join(SOLUTION_TXT))?);
    let placements = puzzle.resolve(solution);
    let side = puzzle.grid.side();

    writeln!(
        file,
        "{}x{}x{} packing with {} pieces:\n",
        side,
        side,
        side,
        placements.len()
    )?;
    write!(file, "{}", format_solution(&puzzle.grid, &placements))?;
    writeln!(file)?;

    for (ordinal, (&row, placement)) in solution.iter().zip(&placements).enumerate() {
        let label = puzzle
            .rotations
            .get(placement.rotation_index)
            .map_or("?", |r| r.label.as_str());
        let (x, y, z) = placement.offset;
        writeln!(file, "{ordinal:>3}  row {row:>5}  {label} at ({x}, {y}, {z})")?;
    }

    file.flush()
}

/// Saves the solution in compact binary format.
fn save_binary(dir: &Path, side: usize, solution: &[usize]) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(dir.join(SOLUTION_BIN))?);

    write_u32(&mut file, side)?;
    write_u32(&mut file, solution.len())?;
    for &row in solution {
        write_u32(&mut file, row)?;
    }

    file.flush()
}

fn write_u32(out: &mut impl Write, value: usize) -> io::Result<()> {
    let value = u32::try_from(value)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "value exceeds u32"))?;
    out.write_all(&value.to_le_bytes())
}

fn read_u32(input: &mut impl Read) -> io::Result<usize> {
    let mut buffer = [0u8; 4];
    input.read_exact(&mut buffer)?;
    Ok(u32::from_le_bytes(buffer) as usize)
}

/// Loads the solution saved in `dir`.
pub fn load(dir: &Path) -> io::Result<SavedSolution> {
    let mut file = File::open(dir.join(SOLUTION_BIN))?;

    let side = read_u32(&mut file)?;
    let count = read_u32(&mut file)?;

    let mut rows = Vec::with_capacity(count.min(1 << 16));
    for _ in 0..count {
        rows.push(read_u32(&mut file)?);
    }

    Ok(SavedSolution { side, rows })
}

/// Loads a saved solution and rebuilds the puzzle it refers to, rejecting
/// row ids that do not exist or do not tile the grid.
pub fn load_verified(dir: &Path) -> io::Result<(Puzzle, SavedSolution)> {
    let saved = load(dir)?;
    let puzzle = Puzzle::new(saved.side)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    if saved.rows.iter().any(|&row| row >= puzzle.placements.len()) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "saved row id out of range",
        ));
    }
    let cells = puzzle.resolve(&saved.rows).into_iter().map(|p| &p.cells[..]);
    if !puzzle.grid.is_exact_partition(cells) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "saved rows do not tile the grid",
        ));
    }

    Ok((puzzle, saved))
}
