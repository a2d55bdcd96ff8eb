//! L-Tetracube Packing Solver
//!
//! Packs copies of the L-shaped tetracube into an N x N x N cube using
//! Dancing Links. Finds the first packing, optionally starting from a pinned
//! piece, prints it slice by slice and can step through it piece by piece.

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};

use tetracube::geometry::RotationGroup;
use tetracube::grid::{format_solution, MAX_GRID_SIDE};
use tetracube::persistence;
use tetracube::pieces::{Coord, Puzzle, CUBES_PER_PIECE, DEFAULT_GRID_SIDE};
use tetracube::placement::placements_per_rotation;
use tetracube::playback::{CancelToken, Playback};
use tetracube::PuzzleError;

/// Packs L-tetracubes into a cube and prints the packing.
#[derive(Parser)]
#[command(name = "tetracube")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Find the first packing and save it to disk.
    Solve(SolveArgs),
    /// Print the saved packing.
    Display,
    /// List the 24 cube rotations.
    Rotations,
    /// Count the placements of the piece in the grid.
    Placements {
        /// Side length of the cube.
        #[arg(long, default_value_t = DEFAULT_GRID_SIDE, value_parser = parse_side)]
        size: usize,
    },
}

#[derive(clap::Args)]
struct SolveArgs {
    /// Side length of the cube.
    #[arg(long, default_value_t = DEFAULT_GRID_SIDE, value_parser = parse_side)]
    size: usize,
    /// Rotation label of a piece that must be part of the packing, e.g. "Rx(90)".
    #[arg(long, requires = "at")]
    pin: Option<String>,
    /// Grid offset of the pinned piece as X,Y,Z.
    #[arg(long, value_parser = parse_coord, requires = "pin")]
    at: Option<Coord>,
    /// Print the packing one piece at a time with this pause in milliseconds.
    #[arg(long)]
    step_delay_ms: Option<u64>,
    /// Do not write solution.txt and solution.bin.
    #[arg(long)]
    no_save: bool,
}

impl Default for SolveArgs {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIDE,
            pin: None,
            at: None,
            step_delay_ms: None,
            no_save: false,
        }
    }
}

fn parse_side(s: &str) -> Result<usize, String> {
    let side: usize = s.parse().map_err(|e| format!("{e}"))?;
    if side == 0 {
        return Err("size must be at least 1".to_string());
    }
    if side > MAX_GRID_SIDE {
        return Err(format!("size must be at most {MAX_GRID_SIDE}"));
    }
    Ok(side)
}

fn parse_coord(s: &str) -> Result<Coord, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts[..] else {
        return Err(format!("expected X,Y,Z, got {s:?}"));
    };
    let parse = |v: &str| v.parse::<i32>().map_err(|e| format!("{v:?}: {e}"));
    Ok((parse(x)?, parse(y)?, parse(z)?))
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Command::Solve(args)) => run_solver(&args),
        Some(Command::Display) => run_display(),
        Some(Command::Rotations) => run_rotations(),
        Some(Command::Placements { size }) => run_placements(size),
        None => run_solver(&SolveArgs::default()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

/// Solves the puzzle, prints the packing and saves it to disk.
fn run_solver(args: &SolveArgs) -> Result<(), String> {
    let puzzle = Puzzle::new(args.size).map_err(|e| e.to_string())?;
    if puzzle.pieces_needed().is_none() {
        println!("{}", no_packing_reason(&puzzle));
        return Ok(());
    }

    let pinned_row = match (&args.pin, args.at) {
        (Some(label), Some(offset)) => {
            Some(puzzle.pin_row(label, offset).map_err(|e| e.to_string())?)
        }
        _ => None,
    };

    let Some(solution) = puzzle.solve(pinned_row).map_err(|e| e.to_string())? else {
        println!("No packing found");
        return Ok(());
    };

    if let Some(delay_ms) = args.step_delay_ms {
        play(&puzzle, &solution, Duration::from_millis(delay_ms));
    }

    println!("Found a packing with {} pieces:\n", solution.len());
    print!("{}", format_solution(&puzzle.grid, &puzzle.resolve(&solution)));

    if args.no_save {
        return Ok(());
    }
    if let Err(e) = persistence::save(Path::new("."), &puzzle, &solution) {
        eprintln!("Failed to save solution: {}", e);
    } else {
        println!(
            "Wrote {} and {}",
            persistence::SOLUTION_TXT,
            persistence::SOLUTION_BIN
        );
    }
    Ok(())
}

fn no_packing_reason(puzzle: &Puzzle) -> String {
    format!(
        "No packing found: {} cells is not a multiple of {}",
        puzzle.grid.cell_count(),
        CUBES_PER_PIECE
    )
}

/// Prints the solution one placement at a time.
fn play(puzzle: &Puzzle, solution: &[usize], delay: Duration) {
    let total = solution.len();
    for (step, row) in Playback::new(solution, delay, CancelToken::new()).enumerate() {
        let Some(placement) = puzzle.placements.get(row) else {
            continue;
        };
        let label = puzzle
            .rotations
            .get(placement.rotation_index)
            .map_or("?", |r| r.label.as_str());
        println!(
            "step {}/{}: row {} {} at {:?}",
            step + 1,
            total,
            row,
            label,
            placement.offset
        );
    }
}

/// Loads and prints the saved solution.
fn run_display() -> Result<(), String> {
    let (puzzle, saved) = persistence::load_verified(Path::new(".")).map_err(|e| {
        format!(
            "Could not load {}: {e}. Run 'tetracube solve' first.",
            persistence::SOLUTION_BIN
        )
    })?;

    println!("Loaded a packing with {} pieces:\n", saved.rows.len());
    print!("{}", format_solution(&puzzle.grid, &puzzle.resolve(&saved.rows)));
    Ok(())
}

/// Lists the rotation group in discovery order.
fn run_rotations() -> Result<(), String> {
    print!("{}", format_rotations().map_err(|e| e.to_string())?);
    Ok(())
}

fn format_rotations() -> Result<String, PuzzleError> {
    let group = RotationGroup::octahedral()?;
    let mut output = String::new();
    for (index, rotation) in group.iter().enumerate() {
        output.push_str(&format!(
            "{:>2}  {:<4} {:<16} {}\n",
            index,
            rotation.symmetry_class.to_string(),
            rotation.signed_permutation,
            rotation.label
        ));
    }
    Ok(output)
}

/// Prints the number of placements per rotation.
fn run_placements(size: usize) -> Result<(), String> {
    let puzzle = Puzzle::new(size).map_err(|e| e.to_string())?;
    let counts = placements_per_rotation(&puzzle.placements, puzzle.rotations.len());

    println!(
        "{} placements in a {}x{}x{} grid",
        puzzle.placements.len(),
        size,
        size,
        size
    );
    for (rotation, count) in puzzle.rotations.iter().zip(counts) {
        println!("{:>5}  {}", count, rotation.label);
    }
    Ok(())
}
