use rand::{RngCore, SeedableRng, rngs::StdRng, seq::SliceRandom};
use thiserror::Error;

mod island;
mod prim;

pub use island::IslandGenerator;
pub use prim::PrimGenerator;

use crate::maze::{Maze, Position};

/// Errors from generating a maze.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("maze dimensions must be positive, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("maze dimensions must be odd, got {rows}x{cols}")]
    EvenDimensions { rows: usize, cols: usize },
    #[error("no options for end")]
    NoEndCandidate,
    #[error("not enough spaces for a start and an end")]
    NotEnoughSpaces,
}

/// A tunable generator parameter, for exposing on a command line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub help: &'static str,
    pub default: f64,
}

/// A maze generation algorithm.
///
/// Every maze produced has `start != end`, neither on a wall, and the end
/// reachable from the start. All randomness comes from the supplied source,
/// so a seeded source reproduces the same maze.
pub trait Generator {
    fn generate(&self, rows: usize, cols: usize, rng: &mut dyn RngCore) -> Result<Maze, GenerateError>;

    /// A short description of what the algorithm does.
    fn description(&self) -> &'static str;

    /// The generator's tunable parameters with their defaults.
    fn params(&self) -> Vec<ParamSpec> {
        Vec::new()
    }
}

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    Prim,
    Island,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 2] = [GeneratorKind::Prim, GeneratorKind::Island];

    /// The name used to select this generator on the command line.
    pub fn name(self) -> &'static str {
        match self {
            GeneratorKind::Prim => "prim",
            GeneratorKind::Island => "island",
        }
    }

    /// The generator with its default parameters.
    pub fn with_defaults(self) -> Box<dyn Generator> {
        match self {
            GeneratorKind::Prim => Box::new(PrimGenerator),
            GeneratorKind::Island => Box::new(IslandGenerator::default()),
        }
    }
}

impl std::fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratorKind::Prim => write!(f, "Prim's Algorithm (randomized)"),
            GeneratorKind::Island => write!(f, "Wall Islands"),
        }
    }
}

/// Non-wall cells in random order, leaving out `exclude`.
fn shuffled_spaces(maze: &Maze, exclude: &[Position], rng: &mut dyn RngCore) -> Vec<Position> {
    let mut spaces = maze
        .positions()
        .filter(|&pos| !maze.wall(pos) && !exclude.contains(&pos))
        .collect::<Vec<_>>();
    spaces.shuffle(rng);
    spaces
}
