use rand::{Rng, RngCore};

use super::{GenerateError, Generator, ParamSpec, shuffled_spaces};
use crate::maze::{Maze, Position};

const DEFAULT_DENSITY: f64 = 0.75;
const DEFAULT_COMPLEXITY: f64 = 0.75;

/// Generates mazes by growing islands of walls on the odd lattice of an
/// initially empty grid, such that all spaces stay connected.
///
/// Both dimensions must be odd.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IslandGenerator {
    /// Controls the number of islands, from 0 to 1.
    /// A value of 0 selects the default.
    pub density: f64,
    /// Controls how large each island gets, from 0 to 1.
    /// A value of 0 selects the default.
    pub complexity: f64,
}

impl Default for IslandGenerator {
    fn default() -> Self {
        IslandGenerator {
            density: DEFAULT_DENSITY,
            complexity: DEFAULT_COMPLEXITY,
        }
    }
}

impl IslandGenerator {
    /// Number of islands and the maximum walk length of each.
    fn adjusted_params(&self, rows: usize, cols: usize) -> (usize, usize) {
        let density = if self.density == 0.0 {
            DEFAULT_DENSITY
        } else {
            self.density
        };
        let complexity = if self.complexity == 0.0 {
            DEFAULT_COMPLEXITY
        } else {
            self.complexity
        };
        let num_islands = (density * (rows / 2 + cols / 2) as f64) as usize;
        let island_size = (complexity * 5.0 * (rows + cols) as f64) as usize;
        (num_islands, island_size)
    }
}

impl Generator for IslandGenerator {
    fn description(&self) -> &'static str {
        "create islands of walls in odd positions"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec {
                name: "density",
                help: "the number of islands",
                default: DEFAULT_DENSITY,
            },
            ParamSpec {
                name: "complexity",
                help: "the size of islands",
                default: DEFAULT_COMPLEXITY,
            },
        ]
    }

    fn generate(&self, rows: usize, cols: usize, rng: &mut dyn RngCore) -> Result<Maze, GenerateError> {
        if rows == 0 || cols == 0 {
            return Err(GenerateError::InvalidDimensions { rows, cols });
        }
        if rows % 2 == 0 || cols % 2 == 0 {
            return Err(GenerateError::EvenDimensions { rows, cols });
        }

        let mut maze = Maze::filled(rows, cols, false);
        let (num_islands, island_size) = self.adjusted_params(rows, cols);

        for _ in 0..num_islands {
            // The island may start on the implicit border just outside the grid
            let mut current = Position::new(
                rng.random_range(0..rows / 2 + 2) as i32 * 2 - 1,
                rng.random_range(0..cols / 2 + 2) as i32 * 2 - 1,
            );
            if maze.in_bounds(current) {
                maze.set_wall(current, true);
            }

            for _ in 0..island_size {
                let destinations = spaces_two_cells_away(&maze, current);
                if destinations.is_empty() {
                    break;
                }
                let destination = destinations[rng.random_range(0..destinations.len())];
                let midpoint = Position::new(
                    current.row + (destination.row - current.row) / 2,
                    current.col + (destination.col - current.col) / 2,
                );
                maze.set_wall(midpoint, true);
                maze.set_wall(destination, true);
                current = destination;
            }
        }

        let spaces = shuffled_spaces(&maze, &[], rng);
        let &[start, end, ..] = spaces.as_slice() else {
            return Err(GenerateError::NotEnoughSpaces);
        };
        maze.set_start(start);
        maze.set_end(end);

        tracing::debug!(
            "[island] generated {}x{} maze with {} islands of up to {} steps, start {}, end {}",
            rows,
            cols,
            num_islands,
            island_size,
            start,
            end
        );
        Ok(maze)
    }
}

/// Open lattice junctions exactly two cells away along one axis.
fn spaces_two_cells_away(maze: &Maze, pos: Position) -> Vec<Position> {
    [-2, 2]
        .into_iter()
        .flat_map(|delta| [pos.offset(delta, 0), pos.offset(0, delta)])
        .filter(|&p| !maze.wall(p))
        .collect()
}
