use std::collections::HashSet;

use rand::{Rng, RngCore};

use super::{GenerateError, Generator, shuffled_spaces};
use crate::maze::{Maze, Position, neighboring_spaces, neighbors};

/// Carves passages out of a solid grid with a randomized variant of Prim's
/// algorithm. The carved region is a tree, so there is exactly one route
/// between any two open cells.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PrimGenerator;

impl Generator for PrimGenerator {
    fn description(&self) -> &'static str {
        "randomized variant of Prim's algorithm"
    }

    fn generate(&self, rows: usize, cols: usize, rng: &mut dyn RngCore) -> Result<Maze, GenerateError> {
        if rows == 0 || cols == 0 {
            return Err(GenerateError::InvalidDimensions { rows, cols });
        }

        // Initialize the maze with walls
        let mut maze = Maze::filled(rows, cols, true);

        // Initialize the starting point
        let start = Position::new(rng.random_range(0..rows) as i32, rng.random_range(0..cols) as i32);
        maze.set_start(start);
        maze.set_wall(start, false);

        // Every position that has ever been put on the frontier
        let mut visited = HashSet::from([start]);
        let mut frontiers = neighbors(&maze, start).collect::<Vec<_>>();
        visited.extend(frontiers.iter().copied());

        // Pick a random frontier cell
        while !frontiers.is_empty() {
            let idx = rng.random_range(0..frontiers.len());
            let frontier = frontiers.swap_remove(idx);

            // Opening a cell next to two passages would join them into a cycle
            if neighboring_spaces(&maze, frontier).count() > 1 {
                continue;
            }
            maze.set_wall(frontier, false);

            let unvisited = neighbors(&maze, frontier)
                .filter(|p| !visited.contains(p))
                .collect::<Vec<_>>();
            for coord in unvisited {
                visited.insert(coord);
                frontiers.push(coord);
            }
        }

        let end = shuffled_spaces(&maze, &[start], rng)
            .first()
            .copied()
            .ok_or(GenerateError::NoEndCandidate)?;
        maze.set_end(end);

        tracing::debug!(
            "[prim] generated {}x{} maze, start {}, end {}",
            rows,
            cols,
            start,
            end
        );
        Ok(maze)
    }
}
