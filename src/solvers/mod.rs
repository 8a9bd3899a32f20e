mod bfs;

use crate::maze::{Maze, Position};
use bfs::solve_bfs;

/// Finds an optimal solution to the maze with a breadth-first search.
///
/// The solution lists every position visited, including the start and the
/// end. Only the length is guaranteed; which of several equally short
/// routes comes back depends on the order neighbors are explored in.
///
/// Returns `None` if the end is unreachable.
pub fn solve(maze: &Maze) -> Option<Vec<Position>> {
    solve_bfs(maze)
}

/// Number of positions on the optimal solution, or 0 if there is none.
pub fn solution_length(maze: &Maze) -> usize {
    solve(maze).map_or(0, |path| path.len())
}
