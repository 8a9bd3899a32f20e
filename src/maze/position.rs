use std::fmt;

use super::Maze;

/// A (row, column) location on a maze grid.
///
/// Coordinates are signed so that positions just outside the grid can be
/// expressed; such positions are always treated as walls.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }

    /// Returns the position shifted by the given row and column deltas.
    pub const fn offset(self, d_row: i32, d_col: i32) -> Self {
        Position {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Get the in-bounds neighbors of a cell.
/// A neighbor is one step away in the cardinal directions, visited in the
/// order up, down, left, right.
pub fn neighbors(maze: &Maze, pos: Position) -> impl Iterator<Item = Position> + '_ {
    [(-1, 0), (1, 0), (0, -1), (0, 1)]
        .into_iter()
        .map(move |(d_row, d_col)| pos.offset(d_row, d_col))
        .filter(|&p| maze.in_bounds(p))
}

/// Get the neighbors of a cell that are not walls.
pub fn neighboring_spaces(maze: &Maze, pos: Position) -> impl Iterator<Item = Position> + '_ {
    neighbors(maze, pos).filter(|&p| !maze.wall(p))
}
