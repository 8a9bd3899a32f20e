pub mod cell;
mod position;

use std::{fmt, str::FromStr};

use thiserror::Error;

pub use cell::Cell;
pub use position::{Position, neighboring_spaces, neighbors};

/// Errors from building a [`Maze`] out of raw parts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("expected {expected} wall flags for the grid, got {found}")]
    WallCount { expected: usize, found: usize },
    #[error("{marker} position {pos} is out of bounds")]
    OutOfBounds { marker: &'static str, pos: Position },
    #[error("{marker} position {pos} is a wall")]
    OnWall { marker: &'static str, pos: Position },
}

/// Errors from parsing the ASCII maze format.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseMazeError {
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("invalid character {ch:?} at row {row}, column {col}")]
    InvalidChar { ch: char, row: usize, col: usize },
    #[error("expected exactly one start marker 'A', found {0}")]
    StartCount(usize),
    #[error("expected exactly one end marker 'x', found {0}")]
    EndCount(usize),
}

/// A rectangular grid of wall and open cells with a start and an end.
///
/// Everything outside `[0, rows) x [0, cols)` counts as wall, so a maze is
/// implicitly surrounded by an infinite border. Once built, a maze is never
/// mutated; [`Maze::bordered`] produces a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    rows: usize,
    cols: usize,
    start: Position,
    end: Position,
    /// Row-major wall flags, one per cell.
    walls: Box<[bool]>,
}

impl Maze {
    /// Creates a maze from row-major wall flags.
    ///
    /// Fails if the flag count does not match the grid, or if the start or
    /// end is out of bounds or on a wall. Connectivity is not checked; use
    /// [`crate::solvers::solve`] for that.
    pub fn new(
        rows: usize,
        cols: usize,
        walls: Vec<bool>,
        start: Position,
        end: Position,
    ) -> Result<Self, MazeError> {
        if walls.len() != rows * cols {
            return Err(MazeError::WallCount {
                expected: rows * cols,
                found: walls.len(),
            });
        }
        let maze = Maze {
            rows,
            cols,
            start,
            end,
            walls: walls.into_boxed_slice(),
        };
        for (marker, pos) in [("start", start), ("end", end)] {
            if !maze.in_bounds(pos) {
                return Err(MazeError::OutOfBounds { marker, pos });
            }
            if maze.wall(pos) {
                return Err(MazeError::OnWall { marker, pos });
            }
        }
        Ok(maze)
    }

    /// A grid of the given size with every cell set to `wall` and start/end
    /// still unset. Generators carve into this before handing it out.
    pub(crate) fn filled(rows: usize, cols: usize, wall: bool) -> Self {
        Maze {
            rows,
            cols,
            start: Position::default(),
            end: Position::default(),
            walls: vec![wall; rows * cols].into_boxed_slice(),
        }
    }

    pub(crate) fn set_wall(&mut self, pos: Position, wall: bool) {
        let idx = self.cell_index(pos);
        self.walls[idx] = wall;
    }

    pub(crate) fn set_start(&mut self, pos: Position) {
        self.start = pos;
    }

    pub(crate) fn set_end(&mut self, pos: Position) {
        self.end = pos;
    }

    /// Returns the height of the maze in cells.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the width of the maze in cells.
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Row-major wall flags.
    pub fn walls(&self) -> &[bool] {
        &self.walls
    }

    /// Checks if the position lies within the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row >= 0
            && pos.col >= 0
            && (pos.row as usize) < self.rows
            && (pos.col as usize) < self.cols
    }

    /// Checks if the position is a wall. Out-of-bounds positions are walls.
    pub fn wall(&self, pos: Position) -> bool {
        if !self.in_bounds(pos) {
            return true;
        }
        self.walls[self.cell_index(pos)]
    }

    /// Row-major index of an in-bounds position.
    ///
    /// # Panics
    /// If `pos` is out of bounds. Callers bounds-check first.
    pub fn cell_index(&self, pos: Position) -> usize {
        if !self.in_bounds(pos) {
            panic!(
                "position {pos} is out of bounds for a {}x{} maze",
                self.rows, self.cols
            );
        }
        pos.row as usize * self.cols + pos.col as usize
    }

    /// All in-bounds positions in row-major order, matching [`Maze::walls`].
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let cols = self.cols as i32;
        (0..self.rows as i32).flat_map(move |row| (0..cols).map(move |col| Position::new(row, col)))
    }

    /// Classifies a position. The start takes precedence over the end if
    /// they coincide, and anything out of bounds is a wall.
    pub fn cell(&self, pos: Position) -> Cell {
        if self.wall(pos) {
            Cell::Wall
        } else if pos == self.start {
            Cell::Start
        } else if pos == self.end {
            Cell::End
        } else {
            Cell::Empty
        }
    }

    /// Creates a new maze with a ring of walls around this one.
    /// Every cell, including start and end, is shifted by (+1, +1).
    pub fn bordered(&self) -> Maze {
        let mut res = Maze::filled(self.rows + 2, self.cols + 2, true);
        res.start = self.start.offset(1, 1);
        res.end = self.end.offset(1, 1);
        for pos in self.positions() {
            res.set_wall(pos.offset(1, 1), self.wall(pos));
        }
        res
    }

    /// Parses the ASCII format produced by the `Display` impl: one line per
    /// row, `A` for the start, `x` for the end, `w` for walls and `.` for
    /// empty cells.
    pub fn parse(text: &str) -> Result<Maze, ParseMazeError> {
        let lines = text.lines().collect::<Vec<_>>();
        let rows = lines.len();
        let cols = lines.first().map_or(0, |line| line.chars().count());

        let mut walls = Vec::with_capacity(rows * cols);
        let mut starts = Vec::new();
        let mut ends = Vec::new();
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(ParseMazeError::RaggedRow {
                    row,
                    expected: cols,
                    found,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let cell =
                    Cell::from_char(ch).ok_or(ParseMazeError::InvalidChar { ch, row, col })?;
                let pos = Position::new(row as i32, col as i32);
                match cell {
                    Cell::Start => starts.push(pos),
                    Cell::End => ends.push(pos),
                    Cell::Empty | Cell::Wall => {}
                }
                walls.push(cell.is_wall());
            }
        }

        let (start, end) = match (starts.as_slice(), ends.as_slice()) {
            (&[start], &[end]) => (start, end),
            (&[_], _) => return Err(ParseMazeError::EndCount(ends.len())),
            _ => return Err(ParseMazeError::StartCount(starts.len())),
        };

        Ok(Maze {
            rows,
            cols,
            start,
            end,
            walls: walls.into_boxed_slice(),
        })
    }

    /// Renders the maze with terminal colors. Same layout as `Display`.
    pub fn colored(&self) -> String {
        (0..self.rows as i32)
            .map(|row| {
                (0..self.cols as i32)
                    .map(|col| self.cell(Position::new(row, col)).styled().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows as i32 {
            if row > 0 {
                writeln!(f)?;
            }
            for col in 0..self.cols as i32 {
                write!(f, "{}", self.cell(Position::new(row, col)))?;
            }
        }
        Ok(())
    }
}

impl FromStr for Maze {
    type Err = ParseMazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Maze::parse(s)
    }
}
