use crossterm::style::{Color, StyledContent, Stylize};

use std::fmt;

/// Classification of a single maze cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    /// A passable cell that is neither the start nor the end.
    Empty,
    /// An impassable cell. Everything outside the grid is a wall too.
    Wall,
    /// The cell the agent starts from.
    Start,
    /// The goal cell.
    End,
}

impl Cell {
    /// Every cell type, in the order they appear in an observation block.
    pub const ALL: [Cell; 4] = [Cell::Empty, Cell::Wall, Cell::Start, Cell::End];

    /// The character used for this cell in the ASCII maze format.
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Wall => 'w',
            Cell::Start => 'A',
            Cell::End => 'x',
        }
    }

    /// Inverse of [`Cell::to_char`].
    pub fn from_char(ch: char) -> Option<Cell> {
        match ch {
            '.' => Some(Cell::Empty),
            'w' => Some(Cell::Wall),
            'A' => Some(Cell::Start),
            'x' => Some(Cell::End),
            _ => None,
        }
    }

    pub fn is_wall(self) -> bool {
        self == Cell::Wall
    }

    /// Position of this cell type in the one-hot part of an observation block,
    /// i.e. the offset after the leading "agent is here" flag.
    pub fn one_hot_index(self) -> usize {
        match self {
            Cell::Empty => 0,
            Cell::Wall => 1,
            Cell::Start => 2,
            Cell::End => 3,
        }
    }

    /// Colored form of the cell's character for terminal output.
    pub fn styled(self) -> StyledContent<char> {
        let ch = self.to_char();
        match self {
            Cell::Empty => ch.with(Color::Reset),
            Cell::Wall => ch.with(Color::DarkGrey),
            Cell::Start => ch.with(Color::Green).bold(),
            Cell::End => ch.with(Color::Red).bold(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
