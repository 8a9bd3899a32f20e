//! Grid-world environments over a [`Maze`].
//!
//! An external loop resets an environment, feeds it one-hot action vectors
//! and receives flat observation vectors and rewards until the episode is
//! done. [`MazeEnv`] is the base state machine; [`SurroundingsEnv`] and
//! [`MetaEnv`] wrap any [`Env`] to change what is observed or how episodes
//! are framed.

mod maze_env;
mod meta;
mod surroundings;

use thiserror::Error;

use crate::maze::{Cell, Maze, Position};

pub use maze_env::MazeEnv;
pub use meta::MetaEnv;
pub use surroundings::{MAX_HORIZON, SurroundingsEnv};

/// A flat, row-major list of per-cell blocks.
pub type Observation = Vec<f64>;

/// Values per cell in an observation: an "agent is here" flag followed by a
/// one-hot over empty, wall, start, end.
pub const CELL_BLOCK_LEN: usize = 1 + Cell::ALL.len();

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("step: maze is already solved")]
    AlreadySolved,
    #[error("step: meta-episode is already finished")]
    MetaEpisodeFinished,
}

/// The outcome of a single step.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
}

/// A maze environment driven by one-hot action vectors.
///
/// See [`Action`] for the action layout.
pub trait Env {
    /// Starts a new episode and returns the first observation.
    fn reset(&mut self) -> Result<Observation, EnvError>;

    /// Applies an action vector. The action taken is the arg-max index
    /// (see [`Action::from_vector`]).
    fn step(&mut self, action: &[f64]) -> Result<Step, EnvError>;

    /// The environment's map.
    fn maze(&self) -> &Maze;

    /// The agent's current position.
    fn position(&self) -> Position;
}

impl<E: Env + ?Sized> Env for Box<E> {
    fn reset(&mut self) -> Result<Observation, EnvError> {
        (**self).reset()
    }

    fn step(&mut self, action: &[f64]) -> Result<Step, EnvError> {
        (**self).step(action)
    }

    fn maze(&self) -> &Maze {
        (**self).maze()
    }

    fn position(&self) -> Position {
        (**self).position()
    }
}

/// The five symbolic actions, in the order of their one-hot indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Nop,
    Up,
    Right,
    Down,
    Left,
}

impl Action {
    pub const ALL: [Action; 5] = [Action::Nop, Action::Up, Action::Right, Action::Down, Action::Left];
    /// Length of a one-hot action vector.
    pub const COUNT: usize = Action::ALL.len();

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Action> {
        Action::ALL.get(idx).copied()
    }

    /// Picks the action at the arg-max of `values`.
    ///
    /// When several entries share the maximum, the last one wins. An empty
    /// vector, or an arg-max beyond the five known actions, is a no-op.
    pub fn from_vector(values: &[f64]) -> Action {
        arg_max(values).and_then(Action::from_index).unwrap_or(Action::Nop)
    }

    pub fn one_hot(self) -> [f64; Action::COUNT] {
        let mut res = [0.0; Action::COUNT];
        res[self.index()] = 1.0;
        res
    }

    /// Row and column deltas of the move.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Action::Nop => (0, 0),
            Action::Up => (-1, 0),
            Action::Right => (0, 1),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
        }
    }

    /// The action that moves from `from` to the adjacent `to`, if any.
    pub fn between(from: Position, to: Position) -> Option<Action> {
        let delta = (to.row - from.row, to.col - from.col);
        Action::ALL.into_iter().find(|a| a.offset() == delta)
    }
}

/// Index of the largest value, preferring the last of several equal maxima.
pub fn arg_max(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v < b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Encodes a `rows x cols` window of the maze whose top-left corner is
/// `(start_row, start_col)`. Cells outside the maze are encoded as walls.
pub fn one_hot_grid(
    maze: &Maze,
    agent: Position,
    start_row: i32,
    start_col: i32,
    rows: usize,
    cols: usize,
) -> Observation {
    let mut res = Vec::with_capacity(rows * cols * CELL_BLOCK_LEN);
    for row in start_row..start_row + rows as i32 {
        for col in start_col..start_col + cols as i32 {
            let pos = Position::new(row, col);
            let mut block = [0.0; CELL_BLOCK_LEN];
            if pos == agent && maze.in_bounds(pos) {
                block[0] = 1.0;
            }
            block[1 + maze.cell(pos).one_hot_index()] = 1.0;
            res.extend_from_slice(&block);
        }
    }
    res
}
