//! Grid mazes for sequential decision-making experiments.
//!
//! [`maze`] holds the grid model and its ASCII format, [`generators`] builds
//! random solvable mazes, [`solvers`] finds shortest paths, and [`env`]
//! simulates an agent walking the grid with one-hot observations and
//! rewards.

pub mod app;
pub mod env;
pub mod generators;
pub mod maze;
pub mod solvers;
pub mod stream;

pub use env::{Action, Env, EnvError, MazeEnv, MetaEnv, Observation, Step, SurroundingsEnv};
pub use generators::{GenerateError, Generator, GeneratorKind, IslandGenerator, PrimGenerator};
pub use maze::{Cell, Maze, MazeError, ParseMazeError, Position};
pub use solvers::solve;
