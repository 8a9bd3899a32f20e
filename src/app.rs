//! Command-line orchestration: generating, solving and rolling out mazes.

use std::{
    collections::HashMap,
    io::{self, Read, Write},
    sync::mpsc::Receiver,
};

use rand::{Rng, RngCore};
use thiserror::Error;

use crate::{
    env::{Action, Env, EnvError, MazeEnv, MetaEnv, SurroundingsEnv},
    generators::{GenerateError, Generator},
    maze::{Maze, Position},
    solvers::solve,
    stream::{StreamError, spawn_reader},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error(transparent)]
    Env(#[from] EnvError),
}

/// How mazes are generated and printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub rows: usize,
    pub cols: usize,
    /// Number of mazes to generate
    pub num: usize,
    /// Add a border of walls around each maze
    pub border: bool,
    /// Print with terminal colors
    pub color: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            rows: 11,
            cols: 11,
            num: 1,
            border: false,
            color: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Follow a shortest path from the solver
    Optimal,
    /// Pick one of the five actions uniformly at random
    Random,
}

/// How the environment stack for a rollout is assembled and driven.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloutOptions {
    /// Limit observations to a square of this radius around the agent
    pub horizon: Option<usize>,
    /// Episodes per meta-episode
    pub runs: usize,
    pub policy: Policy,
    /// Stop after this many steps even if the meta-episode is not done
    pub max_steps: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RolloutSummary {
    pub steps: usize,
    pub total_reward: f64,
    /// Inner episodes that reached the end
    pub episodes: usize,
    pub done: bool,
    pub observation_len: usize,
}

pub struct App {
    /// Maximum number of parsed mazes buffered between the reader thread and
    /// the solver
    max_mazes_in_channel_buffer: usize,
    /// Step cap for rollouts that don't set their own
    default_max_rollout_steps: usize,
}

impl Default for App {
    fn default() -> Self {
        Self {
            max_mazes_in_channel_buffer: 16,
            default_max_rollout_steps: 10_000,
        }
    }
}

impl App {
    /// Generates `options.num` mazes and writes them blank-line separated.
    pub fn generate(
        &self,
        generator: &dyn Generator,
        options: &GenerateOptions,
        rng: &mut dyn RngCore,
        out: &mut impl Write,
    ) -> Result<(), AppError> {
        tracing::info!(
            "Generating {} maze(s) of {}x{} with {}",
            options.num,
            options.rows,
            options.cols,
            generator.description()
        );
        for i in 0..options.num {
            let mut maze = generator.generate(options.rows, options.cols, rng)?;
            if options.border {
                maze = maze.bordered();
            }
            if options.color {
                writeln!(out, "{}", maze.colored())?;
            } else {
                writeln!(out, "{maze}")?;
            }
            if i + 1 < options.num {
                writeln!(out)?;
            }
        }
        Ok(())
    }

    /// Reads mazes on a worker thread and writes one solution per maze:
    /// either the full path or just its length.
    pub fn solve<R>(&self, input: R, length_only: bool, out: &mut impl Write) -> Result<usize, AppError>
    where
        R: Read + Send + 'static,
    {
        tracing::info!("Solving mazes with breadth-first search");
        let (rx, handle) = spawn_reader(input, self.max_mazes_in_channel_buffer);
        let result = write_solutions(&rx, length_only, out);
        // Dropping the receiver stops a reader that is still blocked on a send.
        drop(rx);
        if handle.join().is_err() {
            tracing::warn!("Maze reader thread panicked");
        }
        result
    }

    /// Builds base, windowed and meta layers over `maze` and drives them with
    /// `options.policy` until the meta-episode ends or the step cap is hit.
    pub fn rollout(
        &self,
        maze: Maze,
        options: &RolloutOptions,
        rng: &mut dyn RngCore,
    ) -> Result<RolloutSummary, AppError> {
        let next_action = match options.policy {
            Policy::Optimal => optimal_actions(&maze),
            Policy::Random => HashMap::new(),
        };
        if options.policy == Policy::Optimal && next_action.is_empty() && maze.start() != maze.end() {
            tracing::warn!("Maze has no solution, the optimal policy will stand still");
        }

        let base = MazeEnv::new(maze);
        let inner: Box<dyn Env> = match options.horizon {
            Some(horizon) => Box::new(SurroundingsEnv::new(base, horizon)),
            None => Box::new(base),
        };
        let mut env = MetaEnv::new(inner, options.runs);

        let observation_len = env.reset()?.len();
        let max_steps = options.max_steps.unwrap_or(self.default_max_rollout_steps);
        let mut summary = RolloutSummary {
            steps: 0,
            total_reward: 0.0,
            episodes: 0,
            done: false,
            observation_len,
        };
        while !summary.done && summary.steps < max_steps {
            let action = match options.policy {
                Policy::Optimal => next_action.get(&env.position()).copied().unwrap_or(Action::Nop),
                Policy::Random => Action::ALL[rng.random_range(0..Action::COUNT)],
            };
            let step = env.step(&action.one_hot())?;
            summary.steps += 1;
            summary.total_reward += step.reward;
            summary.done = step.done;
        }
        summary.episodes = env.num_runs() - env.runs_remaining();

        tracing::info!(
            "Rollout finished after {} steps with reward {} ({} of {} episodes)",
            summary.steps,
            summary.total_reward,
            summary.episodes,
            options.runs
        );
        Ok(summary)
    }
}

fn write_solutions(
    rx: &Receiver<Result<Maze, StreamError>>,
    length_only: bool,
    out: &mut impl Write,
) -> Result<usize, AppError> {
    let mut solved = 0;
    for maze in rx.iter() {
        let solution = solve(&maze?).unwrap_or_default();
        if length_only {
            writeln!(out, "{}", solution.len())?;
        } else {
            writeln!(out, "{}", format_path(&solution))?;
        }
        solved += 1;
    }
    Ok(solved)
}

/// For every cell on a shortest path, the action that leads to the next one.
fn optimal_actions(maze: &Maze) -> HashMap<Position, Action> {
    let Some(path) = solve(maze) else {
        return HashMap::new();
    };
    path.windows(2)
        .filter_map(|pair| Action::between(pair[0], pair[1]).map(|action| (pair[0], action)))
        .collect()
}

/// Formats a path as `[(r, c), (r, c), ...]`.
pub fn format_path(path: &[Position]) -> String {
    let cells = path.iter().map(Position::to_string).collect::<Vec<_>>();
    format!("[{}]", cells.join(", "))
}
