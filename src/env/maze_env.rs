use std::sync::Arc;

use super::{Action, Env, EnvError, Observation, Step, one_hot_grid};
use crate::maze::{Maze, Position};

/// Reward for every step that does not reach the end.
pub const STEP_REWARD: f64 = -1.0;
/// Reward for the step that reaches the end.
pub const SOLVED_REWARD: f64 = 0.0;

/// The base maze environment.
///
/// Observations cover the whole grid in row-major order, see
/// [`one_hot_grid`]. Rewards are -1 until the maze is solved, at which
/// point the episode ends with a reward of 0, so shorter solutions collect
/// more reward. Stepping a solved maze is an error until the next reset.
///
/// The maze is shared read-only; only the agent position changes.
#[derive(Debug, Clone)]
pub struct MazeEnv {
    maze: Arc<Maze>,
    position: Position,
}

impl MazeEnv {
    /// Creates an environment with the agent on the maze's start.
    pub fn new(maze: impl Into<Arc<Maze>>) -> Self {
        let maze = maze.into();
        let position = maze.start();
        MazeEnv { maze, position }
    }

    /// Check if the agent has reached the end.
    pub fn solved(&self) -> bool {
        self.position == self.maze.end()
    }

    /// Length of every observation this environment produces.
    pub fn observation_len(&self) -> usize {
        self.maze.rows() * self.maze.cols() * super::CELL_BLOCK_LEN
    }

    fn observation(&self) -> Observation {
        one_hot_grid(&self.maze, self.position, 0, 0, self.maze.rows(), self.maze.cols())
    }
}

impl Env for MazeEnv {
    fn reset(&mut self) -> Result<Observation, EnvError> {
        self.position = self.maze.start();
        Ok(self.observation())
    }

    fn step(&mut self, action: &[f64]) -> Result<Step, EnvError> {
        if self.solved() {
            return Err(EnvError::AlreadySolved);
        }

        let (d_row, d_col) = Action::from_vector(action).offset();
        let new_pos = self.position.offset(d_row, d_col);
        if self.maze.wall(new_pos) {
            tracing::trace!("[env] blocked moving to {}", new_pos);
        } else {
            tracing::trace!("[env] moving to {}", new_pos);
            self.position = new_pos;
        }

        let done = self.solved();
        if done {
            tracing::debug!("[env] reached the end at {}", self.position);
        }
        Ok(Step {
            observation: self.observation(),
            reward: if done { SOLVED_REWARD } else { STEP_REWARD },
            done,
        })
    }

    fn maze(&self) -> &Maze {
        &self.maze
    }

    fn position(&self) -> Position {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::tests::{example_maze, obs_close, one_hot_action};

    #[rustfmt::skip]
    const EXPECTED_INITIAL: [f64; 80] = [
        0., 1., 0., 0., 0.,
        0., 1., 0., 0., 0.,
        0., 1., 0., 0., 0.,
        0., 0., 1., 0., 0.,

        0., 1., 0., 0., 0.,
        0., 0., 1., 0., 0.,
        0., 0., 0., 0., 1.,
        0., 0., 1., 0., 0.,

        1., 0., 0., 1., 0.,
        0., 0., 1., 0., 0.,
        0., 0., 1., 0., 0.,
        0., 0., 1., 0., 0.,

        0., 1., 0., 0., 0.,
        0., 1., 0., 0., 0.,
        0., 1., 0., 0., 0.,
        0., 0., 1., 0., 0.,
    ];

    fn assert_not_done(step: &Step) {
        assert_eq!(step.reward, -1.0);
        assert!(!step.done);
    }

    #[test]
    fn test_env() {
        let mut env = MazeEnv::new(example_maze());
        let obs = env.reset().unwrap();
        assert!(obs_close(&obs, &EXPECTED_INITIAL));
        assert_eq!(obs.len(), env.observation_len());

        // All these directions should have no effect.
        for action in [Action::Nop, Action::Right, Action::Left] {
            let step = env.step(&one_hot_action(action)).unwrap();
            assert_not_done(&step);
            assert!(obs_close(&step.observation, &EXPECTED_INITIAL), "{action:?} moved the agent");
        }

        let step = env.step(&one_hot_action(Action::Down)).unwrap();
        assert_not_done(&step);
        let mut down_res = EXPECTED_INITIAL;
        down_res[8 * 5] = 0.0;
        down_res[12 * 5] = 1.0;
        assert!(obs_close(&step.observation, &down_res));

        let step = env.step(&one_hot_action(Action::Up)).unwrap();
        assert_not_done(&step);
        assert!(obs_close(&step.observation, &EXPECTED_INITIAL));

        let mut last_obs = step.observation;
        for action in [Action::Up, Action::Up, Action::Right, Action::Right] {
            let step = env.step(&one_hot_action(action)).unwrap();
            assert_not_done(&step);
            assert!(!obs_close(&last_obs, &step.observation), "observation didn't change after {action:?}");
            last_obs = step.observation;
        }

        let step = env.step(&one_hot_action(Action::Down)).unwrap();
        assert!(step.done);
        assert_eq!(step.reward, 0.0);
        let mut done_res = EXPECTED_INITIAL;
        done_res[8 * 5] = 0.0;
        done_res[6 * 5] = 1.0;
        assert!(obs_close(&step.observation, &done_res));

        assert_eq!(env.step(&one_hot_action(Action::Up)), Err(EnvError::AlreadySolved));
    }

    #[test]
    fn test_terminal_lock_keeps_state() {
        let mut env = MazeEnv::new(example_maze());
        env.reset().unwrap();
        for action in [Action::Up, Action::Up, Action::Right, Action::Right, Action::Down] {
            env.step(&one_hot_action(action)).unwrap();
        }
        let solved_at = env.position();
        for action in Action::ALL {
            assert_eq!(env.step(&one_hot_action(action)), Err(EnvError::AlreadySolved));
            assert_eq!(env.position(), solved_at);
        }
        // Reset recovers.
        env.reset().unwrap();
        assert_eq!(env.position(), env.maze().start());
        assert!(env.step(&one_hot_action(Action::Up)).is_ok());
    }

    #[test]
    fn test_deterministic_replay() {
        let actions = [Action::Down, Action::Right, Action::Up, Action::Up, Action::Left, Action::Right];
        let mut env = MazeEnv::new(example_maze());
        let mut runs = Vec::new();
        for _ in 0..2 {
            let mut trace = vec![env.reset().unwrap()];
            for action in actions {
                let step = env.step(&one_hot_action(action)).unwrap();
                trace.push(step.observation);
                trace.push(vec![step.reward, step.done as u8 as f64]);
            }
            runs.push(trace);
        }
        assert_eq!(runs[0], runs[1]);
    }

    #[test]
    fn test_tied_action_takes_last() {
        let mut env = MazeEnv::new(example_maze());
        env.reset().unwrap();
        // Up and Down tie; Down is last, and (3, 0) is open.
        env.step(&[0.0, 1.0, 0.0, 1.0, 0.0]).unwrap();
        assert_eq!(env.position(), Position::new(3, 0));
    }

    #[test]
    fn test_shared_maze() {
        let maze = Arc::new(example_maze());
        let mut a = MazeEnv::new(maze.clone());
        let b = MazeEnv::new(maze.clone());
        a.step(&one_hot_action(Action::Up)).unwrap();
        assert_eq!(a.position(), Position::new(1, 0));
        assert_eq!(b.position(), maze.start());
    }
}
