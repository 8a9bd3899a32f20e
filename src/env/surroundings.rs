use super::{CELL_BLOCK_LEN, Env, EnvError, Observation, Step, one_hot_grid};
use crate::maze::{Maze, Position};

/// Largest supported horizon. Observations already hold `2049^2` cell blocks
/// at this radius.
pub const MAX_HORIZON: usize = 1024;

/// Restricts the observations of an [`Env`] to an NxN square centered on the
/// agent, where N is `2 * horizon + 1`.
///
/// Parts of the square beyond the grid are seen as walls. Movement, rewards
/// and termination are those of the inner environment.
#[derive(Debug, Clone)]
pub struct SurroundingsEnv<E> {
    inner: E,
    horizon: usize,
}

impl<E: Env> SurroundingsEnv<E> {
    /// With a horizon of 1, the agent sees a 3x3 square.
    ///
    /// # Panics
    /// If `horizon` is larger than [`MAX_HORIZON`].
    pub fn new(inner: E, horizon: usize) -> Self {
        assert!(
            horizon <= MAX_HORIZON,
            "horizon {horizon} is larger than the maximum of {MAX_HORIZON}"
        );
        SurroundingsEnv { inner, horizon }
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }

    /// Length of every observation: `(2 * horizon + 1)^2` cell blocks.
    pub fn observation_len(&self) -> usize {
        let size = 2 * self.horizon + 1;
        size * size * CELL_BLOCK_LEN
    }

    fn observe(&self) -> Observation {
        let pos = self.inner.position();
        let horizon = self.horizon as i32;
        let size = 2 * self.horizon + 1;
        one_hot_grid(self.inner.maze(), pos, pos.row - horizon, pos.col - horizon, size, size)
    }
}

impl<E: Env> Env for SurroundingsEnv<E> {
    fn reset(&mut self) -> Result<Observation, EnvError> {
        self.inner.reset()?;
        Ok(self.observe())
    }

    fn step(&mut self, action: &[f64]) -> Result<Step, EnvError> {
        let step = self.inner.step(action)?;
        Ok(Step {
            observation: self.observe(),
            ..step
        })
    }

    fn maze(&self) -> &Maze {
        self.inner.maze()
    }

    fn position(&self) -> Position {
        self.inner.position()
    }
}
