use super::{Action, Env, EnvError, Observation, Step};
use crate::maze::{Maze, Position};

/// Joins several episodes of an [`Env`] into one longer meta-episode.
///
/// Every observation is followed by the action vector that was just taken
/// and the reward that was just received (zeros right after a reset). The
/// action block is always [`Action::COUNT`] wide: shorter vectors are padded
/// with zeros and longer ones are truncated. When
/// an inner episode ends before the last run, the inner environment is
/// reset silently, its fresh observation is returned and `done` stays
/// false. Only the last inner episode ends the meta-episode.
#[derive(Debug, Clone)]
pub struct MetaEnv<E> {
    inner: E,
    num_runs: usize,
    runs_remaining: usize,
}

impl<E: Env> MetaEnv<E> {
    /// Wraps `inner` so that one meta-episode spans `num_runs` episodes.
    /// The meta-episode must be reset before the first step.
    ///
    /// # Panics
    /// If `num_runs` is 0.
    pub fn new(inner: E, num_runs: usize) -> Self {
        assert!(num_runs > 0, "a meta-episode needs at least one run");
        MetaEnv {
            inner,
            num_runs,
            runs_remaining: 0,
        }
    }

    pub fn num_runs(&self) -> usize {
        self.num_runs
    }

    /// Inner episodes left in the current meta-episode.
    pub fn runs_remaining(&self) -> usize {
        self.runs_remaining
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }
}

impl<E: Env> Env for MetaEnv<E> {
    fn reset(&mut self) -> Result<Observation, EnvError> {
        let mut obs = self.inner.reset()?;
        self.runs_remaining = self.num_runs;
        obs.extend([0.0; Action::COUNT + 1]);
        Ok(obs)
    }

    fn step(&mut self, action: &[f64]) -> Result<Step, EnvError> {
        if self.runs_remaining == 0 {
            return Err(EnvError::MetaEpisodeFinished);
        }

        let mut step = self.inner.step(action)?;
        if step.done {
            self.runs_remaining -= 1;
            if self.runs_remaining > 0 {
                tracing::debug!(
                    "[meta] episode finished, {} of {} runs remaining",
                    self.runs_remaining,
                    self.num_runs
                );
                step.observation = self.inner.reset()?;
                step.done = false;
            } else {
                tracing::debug!("[meta] all {} runs finished", self.num_runs);
            }
        }

        let mut block = [0.0; Action::COUNT];
        let width = action.len().min(Action::COUNT);
        block[..width].copy_from_slice(&action[..width]);
        step.observation.extend(block);
        step.observation.push(step.reward);
        Ok(step)
    }

    fn maze(&self) -> &Maze {
        self.inner.maze()
    }

    fn position(&self) -> Position {
        self.inner.position()
    }
}
