//! Rollout buffer interface.
//!
//! An on-policy agent collects a fixed number of timesteps of interaction,
//! learns from them once and throws them away. A rollout buffer holds
//! exactly one such rollout.
use super::{Env, Step};
use anyhow::Result;

/// Interface of fixed-capacity buffers holding one rollout of a vectorized environment.
///
/// A rollout is `capacity()` timesteps of all units. The buffer is written
/// row by row, one timestep per [`push_step`](RolloutBufferBase::push_step),
/// and is logically cleared with [`reset`](RolloutBufferBase::reset) after the
/// agent has learned from it.
pub trait RolloutBufferBase<E: Env> {
    /// Configuration parameters for the buffer.
    type Config: Clone;

    /// What the behavior policy computed when it chose the actions of a step,
    /// such as value estimates and log-probabilities.
    type Estimate;

    /// Builds a new buffer from the given configuration.
    fn build(config: &Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Stores one timestep.
    ///
    /// `obs` is the observation the actions were chosen on, `estimate` what
    /// the agent computed for it and `step` the response of the environment.
    /// Fails when the buffer is already full.
    fn push_step(&mut self, obs: &E::Obs, estimate: Self::Estimate, step: &Step<E>) -> Result<()>;

    /// Number of timesteps stored since the last reset.
    fn len(&self) -> usize;

    /// Number of timesteps the buffer holds when full.
    fn capacity(&self) -> usize;

    /// Returns `true` when the buffer holds `capacity()` timesteps.
    fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Moves the write cursor back to the first timestep.
    ///
    /// Stored data are not cleared and will be overwritten by the next pushes.
    fn reset(&mut self);
}
