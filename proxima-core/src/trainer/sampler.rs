//! Experience sampling into a rollout buffer.
//!
//! The sampler owns the environment, remembers the last observation and
//! keeps the episode-return bookkeeping of the tracked unit.
use crate::{
    record::{Record, RecordValue},
    Agent, Env, RolloutBufferBase,
};
use anyhow::Result;
use log::debug;

/// Manages the sampling of experiences from the environment.
///
/// Episode returns are tracked for a single unit, the first one. Its reward
/// is accumulated at every step and reported as `"episode_reward"` when its
/// episode ends.
pub struct Sampler<E: Env> {
    env: E,

    /// Observation and information the next actions are chosen on.
    prev: Option<(E::Obs, E::Info)>,

    /// Accumulated reward of the tracked unit in the current episode.
    episode_reward: f32,

    /// Number of finished episodes of the tracked unit.
    n_episodes: usize,
}

impl<E: Env> Sampler<E> {
    /// Creates a new sampler with the given environment.
    pub fn new(env: E) -> Self {
        Self {
            env,
            prev: None,
            episode_reward: 0.0,
            n_episodes: 0,
        }
    }

    /// Number of finished episodes of the tracked unit.
    pub fn n_episodes(&self) -> usize {
        self.n_episodes
    }

    /// Samples actions for all units, steps the environment and pushes the
    /// resulting timestep into the buffer.
    ///
    /// The environment is reset on the first call only; afterwards it resets
    /// finished units by itself.
    pub fn sample_and_push<A, R>(&mut self, agent: &mut A, buffer: &mut R) -> Result<Record>
    where
        A: Agent<E, R>,
        R: RolloutBufferBase<E>,
    {
        let (obs, info) = match self.prev.take() {
            Some(prev) => prev,
            None => self.env.reset()?,
        };

        let (act, estimate) = agent.sample_with_estimates(&obs, &info)?;
        let (step, mut record) = self.env.step(&act)?;
        buffer.push_step(&obs, estimate, &step)?;

        // Bookkeeping of the tracked unit
        self.episode_reward += step.reward[0];
        if step.is_done()[0] == 1 {
            debug!(
                "Episode {}: reward = {}",
                self.n_episodes, self.episode_reward
            );
            record.insert("episode_reward", RecordValue::Scalar(self.episode_reward));
            record.insert("episode", RecordValue::Scalar(self.n_episodes as f32));
            self.episode_reward = 0.0;
            self.n_episodes += 1;
        }

        self.prev = Some((step.obs, step.info));

        Ok(record)
    }
}
