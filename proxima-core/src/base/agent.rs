//! Agent.
use super::{Env, Policy, RolloutBufferBase};
use crate::record::Record;
use anyhow::Result;
use std::path::Path;

/// Represents a trainable on-policy agent on an environment.
pub trait Agent<E: Env, R: RolloutBufferBase<E>>: Policy<E> {
    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Samples actions with the behavior policy.
    ///
    /// Together with the actions, it returns what the rollout buffer needs to
    /// store about them, computed while sampling.
    fn sample_with_estimates(&mut self, obs: &E::Obs, info: &E::Info)
        -> Result<(E::Act, R::Estimate)>;

    /// Performs an optimization step with a full rollout buffer and returns some information.
    fn opt_with_record(&mut self, buffer: &mut R) -> Result<Record>;

    /// Save the parameters of the agent in the given directory.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Load the parameters of the agent from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
