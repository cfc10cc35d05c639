//! Environment.
use super::{Act, EnvSpec, Info, Obs, Step};
use crate::record::Record;
use anyhow::Result;

/// Represents a vectorized environment, typically a batch of MDPs.
///
/// An implementation steps all of its units at once. Units whose episode
/// ends within a step are reset by the environment itself, so the caller
/// only resets once at the beginning of training.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Information in the [`Step`] object.
    type Info: Info;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Returns the spaces and the number of parallel units.
    fn spec(&self) -> EnvSpec;

    /// Resets all units.
    fn reset(&mut self) -> Result<(Self::Obs, Self::Info)>;

    /// Performes an environment step on all units.
    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)>
    where
        Self: Sized;
}
