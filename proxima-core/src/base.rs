//! Core functionalities.
mod agent;
mod env;
mod policy;
mod rollout_buffer;
mod space;
mod step;
pub use agent::Agent;
pub use env::Env;
pub use policy::Policy;
pub use rollout_buffer::RolloutBufferBase;
pub use space::{ActionSpace, EnvSpec, ObservationSpace};
use std::fmt::Debug;
pub use step::{Info, Step};

/// A set of observations, one for each parallel unit of a vectorized environment.
///
/// A unit is a pair of an environment instance and an agent in it, so a
/// vectorized environment with `n_envs` instances of an `n_agents`-agent
/// game emits `n_envs * n_agents` observations at a time.
pub trait Obs: Clone + Debug {
    /// Returns the number of units the observation covers.
    fn len(&self) -> usize;
}

/// A set of actions, one for each parallel unit.
pub trait Act: Clone + Debug {
    /// Returns the number of units the action covers.
    fn len(&self) -> usize;
}
