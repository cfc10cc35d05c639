//! Policy.
use super::Env;
use anyhow::Result;

/// A policy on an environment.
///
/// Policy is a mapping from an observation to an action.
/// The mapping can be either of deterministic or stochastic.
pub trait Policy<E: Env> {
    /// Sample an action given an observation.
    ///
    /// `info` is the information emitted together with `obs`, used for
    /// action masks.
    fn sample(&mut self, obs: &E::Obs, info: &E::Info) -> Result<E::Act>;
}
