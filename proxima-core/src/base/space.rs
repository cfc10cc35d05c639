//! Observation and action spaces.
use serde::{Deserialize, Serialize};

/// Space of the observation of a single unit.
///
/// Agents see every observation as a flat vector of `f32` values of length
/// [`ObservationSpace::flat_dim`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum ObservationSpace {
    /// Real-valued tensor of the given shape.
    Box {
        /// Shape of the observation.
        shape: Vec<usize>,

        /// Lower bounds, flattened.
        low: Vec<f32>,

        /// Upper bounds, flattened.
        high: Vec<f32>,
    },

    /// One of `n` categories, flattened as a one-hot vector.
    Discrete {
        /// Number of categories.
        n: usize,
    },
}

impl ObservationSpace {
    /// Length of the flattened observation.
    pub fn flat_dim(&self) -> usize {
        match self {
            Self::Box { shape, .. } => shape.iter().product(),
            Self::Discrete { n } => *n,
        }
    }
}

/// Space of the action of a single unit.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum ActionSpace {
    /// One of `n` actions.
    Discrete {
        /// Number of actions.
        n: usize,
    },

    /// Real-valued tensor of the given shape with per-dimension bounds.
    Box {
        /// Shape of the action.
        shape: Vec<usize>,

        /// Lower bounds, flattened.
        low: Vec<f32>,

        /// Upper bounds, flattened.
        high: Vec<f32>,
    },

    /// A vector of discrete actions.
    MultiDiscrete {
        /// Number of actions in each dimension.
        nvec: Vec<usize>,
    },
}

impl ActionSpace {
    /// Returns `true` for [`ActionSpace::Discrete`].
    pub fn is_discrete(&self) -> bool {
        matches!(self, Self::Discrete { .. })
    }
}

/// Static description of a (vectorized) environment.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EnvSpec {
    /// Observation space of a single unit.
    pub observation_space: ObservationSpace,

    /// Action space of a single unit.
    pub action_space: ActionSpace,

    /// Number of environment instances running in parallel.
    pub n_envs: usize,

    /// Number of agents in each environment instance.
    pub n_agents: usize,

    /// If the environment reports legal actions through [`Info::action_mask`].
    ///
    /// [`Info::action_mask`]: crate::Info::action_mask
    pub uses_action_mask: bool,
}

impl EnvSpec {
    /// Number of parallel units, `n_envs * n_agents`.
    pub fn n_units(&self) -> usize {
        self.n_envs * self.n_agents
    }
}
