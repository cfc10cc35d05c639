//! Environment step.
use super::Env;

/// Additional information to `Obs` and `Act`.
pub trait Info {
    /// Legal actions of every unit, concatenated unit by unit.
    ///
    /// Each unit contributes one value per discrete action, `1.0` for a legal
    /// action and `0.0` for an illegal one. Environments without action masks
    /// return `None`.
    fn action_mask(&self) -> Option<&[f32]> {
        None
    }
}

impl Info for () {}

/// Represents an action, observation and reward tuple `(a_t, o_t+1, r_t)`
/// for all units of a vectorized environment, with some additional information.
///
/// Vectorized environments reset finished units by themselves. For such a
/// unit, `obs` holds the first observation of its next episode.
pub struct Step<E: Env> {
    /// Action.
    pub act: E::Act,

    /// Observation.
    pub obs: E::Obs,

    /// Reward of each unit.
    pub reward: Vec<f32>,

    /// Flag denoting if episode is terminated, for each unit.
    pub is_terminated: Vec<i8>,

    /// Flag denoting if episode is truncated, for each unit.
    pub is_truncated: Vec<i8>,

    /// Information defined by user.
    pub info: E::Info,
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(
        obs: E::Obs,
        act: E::Act,
        reward: Vec<f32>,
        is_terminated: Vec<i8>,
        is_truncated: Vec<i8>,
        info: E::Info,
    ) -> Self {
        Step {
            act,
            obs,
            reward,
            is_terminated,
            is_truncated,
            info,
        }
    }

    /// Terminated or truncated, for each unit.
    pub fn is_done(&self) -> Vec<i8> {
        self.is_terminated
            .iter()
            .zip(self.is_truncated.iter())
            .map(|(&te, &tr)| (te == 1 || tr == 1) as i8)
            .collect()
    }

    /// Number of units in the step.
    pub fn n_units(&self) -> usize {
        self.reward.len()
    }
}
