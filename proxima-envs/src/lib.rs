//! Vectorized environments implemented in Rust.
//!
//! Every environment runs `n_envs` independent instances stepped together
//! and resets finished instances by itself. Observations convert into
//! [`tch::Tensor`] of shape `(n_envs, obs_dim)`, actions are built from the
//! tensors sampled by agents.
//!
//! * [`CartPole`]: balancing a pole on a cart, discrete actions.
//! * [`Pendulum`]: swinging up a pendulum, continuous actions.
//! * [`MaskedGuess`]: guessing a target among legal actions reported by action masks.
mod act;
mod cartpole;
mod masked_guess;
mod obs;
mod pendulum;
pub use act::{ContinuousAct, DiscreteAct};
pub use cartpole::{CartPole, CartPoleConfig};
pub use masked_guess::{MaskInfo, MaskedGuess, MaskedGuessConfig};
pub use obs::FlatObs;
pub use pendulum::{Pendulum, PendulumConfig};
