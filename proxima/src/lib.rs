//! Proximal policy optimization in Rust.
//!
//! Proxima consists of the following crates:
//!
//! * [proxima-core](proxima_core) provides the traits and the training loop
//!   generic to environments and agents. It does not depend on a tensor library.
//! * [proxima-tch-agent](proxima_tch_agent) implements the PPO agent, its rollout
//!   buffer and generalized advantage estimation on [tch](https://crates.io/crates/tch).
//! * [proxima-tensorboard](proxima_tensorboard) has `TensorboardRecorder` to write
//!   records which can be shown in Tensorboard.
//! * [proxima-envs](proxima_envs) has small vectorized environments written in Rust,
//!   used for demos and tests.
//!
//! This crate re-exports them and hosts the demos in `proxima/examples`.
//!
//! # Training a PPO agent
//!
//! ```no_run
//! use anyhow::Result;
//! use proxima::{
//!     core::{record::NullRecorder, Env, Trainer, TrainerConfig},
//!     envs::{CartPole, CartPoleConfig},
//!     tch_agent::{
//!         ppo::{Ppo, PpoConfig},
//!         rollout_buffer::RolloutBuffer,
//!     },
//! };
//!
//! fn main() -> Result<()> {
//!     let env = CartPole::build(&CartPoleConfig::default().n_envs(4), 0)?;
//!     let mut agent = Ppo::<CartPole>::build(PpoConfig::default().horizon(128), &env.spec())?;
//!     let mut buffer = RolloutBuffer::new(&agent.rollout_buffer_config());
//!     let mut trainer = Trainer::build(TrainerConfig::default().max_steps(10_000));
//!     trainer.train(env, &mut agent, &mut buffer, &mut NullRecorder::new())?;
//!     Ok(())
//! }
//! ```
pub use proxima_core as core;
pub use proxima_envs as envs;
pub use proxima_tch_agent as tch_agent;
pub use proxima_tensorboard as tensorboard;
