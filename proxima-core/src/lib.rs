#![warn(missing_docs)]
//! Core interfaces of proximal policy optimization.
//!
//! This crate has no dependency on a tensor library. It defines the contract
//! an environment has to satisfy ([`Env`]), the interfaces of agents and
//! rollout buffers ([`Agent`], [`RolloutBufferBase`]), records for telemetry
//! ([`record`]) and the training loop ([`Trainer`]).
pub mod error;
pub mod record;

mod base;
pub use base::{
    Act, ActionSpace, Agent, Env, EnvSpec, Info, Obs, ObservationSpace, Policy, RolloutBufferBase,
    Step,
};

mod trainer;
pub use trainer::{Sampler, Trainer, TrainerConfig};

#[cfg(test)]
mod dummy;
