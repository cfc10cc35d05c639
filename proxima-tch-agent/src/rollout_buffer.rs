//! Rollout buffer.
//!
//! [`RolloutBuffer`] preallocates one tensor per field with leading shape
//! `(horizon, n_units)` and writes one timestep of all units per push.
mod base;
mod config;
pub use base::{RolloutBuffer, RolloutEstimate, RolloutTensors, Transition};
pub use config::RolloutBufferConfig;
