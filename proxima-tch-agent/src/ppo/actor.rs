//! Actor of PPO agents.
mod base;
mod config;
pub use base::{Actor, PolicyHead};
pub use config::ActorConfig;
