//! Critic of PPO agents.
mod base;
mod config;
pub use base::Critic;
pub use config::CriticConfig;
