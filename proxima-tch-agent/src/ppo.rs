//! PPO agent.
mod actor;
mod base;
mod config;
mod critic;
mod dist;
mod gae;
mod loss;
pub use actor::{Actor, ActorConfig, PolicyHead};
pub use base::Ppo;
pub use config::PpoConfig;
pub use critic::{Critic, CriticConfig};
pub use dist::{ActionDist, DistKind};
pub use gae::{compute_gae, normalize_advantages};
pub use loss::{approx_kl, clip_fraction, clipped_objective};
