//! Configuration of PPO agent.
use super::{ActorConfig, CriticConfig};
use crate::{mlp::MlpConfig, opt::OptimizerConfig, Device};
use anyhow::Result;
use proxima_core::error::ProximaError;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Ppo`](super::Ppo).
///
/// Input and output dimensions of the networks are taken from the
/// environment when the agent is built.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct PpoConfig {
    /// Configuration of the actor.
    pub actor_config: ActorConfig<MlpConfig>,

    /// Configuration of the critic.
    pub critic_config: CriticConfig<MlpConfig>,

    /// Discount factor.
    pub gamma: f64,

    /// Weight of multi-step estimates in GAE.
    pub gae_lambda: f64,

    /// Number of timesteps collected before each update.
    pub horizon: usize,

    /// Number of passes over a rollout in each update.
    pub num_epochs: usize,

    /// Number of transitions in a minibatch. `None` uses the whole rollout.
    pub minibatch_size: Option<usize>,

    /// Clipping range of the probability ratio.
    pub eps: f64,

    /// Coefficient of the entropy bonus.
    pub ent_coef: f64,

    /// Coefficient of the value loss.
    pub vf_coef: f64,

    /// If `true`, gradient norms of both networks are clipped to `grad_clip`.
    pub use_grad_clip: bool,

    /// Maximum gradient norm.
    pub grad_clip: f64,

    /// Random seed of tch.
    pub seed: Option<i64>,

    /// Device of the networks and the rollout buffer.
    pub device: Option<Device>,
}

impl Default for PpoConfig {
    fn default() -> Self {
        Self {
            actor_config: ActorConfig::default()
                .pi_config(MlpConfig::with_hidden_layers(0, 3, 64, 0).out_std(0.01)),
            critic_config: CriticConfig::default()
                .v_config(MlpConfig::with_hidden_layers(0, 3, 64, 1).out_std(1.0)),
            gamma: 0.99,
            gae_lambda: 0.95,
            horizon: 5,
            num_epochs: 5,
            minibatch_size: None,
            eps: 0.2,
            ent_coef: 0.01,
            vf_coef: 0.5,
            use_grad_clip: false,
            grad_clip: 0.5,
            seed: None,
            device: None,
        }
    }
}

impl PpoConfig {
    /// Sets the configuration of the actor.
    pub fn actor_config(mut self, v: ActorConfig<MlpConfig>) -> Self {
        self.actor_config = v;
        self
    }

    /// Sets the configuration of the critic.
    pub fn critic_config(mut self, v: CriticConfig<MlpConfig>) -> Self {
        self.critic_config = v;
        self
    }

    /// Sets the hidden layers of both the actor and the critic.
    pub fn hidden_layers(mut self, n_layers: usize, size: i64) -> Self {
        let actor = MlpConfig::with_hidden_layers(0, n_layers, size, 0).out_std(0.01);
        let critic = MlpConfig::with_hidden_layers(0, n_layers, size, 1).out_std(1.0);
        self.actor_config = self.actor_config.pi_config(actor);
        self.critic_config = self.critic_config.v_config(critic);
        self
    }

    /// Sets the learning rates of the actor and the critic.
    pub fn learning_rates(mut self, actor_lr: f64, critic_lr: f64) -> Self {
        self.actor_config = self
            .actor_config
            .opt_config(OptimizerConfig::Adam { lr: actor_lr });
        self.critic_config = self
            .critic_config
            .opt_config(OptimizerConfig::Adam { lr: critic_lr });
        self
    }

    /// Sets the discount factor.
    pub fn gamma(mut self, v: f64) -> Self {
        self.gamma = v;
        self
    }

    /// Sets the GAE parameter.
    pub fn gae_lambda(mut self, v: f64) -> Self {
        self.gae_lambda = v;
        self
    }

    /// Sets the number of timesteps collected before each update.
    pub fn horizon(mut self, v: usize) -> Self {
        self.horizon = v;
        self
    }

    /// Sets the number of epochs in each update.
    pub fn num_epochs(mut self, v: usize) -> Self {
        self.num_epochs = v;
        self
    }

    /// Sets the minibatch size.
    pub fn minibatch_size(mut self, v: usize) -> Self {
        self.minibatch_size = Some(v);
        self
    }

    /// Sets the clipping range.
    pub fn eps(mut self, v: f64) -> Self {
        self.eps = v;
        self
    }

    /// Sets the coefficient of the entropy bonus.
    pub fn ent_coef(mut self, v: f64) -> Self {
        self.ent_coef = v;
        self
    }

    /// Sets the coefficient of the value loss.
    pub fn vf_coef(mut self, v: f64) -> Self {
        self.vf_coef = v;
        self
    }

    /// Enables gradient clipping with the given maximum norm.
    pub fn grad_clip(mut self, v: f64) -> Self {
        self.use_grad_clip = true;
        self.grad_clip = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: i64) -> Self {
        self.seed = Some(v);
        self
    }

    /// Sets the device.
    pub fn device(mut self, device: tch::Device) -> Self {
        self.device = Some(device.into());
        self
    }

    /// Checks hyperparameters that do not depend on the environment.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(ProximaError::InvalidConfig(msg).into()) };

        if self.horizon == 0 {
            return invalid("horizon must be positive".to_string());
        }
        if self.num_epochs == 0 {
            return invalid("num_epochs must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return invalid(format!("gamma must be in [0, 1], got {}", self.gamma));
        }
        if !(0.0..=1.0).contains(&self.gae_lambda) {
            return invalid(format!(
                "gae_lambda must be in [0, 1], got {}",
                self.gae_lambda
            ));
        }
        if !(self.eps > 0.0) {
            return invalid(format!("eps must be positive, got {}", self.eps));
        }
        if self.use_grad_clip && !(self.grad_clip > 0.0) {
            return invalid(format!(
                "grad_clip must be positive, got {}",
                self.grad_clip
            ));
        }
        Ok(())
    }

    /// Constructs [`PpoConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`PpoConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
