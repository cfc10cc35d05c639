//! Configuration of rollout buffer.
use crate::Device;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`RolloutBuffer`](super::RolloutBuffer).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RolloutBufferConfig {
    /// Number of timesteps in a rollout.
    pub horizon: usize,

    /// Number of parallel units, `n_envs * n_agents`.
    pub n_units: usize,

    /// Length of the flattened observation of a unit.
    pub obs_dim: i64,

    /// Length of the action vector of a unit, 1 for discrete actions.
    pub act_dim: i64,

    /// Length of the action mask of a unit, 1 when masking is not used.
    pub mask_dim: i64,

    /// Device on which the tensors are allocated.
    pub device: Option<Device>,
}

impl Default for RolloutBufferConfig {
    fn default() -> Self {
        Self {
            horizon: 5,
            n_units: 1,
            obs_dim: 1,
            act_dim: 1,
            mask_dim: 1,
            device: None,
        }
    }
}

impl RolloutBufferConfig {
    /// Sets the number of timesteps in a rollout.
    pub fn horizon(mut self, v: usize) -> Self {
        self.horizon = v;
        self
    }

    /// Sets the number of parallel units.
    pub fn n_units(mut self, v: usize) -> Self {
        self.n_units = v;
        self
    }

    /// Sets the observation dimension.
    pub fn obs_dim(mut self, v: i64) -> Self {
        self.obs_dim = v;
        self
    }

    /// Sets the action dimension.
    pub fn act_dim(mut self, v: i64) -> Self {
        self.act_dim = v;
        self
    }

    /// Sets the action mask dimension.
    pub fn mask_dim(mut self, v: i64) -> Self {
        self.mask_dim = v;
        self
    }

    /// Sets the device.
    pub fn device(mut self, device: tch::Device) -> Self {
        self.device = Some(device.into());
        self
    }

    /// Number of transitions in a full buffer, `horizon * n_units`.
    pub fn batch_size(&self) -> usize {
        self.horizon * self.n_units
    }

    /// Loads [`RolloutBufferConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`RolloutBufferConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
