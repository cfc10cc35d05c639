use crate::{
    opt::OptimizerConfig,
    util::{InDim, OutDim},
};
use anyhow::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`Critic`](super::Critic).
pub struct CriticConfig<V> {
    /// Configuration of the value network.
    pub v_config: Option<V>,

    /// Configuration of the optimizer.
    pub opt_config: OptimizerConfig,
}

impl<V> Default for CriticConfig<V> {
    fn default() -> Self {
        Self {
            v_config: None,
            opt_config: OptimizerConfig::Adam { lr: 5e-4 },
        }
    }
}

impl<V> CriticConfig<V>
where
    V: DeserializeOwned + Serialize + InDim + OutDim,
{
    /// Sets configurations for the value network.
    pub fn v_config(mut self, v: V) -> Self {
        self.v_config = Some(v);
        self
    }

    /// Sets input dimension of the model.
    ///
    /// The output dimension of a value network is always 1.
    pub fn in_dim(mut self, v: i64) -> Self {
        if let Some(v_config) = &mut self.v_config {
            v_config.set_in_dim(v);
            v_config.set_out_dim(1);
        }
        self
    }

    /// Sets optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Constructs [`CriticConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`CriticConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
