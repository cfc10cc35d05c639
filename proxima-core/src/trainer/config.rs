//! Configuration of [`Trainer`](super::Trainer).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The maximum number of environment steps.
    pub max_steps: usize,

    /// Interval of recording throughput in environment steps.
    pub record_interval: usize,

    /// Where to save the trained model.
    pub model_dir: Option<String>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_steps: 0,
            record_interval: usize::MAX,
            model_dir: None,
        }
    }
}

impl TrainerConfig {
    /// Sets the number of environment steps.
    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = v;
        self
    }

    /// Sets the interval of recording throughput in environment steps.
    pub fn record_interval(mut self, v: usize) -> Self {
        self.record_interval = v;
        self
    }

    /// Sets the directory where the trained model is saved.
    pub fn model_dir(mut self, model_dir: impl Into<String>) -> Self {
        self.model_dir = Some(model_dir.into());
        self
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
