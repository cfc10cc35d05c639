use crate::util::{InDim, OutDim};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`Mlp`](super::Mlp).
pub struct MlpConfig {
    pub(super) in_dim: i64,
    pub(super) units: Vec<i64>,
    pub(super) out_dim: i64,

    /// Standard deviation scale of the initial weights of the output layer.
    ///
    /// The weights are drawn from a normal distribution with standard deviation
    /// `out_std / sqrt(fan_in)`. `None` keeps the default initialization of tch.
    #[serde(default)]
    pub(super) out_std: Option<f64>,
}

impl MlpConfig {
    /// Creates configuration of MLP with hidden layers of the given sizes.
    pub fn new(in_dim: i64, units: Vec<i64>, out_dim: i64) -> Self {
        Self {
            in_dim,
            units,
            out_dim,
            out_std: None,
        }
    }

    /// Creates configuration of MLP with `n_layers` hidden layers of `size` units.
    pub fn with_hidden_layers(in_dim: i64, n_layers: usize, size: i64, out_dim: i64) -> Self {
        Self::new(in_dim, vec![size; n_layers], out_dim)
    }

    /// Sets the initialization scale of the output layer.
    pub fn out_std(mut self, v: f64) -> Self {
        self.out_std = Some(v);
        self
    }

    /// Sizes of the hidden layers.
    pub fn units(&self) -> &[i64] {
        &self.units
    }
}

impl OutDim for MlpConfig {
    fn get_out_dim(&self) -> i64 {
        self.out_dim
    }

    fn set_out_dim(&mut self, out_dim: i64) {
        self.out_dim = out_dim;
    }
}

impl InDim for MlpConfig {
    fn get_in_dim(&self) -> i64 {
        self.in_dim
    }

    fn set_in_dim(&mut self, in_dim: i64) {
        self.in_dim = in_dim;
    }
}
