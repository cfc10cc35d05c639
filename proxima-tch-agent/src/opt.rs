//! Optimizers.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tch::nn::{Adam, AdamW, Optimizer as Optimizer_, OptimizerConfig as OptimizerConfig_, VarStore};

/// Configures an optimizer for training neural networks in an RL agent.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum OptimizerConfig {
    /// Adam optimizer.
    Adam {
        /// Learning rate.
        lr: f64,
    },

    /// AdamW optimizer.
    AdamW {
        /// Learning rate.
        lr: f64,
        /// Decay rate of the first moment.
        beta1: f64,
        /// Decay rate of the second moment.
        beta2: f64,
        /// Weight decay.
        wd: f64,
        /// Term added to the denominator.
        eps: f64,
        /// Use the AMSGrad variant.
        amsgrad: bool,
    },
}

impl OptimizerConfig {
    /// Constructs an optimizer.
    ///
    /// All variables of `vs` must have been created before calling this method.
    pub fn build(&self, vs: &VarStore) -> Result<Optimizer> {
        match &self {
            OptimizerConfig::Adam { lr } => {
                let opt = Adam::default().build(vs, *lr)?;
                Ok(Optimizer::Adam(opt))
            }
            OptimizerConfig::AdamW {
                lr,
                beta1,
                beta2,
                wd,
                eps,
                amsgrad,
            } => {
                let opt = AdamW {
                    beta1: *beta1,
                    beta2: *beta2,
                    wd: *wd,
                    eps: *eps,
                    amsgrad: *amsgrad,
                }
                .build(vs, *lr)?;
                Ok(Optimizer::AdamW(opt))
            }
        }
    }
}

/// Optimizers.
///
/// This is a thin wrapper of [tch::nn::Optimizer]. PPO zeroes gradients,
/// backpropagates one loss through two networks and clips gradients before
/// stepping, so the stages are exposed separately.
///
/// [tch::nn::Optimizer]: https://docs.rs/tch/0.16.0/tch/nn/struct.Optimizer.html
pub enum Optimizer {
    /// Adam optimizer.
    Adam(Optimizer_),

    /// AdamW optimizer.
    AdamW(Optimizer_),
}

impl Optimizer {
    fn inner(&mut self) -> &mut Optimizer_ {
        match self {
            Self::Adam(opt) => opt,
            Self::AdamW(opt) => opt,
        }
    }

    /// Zeroes the gradients of all variables.
    pub fn zero_grad(&mut self) {
        self.inner().zero_grad();
    }

    /// Rescales gradients so that their global norm does not exceed `max_norm`.
    pub fn clip_grad_norm(&mut self, max_norm: f64) {
        self.inner().clip_grad_norm(max_norm);
    }

    /// Applies one update with the current gradients.
    pub fn step(&mut self) {
        self.inner().step();
    }
}
