//! Action distributions.
use serde::{Deserialize, Serialize};
use tch::{Kind, Tensor};

/// Probabilities below this value are clamped before taking logarithms.
const MIN_PROB: f64 = 1e-8;

/// Family of the action distribution, selected from the action space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum DistKind {
    /// Categorical distribution over discrete actions.
    Categorical,

    /// Diagonal Gaussian distribution over continuous actions.
    Gaussian,
}

/// Action distribution for a batch of observations.
pub enum ActionDist {
    /// Categorical distribution.
    Categorical {
        /// Probabilities of actions, `(batch, n_actions)`.
        probs: Tensor,
    },

    /// Diagonal Gaussian distribution.
    Normal {
        /// `(batch, act_dim)`
        mean: Tensor,

        /// `(batch, act_dim)`
        std: Tensor,
    },
}

impl ActionDist {
    /// Returns the family of the distribution.
    pub fn kind(&self) -> DistKind {
        match self {
            Self::Categorical { .. } => DistKind::Categorical,
            Self::Normal { .. } => DistKind::Gaussian,
        }
    }

    /// Samples actions.
    ///
    /// Categorical samples are action indices of shape `(batch, 1)` and kind
    /// `Int64`; Gaussian samples have shape `(batch, act_dim)`.
    pub fn sample(&self) -> Tensor {
        match self {
            Self::Categorical { probs } => probs.multinomial(1, true),
            Self::Normal { mean, std } => mean + std * mean.randn_like(),
        }
    }

    /// The most probable actions, used for greedy evaluation.
    pub fn mode(&self) -> Tensor {
        match self {
            Self::Categorical { probs } => probs.argmax(-1, true),
            Self::Normal { mean, .. } => mean.shallow_clone(),
        }
    }

    /// Log-probabilities of `actions`.
    ///
    /// Shape is `(batch, 1)` for categorical and `(batch, act_dim)` for Gaussian
    /// distributions; dimensions of Gaussian actions are not summed.
    pub fn log_prob(&self, actions: &Tensor) -> Tensor {
        match self {
            Self::Categorical { probs } => {
                let index = actions.to_kind(Kind::Int64).reshape([-1, 1]);
                probs.clamp_min(MIN_PROB).log().gather(-1, &index, false)
            }
            Self::Normal { mean, std } => {
                let log_norm = 0.5 * (2.0 * std::f64::consts::PI).ln();
                let z = (actions - mean) / std;
                z.pow_tensor_scalar(2) * -0.5 - std.log() - log_norm
            }
        }
    }

    /// Entropy.
    ///
    /// Shape is `(batch,)` for categorical and `(batch, act_dim)` for Gaussian
    /// distributions.
    pub fn entropy(&self) -> Tensor {
        match self {
            Self::Categorical { probs } => {
                let log_probs = probs.clamp_min(MIN_PROB).log();
                -(probs * log_probs).sum_dim_intlist(Some([-1].as_slice()), false, Kind::Float)
            }
            Self::Normal { std, .. } => {
                let c = 0.5 + 0.5 * (2.0 * std::f64::consts::PI).ln();
                std.log() + c
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tch::kind::FLOAT_CPU;

    #[test]
    fn test_categorical() {
        tch::manual_seed(42);
        let probs = Tensor::from_slice(&[0.0f32, 0.25, 0.75, 0.5, 0.5, 0.0]).reshape([2, 3]);
        let dist = ActionDist::Categorical { probs };
        assert_eq!(dist.kind(), DistKind::Categorical);

        let a = dist.sample();
        assert_eq!(a.size(), [2, 1]);
        assert_eq!(a.kind(), Kind::Int64);
        // Zero-probability actions are never sampled.
        for _ in 0..20 {
            let a = dist.sample();
            assert_ne!(a.int64_value(&[0, 0]), 0);
            assert_ne!(a.int64_value(&[1, 0]), 2);
        }

        let mode = dist.mode();
        assert_eq!(mode.int64_value(&[0, 0]), 2);

        let actions = Tensor::from_slice(&[2.0f32, 1.0]).reshape([2, 1]);
        let lp = dist.log_prob(&actions);
        assert_eq!(lp.size(), [2, 1]);
        assert!((lp.double_value(&[0, 0]) - 0.75f64.ln()).abs() < 1e-5);
        assert!((lp.double_value(&[1, 0]) - 0.5f64.ln()).abs() < 1e-5);

        let ent = dist.entropy();
        assert_eq!(ent.size(), [2]);
        let expected = -(0.25f64 * 0.25f64.ln() + 0.75 * 0.75f64.ln());
        assert!((ent.double_value(&[0]) - expected).abs() < 1e-5);
        assert!((ent.double_value(&[1]) - 2f64.ln()).abs() < 1e-5);
    }

    #[test]
    fn test_normal() {
        tch::manual_seed(42);
        let mean = Tensor::zeros([3, 2], FLOAT_CPU);
        let std = Tensor::ones([3, 2], FLOAT_CPU);
        let dist = ActionDist::Normal { mean, std };

        assert_eq!(dist.sample().size(), [3, 2]);
        assert_eq!(dist.mode().abs().sum(Kind::Float).double_value(&[]), 0.0);

        // Standard normal density at 0 and 1.
        let actions = Tensor::from_slice(&[0.0f32, 1.0, 0.0, 1.0, 0.0, 1.0]).reshape([3, 2]);
        let lp = dist.log_prob(&actions);
        assert_eq!(lp.size(), [3, 2]);
        let log_norm = 0.5 * (2.0 * std::f64::consts::PI).ln();
        assert!((lp.double_value(&[0, 0]) + log_norm).abs() < 1e-5);
        assert!((lp.double_value(&[0, 1]) + log_norm + 0.5).abs() < 1e-5);

        let ent = dist.entropy();
        assert_eq!(ent.size(), [3, 2]);
        assert!((ent.double_value(&[2, 1]) - (0.5 + log_norm)).abs() < 1e-5);
    }
}
