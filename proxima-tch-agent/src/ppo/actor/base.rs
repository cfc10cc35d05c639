use super::ActorConfig;
use crate::{
    model::{n_params, ModelBase, SubModel},
    opt::{Optimizer, OptimizerConfig},
    ppo::{ActionDist, DistKind},
    util::OutDim,
};
use anyhow::{Context, Result};
use log::{info, trace};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use tch::{nn, Device, Kind, Tensor};

/// How the output of the policy network becomes an action distribution.
///
/// The head is fixed when the actor is built.
pub enum PolicyHead {
    /// Softmax over the outputs.
    Categorical,

    /// Softmax over the outputs, restricted to legal actions.
    ///
    /// Probabilities are multiplied by the action mask and renormalized. A
    /// row without any legal action keeps the unmasked probabilities.
    MaskedCategorical,

    /// `tanh` of the outputs as the mean, with a learnable log standard
    /// deviation independent of the observation.
    Gaussian {
        /// Log standard deviation, `(act_dim,)`.
        log_std: Tensor,
    },
}

/// Stochastic policy of PPO agents.
pub struct Actor<P>
where
    P: SubModel<Input = Tensor, Output = Tensor>,
    P::Config: DeserializeOwned + Serialize + OutDim,
{
    device: Device,
    var_store: nn::VarStore,

    // Dimension of the output of the policy network.
    out_dim: i64,

    // Policy network
    pi: P,

    head: PolicyHead,

    // Optimizer
    opt: Optimizer,
}

impl<P> Actor<P>
where
    P: SubModel<Input = Tensor, Output = Tensor>,
    P::Config: DeserializeOwned + Serialize + OutDim,
{
    /// Constructs [`Actor`].
    ///
    /// `masking` selects [`PolicyHead::MaskedCategorical`] for categorical
    /// distributions and is ignored for Gaussian ones.
    pub fn build(
        config: ActorConfig<P::Config>,
        dist_kind: DistKind,
        masking: bool,
        device: Device,
    ) -> Result<Actor<P>> {
        let pi_config = config.pi_config.context("pi_config is not set.")?;
        let out_dim = pi_config.get_out_dim();
        let var_store = nn::VarStore::new(device);
        let pi = P::build(&var_store, pi_config);

        // All variables have to exist before the optimizer is built.
        let head = match (dist_kind, masking) {
            (DistKind::Categorical, false) => PolicyHead::Categorical,
            (DistKind::Categorical, true) => PolicyHead::MaskedCategorical,
            (DistKind::Gaussian, _) => PolicyHead::Gaussian {
                log_std: var_store
                    .root()
                    .var("log_std", &[out_dim], nn::Init::Const(0.0)),
            },
        };
        let opt = config.opt_config.build(&var_store)?;
        info!(
            "Build actor: {:?} head, {} parameters",
            dist_kind,
            n_params(&var_store)
        );

        Ok(Self {
            device,
            var_store,
            out_dim,
            pi,
            head,
            opt,
        })
    }

    /// Returns the head of the policy.
    pub fn head(&self) -> &PolicyHead {
        &self.head
    }

    /// Action distribution for a batch of observations.
    ///
    /// `mask` has shape `(batch, n_actions)` for [`PolicyHead::MaskedCategorical`]
    /// and is not used by the other heads.
    pub fn dist(&self, obs: &Tensor, mask: &Tensor) -> ActionDist {
        let out = self.pi.forward(obs);
        debug_assert_eq!(out.size().as_slice()[1], self.out_dim);

        match &self.head {
            PolicyHead::Categorical => ActionDist::Categorical {
                probs: out.softmax(-1, Kind::Float),
            },
            PolicyHead::MaskedCategorical => {
                let probs = out.softmax(-1, Kind::Float);
                let masked = &probs * mask.to_device(self.device);
                let z = masked.sum_dim_intlist(Some([-1].as_slice()), true, Kind::Float);
                let has_legal = z.gt(0.0);
                ActionDist::Categorical {
                    probs: (masked / z.clamp_min(1e-12)).where_self(&has_legal, &probs),
                }
            }
            PolicyHead::Gaussian { log_std } => {
                let mean = out.tanh();
                let std = log_std.exp().expand_as(&mean);
                ActionDist::Normal { mean, std }
            }
        }
    }
}

impl<P> ModelBase for Actor<P>
where
    P: SubModel<Input = Tensor, Output = Tensor>,
    P::Config: DeserializeOwned + Serialize + OutDim,
{
    fn zero_grad(&mut self) {
        self.opt.zero_grad();
    }

    fn clip_grad_norm(&mut self, max_norm: f64) {
        self.opt.clip_grad_norm(max_norm);
    }

    fn step(&mut self) {
        self.opt.step();
    }

    fn get_var_store(&self) -> &nn::VarStore {
        &self.var_store
    }

    fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.var_store.save(&path)?;
        info!("Save actor to {:?}", path.as_ref());
        let vs = self.var_store.variables();
        for (name, _) in vs.iter() {
            trace!("Save variable {}", name);
        }
        Ok(())
    }

    fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.var_store.load(&path)?;
        info!("Load actor from {:?}", path.as_ref());
        Ok(())
    }
}
