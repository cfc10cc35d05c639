use super::CriticConfig;
use crate::{
    model::{n_params, ModelBase, SubModel},
    opt::Optimizer,
    util::OutDim,
};
use anyhow::{Context, Result};
use log::{info, trace};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use tch::{nn, Device, Tensor};

/// State-value function of PPO agents.
pub struct Critic<V>
where
    V: SubModel<Input = Tensor, Output = Tensor>,
    V::Config: DeserializeOwned + Serialize + OutDim,
{
    var_store: nn::VarStore,

    // State-value function
    v: V,

    // Optimizer
    opt: Optimizer,
}

impl<V> Critic<V>
where
    V: SubModel<Input = Tensor, Output = Tensor>,
    V::Config: DeserializeOwned + Serialize + OutDim,
{
    /// Constructs [`Critic`].
    pub fn build(config: CriticConfig<V::Config>, device: Device) -> Result<Critic<V>> {
        let v_config = config.v_config.context("v_config is not set.")?;
        let var_store = nn::VarStore::new(device);
        let v = V::build(&var_store, v_config);
        let opt = config.opt_config.build(&var_store)?;
        info!("Build critic: {} parameters", n_params(&var_store));

        Ok(Self { var_store, v, opt })
    }

    /// Value estimates of a batch of observations, `(batch, 1)`.
    pub fn forward(&self, obs: &Tensor) -> Tensor {
        self.v.forward(obs)
    }
}

impl<V> ModelBase for Critic<V>
where
    V: SubModel<Input = Tensor, Output = Tensor>,
    V::Config: DeserializeOwned + Serialize + OutDim,
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
        info!("Save critic to {:?}", path.as_ref());
        let vs = self.var_store.variables();
        for (name, _) in vs.iter() {
            trace!("Save variable {}", name);
        }
        Ok(())
    }

    fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.var_store.load(&path)?;
        info!("Load critic from {:?}", path.as_ref());
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        mlp::{Mlp, MlpConfig},
        opt::OptimizerConfig,
    };
    use tch::{kind::FLOAT_CPU, Kind};
    use tempdir::TempDir;

    #[test]
    fn test_fit_constant() -> Result<()> {
        tch::manual_seed(42);
        let config = CriticConfig::default()
            .v_config(MlpConfig::with_hidden_layers(0, 2, 16, 0))
            .in_dim(3)
            .opt_config(OptimizerConfig::Adam { lr: 1e-2 });
        let mut critic = Critic::<Mlp>::build(config, Device::Cpu)?;
        let obs = Tensor::randn([8, 3], FLOAT_CPU);
        let target = Tensor::ones([8, 1], FLOAT_CPU);
        assert_eq!(critic.forward(&obs).size(), [8, 1]);

        let loss = |critic: &Critic<Mlp>| {
            critic
                .forward(&obs)
                .mse_loss(&target, tch::Reduction::Mean)
                .double_value(&[])
        };
        let before = loss(&critic);
        for _ in 0..50 {
            let l = critic
                .forward(&obs)
                .mse_loss(&target, tch::Reduction::Mean);
            critic.zero_grad();
            l.backward();
            critic.step();
        }
        assert!(loss(&critic) < before);
        Ok(())
    }

    #[test]
    fn test_save_load() -> Result<()> {
        tch::manual_seed(42);
        let config =
            CriticConfig::default().v_config(MlpConfig::with_hidden_layers(2, 1, 8, 1));
        let critic = Critic::<Mlp>::build(config.clone(), Device::Cpu)?;
        let mut critic_ = Critic::<Mlp>::build(config, Device::Cpu)?;

        let dir = TempDir::new("critic")?;
        let path = dir.path().join("critic.pt.tch");
        critic.save(&path)?;
        critic_.load(&path)?;

        let obs = Tensor::randn([4, 2], FLOAT_CPU);
        let diff = (critic.forward(&obs) - critic_.forward(&obs))
            .abs()
            .sum(Kind::Float)
            .double_value(&[]);
        assert_eq!(diff, 0.0);
        Ok(())
    }
}
