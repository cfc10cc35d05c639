//! This module is used for tests.
use anyhow::Result;
use proxima_core::{record::Record, Act, EnvSpec, Info, Obs, Step};
use tch::{Kind, Tensor};

/// Observations of all units, flattened unit by unit.
#[derive(Clone, Debug)]
pub struct VecObs {
    pub data: Vec<f32>,
    pub n_units: usize,
}

impl Obs for VecObs {
    fn len(&self) -> usize {
        self.n_units
    }
}

impl From<VecObs> for Tensor {
    fn from(obs: VecObs) -> Tensor {
        Tensor::from_slice(&obs.data).reshape([obs.n_units as i64, -1])
    }
}

/// Actions of all units, flattened unit by unit.
#[derive(Clone, Debug)]
pub struct VecAct(pub Vec<f32>);

impl Act for VecAct {
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Tensor> for VecAct {
    fn from(t: Tensor) -> Self {
        let t = t.to_kind(Kind::Float).flatten(0, -1);
        Self(Vec::<f32>::try_from(&t).unwrap())
    }
}

/// Optional action masks of all units.
pub struct MaskInfo(pub Option<Vec<f32>>);

impl Info for MaskInfo {
    fn action_mask(&self) -> Option<&[f32]> {
        self.0.as_deref()
    }
}

/// Environment with a given [`EnvSpec`] whose observations depend on the step count only.
///
/// Reward is 1 for every unit, episodes are truncated after `episode_len` steps.
/// With action masks, the first action is always legal and the others are
/// legal on every other step.
pub struct DummyEnv {
    spec: EnvSpec,
    episode_len: usize,
    t: usize,
}

impl DummyEnv {
    fn obs(&self) -> VecObs {
        let n_units = self.spec.n_units();
        let dim = self.spec.observation_space.flat_dim();
        let data = (0..n_units * dim)
            .map(|i| ((self.t + i) as f32 * 0.3).sin())
            .collect();
        VecObs { data, n_units }
    }

    fn info(&self) -> MaskInfo {
        if !self.spec.uses_action_mask {
            return MaskInfo(None);
        }
        let n = match self.spec.action_space {
            proxima_core::ActionSpace::Discrete { n } => n,
            _ => 1,
        };
        let row = (0..n)
            .map(|i| if i == 0 || self.t % 2 == 0 { 1.0 } else { 0.0 })
            .collect::<Vec<_>>();
        MaskInfo(Some(row.repeat(self.spec.n_units())))
    }
}

impl proxima_core::Env for DummyEnv {
    /// `(spec, episode_len)`
    type Config = (EnvSpec, usize);
    type Obs = VecObs;
    type Act = VecAct;
    type Info = MaskInfo;

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            spec: config.0.clone(),
            episode_len: config.1,
            t: 0,
        })
    }

    fn spec(&self) -> EnvSpec {
        self.spec.clone()
    }

    fn reset(&mut self) -> Result<(VecObs, MaskInfo)> {
        self.t = 0;
        Ok((self.obs(), self.info()))
    }

    fn step(&mut self, a: &VecAct) -> Result<(Step<Self>, Record)> {
        let n = self.spec.n_units();
        self.t += 1;
        let done = (self.t % self.episode_len == 0) as i8;
        let step = Step::new(
            self.obs(),
            a.clone(),
            vec![1.0; n],
            vec![0; n],
            vec![done; n],
            self.info(),
        );
        Ok((step, Record::empty()))
    }
}
