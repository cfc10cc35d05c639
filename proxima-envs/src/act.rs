use proxima_core::Act;
use tch::{Device, Kind, Tensor};

/// Discrete actions of all instances.
#[derive(Clone, Debug, PartialEq)]
pub struct DiscreteAct(pub Vec<i64>);

impl Act for DiscreteAct {
    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Takes one action index per row of a `(n_envs, 1)` tensor.
impl From<Tensor> for DiscreteAct {
    fn from(t: Tensor) -> Self {
        let t = t.to_kind(Kind::Int64).to_device(Device::Cpu).flatten(0, -1);
        let n = t.size()[0];
        Self((0..n).map(|i| t.int64_value(&[i])).collect())
    }
}

/// Continuous actions of all instances, stored instance by instance.
#[derive(Clone, Debug, PartialEq)]
pub struct ContinuousAct {
    /// Concatenated actions.
    pub data: Vec<f32>,

    /// Length of the action of an instance.
    pub dim: usize,
}

impl ContinuousAct {
    /// Action of instance `i`.
    pub fn get(&self, i: usize) -> &[f32] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }
}

impl Act for ContinuousAct {
    fn len(&self) -> usize {
        self.data.len() / self.dim.max(1)
    }
}

/// Takes the rows of a `(n_envs, act_dim)` tensor.
impl From<Tensor> for ContinuousAct {
    fn from(t: Tensor) -> Self {
        let t = t.to_kind(Kind::Float).to_device(Device::Cpu);
        let dim = t.size().last().copied().unwrap_or(1) as usize;
        let t = t.flatten(0, -1);
        let n = t.size()[0];
        Self {
            data: (0..n).map(|i| t.double_value(&[i]) as f32).collect(),
            dim,
        }
    }
}
