use proxima_core::Obs;
use tch::Tensor;

/// Flat observations of all instances, stored instance by instance.
#[derive(Clone, Debug)]
pub struct FlatObs {
    data: Vec<f32>,
    dim: usize,
}

impl FlatObs {
    /// Constructs observations from the concatenated vectors of all instances.
    pub fn new(data: Vec<f32>, dim: usize) -> Self {
        debug_assert_eq!(data.len() % dim, 0);
        Self { data, dim }
    }

    /// Observation of instance `i`.
    pub fn get(&self, i: usize) -> &[f32] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    /// Length of the observation of an instance.
    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl Obs for FlatObs {
    fn len(&self) -> usize {
        self.data.len() / self.dim
    }
}

impl From<FlatObs> for Tensor {
    fn from(obs: FlatObs) -> Tensor {
        Tensor::from_slice(&obs.data).reshape([-1, obs.dim as i64])
    }
}
