//! Definition of interfaces of neural networks.
use anyhow::Result;
use std::path::Path;
use tch::nn::VarStore;

/// A network owning its parameters and the optimizer updating them.
///
/// The stages of a parameter update are separate methods, so that a loss
/// depending on several networks can be backpropagated once before each
/// network takes its own optimizer step.
pub trait ModelBase {
    /// Zeroes the gradients of the parameters.
    fn zero_grad(&mut self);

    /// Rescales gradients so that their global norm does not exceed `max_norm`.
    fn clip_grad_norm(&mut self, max_norm: f64);

    /// Applies one optimizer step with the current gradients.
    fn step(&mut self);

    /// Returns `var_store`.
    fn get_var_store(&self) -> &VarStore;

    /// Save parameters of the neural network.
    fn save<T: AsRef<Path>>(&self, path: T) -> Result<()>;

    /// Load parameters of the neural network.
    fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()>;
}

/// Neural network model that can be initialized with [`VarStore`] and configuration.
///
/// The purpose of this trait is for modularity of neural network models.
/// Modules, which consists a neural network, should share [`VarStore`].
/// To do this, structs implementing this trait can be initialized with a given [`VarStore`].
///
/// [`VarStore`]: https://docs.rs/tch/0.16.0/tch/nn/struct.VarStore.html
pub trait SubModel {
    /// Configuration from which [`SubModel`] is constructed.
    type Config;

    /// Input of the [`SubModel`].
    type Input;

    /// Output of the [`SubModel`].
    type Output;

    /// Builds [`SubModel`] with [`VarStore`] and [`SubModel::Config`].
    fn build(var_store: &VarStore, config: Self::Config) -> Self;

    /// A generalized forward function.
    fn forward(&self, input: &Self::Input) -> Self::Output;
}

/// Number of scalar parameters in a [`VarStore`].
pub(crate) fn n_params(var_store: &VarStore) -> i64 {
    var_store
        .trainable_variables()
        .iter()
        .map(|t| t.numel() as i64)
        .sum()
}
