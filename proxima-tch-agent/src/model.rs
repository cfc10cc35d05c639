//! Interface of neural networks used in agents.
mod base;
pub(crate) use base::n_params;
pub use base::{ModelBase, SubModel};
