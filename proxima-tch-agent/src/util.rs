//! Utilities.

/// Interface for handling output dimensions.
pub trait OutDim {
    /// Returns the output dimension.
    fn get_out_dim(&self) -> i64;

    /// Sets the  output dimension.
    fn set_out_dim(&mut self, v: i64);
}

/// Interface for handling input dimensions.
///
/// Agents set the input dimension of their networks from the observation
/// space of the environment.
pub trait InDim {
    /// Returns the input dimension.
    fn get_in_dim(&self) -> i64;

    /// Sets the input dimension.
    fn set_in_dim(&mut self, v: i64);
}
