//! Errors in the library.
use thiserror::Error;

/// Errors raised by agents, buffers and records.
///
/// Configuration errors are raised when an agent is built, before any
/// interaction with the environment. The remaining variants are raised at
/// call time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProximaError {
    /// The action space is neither discrete nor a one-dimensional box.
    #[error("unsupported action space: {0}")]
    UnsupportedActionSpace(String),

    /// An action mask was declared for an action space that is not discrete.
    #[error("action masks are only supported with discrete action spaces")]
    ActionMaskOnNonDiscrete,

    /// The rollout batch cannot be cut into minibatches of equal size.
    #[error("batch size {batch_size} is not a multiple of minibatch size {minibatch_size}")]
    MinibatchNotDivisible {
        /// `horizon * n_envs * n_agents`.
        batch_size: usize,

        /// Configured minibatch size.
        minibatch_size: usize,
    },

    /// A hyperparameter is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A transition was pushed into a full rollout buffer.
    #[error("rollout buffer is full (capacity {capacity})")]
    BufferFull {
        /// Number of timesteps the buffer holds.
        capacity: usize,
    },

    /// A pushed transition does not match the shape of the buffer.
    #[error("shape mismatch in {field}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Name of the transition field.
        field: String,

        /// Shape of a buffer row.
        expected: Vec<i64>,

        /// Shape of the given tensor.
        actual: Vec<i64>,
    },

    /// Key not found in a record.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value has a different type from the requested one.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
