//! Types and traits for recording training metrics.
//!
//! * [`Record`] - A container for storing key-value pairs of various data types
//! * [`RecordValue`] - An enum representing the types of values that can be stored
//! * [`Recorder`] - A trait for writing records to an output destination
//! * [`BufferedRecorder`] - A recorder that keeps records in memory
//! * [`NullRecorder`] - A recorder that discards all records
//!
//! ```rust
//! use proxima_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("env_steps", RecordValue::Scalar(100.0));
//! record.insert("episode_reward", RecordValue::Scalar(21.0));
//! assert_eq!(record.get_scalar("episode_reward").unwrap(), 21.0);
//! ```
//!
//! The [`Trainer`](crate::Trainer) writes a record whenever an episode of the
//! tracked unit ends or the agent is updated.
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
