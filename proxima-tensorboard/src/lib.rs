//! Writes records of training to TensorBoard.
use log::warn;
use proxima_core::record::{Record, RecordValue, Recorder};
use std::path::Path;
use tensorboard_rs::summary_writer::SummaryWriter;

/// Write records to TFRecord.
///
/// Scalar values are written with the value of the step key, `"env_steps"`
/// by default, as their step. Records without the step key are skipped.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
    step_key: String,
}

impl TensorboardRecorder {
    /// Construct a [`TensorboardRecorder`].
    ///
    /// TFRecord will be stored in `logdir`.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
            step_key: "env_steps".to_string(),
        }
    }

    /// Sets the key of the record value used as the step.
    pub fn step_key(mut self, key: impl Into<String>) -> Self {
        self.step_key = key.into();
        self
    }

    /// Flushes the event file.
    pub fn flush(&mut self) {
        self.writer.flush();
    }
}

impl Recorder for TensorboardRecorder {
    /// Write a given [`Record`] into a TFRecord.
    ///
    /// This method handles [`RecordValue::Scalar`] only. Other variants are ignored.
    fn write(&mut self, record: Record) {
        let step = match record.get(&self.step_key) {
            Some(RecordValue::Scalar(v)) => *v as usize,
            _ => {
                warn!("Skip a record without scalar {:?}", self.step_key);
                return;
            }
        };

        for (k, v) in record.iter() {
            if *k != self.step_key {
                if let RecordValue::Scalar(v) = v {
                    self.writer.add_scalar(k, *v, step);
                }
            }
        }
    }
}
