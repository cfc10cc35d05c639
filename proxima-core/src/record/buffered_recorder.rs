use super::{Record, Recorder};

/// Buffered recorder.
///
/// Keeps every record in memory, in the order they were written.
/// This is used for inspecting training runs in tests and for dumping
/// records after an evaluation run.
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<Record>,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self { buf: Vec::default() }
    }

    /// Returns an iterator over the records.
    pub fn iter(&self) -> std::slice::Iter<Record> {
        self.buf.iter()
    }

    /// Number of records written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if no record has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Collects the scalar values stored under `key`, skipping records without it.
    pub fn scalars(&self, key: &str) -> Vec<f32> {
        self.buf
            .iter()
            .filter_map(|r| r.get_scalar(key).ok())
            .collect()
    }
}

impl Recorder for BufferedRecorder {
    /// Write a [`Record`] to the buffer.
    fn write(&mut self, record: Record) {
        self.buf.push(record);
    }
}
