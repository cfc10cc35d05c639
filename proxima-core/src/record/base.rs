//! Records of training metrics.
use crate::error::ProximaError;
use chrono::prelude::{DateTime, Local};
use std::collections::{hash_map::Iter, HashMap};

/// Represents possible types of values that can be stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single floating-point value, typically used for metrics like loss or return.
    Scalar(f32),

    /// A timestamp with local timezone.
    DateTime(DateTime<Local>),

    /// A 1-dimensional array of floating-point values.
    Array1(Vec<f32>),
}

/// A container for storing key-value pairs of various data types.
///
/// ```rust
/// use proxima_core::record::{Record, RecordValue};
///
/// let mut record = Record::from_scalar("loss_value", 0.5);
/// record.insert("entropy", RecordValue::Scalar(0.69));
/// let loss = record.get_scalar("loss_value").unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges two records, consuming both.
    ///
    /// If both records contain the same key, the value from the second record
    /// overwrites the value from the first one.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Gets a scalar value from the record.
    ///
    /// Returns an error if the key does not exist or the value is not a scalar.
    pub fn get_scalar(&self, k: &str) -> Result<f32, ProximaError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(ProximaError::RecordValueTypeError("Scalar".to_string())),
            None => Err(ProximaError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a 1-dimensional array from the record.
    pub fn get_array1(&self, k: &str) -> Result<Vec<f32>, ProximaError> {
        match self.0.get(k) {
            Some(RecordValue::Array1(v)) => Ok(v.clone()),
            Some(_) => Err(ProximaError::RecordValueTypeError("Array1".to_string())),
            None => Err(ProximaError::RecordKeyError(k.to_string())),
        }
    }

    /// Checks if the record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of entries in the record.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_get_scalar_errors() {
        let mut record = Record::from_scalar("loss_clip", 0.1);
        record.insert("act", RecordValue::Array1(vec![0.5, -0.5]));

        assert_eq!(record.get_scalar("loss_clip"), Ok(0.1));
        assert_eq!(
            record.get_scalar("act"),
            Err(ProximaError::RecordValueTypeError("Scalar".to_string()))
        );
        assert_eq!(
            record.get_scalar("entropy"),
            Err(ProximaError::RecordKeyError("entropy".to_string()))
        );
        assert_eq!(record.get_array1("act"), Ok(vec![0.5, -0.5]));
        assert!(record.get_array1("loss_clip").is_err());
    }

    #[test]
    fn test_merge_overwrites() {
        let r1 = Record::from_slice(&[
            ("env_steps", RecordValue::Scalar(10.0)),
            ("episode_reward", RecordValue::Scalar(3.0)),
        ]);
        let r2 = Record::from_scalar("env_steps", 20.0);
        let merged = r1.merge(r2);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get_scalar("env_steps").unwrap(), 20.0);
        assert_eq!(merged.get_scalar("episode_reward").unwrap(), 3.0);
    }
}
