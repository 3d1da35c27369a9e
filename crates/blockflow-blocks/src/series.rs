//! Series source block: an arithmetic progression as an array.

use blockflow_core::{
    Block, BlockError, EvalContext, Ports, Properties, Value, count_property, scalar_property,
};

/// Emits `[start, start + increment, ..., start + (count - 1) * increment]`.
///
/// ## Properties
///
/// | Key | Value | Default |
/// |-----|-------|---------|
/// | `start` | scalar | 0 |
/// | `increment` | scalar | 1 |
/// | `count` | non-negative integer | 10 |
///
/// # Example
///
/// ```rust
/// use blockflow_blocks::Series;
///
/// let series = Series::with_range("s", 0.0, 2.0, 3);
/// assert_eq!(series.values(), vec![0.0, 2.0, 4.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Series {
    uid: String,
    start: f64,
    increment: f64,
    count: usize,
    ports: Ports,
}

impl Series {
    /// Creates `0, 1, ..., 9`.
    pub fn new(uid: impl Into<String>) -> Self {
        Self::with_range(uid, 0.0, 1.0, 10)
    }

    /// Creates a series with explicit parameters.
    pub fn with_range(uid: impl Into<String>, start: f64, increment: f64, count: usize) -> Self {
        Self {
            uid: uid.into(),
            start,
            increment,
            count,
            ports: Ports::with(&[], &["Out"]),
        }
    }

    /// The elements this series emits.
    pub fn values(&self) -> Vec<f64> {
        (0..self.count)
            .map(|i| self.start + i as f64 * self.increment)
            .collect()
    }
}

impl Block for Series {
    block_plumbing!("series");

    fn update_model(&mut self, _ctx: &mut EvalContext<'_>) -> Result<(), BlockError> {
        self.ports.set_output("Out", Value::Array(self.values()));
        Ok(())
    }

    fn reset(&mut self) {}

    fn copy_with_uid(&self, uid: String) -> Box<dyn Block> {
        Box::new(Self::with_range(uid, self.start, self.increment, self.count))
    }

    fn properties(&self) -> Properties {
        Properties::from([
            ("count".to_string(), Value::Scalar(self.count as f64)),
            ("increment".to_string(), Value::Scalar(self.increment)),
            ("start".to_string(), Value::Scalar(self.start)),
        ])
    }

    fn set_property(&mut self, key: &str, value: Value) -> Result<(), BlockError> {
        match key {
            "start" => self.start = scalar_property(key, &value)?,
            "increment" => self.increment = scalar_property(key, &value)?,
            "count" => self.count = count_property(key, &value)?,
            _ => return Err(BlockError::UnknownProperty(key.to_string())),
        }
        Ok(())
    }
}
