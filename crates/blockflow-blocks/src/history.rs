//! History: a sliding window of past samples, the buffer behind a plot.

use std::collections::VecDeque;

use blockflow_core::{Block, BlockError, EvalContext, Ports, Properties, Value, count_property};

/// Records one scalar per evaluation and emits the last `window` samples.
///
/// `Out` stays `Undefined` until `window` samples have accumulated, then
/// carries an array of the most recent `window`, oldest first. Ticks where
/// `In` is undefined record nothing.
///
/// ## Properties
///
/// | Key | Value | Default |
/// |-----|-------|---------|
/// | `window` | integer ≥ 1 | 10 |
#[derive(Debug, Clone)]
pub struct History {
    uid: String,
    window: usize,
    samples: VecDeque<f64>,
    ports: Ports,
}

impl History {
    /// Creates a ten-sample history.
    pub fn new(uid: impl Into<String>) -> Self {
        Self::with_window(uid, 10)
    }

    /// Creates a history of `window` samples.
    pub fn with_window(uid: impl Into<String>, window: usize) -> Self {
        let window = window.max(1);
        Self {
            uid: uid.into(),
            window,
            samples: VecDeque::with_capacity(window),
            ports: Ports::with(&["In"], &["Out"]),
        }
    }

    /// Samples currently held, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }
}

impl Block for History {
    block_plumbing!("history");

    fn update_model(&mut self, _ctx: &mut EvalContext<'_>) -> Result<(), BlockError> {
        match self.ports.input("In") {
            Value::Undefined => {}
            Value::Scalar(x) => {
                if self.samples.len() == self.window {
                    self.samples.pop_front();
                }
                self.samples.push_back(*x);
            }
            other => return Err(BlockError::wrong_type("In", "scalar", other)),
        }

        if self.samples.len() == self.window {
            self.ports
                .set_output("Out", Value::Array(self.samples.iter().copied().collect()));
        } else {
            self.ports.clear_outputs();
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.samples.clear();
        self.ports.clear_outputs();
    }

    fn copy_with_uid(&self, uid: String) -> Box<dyn Block> {
        Box::new(Self::with_window(uid, self.window))
    }

    fn properties(&self) -> Properties {
        Properties::from([("window".to_string(), Value::Scalar(self.window as f64))])
    }

    fn set_property(&mut self, key: &str, value: Value) -> Result<(), BlockError> {
        match key {
            "window" => {
                let window = count_property(key, &value)?;
                if window == 0 {
                    return Err(BlockError::invalid_property(key, "window must be at least 1"));
                }
                while self.samples.len() > window {
                    self.samples.pop_front();
                }
                self.window = window;
            }
            _ => return Err(BlockError::UnknownProperty(key.to_string())),
        }
        Ok(())
    }
}
