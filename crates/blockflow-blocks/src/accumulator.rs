//! Accumulator: a running sum that doubles as a counter.

use blockflow_core::{Block, BlockError, EvalContext, Ports, Properties, Value, scalar_property};

/// Adds `In` to a running total on every evaluation.
///
/// With `In` unconnected the total grows by `step` instead, which makes the
/// block a tick counter. The feedback lives in the block's own state, so no
/// connector loop is needed.
///
/// ## Properties
///
/// | Key | Value | Default |
/// |-----|-------|---------|
/// | `initial` | scalar, the total after a reset | 0 |
/// | `step` | scalar added when `In` is undefined | 1 |
#[derive(Debug, Clone)]
pub struct Accumulator {
    uid: String,
    initial: f64,
    step: f64,
    total: f64,
    ports: Ports,
}

impl Accumulator {
    /// Creates a counter starting at `0` with step `1`.
    pub fn new(uid: impl Into<String>) -> Self {
        Self::with_step(uid, 0.0, 1.0)
    }

    /// Creates an accumulator with explicit initial total and step.
    pub fn with_step(uid: impl Into<String>, initial: f64, step: f64) -> Self {
        Self {
            uid: uid.into(),
            initial,
            step,
            total: initial,
            ports: Ports::with(&["In"], &["Out"]),
        }
    }

    /// Current running total.
    pub fn total(&self) -> f64 {
        self.total
    }
}

impl Block for Accumulator {
    block_plumbing!("accumulator");

    fn update_model(&mut self, _ctx: &mut EvalContext<'_>) -> Result<(), BlockError> {
        let increment = match self.ports.input("In") {
            Value::Undefined => self.step,
            Value::Scalar(x) => *x,
            other => return Err(BlockError::wrong_type("In", "scalar", other)),
        };
        self.total += increment;
        self.ports.set_output("Out", Value::Scalar(self.total));
        Ok(())
    }

    fn reset(&mut self) {
        self.total = self.initial;
        self.ports.clear_outputs();
    }

    fn copy_with_uid(&self, uid: String) -> Box<dyn Block> {
        Box::new(Self::with_step(uid, self.initial, self.step))
    }

    fn properties(&self) -> Properties {
        Properties::from([
            ("initial".to_string(), Value::Scalar(self.initial)),
            ("step".to_string(), Value::Scalar(self.step)),
        ])
    }

    fn set_property(&mut self, key: &str, value: Value) -> Result<(), BlockError> {
        match key {
            "initial" => self.initial = scalar_property(key, &value)?,
            "step" => self.step = scalar_property(key, &value)?,
            _ => return Err(BlockError::UnknownProperty(key.to_string())),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockflow_core::Globals;

    #[test]
    fn counts_when_unconnected_and_sums_when_fed() {
        let globals = Globals::new();
        let mut acc = Accumulator::with_step("a", 10.0, 2.0);
        acc.update_model(&mut EvalContext::new(&globals)).unwrap();
        acc.update_model(&mut EvalContext::new(&globals)).unwrap();
        assert_eq!(acc.total(), 14.0);

        acc.ports_mut().get_mut("In").unwrap().value = Value::Scalar(0.5);
        acc.update_model(&mut EvalContext::new(&globals)).unwrap();
        assert_eq!(acc.ports().get("Out").unwrap().value, Value::Scalar(14.5));

        acc.reset();
        assert_eq!(acc.total(), 10.0);
    }

    #[test]
    fn arrays_are_rejected() {
        let globals = Globals::new();
        let mut acc = Accumulator::new("a");
        acc.ports_mut().get_mut("In").unwrap().value = Value::Array(vec![1.0]);
        assert!(acc.update_model(&mut EvalContext::new(&globals)).is_err());
        assert_eq!(acc.total(), 0.0);
    }
}
