//! Bundle: gathers a variable number of inputs into one array.

use blockflow_core::{Block, BlockError, EvalContext, Ports, Properties, Value, count_property};

const MAX_CHANNELS: usize = 64;

/// Concatenates inputs `In1..InN` into an array on `Out`.
///
/// Scalars contribute one element, arrays and vectors all of theirs. Until
/// every input carries a value the output stays `Undefined`.
///
/// Changing `channels` resizes the input list; retained inputs keep their
/// connectors, dropped ones lose them.
///
/// ## Properties
///
/// | Key | Value | Default |
/// |-----|-------|---------|
/// | `channels` | integer in 1..=64 | 2 |
#[derive(Debug, Clone)]
pub struct Bundle {
    uid: String,
    ports: Ports,
}

impl Bundle {
    /// Creates a two-channel bundle.
    pub fn new(uid: impl Into<String>) -> Self {
        Self::with_channels(uid, 2)
    }

    /// Creates a bundle with `n` inputs.
    pub fn with_channels(uid: impl Into<String>, n: usize) -> Self {
        let mut ports = Ports::with(&[], &["Out"]);
        ports.resize_inputs("In", n.clamp(1, MAX_CHANNELS));
        Self {
            uid: uid.into(),
            ports,
        }
    }

    /// Number of inputs.
    pub fn channels(&self) -> usize {
        self.ports.inputs().count()
    }
}

impl Block for Bundle {
    block_plumbing!("bundle");

    fn update_model(&mut self, _ctx: &mut EvalContext<'_>) -> Result<(), BlockError> {
        let mut out = Vec::new();
        let mut complete = true;
        for port in self.ports.inputs() {
            match &port.value {
                Value::Undefined => {
                    complete = false;
                    break;
                }
                Value::Scalar(x) => out.push(*x),
                Value::Array(xs) => out.extend_from_slice(xs),
                Value::Vector(v) => out.extend_from_slice(&v.0),
                other => {
                    return Err(BlockError::wrong_type(port.uid(), "scalar, array or vector", other));
                }
            }
        }
        if complete {
            self.ports.set_output("Out", Value::Array(out));
        } else {
            self.ports.clear_outputs();
        }
        Ok(())
    }

    fn reset(&mut self) {}

    fn copy_with_uid(&self, uid: String) -> Box<dyn Block> {
        Box::new(Self::with_channels(uid, self.channels()))
    }

    fn properties(&self) -> Properties {
        Properties::from([("channels".to_string(), Value::Scalar(self.channels() as f64))])
    }

    fn set_property(&mut self, key: &str, value: Value) -> Result<(), BlockError> {
        match key {
            "channels" => {
                let n = count_property(key, &value)?;
                if !(1..=MAX_CHANNELS).contains(&n) {
                    return Err(BlockError::invalid_property(
                        key,
                        format!("expected 1..={MAX_CHANNELS}, got {n}"),
                    ));
                }
                self.ports.resize_inputs("In", n);
            }
            _ => return Err(BlockError::UnknownProperty(key.to_string())),
        }
        Ok(())
    }
}
