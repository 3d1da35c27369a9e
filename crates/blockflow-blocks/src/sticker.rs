//! Sticker: a display sink.

use blockflow_core::{Block, BlockError, EvalContext, Ports, Properties, Value, text_property};

/// Shows whatever arrives on its `In` port. Has no outputs.
///
/// The displayed value is the input port's value, which the graph refreshes
/// just before each evaluation. A disconnected sticker shows `Undefined`.
///
/// ## Properties
///
/// | Key | Value | Default |
/// |-----|-------|---------|
/// | `label` | text | `""` |
#[derive(Debug, Clone)]
pub struct Sticker {
    uid: String,
    label: String,
    ports: Ports,
}

impl Sticker {
    /// Creates an unlabelled sticker.
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            label: String::new(),
            ports: Ports::with(&["In"], &[]),
        }
    }

    /// The value currently displayed.
    pub fn displayed(&self) -> &Value {
        self.ports.input("In")
    }

    /// Caption shown next to the value.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Block for Sticker {
    block_plumbing!("sticker");

    fn update_model(&mut self, _ctx: &mut EvalContext<'_>) -> Result<(), BlockError> {
        Ok(())
    }

    fn reset(&mut self) {}

    fn copy_with_uid(&self, uid: String) -> Box<dyn Block> {
        let mut copy = Self::new(uid);
        copy.label.clone_from(&self.label);
        Box::new(copy)
    }

    fn properties(&self) -> Properties {
        Properties::from([("label".to_string(), Value::from(self.label.as_str()))])
    }

    fn set_property(&mut self, key: &str, value: Value) -> Result<(), BlockError> {
        match key {
            "label" => self.label = text_property(key, &value)?,
            _ => return Err(BlockError::UnknownProperty(key.to_string())),
        }
        Ok(())
    }
}
