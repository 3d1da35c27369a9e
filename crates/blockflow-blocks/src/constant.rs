//! Constant source block.

use blockflow_core::{Block, BlockError, EvalContext, Ports, Properties, Value};

/// Emits a fixed, user-configured value of any variant.
///
/// ## Ports
///
/// | Port | Direction | Value |
/// |------|-----------|-------|
/// | `Out` | output | the configured `value` |
///
/// ## Properties
///
/// | Key | Value | Default |
/// |-----|-------|---------|
/// | `value` | any | `Scalar(0)` |
#[derive(Debug, Clone)]
pub struct Constant {
    uid: String,
    value: Value,
    ports: Ports,
}

impl Constant {
    /// Creates a constant emitting `0`.
    pub fn new(uid: impl Into<String>) -> Self {
        Self::with_value(uid, Value::Scalar(0.0))
    }

    /// Creates a constant emitting `value`.
    pub fn with_value(uid: impl Into<String>, value: Value) -> Self {
        Self {
            uid: uid.into(),
            value,
            ports: Ports::with(&[], &["Out"]),
        }
    }

    /// The configured value.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Block for Constant {
    block_plumbing!("constant");

    fn update_model(&mut self, _ctx: &mut EvalContext<'_>) -> Result<(), BlockError> {
        self.ports.set_output("Out", self.value.clone());
        Ok(())
    }

    fn reset(&mut self) {}

    fn copy_with_uid(&self, uid: String) -> Box<dyn Block> {
        Box::new(Self::with_value(uid, self.value.clone()))
    }

    fn properties(&self) -> Properties {
        Properties::from([("value".to_string(), self.value.clone())])
    }

    fn set_property(&mut self, key: &str, value: Value) -> Result<(), BlockError> {
        match key {
            "value" => self.value = value,
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
    fn emits_configured_value() {
        let globals = Globals::new();
        let mut block = Constant::new("c");
        block
            .set_property("value", Value::Array(vec![1.0, 2.0]))
            .unwrap();
        block.update_model(&mut EvalContext::new(&globals)).unwrap();
        assert_eq!(block.ports().get("Out").unwrap().value, Value::Array(vec![1.0, 2.0]));
    }

    #[test]
    fn unknown_property_rejected() {
        let mut block = Constant::new("c");
        assert_eq!(
            block.set_property("colour", Value::Scalar(1.0)),
            Err(BlockError::UnknownProperty("colour".into()))
        );
    }
}
