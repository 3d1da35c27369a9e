//! Global variable blocks: publish to and read from the graph-wide namespace.
//!
//! A [`GlobalVariable`] writes its value under a name through
//! [`EvalContext::write_global`]. Any [`GlobalRef`] with the same name sees
//! the new value once the graph re-runs, whether or not it is wired to the
//! writer.

use blockflow_core::{Block, BlockError, EvalContext, Ports, Properties, Value, text_property};

fn variable_name(key: &str, value: &Value) -> Result<String, BlockError> {
    let name = text_property(key, value)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(BlockError::invalid_property(key, "name must not be empty"));
    }
    Ok(name.to_string())
}

/// Publishes a value as a global variable.
///
/// The published value is `In` when it carries something, otherwise the
/// configured `value`. It is also passed through on `Out`.
///
/// ## Properties
///
/// | Key | Value | Default |
/// |-----|-------|---------|
/// | `name` | non-empty text | `"x"` |
/// | `value` | any (used while `In` is undefined) | `Scalar(0)` |
#[derive(Debug, Clone)]
pub struct GlobalVariable {
    uid: String,
    name: String,
    value: Value,
    ports: Ports,
}

impl GlobalVariable {
    /// Creates a writer for global `x` with default value `0`.
    pub fn new(uid: impl Into<String>) -> Self {
        Self::named(uid, "x", Value::Scalar(0.0))
    }

    /// Creates a writer for `name` with a default value.
    pub fn named(uid: impl Into<String>, name: impl Into<String>, value: Value) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            value,
            ports: Ports::with(&["In"], &["Out"]),
        }
    }

    /// Name of the global this block writes.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Block for GlobalVariable {
    block_plumbing!("global_variable");

    fn update_model(&mut self, ctx: &mut EvalContext<'_>) -> Result<(), BlockError> {
        let value = match self.ports.input("In") {
            Value::Undefined => self.value.clone(),
            input => input.clone(),
        };
        ctx.write_global(self.name.as_str(), value.clone());
        self.ports.set_output("Out", value);
        Ok(())
    }

    fn reset(&mut self) {}

    fn copy_with_uid(&self, uid: String) -> Box<dyn Block> {
        Box::new(Self::named(uid, self.name.as_str(), self.value.clone()))
    }

    fn properties(&self) -> Properties {
        Properties::from([
            ("name".to_string(), Value::from(self.name.as_str())),
            ("value".to_string(), self.value.clone()),
        ])
    }

    fn set_property(&mut self, key: &str, value: Value) -> Result<(), BlockError> {
        match key {
            "name" => self.name = variable_name(key, &value)?,
            "value" => self.value = value,
            _ => return Err(BlockError::UnknownProperty(key.to_string())),
        }
        Ok(())
    }
}

/// Reads a global variable onto `Out`.
///
/// Emits `Undefined` while the global is unset.
///
/// ## Properties
///
/// | Key | Value | Default |
/// |-----|-------|---------|
/// | `name` | non-empty text | `"x"` |
#[derive(Debug, Clone)]
pub struct GlobalRef {
    uid: String,
    name: String,
    ports: Ports,
}

impl GlobalRef {
    /// Creates a reader for global `x`.
    pub fn new(uid: impl Into<String>) -> Self {
        Self::named(uid, "x")
    }

    /// Creates a reader for `name`.
    pub fn named(uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            ports: Ports::with(&[], &["Out"]),
        }
    }
}

impl Block for GlobalRef {
    block_plumbing!("global_ref");

    fn update_model(&mut self, ctx: &mut EvalContext<'_>) -> Result<(), BlockError> {
        let value = ctx.global(&self.name).cloned().unwrap_or_default();
        self.ports.set_output("Out", value);
        Ok(())
    }

    fn reset(&mut self) {}

    fn copy_with_uid(&self, uid: String) -> Box<dyn Block> {
        Box::new(Self::named(uid, self.name.as_str()))
    }

    fn properties(&self) -> Properties {
        Properties::from([("name".to_string(), Value::from(self.name.as_str()))])
    }

    fn set_property(&mut self, key: &str, value: Value) -> Result<(), BlockError> {
        match key {
            "name" => self.name = variable_name(key, &value)?,
            _ => return Err(BlockError::UnknownProperty(key.to_string())),
        }
        Ok(())
    }
}
