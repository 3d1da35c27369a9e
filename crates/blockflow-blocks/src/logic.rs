//! Boolean logic block.

use blockflow_core::{Block, BlockError, EvalContext, Ports, Properties, Value, text_property};

/// Gate applied by [`Logic`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Gate {
    /// `a && b`
    #[default]
    And,
    /// `a || b`
    Or,
    /// `a != b`
    Xor,
    /// `!(a && b)`
    Nand,
    /// `!(a || b)`
    Nor,
    /// `!a` (input `B` is ignored)
    Not,
}

impl Gate {
    /// Property value naming this gate.
    pub fn name(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Nand => "nand",
            Self::Nor => "nor",
            Self::Not => "not",
        }
    }

    /// Parses a gate name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        let gate = match s.trim().to_ascii_lowercase().as_str() {
            "and" => Self::And,
            "or" => Self::Or,
            "xor" => Self::Xor,
            "nand" => Self::Nand,
            "nor" => Self::Nor,
            "not" => Self::Not,
            _ => return None,
        };
        Some(gate)
    }

    /// Evaluates the gate.
    pub fn eval(self, a: bool, b: bool) -> bool {
        match self {
            Self::And => a && b,
            Self::Or => a || b,
            Self::Xor => a != b,
            Self::Nand => !(a && b),
            Self::Nor => !(a || b),
            Self::Not => !a,
        }
    }
}

fn boolean_input(ports: &Ports, port: &str) -> Result<bool, BlockError> {
    match ports.input(port) {
        Value::Boolean(b) => Ok(*b),
        Value::Undefined => Err(BlockError::MissingInput(port.to_string())),
        other => Err(BlockError::wrong_type(port, "boolean", other)),
    }
}

/// Boolean gate over inputs `A` and `B`, writing a boolean to `Out`.
///
/// ## Properties
///
/// | Key | Value | Default |
/// |-----|-------|---------|
/// | `operation` | `and`, `or`, `xor`, `nand`, `nor`, `not` | `and` |
#[derive(Debug, Clone)]
pub struct Logic {
    uid: String,
    gate: Gate,
    ports: Ports,
}

impl Logic {
    /// Creates an AND gate.
    pub fn new(uid: impl Into<String>) -> Self {
        Self::with_gate(uid, Gate::And)
    }

    /// Creates a block computing `gate`.
    pub fn with_gate(uid: impl Into<String>, gate: Gate) -> Self {
        Self {
            uid: uid.into(),
            gate,
            ports: Ports::with(&["A", "B"], &["Out"]),
        }
    }
}

impl Block for Logic {
    block_plumbing!("logic");

    fn update_model(&mut self, _ctx: &mut EvalContext<'_>) -> Result<(), BlockError> {
        let a = boolean_input(&self.ports, "A")?;
        let b = match self.gate {
            Gate::Not => false,
            _ => boolean_input(&self.ports, "B")?,
        };
        self.ports.set_output("Out", Value::Boolean(self.gate.eval(a, b)));
        Ok(())
    }

    fn reset(&mut self) {}

    fn copy_with_uid(&self, uid: String) -> Box<dyn Block> {
        Box::new(Self::with_gate(uid, self.gate))
    }

    fn properties(&self) -> Properties {
        Properties::from([("operation".to_string(), Value::from(self.gate.name()))])
    }

    fn set_property(&mut self, key: &str, value: Value) -> Result<(), BlockError> {
        match key {
            "operation" => {
                let name = text_property(key, &value)?;
                self.gate = Gate::parse(&name).ok_or_else(|| {
                    BlockError::invalid_property(key, format!("unknown gate '{name}'"))
                })?;
            }
            _ => return Err(BlockError::UnknownProperty(key.to_string())),
        }
        Ok(())
    }
}
