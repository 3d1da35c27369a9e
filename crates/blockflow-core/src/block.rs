//! The [`Block`] trait and the context blocks evaluate in.
//!
//! A block is an opaque compute unit: it reads the values on its input ports,
//! combines them with its own private state, and writes its output ports. The
//! graph decides when a block runs; the block only decides what it computes.
//!
//! ## Design Decisions
//!
//! - **Object-safe**: blocks live in the graph as `Box<dyn Block>`, so the
//!   scheduler never needs to know concrete kinds.
//!
//! - **No graph access during evaluation**: [`Block::update_model`] receives an
//!   [`EvalContext`], which exposes the global namespace read-only and queues
//!   global writes. A block cannot reach the graph, so it cannot trigger a
//!   recompute from inside one.
//!
//! - **Feedback lives in state, not wiring**: accumulators, counters and plot
//!   history keep their past in private fields. Wiring a block's output back
//!   into its own input is rejected at connect time.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::port::Ports;
use crate::value::Value;

/// Configuration fields of a block, keyed by property name.
///
/// This is what a property dialog edits and what a snapshot persists.
pub type Properties = BTreeMap<String, Value>;

/// Graph-wide global variables, keyed by name.
pub type Globals = BTreeMap<String, Value>;

/// Errors a block reports from evaluation or configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BlockError {
    /// An input carried a variant the block does not accept.
    #[error("port '{port}' expected {expected}, got {found}")]
    WrongType {
        /// Port label.
        port: String,
        /// Accepted variant(s), human readable.
        expected: &'static str,
        /// Variant actually received.
        found: &'static str,
    },

    /// A required input has no value yet.
    #[error("port '{0}' has no value")]
    MissingInput(String),

    /// Operands have incompatible dimensions.
    #[error("shape mismatch: {0}")]
    Shape(String),

    /// A property was given a value it cannot take.
    #[error("invalid value for property '{key}': {reason}")]
    InvalidProperty {
        /// Property name.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The block has no property with this name.
    #[error("unknown property '{0}'")]
    UnknownProperty(String),

    /// The computation itself failed.
    #[error("{0}")]
    Compute(String),
}

impl BlockError {
    /// Wrong-variant error for `port`, describing what was received.
    pub fn wrong_type(port: &str, expected: &'static str, found: &Value) -> Self {
        Self::WrongType {
            port: port.to_string(),
            expected,
            found: found.type_name(),
        }
    }

    /// Invalid-property error.
    pub fn invalid_property(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidProperty {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// What a block sees while it evaluates.
///
/// Reads of the global namespace reflect the values at the start of the
/// current pass. Writes are queued and applied by the graph once the pass
/// finishes; if any of them changes a global, the graph runs another full
/// pass.
pub struct EvalContext<'a> {
    globals: &'a Globals,
    writes: Vec<(String, Value)>,
}

impl<'a> EvalContext<'a> {
    /// Creates a context over the given globals with an empty write queue.
    pub fn new(globals: &'a Globals) -> Self {
        Self {
            globals,
            writes: Vec::new(),
        }
    }

    /// Current value of a global, if set.
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    /// Queues a write to the global namespace.
    pub fn write_global(&mut self, name: impl Into<String>, value: Value) {
        self.writes.push((name.into(), value));
    }

    /// Consumes the context, returning queued writes in order.
    pub fn into_writes(self) -> Vec<(String, Value)> {
        self.writes
    }
}

/// Core trait for every computational block.
///
/// Implementations differ only in their port shape and in
/// [`update_model`](Self::update_model). Everything else the graph needs
/// (copying, resetting, persisting configuration) is expressed through the
/// remaining methods.
///
/// # Example
///
/// ```rust
/// use blockflow_core::{Block, BlockError, EvalContext, Ports, Properties, Value};
///
/// struct Double {
///     uid: String,
///     ports: Ports,
/// }
///
/// impl Block for Double {
///     fn uid(&self) -> &str { &self.uid }
///     fn set_uid(&mut self, uid: String) { self.uid = uid; }
///     fn kind(&self) -> &'static str { "double" }
///     fn ports(&self) -> &Ports { &self.ports }
///     fn ports_mut(&mut self) -> &mut Ports { &mut self.ports }
///
///     fn update_model(&mut self, _ctx: &mut EvalContext<'_>) -> Result<(), BlockError> {
///         let x = self.ports.input("In").as_scalar()
///             .ok_or_else(|| BlockError::MissingInput("In".into()))?;
///         self.ports.set_output("Out", Value::Scalar(2.0 * x));
///         Ok(())
///     }
///
///     fn reset(&mut self) {}
///
///     fn copy_with_uid(&self, uid: String) -> Box<dyn Block> {
///         Box::new(Double { uid, ports: Ports::with(&["In"], &["Out"]) })
///     }
///
///     fn properties(&self) -> Properties { Properties::new() }
///
///     fn set_property(&mut self, key: &str, _value: Value) -> Result<(), BlockError> {
///         Err(BlockError::UnknownProperty(key.into()))
///     }
/// }
/// ```
pub trait Block: Send {
    /// Globally unique identifier.
    fn uid(&self) -> &str;

    /// Replaces the identifier. Only the graph calls this, before insertion.
    fn set_uid(&mut self, uid: String);

    /// Kind id, as registered with a [`BlockFactory`].
    fn kind(&self) -> &'static str;

    /// The block's ports in order.
    fn ports(&self) -> &Ports;

    /// Mutable access to the ports. The graph writes input values through
    /// this before each evaluation.
    fn ports_mut(&mut self) -> &mut Ports;

    /// Computes outputs from current input values and private state.
    ///
    /// Must write every output this tick produces; an output left
    /// [`Value::Undefined`] means "nothing yet". On error the graph clears
    /// all outputs of this block for the tick.
    fn update_model(&mut self, ctx: &mut EvalContext<'_>) -> Result<(), BlockError>;

    /// Clears private state (history, counters, seeds back to their initial
    /// value) without touching configuration or wiring.
    fn reset(&mut self);

    /// Returns an independent copy with a new uid: same configuration, empty
    /// state, fresh ports.
    fn copy_with_uid(&self, uid: String) -> Box<dyn Block>;

    /// Current configuration fields.
    fn properties(&self) -> Properties;

    /// Sets one configuration field. May resize the port list; the graph
    /// takes care of connectors on dropped ports.
    fn set_property(&mut self, key: &str, value: Value) -> Result<(), BlockError>;
}

/// Creates blocks by kind id.
///
/// This is the seam between the engine and a block catalogue: the graph uses
/// it for `add_block_of_kind` and when restoring a snapshot.
pub trait BlockFactory {
    /// Creates a fresh block of `kind` with the given uid, or `None` if the
    /// kind is unknown.
    fn create(&self, kind: &str, uid: &str) -> Option<Box<dyn Block>>;
}

/// Reads a numeric property value, rejecting any other variant.
pub fn scalar_property(key: &str, value: &Value) -> Result<f64, BlockError> {
    value
        .as_scalar()
        .ok_or_else(|| {
            BlockError::invalid_property(key, format!("expected scalar, got {}", value.type_name()))
        })
}

/// Reads a text property value, rejecting any other variant.
pub fn text_property(key: &str, value: &Value) -> Result<String, BlockError> {
    value
        .as_text()
        .map(str::to_string)
        .ok_or_else(|| {
            BlockError::invalid_property(key, format!("expected text, got {}", value.type_name()))
        })
}

/// Reads a non-negative integer property value.
pub fn count_property(key: &str, value: &Value) -> Result<usize, BlockError> {
    let x = scalar_property(key, value)?;
    if x < 0.0 || x.fract() != 0.0 || !x.is_finite() {
        return Err(BlockError::invalid_property(
            key,
            format!("expected a non-negative integer, got {x}"),
        ));
    }
    Ok(x as usize)
}
