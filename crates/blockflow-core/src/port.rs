//! Ports: the named attachment points a block exposes to the graph.
//!
//! A block owns its [`Ports`] exclusively. The graph addresses a port from the
//! outside with a [`PortRef`] (owning block + port uid), so wiring survives a
//! block resizing its port list as long as the retained ports keep their uids.

use crate::graph::BlockId;
use crate::value::Value;

static UNDEFINED: Value = Value::Undefined;

/// Whether a port receives or produces values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    /// Receives a value from at most one connector.
    Input,
    /// Produces a value for any number of connectors.
    Output,
}

/// A named, directional attachment point carrying the last value seen.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    uid: String,
    direction: PortDirection,
    /// Last value written (outputs) or received (inputs).
    pub value: Value,
}

impl Port {
    /// Creates an input port holding [`Value::Undefined`].
    pub fn input(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            direction: PortDirection::Input,
            value: Value::Undefined,
        }
    }

    /// Creates an output port holding [`Value::Undefined`].
    pub fn output(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            direction: PortDirection::Output,
            value: Value::Undefined,
        }
    }

    /// Port label, unique within its block.
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Input or output.
    pub fn direction(&self) -> PortDirection {
        self.direction
    }

    /// Shorthand for `direction() == PortDirection::Input`.
    pub fn is_input(&self) -> bool {
        self.direction == PortDirection::Input
    }
}

/// The ordered port list owned by one block.
///
/// Port uids are unique within the list; [`push`](Self::push) ignores a port
/// whose uid is already present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ports {
    ports: Vec<Port>,
}

impl Ports {
    /// Creates an empty port list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a port list from input and output labels, inputs first.
    pub fn with(inputs: &[&str], outputs: &[&str]) -> Self {
        let mut ports = Self::new();
        for uid in inputs {
            ports.push(Port::input(*uid));
        }
        for uid in outputs {
            ports.push(Port::output(*uid));
        }
        ports
    }

    /// Appends a port unless one with the same uid exists.
    pub fn push(&mut self, port: Port) {
        if self.get(port.uid()).is_none() {
            self.ports.push(port);
        }
    }

    /// Removes and returns the port with this uid.
    pub fn remove(&mut self, uid: &str) -> Option<Port> {
        let idx = self.ports.iter().position(|p| p.uid == uid)?;
        Some(self.ports.remove(idx))
    }

    /// Looks up a port by uid.
    pub fn get(&self, uid: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.uid == uid)
    }

    /// Looks up a port by uid for mutation.
    pub fn get_mut(&mut self, uid: &str) -> Option<&mut Port> {
        self.ports.iter_mut().find(|p| p.uid == uid)
    }

    /// Value currently on an input port, or [`Value::Undefined`] if there is
    /// no such input.
    pub fn input(&self, uid: &str) -> &Value {
        match self.get(uid) {
            Some(port) if port.is_input() => &port.value,
            _ => &UNDEFINED,
        }
    }

    /// Writes a value to an output port. Unknown or input uids are ignored.
    pub fn set_output(&mut self, uid: &str, value: Value) {
        if let Some(port) = self.get_mut(uid)
            && !port.is_input()
        {
            port.value = value;
        }
    }

    /// Resets every output port to [`Value::Undefined`].
    pub fn clear_outputs(&mut self) {
        for port in self.ports.iter_mut().filter(|p| !p.is_input()) {
            port.value = Value::Undefined;
        }
    }

    /// Resets every port, inputs included, to [`Value::Undefined`].
    pub fn clear_all(&mut self) {
        for port in &mut self.ports {
            port.value = Value::Undefined;
        }
    }

    /// Grows or shrinks a numbered family of inputs `{prefix}1..={prefix}n`.
    ///
    /// Retained inputs keep their position and value. New inputs are inserted
    /// after the last input of the family so outputs stay at the end.
    pub fn resize_inputs(&mut self, prefix: &str, n: usize) {
        let family = |uid: &str| {
            uid.strip_prefix(prefix)
                .and_then(|rest| rest.parse::<usize>().ok())
        };
        self.ports
            .retain(|p| !p.is_input() || family(&p.uid).is_none_or(|i| (1..=n).contains(&i)));

        for i in 1..=n {
            let uid = format!("{prefix}{i}");
            if self.get(&uid).is_none() {
                let at = self
                    .ports
                    .iter()
                    .rposition(|p| p.is_input())
                    .map_or(0, |idx| idx + 1);
                self.ports.insert(at, Port::input(uid));
            }
        }
    }

    /// Iterates the ports in order.
    pub fn iter(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter()
    }

    /// Iterates the input ports in order.
    pub fn inputs(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| p.is_input())
    }

    /// Iterates the output ports in order.
    pub fn outputs(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| !p.is_input())
    }

    /// Port uids in order.
    pub fn uids(&self) -> Vec<String> {
        self.ports.iter().map(|p| p.uid.clone()).collect()
    }

    /// Number of ports.
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Returns `true` if the block has no ports.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

/// Graph-wide address of a port: the owning block and the port's uid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PortRef {
    /// Owning block.
    pub block: BlockId,
    /// Port label within that block.
    pub port: String,
}

impl PortRef {
    /// Creates a port reference.
    pub fn new(block: BlockId, port: impl Into<String>) -> Self {
        Self {
            block,
            port: port.into(),
        }
    }
}

impl core::fmt::Display for PortRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}", self.block, self.port)
    }
}
