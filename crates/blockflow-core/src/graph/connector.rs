//! Connectors: directed edges from one output port to one input port.
//!
//! A connector is the only way data moves between blocks. The dependency
//! graph the scheduler sorts is derived from the connector set: an edge
//! `A → B` exists iff some connector runs from a port of `A` to a port of `B`.

use crate::port::PortRef;

/// Unique identifier for a connector in a flowchart.
///
/// Connector IDs are assigned sequentially and never reused within a
/// flowchart instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectorId(pub(crate) u32);

impl ConnectorId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ConnectorId({})", self.0)
    }
}

/// A directed connection from an output port to an input port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connector {
    /// Output port the value is read from.
    pub source: PortRef,
    /// Input port the value is delivered to.
    pub target: PortRef,
}

impl Connector {
    /// Returns `true` if either endpoint is `port`.
    pub fn touches(&self, port: &PortRef) -> bool {
        self.source == *port || self.target == *port
    }
}
