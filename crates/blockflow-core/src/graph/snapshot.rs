//! Serializable capture of a flowchart's structure and configuration.
//!
//! A [`GraphSnapshot`] records what is needed to rebuild an equivalent
//! flowchart through a [`BlockFactory`](crate::BlockFactory): block kinds,
//! uids and properties, connectors by uid and port, and globals. Port values
//! and private block state are not captured; a restored flowchart starts
//! cold and fills in on its first recompute.

use serde::{Deserialize, Serialize};

use crate::block::{Globals, Properties};

/// Snapshot of an entire flowchart for save/restore workflows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// One entry per block, in insertion order.
    #[serde(default)]
    pub blocks: Vec<BlockSnapshot>,
    /// One entry per connector, in insertion order.
    #[serde(default)]
    pub connectors: Vec<ConnectorSnapshot>,
    /// Global variables at capture time.
    #[serde(default)]
    pub globals: Globals,
}

/// State of a single block in a [`GraphSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    /// Block uid.
    pub uid: String,
    /// Kind id understood by the block factory (e.g. `"series"`).
    pub kind: String,
    /// Configuration fields.
    #[serde(default)]
    pub properties: Properties,
}

/// A connector in a [`GraphSnapshot`], addressed by block uid and port uid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorSnapshot {
    /// Source block uid.
    pub from: String,
    /// Source output port.
    pub from_port: String,
    /// Target block uid.
    pub to: String,
    /// Target input port.
    pub to_port: String,
}

impl ConnectorSnapshot {
    /// Creates a connector entry.
    pub fn new(
        from: impl Into<String>,
        from_port: impl Into<String>,
        to: impl Into<String>,
        to_port: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            from_port: from_port.into(),
            to: to.into(),
            to_port: to_port.into(),
        }
    }
}
