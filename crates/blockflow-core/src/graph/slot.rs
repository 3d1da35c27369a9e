//! Block identifiers and the graph's per-block bookkeeping.
//!
//! Each block in the flowchart has a [`BlockId`] and lives in a `BlockSlot`
//! that bundles the boxed block with its adjacency lists (connector ids
//! arriving at and leaving from any of its ports).

use crate::block::Block;

use super::connector::ConnectorId;

/// Unique identifier for a block in a flowchart.
///
/// Block IDs are assigned sequentially and never reused within a flowchart
/// instance. They stay stable across mutations and recomputes. The
/// user-facing identity is the block's uid string; `BlockId` is the cheap
/// handle the engine passes around.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub(crate) u32);

impl BlockId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn slot(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for BlockId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "BlockId({})", self.0)
    }
}

/// Internal bookkeeping for a block in the graph.
pub(crate) struct BlockSlot {
    pub block: Box<dyn Block>,
    /// Connectors whose target port belongs to this block.
    pub incoming: Vec<ConnectorId>,
    /// Connectors whose source port belongs to this block.
    pub outgoing: Vec<ConnectorId>,
}

impl BlockSlot {
    pub fn new(block: Box<dyn Block>) -> Self {
        Self {
            block,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }
}
