//! Errors raised by flowchart mutations and recomputes.
//!
//! [`GraphError`] is returned when an operation is refused; the graph is left
//! exactly as it was. [`CycleDetected`] and [`BlockEvaluationError`] are not
//! fatal: they describe parts of a recompute that were skipped or failed and
//! are collected in a [`RecomputeReport`](super::RecomputeReport).

use thiserror::Error;

use crate::block::BlockError;

use super::connector::ConnectorId;
use super::slot::BlockId;

/// Why a connector was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WiringViolation {
    /// The source is an input port or the target is an output port.
    Direction,
    /// Source and target belong to the same block.
    SameBlock,
    /// The target input already has a connector.
    FanIn,
    /// The connector would close a dependency cycle.
    Cycle,
}

impl core::fmt::Display for WiringViolation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Direction => f.write_str("connectors run from an output port to an input port"),
            Self::SameBlock => f.write_str("a block cannot be wired to itself"),
            Self::FanIn => f.write_str("target input is already connected"),
            Self::Cycle => f.write_str("connector would create a dependency cycle"),
        }
    }
}

/// Errors that can occur during graph operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// The specified block was not found in the graph.
    #[error("block {0} not found")]
    BlockNotFound(BlockId),

    /// No block carries this uid.
    #[error("no block with uid '{0}'")]
    UnknownUid(String),

    /// The specified connector was not found in the graph.
    #[error("connector {0} not found")]
    ConnectorNotFound(ConnectorId),

    /// The block exists but has no port with this uid.
    #[error("block '{block}' has no port '{port}'")]
    PortNotFound {
        /// Block uid.
        block: String,
        /// Port uid.
        port: String,
    },

    /// Another block already uses this uid.
    #[error("a block with uid '{0}' already exists")]
    DuplicateUid(String),

    /// The block factory does not know this kind.
    #[error("unknown block kind '{0}'")]
    UnknownKind(String),

    /// The connector violates a wiring rule.
    #[error("cannot connect {source_port} to {target_port}: {violation}")]
    InvalidWiring {
        /// `block.port` of the proposed source.
        source_port: String,
        /// `block.port` of the proposed target.
        target_port: String,
        /// The rule that was broken.
        violation: WiringViolation,
    },

    /// The block refused a property value.
    #[error("block '{uid}': {source}")]
    Property {
        /// Block uid.
        uid: String,
        /// What the block reported.
        #[source]
        source: BlockError,
    },

    /// A connector points at a block or port that no longer exists.
    ///
    /// Mutations keep the connector set consistent, so this only surfaces
    /// from [`Flowchart::validate`](super::Flowchart::validate) or when the
    /// engine's own bookkeeping is broken.
    #[error("connector {connector} references missing endpoint {endpoint}")]
    DanglingReference {
        /// Offending connector.
        connector: ConnectorId,
        /// `block.port` that could not be resolved.
        endpoint: String,
    },
}

/// A set of blocks that depend on each other in a loop.
///
/// The blocks were skipped for the recompute that found them; their outputs
/// keep the values of their last successful evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("dependency cycle among blocks: {}", uids.join(", "))]
pub struct CycleDetected {
    /// Blocks on the cycle, in ascending id order.
    pub blocks: Vec<BlockId>,
    /// Their uids, in the same order.
    pub uids: Vec<String>,
}

/// A block failed during a recompute.
///
/// Its outputs were cleared to `Undefined` for the tick; the rest of the
/// recompute carried on.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("block '{uid}' failed: {source}")]
pub struct BlockEvaluationError {
    /// Failing block.
    pub block: BlockId,
    /// Its uid.
    pub uid: String,
    /// What the block reported.
    #[source]
    pub source: BlockError,
}
