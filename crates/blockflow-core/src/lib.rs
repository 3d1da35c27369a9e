//! Blockflow Core - dataflow graph engine for block diagrams
//!
//! This crate provides the engine behind a block-diagram calculator: blocks
//! expose ports, connectors carry values from output ports to input ports,
//! and a [`Flowchart`] re-evaluates blocks in dependency order whenever
//! something changes.
//!
//! # Core Abstractions
//!
//! ## Data Model
//!
//! - [`Value`] - Tagged union every port carries (scalar, array, matrix, ...)
//! - [`Port`] / [`Ports`] - Named, directional attachment points a block owns
//! - [`PortRef`] - Graph-wide port address (block + port uid)
//! - [`Connector`] - Directed edge from an output port to an input port
//!
//! ## Blocks
//!
//! - [`Block`] - Object-safe trait for every computational unit
//! - [`EvalContext`] - What a block sees while evaluating (globals, write queue)
//! - [`BlockFactory`] - Creates blocks by kind id
//!
//! ## Graph
//!
//! - [`Flowchart`] - Owns blocks, connectors and globals; runs recomputes
//! - [`RecomputeReport`] - What a recompute evaluated, skipped and failed
//! - [`GraphSnapshot`] - Serializable structure for save/restore
//!
//! # Feature Flags
//!
//! - `tracing` - emit `tracing` events for mutations, failures and cycles
//!
//! # Example
//!
//! ```rust,ignore
//! use blockflow_core::{Flowchart, PortRef};
//!
//! let mut chart = Flowchart::default();
//! let a = chart.add_block(source)?;
//! let b = chart.add_block(sink)?;
//! chart.add_connector(PortRef::new(a, "Out"), PortRef::new(b, "In"))?;
//!
//! let report = chart.update_results()?;
//! for failure in &report.failures {
//!     eprintln!("{failure}");
//! }
//! ```
//!
//! # Design Principles
//!
//! - **Engine is value-blind**: it transports [`Value`]s and never converts them
//! - **Failures stay local**: a failing block clears its own outputs; the rest
//!   of the chart still evaluates
//! - **Never hangs**: cycles are detected, reported and skipped

pub mod block;
pub mod graph;
pub mod port;
pub mod value;

pub use block::{
    Block, BlockError, BlockFactory, EvalContext, Globals, Properties, count_property,
    scalar_property, text_property,
};
pub use graph::{
    BlockEvaluationError, BlockId, BlockSnapshot, Connector, ConnectorId, ConnectorSnapshot,
    CycleDetected, CyclePolicy, EngineConfig, Flowchart, GraphError, GraphSnapshot,
    RecomputeReport, WiringViolation,
};
pub use port::{Port, PortDirection, PortRef, Ports};
pub use value::{Value, Vector};

pub use rustfft::num_complex::Complex64;
