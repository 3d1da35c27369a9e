//! Dataflow graph engine: blocks wired by connectors, evaluated in
//! dependency order.
//!
//! # Architecture
//!
//! - [`Flowchart`] owns the topology (blocks, connectors), the global
//!   namespace and the engine configuration. All mutations go through it.
//! - The scheduler flattens the connector set into a block-level dependency
//!   graph and produces an evaluation order (Kahn's algorithm). Cycles are
//!   isolated with Tarjan's algorithm and skipped; everything else still
//!   runs.
//! - [`GraphSnapshot`] captures structure and configuration by uid so a
//!   chart can be saved and rebuilt through a [`BlockFactory`](crate::BlockFactory).
//!
//! # Recompute Model
//!
//! A full recompute ([`Flowchart::update_results`]) evaluates every block. An
//! incremental recompute ([`Flowchart::update_results_for_block`]) evaluates
//! the edited block and its forward closure only. If a pass changes any
//! global variable, the engine runs further full passes until globals stop
//! changing or [`EngineConfig::max_global_passes`] is reached.
//!
//! # Example
//!
//! ```rust,ignore
//! use blockflow_core::{EngineConfig, Flowchart, PortRef, Value};
//!
//! let mut chart = Flowchart::new(EngineConfig::live());
//! let series = chart.add_block_of_kind(&registry, "series", Some("s"))?;
//! let add = chart.add_block_of_kind(&registry, "arithmetic", Some("add"))?;
//! chart.set_block_property(add, "operand", Value::Scalar(10.0))?;
//! chart.add_connector(PortRef::new(series, "Out"), PortRef::new(add, "A"))?;
//!
//! assert_eq!(chart.value("add", "R"), Some(&Value::Array(vec![10.0, 11.0, 12.0, 13.0, 14.0])));
//! ```

mod config;
mod connector;
mod error;
mod flowchart;
mod schedule;
mod slot;
mod snapshot;

pub use config::{CyclePolicy, EngineConfig};
pub use connector::{Connector, ConnectorId};
pub use error::{BlockEvaluationError, CycleDetected, GraphError, WiringViolation};
pub use flowchart::Flowchart;
pub use schedule::RecomputeReport;
pub use slot::BlockId;
pub use snapshot::{BlockSnapshot, ConnectorSnapshot, GraphSnapshot};
