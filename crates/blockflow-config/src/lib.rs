//! Diagram files, engine settings and validation for blockflow.
//!
//! A diagram is the on-disk form of a flowchart: its blocks with their
//! properties, the connectors between them, initial globals and the engine
//! settings to run it with.
//!
//! # Features
//!
//! - **Diagram Files**: Load and save diagrams as TOML or JSON, picked by
//!   file extension
//! - **Settings**: Live mode, cycle policy and global pass limit per diagram
//! - **Validation**: Check kinds, uids, properties and wiring against the
//!   block registry before building
//! - **Snapshots**: Convert between diagrams and engine snapshots
//!
//! # Example
//!
//! ```rust,no_run
//! use blockflow_config::Diagram;
//! use blockflow_registry::BlockRegistry;
//!
//! let diagram = Diagram::load("demos/series.toml").unwrap();
//! let mut chart = diagram.build(&BlockRegistry::new()).unwrap();
//! let report = chart.update_results().unwrap();
//! println!("evaluated {} blocks", report.evaluated.len());
//!
//! Diagram::from_flowchart(&diagram.name, &chart)
//!     .save("out/series.json")
//!     .unwrap();
//! ```

mod diagram;
mod error;
mod settings;

/// Diagram validation.
pub mod validation;

pub use diagram::{Diagram, DiagramFormat};
pub use error::ConfigError;
pub use settings::Settings;
pub use validation::{ValidationError, ValidationResult, validate_diagram};

/// Re-export commonly used types from blockflow-registry
pub use blockflow_registry::{BlockCategory, BlockDescriptor, BlockRegistry};
