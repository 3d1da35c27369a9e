//! Diagram validation.
//!
//! Checks a [`Diagram`] against a [`BlockRegistry`] before it is handed to the
//! engine, so a bad file is reported all at once instead of failing on the
//! first block the engine trips over.
//!
//! # Example
//!
//! ```rust
//! use blockflow_config::{Diagram, ValidationError, validate_diagram};
//! use blockflow_registry::BlockRegistry;
//!
//! let diagram = Diagram::new("bad")
//!     .with_block("a", "plot3d")
//!     .with_connector("a", "Out", "a", "In");
//!
//! let err = validate_diagram(&diagram, &BlockRegistry::new()).unwrap_err();
//! assert!(matches!(err, ValidationError::Multiple(_)));
//! ```

use std::collections::{HashMap, HashSet};

use blockflow_core::{Block, PortDirection};
use blockflow_registry::BlockRegistry;
use thiserror::Error;

use crate::diagram::Diagram;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Block kind not in the registry.
    #[error("block '{uid}': unknown kind '{kind}'")]
    UnknownKind {
        /// Block uid.
        uid: String,
        /// Kind id as written.
        kind: String,
    },

    /// Two blocks share a uid.
    #[error("duplicate block uid '{0}'")]
    DuplicateUid(String),

    /// The block refused one of its properties.
    #[error("block '{uid}': {reason}")]
    InvalidProperty {
        /// Block uid.
        uid: String,
        /// What the block reported.
        reason: String,
    },

    /// A connector names a block that does not exist.
    #[error("connector {index}: no block '{uid}'")]
    DanglingConnector {
        /// Position in the connector list.
        index: usize,
        /// Missing block uid.
        uid: String,
    },

    /// A connector names a port the block does not have.
    #[error("connector {index}: block '{uid}' has no port '{port}'")]
    UnknownPort {
        /// Position in the connector list.
        index: usize,
        /// Block uid.
        uid: String,
        /// Port uid as written.
        port: String,
    },

    /// A connector starts at an input or ends at an output.
    #[error("connector {index}: port '{uid}.{port}' is not an {expected}")]
    WrongDirection {
        /// Position in the connector list.
        index: usize,
        /// Block uid.
        uid: String,
        /// Port uid.
        port: String,
        /// `"output"` or `"input"`.
        expected: &'static str,
    },

    /// A connector joins a block to itself.
    #[error("connector {index}: block '{uid}' is wired to itself")]
    SelfConnection {
        /// Position in the connector list.
        index: usize,
        /// Block uid.
        uid: String,
    },

    /// An input has more than one incoming connector.
    #[error("input '{uid}.{port}' has {count} incoming connectors")]
    FanIn {
        /// Block uid.
        uid: String,
        /// Input port uid.
        port: String,
        /// Number of connectors targeting it.
        count: usize,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates block kinds, uids, properties and wiring of a diagram.
///
/// Every problem found is reported: one error on its own, several wrapped in
/// [`ValidationError::Multiple`]. Cycles are not an error here; the engine
/// reports them on recompute.
pub fn validate_diagram(diagram: &Diagram, registry: &BlockRegistry) -> ValidationResult<()> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    let mut blocks: HashMap<&str, Option<Box<dyn Block>>> = HashMap::new();

    for entry in &diagram.blocks {
        if !seen.insert(entry.uid.as_str()) {
            errors.push(ValidationError::DuplicateUid(entry.uid.clone()));
            continue;
        }

        let Some(mut block) = registry.create(&entry.kind, &entry.uid) else {
            errors.push(ValidationError::UnknownKind {
                uid: entry.uid.clone(),
                kind: entry.kind.clone(),
            });
            // Known to exist, ports unknown.
            blocks.insert(&entry.uid, None);
            continue;
        };

        for (key, value) in &entry.properties {
            if let Err(e) = block.set_property(key, value.clone()) {
                errors.push(ValidationError::InvalidProperty {
                    uid: entry.uid.clone(),
                    reason: e.to_string(),
                });
            }
        }
        blocks.insert(&entry.uid, Some(block));
    }

    let mut fan_in: HashMap<(&str, &str), usize> = HashMap::new();
    for (index, c) in diagram.connectors.iter().enumerate() {
        let mut endpoints_ok = true;
        for (uid, port, expected) in [
            (&c.from, &c.from_port, PortDirection::Output),
            (&c.to, &c.to_port, PortDirection::Input),
        ] {
            match blocks.get(uid.as_str()) {
                None => {
                    endpoints_ok = false;
                    errors.push(ValidationError::DanglingConnector {
                        index,
                        uid: uid.clone(),
                    });
                }
                Some(None) => {}
                Some(Some(block)) => match block.ports().get(port) {
                    None => {
                        endpoints_ok = false;
                        errors.push(ValidationError::UnknownPort {
                            index,
                            uid: uid.clone(),
                            port: port.clone(),
                        });
                    }
                    Some(p) if p.direction() != expected => {
                        endpoints_ok = false;
                        errors.push(ValidationError::WrongDirection {
                            index,
                            uid: uid.clone(),
                            port: port.clone(),
                            expected: match expected {
                                PortDirection::Output => "output",
                                PortDirection::Input => "input",
                            },
                        });
                    }
                    Some(_) => {}
                },
            }
        }

        if c.from == c.to {
            errors.push(ValidationError::SelfConnection {
                index,
                uid: c.from.clone(),
            });
        } else if endpoints_ok {
            *fan_in.entry((c.to.as_str(), c.to_port.as_str())).or_default() += 1;
        }
    }

    let mut crowded: Vec<_> = fan_in.into_iter().filter(|&(_, n)| n > 1).collect();
    crowded.sort_unstable();
    for ((uid, port), count) in crowded {
        errors.push(ValidationError::FanIn {
            uid: uid.to_string(),
            port: port.to_string(),
            count,
        });
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
