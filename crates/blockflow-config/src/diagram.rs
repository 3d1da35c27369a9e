//! Diagram file format and operations.

use std::path::Path;

use blockflow_core::{
    BlockSnapshot, ConnectorSnapshot, Flowchart, Globals, GraphSnapshot, Properties, Value,
};
use blockflow_registry::BlockRegistry;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::settings::Settings;
use crate::validation::validate_diagram;

/// On-disk encoding of a diagram, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramFormat {
    /// `.toml`
    Toml,
    /// `.json`
    Json,
}

impl DiagramFormat {
    /// Picks the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// A saved flowchart: blocks, connectors, globals and engine settings.
///
/// # TOML Format
///
/// ```toml
/// name = "Offset series"
/// description = "0..5 shifted by ten"
///
/// [settings]
/// live = false
///
/// [[blocks]]
/// uid = "s"
/// kind = "series"
/// [blocks.properties]
/// count = { type = "scalar", value = 5.0 }
///
/// [[blocks]]
/// uid = "add"
/// kind = "arithmetic"
/// [blocks.properties]
/// operand = { type = "scalar", value = 10.0 }
///
/// [[connectors]]
/// from = "s"
/// from_port = "Out"
/// to = "add"
/// to_port = "A"
///
/// [globals]
/// rate = { type = "scalar", value = 2.0 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Diagram {
    /// Name of the diagram.
    pub name: String,

    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Engine settings.
    #[serde(default, skip_serializing_if = "Settings::is_default")]
    pub settings: Settings,

    /// Blocks in insertion order.
    #[serde(default)]
    pub blocks: Vec<BlockSnapshot>,

    /// Connectors by block uid and port.
    #[serde(default)]
    pub connectors: Vec<ConnectorSnapshot>,

    /// Initial global variables.
    #[serde(default, skip_serializing_if = "Globals::is_empty")]
    pub globals: Globals,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl Diagram {
    /// Create a new empty diagram.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            settings: Settings::default(),
            blocks: Vec::new(),
            connectors: Vec::new(),
            globals: Globals::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the engine settings.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Add a block with no properties set.
    pub fn with_block(mut self, uid: impl Into<String>, kind: impl Into<String>) -> Self {
        self.blocks.push(BlockSnapshot {
            uid: uid.into(),
            kind: kind.into(),
            properties: Properties::new(),
        });
        self
    }

    /// Set a property on the most recently added block.
    ///
    /// Does nothing if no block has been added yet.
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        if let Some(block) = self.blocks.last_mut() {
            block.properties.insert(key.into(), value);
        }
        self
    }

    /// Add a connector from `from.from_port` to `to.to_port`.
    pub fn with_connector(
        mut self,
        from: impl Into<String>,
        from_port: impl Into<String>,
        to: impl Into<String>,
        to_port: impl Into<String>,
    ) -> Self {
        self.connectors
            .push(ConnectorSnapshot::new(from, from_port, to, to_port));
        self
    }

    /// Set an initial global variable.
    pub fn with_global(mut self, name: impl Into<String>, value: Value) -> Self {
        self.globals.insert(name.into(), value);
        self
    }

    /// Load a diagram, picking TOML or JSON by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = DiagramFormat::from_path(path)?;
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        match format {
            DiagramFormat::Toml => Self::from_toml(&content),
            DiagramFormat::Json => Self::from_json(&content),
        }
    }

    /// Save the diagram, picking TOML or JSON by extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = match DiagramFormat::from_path(path)? {
            DiagramFormat::Toml => self.to_toml()?,
            DiagramFormat::Json => self.to_json()?,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Parse a diagram from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Convert the diagram to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Parse a diagram from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert the diagram to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The engine-level snapshot this diagram describes.
    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            blocks: self.blocks.clone(),
            connectors: self.connectors.clone(),
            globals: self.globals.clone(),
        }
    }

    /// Wraps an engine snapshot as a diagram with default settings.
    pub fn from_snapshot(name: impl Into<String>, snapshot: &GraphSnapshot) -> Self {
        Self {
            blocks: snapshot.blocks.clone(),
            connectors: snapshot.connectors.clone(),
            globals: snapshot.globals.clone(),
            ..Self::new(name)
        }
    }

    /// Captures a live flowchart, settings included.
    pub fn from_flowchart(name: impl Into<String>, chart: &Flowchart) -> Self {
        Self::from_snapshot(name, &chart.snapshot()).with_settings(chart.config().into())
    }

    /// Validates the diagram against `registry` and builds the flowchart.
    ///
    /// The chart is not recomputed unless `settings.live` is set.
    pub fn build(&self, registry: &BlockRegistry) -> Result<Flowchart, ConfigError> {
        validate_diagram(self, registry)?;
        Ok(Flowchart::restore(
            &self.to_snapshot(),
            registry,
            self.settings.into(),
        )?)
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the diagram has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Find a block entry by uid.
    pub fn block(&self, uid: &str) -> Option<&BlockSnapshot> {
        self.blocks.iter().find(|b| b.uid == uid)
    }
}
