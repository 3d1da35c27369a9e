//! Shared utilities for CLI commands.

use std::path::Path;

use anyhow::Context;
use blockflow_config::Diagram;

/// Parse a `NAME=NUMBER` global override.
pub fn parse_global(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid global format: '{s}' (expected NAME=NUMBER)"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("Invalid global format: '{s}' (empty name)"));
    }
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid global value: '{value}' is not a number"))?;
    Ok((name.to_string(), value))
}

/// Load a diagram file, naming the path on failure.
pub fn load_diagram(path: &Path) -> anyhow::Result<Diagram> {
    let diagram =
        Diagram::load(path).with_context(|| format!("loading diagram {}", path.display()))?;
    tracing::info!(
        name = %diagram.name,
        blocks = diagram.blocks.len(),
        connectors = diagram.connectors.len(),
        "loaded diagram"
    );
    Ok(diagram)
}
