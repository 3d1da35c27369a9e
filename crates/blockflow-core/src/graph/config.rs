//! Engine behaviour switches.

use serde::{Deserialize, Serialize};

/// What [`Flowchart::add_connector`](super::Flowchart::add_connector) does
/// with a connector that would close a dependency cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Refuse the connector with a wiring error.
    #[default]
    Reject,
    /// Accept it; recomputes skip the cycle and report it.
    Allow,
}

/// Flowchart configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Recompute automatically after every mutation.
    pub live: bool,
    /// Treatment of cycle-closing connectors.
    pub cycle_policy: CyclePolicy,
    /// Upper bound on full passes per recompute while globals keep changing.
    pub max_global_passes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            live: false,
            cycle_policy: CyclePolicy::Reject,
            max_global_passes: 8,
        }
    }
}

impl EngineConfig {
    /// Default configuration with live mode switched on.
    pub fn live() -> Self {
        Self {
            live: true,
            ..Self::default()
        }
    }
}
