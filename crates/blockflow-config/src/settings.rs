//! Engine settings as stored in a diagram file.

use blockflow_core::{CyclePolicy, EngineConfig};
use serde::{Deserialize, Serialize};

/// The `[settings]` table of a diagram.
///
/// Every field is optional in the file; missing ones take the engine
/// defaults.
///
/// ```toml
/// [settings]
/// live = true
/// cycle_policy = "allow"
/// max_global_passes = 4
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Recompute after every edit.
    pub live: bool,
    /// `"reject"` or `"allow"` cycle-closing connectors.
    pub cycle_policy: CyclePolicy,
    /// Upper bound on passes while globals keep changing.
    pub max_global_passes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        EngineConfig::default().into()
    }
}

impl Settings {
    /// Returns true if every field has its default value.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl From<Settings> for EngineConfig {
    fn from(s: Settings) -> Self {
        EngineConfig {
            live: s.live,
            cycle_policy: s.cycle_policy,
            max_global_passes: s.max_global_passes,
        }
    }
}

impl From<EngineConfig> for Settings {
    fn from(c: EngineConfig) -> Self {
        Settings {
            live: c.live,
            cycle_policy: c.cycle_policy,
            max_global_passes: c.max_global_passes,
        }
    }
}
