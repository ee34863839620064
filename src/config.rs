// =============================================================================
// Engine Configuration
// =============================================================================
//
// The engine has deliberately little to configure: it is stateless and owns
// no connections. What remains is the worker queue depth. Settings load from
// an optional JSON file and can be overridden per-process via environment
// variables; every field carries `#[serde(default)]` so an older config file
// keeps loading after new fields are added.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

fn default_queue_depth() -> usize {
    64
}

/// Process-level settings for the engine worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Capacity of the bounded request queue in front of the worker.
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            queue_depth: default_queue_depth(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file, falling back to defaults when
    /// the file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        // A zero-capacity queue cannot be constructed; clamp like the env
        // override does instead of panicking at channel creation.
        if config.queue_depth == 0 {
            warn!(path = %path.display(), "queue_depth 0 in config, clamping to 1");
            config.queue_depth = 1;
        }
        info!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    /// Apply environment-variable overrides on top of the loaded values.
    pub fn apply_env_overrides(mut self) -> Self {
        if let Some(depth) = std::env::var("ENGINE_QUEUE_DEPTH")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
        {
            self.queue_depth = depth.max(1);
        }
        self
    }
}
