//! Runtime configuration for collapsing, buffering, and durable logging.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::collapse::LookbackPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Collapse duplicate lines into an occurrence counter.
    pub counter: bool,
    /// Hunt for duplicates beyond the most recent line.
    pub counter_compact: bool,
    /// Lookback distance: `-1` scans the whole buffer, `0` matches the
    /// rendered row count, any other value scans that many recent lines.
    pub counter_compact_distance: i32,
    /// Maximum lines kept in the display buffer.
    pub max_messages: usize,
    /// Let the host wipe chat and history on its own clear events.
    pub host_clearing: bool,
    /// Mirror sent commands and displayed lines into the durable chat log.
    pub chatlog: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            counter: true,
            counter_compact: false,
            counter_compact_distance: 16,
            max_messages: 16_384,
            host_clearing: false,
            chatlog: true,
        }
    }
}

impl ChatConfig {
    /// The lookback policy the dedup engine should run with.
    pub fn lookback_policy(&self) -> LookbackPolicy {
        if self.counter_compact {
            LookbackPolicy::from_distance(self.counter_compact_distance)
        } else {
            LookbackPolicy::Single
        }
    }

    /// Load from a TOML file. Unknown fields are ignored; missing fields take
    /// their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Write the full config (defaults included) as TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating config dir {}", parent.display()))?;
        }
        let raw = toml::to_string_pretty(self).context("serializing config")?;
        fs::write(path, raw).with_context(|| format!("writing config {}", path.display()))
    }

    /// Platform config file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("chatfold").join("config.toml"))
    }

    /// Platform chat log directory.
    pub fn default_chatlog_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("chatfold"))
    }
}
