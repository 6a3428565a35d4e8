//! Persisted install state (`installed.toml`).
//!
//! The registry is in-memory and the real persistence layer lives outside
//! this core, so which addons are installed is recorded in a small TOML
//! file. On startup the lifecycle manager replays the recorded addons'
//! contributions in resolved order to rebuild the registry.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One recorded installed addon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledAddon {
    /// Version that was installed.
    pub version: String,
}

/// The set of installed addons, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFile {
    #[serde(default)]
    installed: BTreeMap<String, InstalledAddon>,
}

impl StateFile {
    /// Create an empty state file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the state file, or an empty one if the path does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Write the state file to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Record `name` as installed at `version`, replacing any prior record.
    pub fn upsert(&mut self, name: &str, version: &str) {
        self.installed.insert(
            name.to_string(),
            InstalledAddon {
                version: version.to_string(),
            },
        );
    }

    /// Drop the record for `name`. Returns whether one existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.installed.remove(name).is_some()
    }

    /// Whether `name` is recorded as installed.
    pub fn contains(&self, name: &str) -> bool {
        self.installed.contains_key(name)
    }

    /// The recorded entry for `name`.
    pub fn get(&self, name: &str) -> Option<&InstalledAddon> {
        self.installed.get(name)
    }

    /// Recorded addon names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.installed.keys().cloned().collect()
    }

    /// Number of recorded addons.
    pub fn len(&self) -> usize {
        self.installed.len()
    }

    /// Whether nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.installed.is_empty()
    }
}
