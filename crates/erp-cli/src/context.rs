//! Platform context shared by all CLI commands.
//!
//! Builds the registry/security/lifecycle trio, discovers the addons path,
//! and replays the recorded install state so every command sees the
//! platform as it was left by the previous invocation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use erp_core::{LifecycleManager, StateFile};
use erp_registry::ModelRegistry;
use erp_security::SecurityFramework;

use crate::error::{CliError, Result};

/// The loaded platform: lifecycle manager plus persisted install state.
pub struct PlatformContext {
    pub manager: LifecycleManager,
    state: StateFile,
    state_path: PathBuf,
}

impl PlatformContext {
    /// Discover `addons_path`, load the state file, and replay recorded
    /// installs into a fresh registry.
    pub fn load(addons_path: &Path, state_path: Option<PathBuf>) -> Result<Self> {
        if !addons_path.is_dir() {
            return Err(CliError::user(format!(
                "addons path '{}' is not a directory",
                addons_path.display()
            )));
        }

        let registry = Arc::new(ModelRegistry::new());
        let security = Arc::new(SecurityFramework::new(Arc::clone(&registry)));
        let mut manager = LifecycleManager::new(registry, security);
        manager.discover(addons_path)?;

        let state_path = state_path.unwrap_or_else(|| addons_path.join("installed.toml"));
        let state = StateFile::load(&state_path)?;
        manager.replay(&state)?;

        Ok(Self {
            manager,
            state,
            state_path,
        })
    }

    /// Record `name` as installed at its discovered version.
    pub fn record_installed(&mut self, name: &str) {
        if let Some(version) = self.manager.version_of(name) {
            let version = version.to_string();
            self.state.upsert(name, &version);
        }
    }

    /// Drop the install record for `name`.
    pub fn record_uninstalled(&mut self, name: &str) {
        self.state.remove(name);
    }

    /// Persist the install state file.
    pub fn save(&self) -> Result<()> {
        self.state.save(&self.state_path)?;
        Ok(())
    }
}
