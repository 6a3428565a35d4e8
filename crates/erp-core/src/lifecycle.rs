//! The addon lifecycle manager.
//!
//! Owns the discovered packages and every addon's [`AddonState`], and
//! drives contributions into the shared model registry and security
//! framework. Each install/upgrade is one transaction: the registry and
//! rule set are snapshotted first and restored verbatim if any part of the
//! contribution fails, so no partial state is ever observable.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use erp_addons::data::hook_map;
use erp_addons::{AddonPackage, DependencyGraph, discover};
use erp_registry::ModelRegistry;
use erp_security::SecurityFramework;

use crate::error::{Error, Result};
use crate::state::AddonState;
use crate::statefile::StateFile;

/// One row of the addon listing.
#[derive(Debug, Clone, Serialize)]
pub struct AddonStatus {
    pub name: String,
    pub version: String,
    pub state: AddonState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One isolated failure inside a batch install.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub addon: String,
    pub reason: String,
}

/// Outcome of a batch install over the resolved order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// Addons installed by this batch, in install order.
    pub installed: Vec<String>,
    /// Addons whose transaction failed and was rolled back.
    pub failed: Vec<BatchFailure>,
    /// Addons skipped because a dependency did not end up installed.
    pub skipped: Vec<String>,
}

impl BatchReport {
    /// Whether every pending addon was installed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Orchestrates install / upgrade / uninstall transitions per addon.
pub struct LifecycleManager {
    packages: BTreeMap<String, AddonPackage>,
    states: BTreeMap<String, AddonState>,
    registry: Arc<ModelRegistry>,
    security: Arc<SecurityFramework>,
}

impl LifecycleManager {
    /// Create a manager over shared registry/security instances.
    pub fn new(registry: Arc<ModelRegistry>, security: Arc<SecurityFramework>) -> Self {
        Self {
            packages: BTreeMap::new(),
            states: BTreeMap::new(),
            registry,
            security,
        }
    }

    /// The shared model registry.
    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    /// The shared security framework.
    pub fn security(&self) -> &Arc<SecurityFramework> {
        &self.security
    }

    /// Discover every addon package under `root` and register it.
    ///
    /// Returns the number of discovered packages. States of addons already
    /// known to the manager are preserved.
    pub fn discover(&mut self, root: &Path) -> Result<usize> {
        let packages = discover(root)?;
        let count = packages.len();
        for package in packages {
            self.register(package);
        }
        tracing::info!(count, path = %root.display(), "discovered addons");
        Ok(count)
    }

    /// Register a single package, replacing any same-named one.
    pub fn register(&mut self, package: AddonPackage) {
        let name = package.name().to_string();
        self.states
            .entry(name.clone())
            .or_insert(AddonState::Discovered);
        self.packages.insert(name, package);
    }

    /// The lifecycle state of `name`, if discovered.
    pub fn state(&self, name: &str) -> Option<AddonState> {
        self.states.get(name).copied()
    }

    /// The discovered version of `name`, if any.
    pub fn version_of(&self, name: &str) -> Option<&str> {
        self.packages.get(name).map(|p| p.version())
    }

    /// Listing of all discovered addons, sorted by name.
    pub fn statuses(&self) -> Vec<AddonStatus> {
        self.packages
            .values()
            .map(|p| AddonStatus {
                name: p.name().to_string(),
                version: p.version().to_string(),
                state: self
                    .state(p.name())
                    .unwrap_or(AddonState::Discovered),
                description: p.manifest.addon.description.clone(),
            })
            .collect()
    }

    /// The deterministic dependency order over all discovered addons.
    ///
    /// Fails with a cycle or missing-dependency error without touching any
    /// addon state.
    pub fn resolved_order(&self) -> Result<Vec<String>> {
        let graph = DependencyGraph::from_manifests(self.packages.values().map(|p| &p.manifest))?;
        Ok(graph.resolve_order()?)
    }

    /// Install one addon.
    ///
    /// Requires every dependency to already be installed; installing an
    /// installed addon is a no-op. On contribution failure the registry and
    /// rule set are restored and the addon is left `failed`.
    pub fn install(&mut self, name: &str) -> Result<()> {
        if self.is_installed(name) {
            return Ok(());
        }
        self.require_package(name)?;
        let pass = self.registry.begin_pass();
        self.install_with_pass(name, pass)
    }

    /// Install every pending addon in resolved order.
    ///
    /// Structural resolution errors (cycle, missing dependency) abort the
    /// whole batch before any addon changes state. Per-addon contribution
    /// failures are isolated: the addon rolls back to `failed`, its
    /// dependents are skipped, and previously installed addons are
    /// untouched. Sibling addons on the same dependency level share an
    /// install pass, so conflicting extensions between them are detected.
    pub fn install_all(&mut self) -> Result<BatchReport> {
        let order = self.resolved_order()?;
        let mut report = BatchReport::default();
        let mut levels: BTreeMap<String, usize> = BTreeMap::new();
        let mut level_passes: BTreeMap<usize, u64> = BTreeMap::new();

        for name in order {
            if self.is_installed(&name) {
                continue;
            }
            let depends = self.require_package(&name)?.manifest.addon.depends.clone();
            if let Some(dep) = depends.iter().find(|d| !self.is_installed(d)) {
                tracing::warn!(addon = %name, dependency = %dep, "skipped: dependency unavailable");
                report.skipped.push(name);
                continue;
            }
            let level = depends
                .iter()
                .filter_map(|d| levels.get(d))
                .map(|l| l + 1)
                .max()
                .unwrap_or(0);
            levels.insert(name.clone(), level);
            let pass = match level_passes.get(&level) {
                Some(&pass) => pass,
                None => {
                    let pass = self.registry.begin_pass();
                    level_passes.insert(level, pass);
                    pass
                }
            };
            match self.install_with_pass(&name, pass) {
                Ok(()) => report.installed.push(name),
                Err(e) => {
                    tracing::warn!(addon = %name, error = %e, "batch install failure");
                    report.failed.push(BatchFailure {
                        addon: name,
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(report)
    }

    /// Uninstall one addon, retracting its models and access rules.
    ///
    /// Fails without any state change if the addon is not installed, if an
    /// installed addon still depends on it, or if the registry reports a
    /// retraction conflict.
    pub fn uninstall(&mut self, name: &str) -> Result<()> {
        self.require_package(name)?;
        if !self.is_installed(name) {
            return Err(Error::AddonNotInstalled(name.to_string()));
        }
        let dependents: Vec<String> = self
            .packages
            .values()
            .filter(|p| p.name() != name && self.is_installed(p.name()))
            .filter(|p| p.manifest.addon.depends.iter().any(|d| d == name))
            .map(|p| p.name().to_string())
            .collect();
        if !dependents.is_empty() {
            return Err(Error::DependentsExist {
                addon: name.to_string(),
                dependents,
            });
        }

        self.registry.retract(name)?;
        self.security.revoke_addon(name);
        self.states.insert(name.to_string(), AddonState::Uninstalled);
        tracing::info!(addon = name, "uninstalled");
        Ok(())
    }

    /// Re-apply an installed addon's contribution.
    ///
    /// Idempotent: the registry replaces the addon's entries in place, so
    /// upgrading twice leaves the same state as upgrading once. On failure
    /// the pre-upgrade state is restored and the addon is left `failed`.
    pub fn upgrade(&mut self, name: &str) -> Result<()> {
        let package = self.require_package(name)?.clone();
        if !self.is_installed(name) {
            return Err(Error::AddonNotInstalled(name.to_string()));
        }
        self.states.insert(name.to_string(), AddonState::Upgrading);
        let registry_snapshot = self.registry.snapshot();
        let rules_snapshot = self.security.snapshot();
        let pass = self.registry.begin_pass();

        match self.apply_contribution(&package, pass) {
            Ok(()) => {
                self.states.insert(name.to_string(), AddonState::Installed);
                tracing::info!(addon = name, version = package.version(), "upgraded");
                Ok(())
            }
            Err(e) => {
                self.registry.restore(registry_snapshot);
                self.security.restore(rules_snapshot);
                self.states.insert(name.to_string(), AddonState::Failed);
                Err(Error::UpgradeFailed {
                    addon: name.to_string(),
                    source: Box::new(e),
                })
            }
        }
    }

    /// Re-install the addons a state file records, in resolved order.
    ///
    /// Used at startup to rebuild the in-memory registry. Recorded addons
    /// that are no longer discovered are logged and skipped. Returns the
    /// replayed addon names.
    pub fn replay(&mut self, state: &StateFile) -> Result<Vec<String>> {
        if state.is_empty() {
            return Ok(Vec::new());
        }
        for name in state.names() {
            match self.packages.get(&name) {
                None => {
                    tracing::warn!(addon = %name, "recorded as installed but not discovered");
                }
                Some(package) => {
                    if let Some(record) = state.get(&name) {
                        if record.version != package.version() {
                            tracing::warn!(
                                addon = %name,
                                recorded = %record.version,
                                discovered = %package.version(),
                                "version changed since install, upgrade to apply"
                            );
                        }
                    }
                }
            }
        }

        let order = self.resolved_order()?;
        let mut replayed = Vec::new();
        for name in order {
            if !state.contains(&name) {
                continue;
            }
            self.install(&name)?;
            replayed.push(name);
        }
        Ok(replayed)
    }

    fn is_installed(&self, name: &str) -> bool {
        self.state(name).is_some_and(|s| s.is_installed())
    }

    fn require_package(&self, name: &str) -> Result<&AddonPackage> {
        self.packages
            .get(name)
            .ok_or_else(|| Error::UnknownAddon(name.to_string()))
    }

    fn install_with_pass(&mut self, name: &str, pass: u64) -> Result<()> {
        let package = self.require_package(name)?.clone();
        for dep in &package.manifest.addon.depends {
            if !self.is_installed(dep) {
                return Err(Error::DependencyNotInstalled {
                    addon: name.to_string(),
                    dependency: dep.clone(),
                });
            }
        }

        self.states.insert(name.to_string(), AddonState::Resolving);
        let registry_snapshot = self.registry.snapshot();
        let rules_snapshot = self.security.snapshot();

        match self.apply_contribution(&package, pass) {
            Ok(()) => {
                self.states.insert(name.to_string(), AddonState::Installed);
                tracing::info!(addon = name, version = package.version(), "installed");
                Ok(())
            }
            Err(e) => {
                self.registry.restore(registry_snapshot);
                self.security.restore(rules_snapshot);
                self.states.insert(name.to_string(), AddonState::Failed);
                Err(Error::InstallFailed {
                    addon: name.to_string(),
                    source: Box::new(e),
                })
            }
        }
    }

    /// Apply one addon's payload: model definitions, then extensions, then
    /// access rules. Any prior grants by the addon are revoked first so
    /// re-application stays idempotent.
    fn apply_contribution(&self, package: &AddonPackage, pass: u64) -> Result<()> {
        let addon = package.name();
        for spec in &package.data.models {
            self.registry.define(
                addon,
                &spec.name,
                pass,
                spec.fields.clone(),
                hook_map(&spec.hooks),
            )?;
        }
        for spec in &package.data.extend {
            self.registry.extend(
                addon,
                &spec.model,
                pass,
                spec.fields.clone(),
                hook_map(&spec.hooks),
            )?;
        }
        self.security.revoke_addon(addon);
        for rule in &package.data.access {
            self.security.grant(addon, rule.clone());
        }
        Ok(())
    }
}
