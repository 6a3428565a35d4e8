//! [`TestAddons`] builder for addon-platform test scenarios.
//!
//! Scaffolds a temporary addons directory with `addon.toml` manifests and
//! optional `data.toml` payloads, so lifecycle and CLI tests can run
//! against a realistic on-disk layout.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary addons directory with helper methods for test setup.
///
/// # Example
///
/// ```rust,no_run
/// use erp_test_utils::TestAddons;
///
/// let addons = TestAddons::new();
/// addons.add_addon("base", "1.0.0", &[], &["res.partner"]);
/// addons.add_data("base", "[[models]]\nname = \"res.partner\"\n");
/// ```
pub struct TestAddons {
    temp_dir: TempDir,
}

impl Default for TestAddons {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAddons {
    /// Create an empty temporary addons directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("TestAddons::new: failed to create temp dir"),
        }
    }

    /// Return the root path of the addons directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Return the directory of one addon.
    pub fn addon_dir(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Write a valid `addon.toml` for `name`, creating the addon directory.
    pub fn add_addon(&self, name: &str, version: &str, depends: &[&str], capabilities: &[&str]) {
        let depends = depends
            .iter()
            .map(|d| format!("\"{d}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let capabilities = capabilities
            .iter()
            .map(|c| format!("\"{c}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let manifest = format!(
            "[addon]\nname = \"{name}\"\nversion = \"{version}\"\n\
             depends = [{depends}]\ncapabilities = [{capabilities}]\n"
        );
        self.add_manifest_raw(name, &manifest);
    }

    /// Write a raw `addon.toml` verbatim, creating the addon directory.
    ///
    /// Use this to scaffold deliberately malformed manifests.
    pub fn add_manifest_raw(&self, dir_name: &str, manifest: &str) {
        let dir = self.addon_dir(dir_name);
        fs::create_dir_all(&dir).expect("TestAddons: failed to create addon dir");
        fs::write(dir.join("addon.toml"), manifest).expect("TestAddons: failed to write manifest");
    }

    /// Write a `data.toml` payload into an existing addon directory.
    pub fn add_data(&self, name: &str, data: &str) {
        let dir = self.addon_dir(name);
        assert!(
            dir.exists(),
            "TestAddons::add_data: addon '{name}' was not added first"
        );
        fs::write(dir.join("data.toml"), data).expect("TestAddons: failed to write payload");
    }
}
