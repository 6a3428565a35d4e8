//! Addon manifest parsing for `addon.toml` files.
//!
//! An addon manifest declares identity, version, dependencies, and the
//! models the addon defines or extends (its capabilities). The canonical
//! filename is [`MANIFEST_FILENAME`](crate::MANIFEST_FILENAME)
//! (`addon.toml`). Loading a manifest never executes addon code and is
//! referentially transparent: the same file always yields the same
//! manifest.
//!
//! # Example TOML
//!
//! ```toml
//! [addon]
//! name = "sale"
//! version = "1.2.0"
//! description = "Sales management"
//! depends = ["base", "account"]
//! capabilities = ["sale.order", "res.partner"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Complete addon manifest loaded from `addon.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AddonManifest {
    /// Addon identity, dependencies, and capabilities.
    pub addon: AddonMeta,
}

/// The `[addon]` section of a manifest.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AddonMeta {
    /// Addon name, unique across the platform (e.g., "sale").
    pub name: String,
    /// Semver version string.
    pub version: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Names of addons that must be installed first, in declared order.
    #[serde(default)]
    pub depends: Vec<String>,
    /// Models this addon defines or extends.
    #[serde(default)]
    pub capabilities: Vec<String>,
}

impl AddonManifest {
    /// Parse an addon manifest from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Read and parse an addon manifest from a file path.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ManifestNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Serialize the manifest back to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::ManifestSerialize(e.to_string()))
    }

    /// Whether `model` is declared as a capability.
    pub fn declares_capability(&self, model: &str) -> bool {
        self.addon.capabilities.iter().any(|c| c == model)
    }

    /// Validate the manifest fields.
    fn validate(&self) -> Result<()> {
        validate_name(&self.addon.name)?;

        semver::Version::parse(&self.addon.version).map_err(|e| Error::InvalidVersion {
            addon: self.addon.name.clone(),
            version: self.addon.version.clone(),
            source: e,
        })?;

        for dep in &self.addon.depends {
            validate_name(dep)?;
            if dep == &self.addon.name {
                return Err(Error::InvalidName {
                    name: self.addon.name.clone(),
                    reason: "addon cannot depend on itself".to_string(),
                });
            }
        }

        for capability in &self.addon.capabilities {
            if capability.is_empty() {
                return Err(Error::InvalidName {
                    name: self.addon.name.clone(),
                    reason: "capability model names must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidName {
            name: name.to_string(),
            reason: "addon name must not be empty".to_string(),
        });
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(Error::InvalidName {
            name: name.to_string(),
            reason: "addon name must contain only alphanumeric characters, hyphens, or underscores"
                .to_string(),
        });
    }
    Ok(())
}
