//! Addon package loading and directory discovery.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::data::AddonData;
use crate::error::{Error, Result};
use crate::manifest::AddonManifest;
use crate::{DATA_FILENAME, MANIFEST_FILENAME};

/// A loaded addon: its manifest plus its contribution payload.
#[derive(Debug, Clone, PartialEq)]
pub struct AddonPackage {
    pub manifest: AddonManifest,
    pub data: AddonData,
}

impl AddonPackage {
    /// Build a package from already-parsed parts, validating the payload
    /// against the manifest's declared capabilities.
    pub fn new(manifest: AddonManifest, data: AddonData) -> Result<Self> {
        data.validate(&manifest)?;
        Ok(Self { manifest, data })
    }

    /// Load a package from an addon directory.
    ///
    /// Reads `addon.toml` (required) and `data.toml` (optional; a missing
    /// payload is an empty contribution).
    pub fn load(dir: &Path) -> Result<Self> {
        let manifest = AddonManifest::from_path(&dir.join(MANIFEST_FILENAME))?;
        let data_path = dir.join(DATA_FILENAME);
        let data = if data_path.exists() {
            AddonData::from_path(&data_path)?
        } else {
            AddonData::default()
        };
        Self::new(manifest, data)
    }

    /// The addon's name.
    pub fn name(&self) -> &str {
        &self.manifest.addon.name
    }

    /// The addon's version string.
    pub fn version(&self) -> &str {
        &self.manifest.addon.version
    }
}

/// Discover every addon package under `root`.
///
/// Each immediate subdirectory containing an `addon.toml` is loaded as a
/// package; other entries are ignored. Packages are returned sorted by
/// addon name, and a name declared by two packages is a
/// [`Error::DuplicateAddon`]. Discovery reads files only — no addon code
/// runs — so repeated calls over the same tree yield identical results.
pub fn discover(root: &Path) -> Result<Vec<AddonPackage>> {
    let mut packages: BTreeMap<String, (AddonPackage, PathBuf)> = BTreeMap::new();

    let mut dirs: Vec<PathBuf> = std::fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    for dir in dirs {
        if !dir.join(MANIFEST_FILENAME).exists() {
            tracing::debug!(path = %dir.display(), "skipping non-addon directory");
            continue;
        }
        let package = AddonPackage::load(&dir)?;
        let name = package.name().to_string();
        if let Some((_, first)) = packages.get(&name) {
            return Err(Error::DuplicateAddon {
                name,
                first: first.clone(),
                second: dir,
            });
        }
        tracing::debug!(addon = %name, path = %dir.display(), "discovered addon");
        packages.insert(name, (package, dir));
    }

    Ok(packages.into_values().map(|(package, _)| package).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_addon(root: &Path, dir_name: &str, manifest: &str, data: Option<&str>) {
        let dir = root.join(dir_name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(MANIFEST_FILENAME), manifest).unwrap();
        if let Some(data) = data {
            fs::write(dir.join(DATA_FILENAME), data).unwrap();
        }
    }

    #[test]
    fn test_discover_sorted_by_name() {
        let tmp = TempDir::new().unwrap();
        write_addon(
            tmp.path(),
            "zdir",
            "[addon]\nname = \"account\"\nversion = \"1.0.0\"\n",
            None,
        );
        write_addon(
            tmp.path(),
            "adir",
            "[addon]\nname = \"base\"\nversion = \"1.0.0\"\n",
            None,
        );

        let packages = discover(tmp.path()).unwrap();
        let names: Vec<&str> = packages.iter().map(AddonPackage::name).collect();
        assert_eq!(names, vec!["account", "base"]);
    }

    #[test]
    fn test_discover_skips_non_addon_dirs() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("not-an-addon")).unwrap();
        fs::write(tmp.path().join("stray-file.txt"), "ignored").unwrap();
        write_addon(
            tmp.path(),
            "base",
            "[addon]\nname = \"base\"\nversion = \"1.0.0\"\n",
            None,
        );

        let packages = discover(tmp.path()).unwrap();
        assert_eq!(packages.len(), 1);
    }

    #[test]
    fn test_discover_duplicate_name_rejected() {
        let tmp = TempDir::new().unwrap();
        let manifest = "[addon]\nname = \"base\"\nversion = \"1.0.0\"\n";
        write_addon(tmp.path(), "first", manifest, None);
        write_addon(tmp.path(), "second", manifest, None);

        let err = discover(tmp.path()).unwrap_err();
        assert!(matches!(err, Error::DuplicateAddon { ref name, .. } if name == "base"));
    }

    #[test]
    fn test_discover_propagates_malformed_manifest() {
        let tmp = TempDir::new().unwrap();
        write_addon(tmp.path(), "broken", "not toml at all [", None);

        let err = discover(tmp.path()).unwrap_err();
        assert!(matches!(err, Error::ManifestParse(_)));
    }

    #[test]
    fn test_load_package_with_payload() {
        let tmp = TempDir::new().unwrap();
        write_addon(
            tmp.path(),
            "sale",
            "[addon]\nname = \"sale\"\nversion = \"1.0.0\"\ncapabilities = [\"sale.order\"]\n",
            Some("[[models]]\nname = \"sale.order\"\n"),
        );

        let package = AddonPackage::load(&tmp.path().join("sale")).unwrap();
        assert_eq!(package.name(), "sale");
        assert_eq!(package.data.models.len(), 1);
    }

    #[test]
    fn test_load_package_without_payload_is_empty() {
        let tmp = TempDir::new().unwrap();
        write_addon(
            tmp.path(),
            "base",
            "[addon]\nname = \"base\"\nversion = \"1.0.0\"\n",
            None,
        );

        let package = AddonPackage::load(&tmp.path().join("base")).unwrap();
        assert!(package.data.is_empty());
    }

    #[test]
    fn test_load_rejects_payload_outside_capabilities() {
        let tmp = TempDir::new().unwrap();
        write_addon(
            tmp.path(),
            "sale",
            "[addon]\nname = \"sale\"\nversion = \"1.0.0\"\n",
            Some("[[models]]\nname = \"sale.order\"\n"),
        );

        let err = AddonPackage::load(&tmp.path().join("sale")).unwrap_err();
        assert!(matches!(err, Error::UndeclaredCapability { .. }));
    }
}
