//! Error types for erp-core

/// Result type for erp-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in lifecycle operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No discovered addon has this name
    #[error("Unknown addon: {0}")]
    UnknownAddon(String),

    /// The operation requires the addon to be installed
    #[error("Addon '{0}' is not installed")]
    AddonNotInstalled(String),

    /// A dependency must be installed before the addon itself
    #[error("Cannot install '{addon}': dependency '{dependency}' is not installed")]
    DependencyNotInstalled { addon: String, dependency: String },

    /// Installed addons still depend on the addon being uninstalled
    #[error("Cannot uninstall '{addon}': still required by {dependents:?}")]
    DependentsExist {
        addon: String,
        dependents: Vec<String>,
    },

    /// An install transaction failed and was rolled back
    #[error("Install of addon '{addon}' failed: {source}")]
    InstallFailed {
        addon: String,
        #[source]
        source: Box<Error>,
    },

    /// An upgrade transaction failed and was rolled back
    #[error("Upgrade of addon '{addon}' failed: {source}")]
    UpgradeFailed {
        addon: String,
        #[source]
        source: Box<Error>,
    },

    // Transparent wrappers for underlying crate errors
    /// Manifest/discovery/resolution error from erp-addons
    #[error(transparent)]
    Addons(#[from] erp_addons::Error),

    /// Registry error from erp-registry
    #[error(transparent)]
    Registry(#[from] erp_registry::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    /// The innermost error of a failed install/upgrade transaction.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::InstallFailed { source, .. } | Error::UpgradeFailed { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}
