use std::path::PathBuf;

/// Errors that can occur while loading or resolving addons.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to parse addon manifest TOML.
    #[error("failed to parse addon manifest: {0}")]
    ManifestParse(#[from] toml::de::Error),

    /// Addon manifest file not found at the expected path.
    #[error("addon manifest not found: {0}")]
    ManifestNotFound(PathBuf),

    /// Invalid addon name.
    #[error("invalid addon name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Invalid semver version string.
    #[error("invalid version '{version}' for addon '{addon}': {source}")]
    InvalidVersion {
        addon: String,
        version: String,
        source: semver::Error,
    },

    /// Failed to serialize an addon manifest.
    #[error("failed to serialize addon manifest: {0}")]
    ManifestSerialize(String),

    /// I/O error reading addon files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Two packages under the same addons path declare the same name.
    #[error("duplicate addon name '{name}' declared by {first} and {second}")]
    DuplicateAddon {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// The payload contributes to a model the manifest does not declare.
    #[error("addon '{addon}' contributes to model '{model}' without declaring it as a capability")]
    UndeclaredCapability { addon: String, model: String },

    /// A field descriptor in the payload is structurally invalid.
    #[error("invalid field '{field}' on model '{model}' in addon '{addon}': {reason}")]
    InvalidFieldSpec {
        addon: String,
        model: String,
        field: String,
        reason: String,
    },

    /// The payload declares the same hook name twice on one model.
    #[error("duplicate hook '{hook}' on model '{model}' in addon '{addon}'")]
    DuplicateHook {
        addon: String,
        model: String,
        hook: String,
    },

    /// The dependency graph contains a cycle.
    #[error("dependency cycle among addons: {participants:?}")]
    DependencyCycle { participants: Vec<String> },

    /// A declared dependency was not discovered.
    #[error("addon '{addon}' depends on unknown addon '{dependency}'")]
    MissingDependency { addon: String, dependency: String },
}

pub type Result<T> = std::result::Result<T, Error>;
