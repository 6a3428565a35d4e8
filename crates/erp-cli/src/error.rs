//! Error types for erp-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from erp-core
    #[error(transparent)]
    Core(#[from] erp_core::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Process exit code distinguishing the error kind.
    ///
    /// 2 manifest/discovery errors, 3 dependency cycle, 4 missing
    /// dependency, 5 contribution conflict, 6 retraction conflict,
    /// 7 dependency not installed, 8 dependents exist, 9 unknown
    /// addon/model, 1 anything else.
    pub fn exit_code(&self) -> i32 {
        use erp_addons::Error as AddonsError;
        use erp_core::Error as CoreError;
        use erp_registry::Error as RegistryError;

        let core = match self {
            Self::Core(e) => e.root_cause(),
            _ => return 1,
        };
        match core {
            CoreError::Addons(e) => match e {
                AddonsError::DependencyCycle { .. } => 3,
                AddonsError::MissingDependency { .. } => 4,
                _ => 2,
            },
            CoreError::Registry(e) => match e {
                RegistryError::ExtensionConflict { .. }
                | RegistryError::ModelAlreadyDefined { .. } => 5,
                RegistryError::RetractionConflict { .. } => 6,
                RegistryError::UnknownModel(_) => 9,
            },
            CoreError::DependencyNotInstalled { .. } => 7,
            CoreError::DependentsExist { .. } => 8,
            CoreError::UnknownAddon(_) | CoreError::AddonNotInstalled(_) => 9,
            _ => 1,
        }
    }
}
