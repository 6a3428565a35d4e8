/// Errors that can occur in model registry operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No model with this name has been contributed by any installed addon.
    #[error("unknown model: {0}")]
    UnknownModel(String),

    /// A second addon attempted to define (not extend) an existing model.
    #[error("model '{model}' is already defined by addon '{defined_by}', addon '{addon}' must extend it instead")]
    ModelAlreadyDefined {
        model: String,
        addon: String,
        defined_by: String,
    },

    /// Two sibling addons extended the same model with colliding names in
    /// the same install pass.
    #[error("conflicting extensions of model '{model}' by addons '{first}' and '{second}': {items:?}")]
    ExtensionConflict {
        model: String,
        first: String,
        second: String,
        items: Vec<String>,
    },

    /// An addon's base model definition cannot be removed while other
    /// addons' extensions still build on it.
    #[error("cannot retract addon '{addon}': model '{model}' is still extended by {dependents:?}")]
    RetractionConflict {
        addon: String,
        model: String,
        dependents: Vec<String>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
