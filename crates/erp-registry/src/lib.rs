//! Model registry for the ERP addon platform.
//!
//! Addons contribute data models incrementally: one addon defines a model,
//! later addons extend it with additional fields and behavior hooks. This
//! crate provides the field/hook/model types and the [`ModelRegistry`] that
//! assembles the merged view of every model from the contributions of all
//! installed addons.

pub mod error;
pub mod model;
pub mod registry;

pub use error::Error;
pub use model::{FieldDef, FieldKind, HookDef, HookKind, ModelDefinition};
pub use registry::{ModelRegistry, RegistrySnapshot};
