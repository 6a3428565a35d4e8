//! Field, hook, and model definition types.
//!
//! Field descriptors are flat declarative structs so addons can ship them as
//! TOML data without executing any code. Relational kinds reference the
//! target model by name (`comodel`); referential integrity against the
//! registry is checked when the definition is assembled, not at parse time.
//!
//! # Example TOML
//!
//! ```toml
//! [fields.partner_id]
//! type = "many2one"
//! comodel = "res.partner"
//! required = true
//!
//! [fields.state]
//! type = "selection"
//! options = ["draft", "confirmed", "done"]
//! default = "draft"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The storage/semantic kind of a model field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Short string.
    Char,
    /// Long text.
    Text,
    Integer,
    Float,
    Boolean,
    Date,
    Datetime,
    /// Opaque binary payload.
    Binary,
    /// One value out of a fixed option list.
    Selection,
    /// Reference to a single record of `comodel`.
    Many2one,
    /// Inverse side of a `many2one` on `comodel`.
    One2many,
    /// Symmetric multi-reference to `comodel`.
    Many2many,
}

impl FieldKind {
    /// Whether this kind references another model and requires `comodel`.
    pub fn is_relational(&self) -> bool {
        matches!(self, Self::Many2one | Self::One2many | Self::Many2many)
    }
}

/// Declarative descriptor of a single model field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field kind.
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Human-readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string: Option<String>,
    /// Whether a value is mandatory.
    #[serde(default)]
    pub required: bool,
    /// Whether the field is read-only for ordinary writes.
    #[serde(default)]
    pub readonly: bool,
    /// Target model for relational kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comodel: Option<String>,
    /// Inverse `many2one` field name, for `one2many` fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inverse: Option<String>,
    /// Allowed values for `selection` fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Default value, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Tooltip/help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl FieldDef {
    /// Create a minimal descriptor of the given kind.
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            string: None,
            required: false,
            readonly: false,
            comodel: None,
            inverse: None,
            options: Vec::new(),
            default: None,
            help: None,
        }
    }

    /// Check structural consistency of the descriptor.
    ///
    /// Returns a human-readable reason on failure so callers can attach the
    /// field and model names to their own error type.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.kind.is_relational() && self.comodel.is_none() {
            return Err(format!(
                "{:?} fields require a 'comodel'",
                self.kind
            ));
        }
        if !self.kind.is_relational() && self.comodel.is_some() {
            return Err("'comodel' is only valid on relational fields".to_string());
        }
        if self.kind == FieldKind::One2many && self.inverse.is_none() {
            return Err("one2many fields require an 'inverse' field name".to_string());
        }
        if self.kind == FieldKind::Selection && self.options.is_empty() {
            return Err("selection fields require a non-empty 'options' list".to_string());
        }
        if self.kind != FieldKind::Selection && !self.options.is_empty() {
            return Err("'options' is only valid on selection fields".to_string());
        }
        Ok(())
    }
}

/// When a behavior hook runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookKind {
    /// Validation constraint checked on write.
    Constraint,
    /// Derived-value computation.
    Compute,
    /// UI-facing recomputation trigger on field change.
    Onchange,
}

/// Declarative descriptor of a behavior hook attached to a model.
///
/// Hooks are declared, not registered as code: the manifest/capability model
/// keeps addon discovery side-effect free, so behavior is contributed as a
/// named descriptor the business-logic layer dispatches on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookDef {
    /// Unique hook name within the model.
    pub name: String,
    /// When the hook runs.
    pub kind: HookKind,
    /// Fields the hook watches or computes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The fully-assembled definition of one model.
///
/// This is the merged union of the base definition and every extension,
/// applied in addon load order. `owners` lists the contributing addons in
/// that order, the defining addon first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelDefinition {
    pub name: String,
    pub fields: BTreeMap<String, FieldDef>,
    pub hooks: BTreeMap<String, HookDef>,
    pub owners: Vec<String>,
}

impl ModelDefinition {
    /// Whether `addon` contributed to this model (base or extension).
    pub fn is_owned_by(&self, addon: &str) -> bool {
        self.owners.iter().any(|o| o == addon)
    }
}
