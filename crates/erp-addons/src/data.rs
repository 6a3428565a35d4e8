//! Declarative contribution payloads (`data.toml`).
//!
//! Next to its manifest, an addon may ship a `data.toml` describing the
//! models it defines, the extensions it applies to other addons' models,
//! and the access rules it grants. The payload is pure data: loading it has
//! no side effects, and applying it is entirely the lifecycle manager's
//! business. Every contributed model must be declared in the manifest's
//! `capabilities` list, which keeps discovery honest without introspecting
//! any code.
//!
//! # Example TOML
//!
//! ```toml
//! [[models]]
//! name = "sale.order"
//!
//! [models.fields.partner_id]
//! type = "many2one"
//! comodel = "res.partner"
//! required = true
//!
//! [[models.hooks]]
//! name = "check_total"
//! kind = "constraint"
//! fields = ["amount_total"]
//!
//! [[extend]]
//! model = "res.partner"
//!
//! [extend.fields.credit_limit]
//! type = "float"
//!
//! [[access]]
//! model = "sale.order"
//! role = "sales_user"
//! operations = ["create", "read", "update"]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use erp_registry::{FieldDef, HookDef};
use erp_security::AccessRule;

use crate::error::{Error, Result};
use crate::manifest::AddonManifest;

/// A model the addon introduces.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ModelSpec {
    /// Model name (e.g., "sale.order").
    pub name: String,
    /// Field name -> descriptor.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldDef>,
    /// Behavior hooks attached to the model.
    #[serde(default)]
    pub hooks: Vec<HookDef>,
}

/// An extension the addon applies to a model defined elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ExtendSpec {
    /// Target model name.
    pub model: String,
    /// Fields added (or overridden) on the target model.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldDef>,
    /// Hooks added on the target model.
    #[serde(default)]
    pub hooks: Vec<HookDef>,
}

/// The full contribution payload of one addon.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AddonData {
    /// Models this addon defines.
    #[serde(default)]
    pub models: Vec<ModelSpec>,
    /// Extensions to models defined by other addons.
    #[serde(default)]
    pub extend: Vec<ExtendSpec>,
    /// Access rules this addon grants.
    #[serde(default)]
    pub access: Vec<AccessRule>,
}

impl AddonData {
    /// Parse a payload from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a payload from a file path.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Validate the payload against the addon's manifest.
    ///
    /// Checks that every contributed model is a declared capability, that
    /// every field descriptor is structurally sound, and that no model spec
    /// declares the same hook twice.
    pub fn validate(&self, manifest: &AddonManifest) -> Result<()> {
        let addon = &manifest.addon.name;
        for spec in &self.models {
            self.validate_entry(manifest, &spec.name, &spec.fields, &spec.hooks)?;
        }
        for spec in &self.extend {
            self.validate_entry(manifest, &spec.model, &spec.fields, &spec.hooks)?;
        }
        tracing::debug!(
            addon = %addon,
            models = self.models.len(),
            extensions = self.extend.len(),
            rules = self.access.len(),
            "payload validated"
        );
        Ok(())
    }

    fn validate_entry(
        &self,
        manifest: &AddonManifest,
        model: &str,
        fields: &BTreeMap<String, FieldDef>,
        hooks: &[HookDef],
    ) -> Result<()> {
        let addon = &manifest.addon.name;
        if !manifest.declares_capability(model) {
            return Err(Error::UndeclaredCapability {
                addon: addon.clone(),
                model: model.to_string(),
            });
        }
        for (field, def) in fields {
            def.validate().map_err(|reason| Error::InvalidFieldSpec {
                addon: addon.clone(),
                model: model.to_string(),
                field: field.clone(),
                reason,
            })?;
        }
        let mut seen = std::collections::BTreeSet::new();
        for hook in hooks {
            if !seen.insert(hook.name.as_str()) {
                return Err(Error::DuplicateHook {
                    addon: addon.clone(),
                    model: model.to_string(),
                    hook: hook.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Whether the payload contributes nothing.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty() && self.extend.is_empty() && self.access.is_empty()
    }
}

/// Key hooks by name, as the registry stores them.
pub fn hook_map(hooks: &[HookDef]) -> BTreeMap<String, HookDef> {
    hooks
        .iter()
        .map(|h| (h.name.clone(), h.clone()))
        .collect()
}
