//! The model registry: assembled model definitions from addon contributions.
//!
//! Each model is stored as an ordered contribution log: the base `define`
//! entry followed by `extend` entries in the order addons were installed.
//! [`ModelRegistry::get`] folds the log into a [`ModelDefinition`] with
//! last-applied-field-wins merge semantics, so readers always see a stable,
//! fully-merged view and never a half-applied mutation.
//!
//! Mutations within one install pass are guarded against sibling corruption:
//! two different addons carrying the same pass id may not touch the same
//! field or hook of one model. Re-contribution by the *same* addon replaces
//! its log entry in place, which is what makes addon upgrades idempotent.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use crate::error::{Error, Result};
use crate::model::{FieldDef, HookDef, ModelDefinition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContributionKind {
    Define,
    Extend,
}

/// One addon's contribution to one model.
#[derive(Debug, Clone)]
struct Contribution {
    addon: String,
    pass: u64,
    kind: ContributionKind,
    fields: BTreeMap<String, FieldDef>,
    hooks: BTreeMap<String, HookDef>,
}

#[derive(Debug, Clone, Default)]
struct RegistryState {
    /// Model name -> contribution log. Invariant: a non-empty log starts
    /// with its single `Define` entry.
    models: HashMap<String, Vec<Contribution>>,
    next_pass: u64,
}

/// An opaque copy of the full registry state, used to roll back a failed
/// install/upgrade transaction.
#[derive(Debug, Clone)]
pub struct RegistrySnapshot(RegistryState);

/// Central mapping from model name to its assembled definition.
///
/// One instance is owned per platform; all mutation goes through a single
/// write lock, and reads fold the contribution log into an owned
/// [`ModelDefinition`] so no caller can observe a mutation mid-flight.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    state: RwLock<RegistryState>,
}

impl ModelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new install pass and return its id.
    ///
    /// Contributions carrying the same pass id are treated as siblings for
    /// conflict detection; the lifecycle manager hands one pass id to each
    /// group of mutually-unordered addons in a batch.
    pub fn begin_pass(&self) -> u64 {
        let mut state = self.write();
        state.next_pass += 1;
        state.next_pass
    }

    /// Introduce a new model.
    ///
    /// A model may be defined exactly once; a repeated `define` by the
    /// *same* addon (an upgrade re-run) replaces the base entry in place,
    /// keeping every extension on top of it. A `define` by a different
    /// addon fails with [`Error::ModelAlreadyDefined`].
    pub fn define(
        &self,
        addon: &str,
        model: &str,
        pass: u64,
        fields: BTreeMap<String, FieldDef>,
        hooks: BTreeMap<String, HookDef>,
    ) -> Result<()> {
        let mut state = self.write();
        let contribution = Contribution {
            addon: addon.to_string(),
            pass,
            kind: ContributionKind::Define,
            fields,
            hooks,
        };

        if let Some(log) = state.models.get_mut(model) {
            let base = &mut log[0];
            if base.addon != addon {
                return Err(Error::ModelAlreadyDefined {
                    model: model.to_string(),
                    addon: addon.to_string(),
                    defined_by: base.addon.clone(),
                });
            }
            tracing::debug!(model, addon, "replacing base definition");
            *base = contribution;
        } else {
            tracing::debug!(model, addon, "defining model");
            state.models.insert(model.to_string(), vec![contribution]);
        }
        Ok(())
    }

    /// Extend an existing model with additional fields and hooks.
    ///
    /// Extensions merge additively in applied order; a field or hook name
    /// collision with an earlier pass is resolved as last-applied-wins, but
    /// a collision with a *sibling* contribution (same pass, different
    /// addon) fails with [`Error::ExtensionConflict`] and leaves the model
    /// untouched. A repeated `extend` by the same addon replaces its entry
    /// in place.
    pub fn extend(
        &self,
        addon: &str,
        model: &str,
        pass: u64,
        fields: BTreeMap<String, FieldDef>,
        hooks: BTreeMap<String, HookDef>,
    ) -> Result<()> {
        let mut state = self.write();
        let log = state
            .models
            .get_mut(model)
            .ok_or_else(|| Error::UnknownModel(model.to_string()))?;

        for sibling in log
            .iter()
            .filter(|c| c.kind == ContributionKind::Extend && c.pass == pass && c.addon != addon)
        {
            let mut items: Vec<String> = fields
                .keys()
                .filter(|k| sibling.fields.contains_key(*k))
                .cloned()
                .collect();
            items.extend(
                hooks
                    .keys()
                    .filter(|k| sibling.hooks.contains_key(*k))
                    .cloned(),
            );
            if !items.is_empty() {
                return Err(Error::ExtensionConflict {
                    model: model.to_string(),
                    first: sibling.addon.clone(),
                    second: addon.to_string(),
                    items,
                });
            }
        }

        if let Some(existing) = log
            .iter_mut()
            .find(|c| c.kind == ContributionKind::Extend && c.addon == addon)
        {
            tracing::debug!(model, addon, "replacing extension");
            existing.pass = pass;
            existing.fields = fields;
            existing.hooks = hooks;
        } else {
            tracing::debug!(model, addon, "extending model");
            log.push(Contribution {
                addon: addon.to_string(),
                pass,
                kind: ContributionKind::Extend,
                fields,
                hooks,
            });
        }
        Ok(())
    }

    /// Return the assembled definition of a model.
    pub fn get(&self, model: &str) -> Result<ModelDefinition> {
        let state = self.read();
        let log = state
            .models
            .get(model)
            .ok_or_else(|| Error::UnknownModel(model.to_string()))?;
        Ok(fold(model, log))
    }

    /// Whether a model is currently known to the registry.
    pub fn contains(&self, model: &str) -> bool {
        self.read().models.contains_key(model)
    }

    /// Sorted names of all registered models.
    pub fn model_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().models.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.read().models.len()
    }

    /// Whether the registry holds no models.
    pub fn is_empty(&self) -> bool {
        self.read().models.is_empty()
    }

    /// Remove every contribution made by `addon`.
    ///
    /// The whole retraction is checked before anything is mutated: removing
    /// a base definition while other addons' extensions still build on it
    /// fails with [`Error::RetractionConflict`], and in that case the
    /// registry is left exactly as it was.
    pub fn retract(&self, addon: &str) -> Result<()> {
        let mut state = self.write();

        let mut model_names: Vec<&String> = state.models.keys().collect();
        model_names.sort();
        for name in model_names {
            let log = &state.models[name];
            if log[0].kind == ContributionKind::Define && log[0].addon == addon {
                let dependents: Vec<String> = log[1..]
                    .iter()
                    .filter(|c| c.addon != addon)
                    .map(|c| c.addon.clone())
                    .collect();
                if !dependents.is_empty() {
                    return Err(Error::RetractionConflict {
                        addon: addon.to_string(),
                        model: name.clone(),
                        dependents,
                    });
                }
            }
        }

        state.models.retain(|name, log| {
            let before = log.len();
            log.retain(|c| c.addon != addon);
            if log.len() != before {
                tracing::debug!(model = %name, addon, "retracted contribution");
            }
            !log.is_empty()
        });
        Ok(())
    }

    /// Copy the full registry state for later [`restore`](Self::restore).
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot(self.read().clone())
    }

    /// Replace the registry state with a previously taken snapshot.
    pub fn restore(&self, snapshot: RegistrySnapshot) {
        *self.write() = snapshot.0;
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Fold a contribution log into the merged definition, in applied order.
fn fold(model: &str, log: &[Contribution]) -> ModelDefinition {
    let mut fields = BTreeMap::new();
    let mut hooks = BTreeMap::new();
    let mut owners: Vec<String> = Vec::new();
    for contribution in log {
        for (name, def) in &contribution.fields {
            fields.insert(name.clone(), def.clone());
        }
        for (name, def) in &contribution.hooks {
            hooks.insert(name.clone(), def.clone());
        }
        if !owners.contains(&contribution.addon) {
            owners.push(contribution.addon.clone());
        }
    }
    ModelDefinition {
        name: model.to_string(),
        fields,
        hooks,
        owners,
    }
}
