//! The security framework: default-deny access checks over granted rules.

use std::sync::{Arc, PoisonError, RwLock};

use erp_registry::ModelRegistry;

use crate::rule::{AccessDecision, AccessRule, Operation};

/// A rule together with the addon that granted it, so uninstalling the
/// addon can revoke exactly its grants.
#[derive(Debug, Clone)]
struct GrantedRule {
    addon: String,
    rule: AccessRule,
}

/// An opaque copy of the granted rule set, used to roll back a failed
/// install/upgrade transaction.
#[derive(Debug, Clone)]
pub struct RulesSnapshot(Vec<GrantedRule>);

/// Evaluates access rules against the live model registry.
///
/// Every [`check`](Self::check) consults the current registry state to
/// confirm the model still exists (a rule referencing a retracted model
/// denies rather than erroring) and re-evaluates the rule set from scratch;
/// decisions are never cached across mutations.
#[derive(Debug)]
pub struct SecurityFramework {
    registry: Arc<ModelRegistry>,
    rules: RwLock<Vec<GrantedRule>>,
}

impl SecurityFramework {
    /// Create a framework evaluating against `registry`.
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self {
            registry,
            rules: RwLock::new(Vec::new()),
        }
    }

    /// Register a rule granted by `addon`.
    pub fn grant(&self, addon: &str, rule: AccessRule) {
        tracing::debug!(
            addon,
            model = %rule.model,
            role = %rule.role,
            "granting access rule"
        );
        self.write().push(GrantedRule {
            addon: addon.to_string(),
            rule,
        });
    }

    /// Remove every rule granted by `addon`. Returns how many were removed.
    pub fn revoke_addon(&self, addon: &str) -> usize {
        let mut rules = self.write();
        let before = rules.len();
        rules.retain(|g| g.addon != addon);
        let removed = before - rules.len();
        if removed > 0 {
            tracing::debug!(addon, removed, "revoked access rules");
        }
        removed
    }

    /// Evaluate whether `role` may perform `operation` on `model`.
    ///
    /// Default-deny: the operation is permitted only if at least one granted
    /// rule matches, and — when `field` is given — no matching rule excludes
    /// that field. An unknown or retracted model always denies (fail safe).
    pub fn check(
        &self,
        role: &str,
        model: &str,
        operation: Operation,
        field: Option<&str>,
    ) -> AccessDecision {
        if !self.registry.contains(model) {
            tracing::debug!(role, model, %operation, "deny: model not registered");
            return AccessDecision::Deny;
        }

        let rules = self.read();
        let matching: Vec<&GrantedRule> = rules
            .iter()
            .filter(|g| g.rule.matches(role, model, operation))
            .collect();

        if matching.is_empty() {
            return AccessDecision::Deny;
        }
        if let Some(field) = field {
            if matching.iter().any(|g| g.rule.restricts_field(field)) {
                tracing::debug!(role, model, field, "deny: field restricted");
                return AccessDecision::Deny;
            }
        }
        AccessDecision::Allow
    }

    /// All rules granted for `model`, for inspection/reporting.
    pub fn rules_for(&self, model: &str) -> Vec<AccessRule> {
        self.read()
            .iter()
            .filter(|g| g.rule.model == model)
            .map(|g| g.rule.clone())
            .collect()
    }

    /// Number of granted rules.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether no rules are granted.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copy the rule set for later [`restore`](Self::restore).
    pub fn snapshot(&self) -> RulesSnapshot {
        RulesSnapshot(self.read().clone())
    }

    /// Replace the rule set with a previously taken snapshot.
    pub fn restore(&self, snapshot: RulesSnapshot) {
        *self.write() = snapshot.0;
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<GrantedRule>> {
        self.rules.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<GrantedRule>> {
        self.rules.write().unwrap_or_else(PoisonError::into_inner)
    }
}
