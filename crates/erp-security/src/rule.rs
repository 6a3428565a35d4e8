//! Access rule types.
//!
//! Rules are declarative and additive: each one grants a role a subset of
//! CRUD operations on one model, optionally excluding specific fields from
//! the grant. The effective permission is the union of all matching rules;
//! no rule means no access.
//!
//! # Example TOML
//!
//! ```toml
//! [[access]]
//! model = "sale.order"
//! role = "sales_user"
//! operations = ["create", "read", "update"]
//! field_restrictions = ["margin"]
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A CRUD operation on a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Read => write!(f, "read"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Error returned when parsing an [`Operation`] from a string fails.
#[derive(Debug, thiserror::Error)]
#[error("unknown operation '{0}', expected create/read/update/delete")]
pub struct ParseOperationError(String);

impl FromStr for Operation {
    type Err = ParseOperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "read" => Ok(Self::Read),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(ParseOperationError(other.to_string())),
        }
    }
}

/// A grant of operations on one model to one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    /// Model the rule applies to.
    pub model: String,
    /// Role the grant is made to.
    pub role: String,
    /// Operations granted.
    pub operations: BTreeSet<Operation>,
    /// Fields excluded from this grant.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_restrictions: Vec<String>,
}

impl AccessRule {
    /// Create a rule granting `operations` on `model` to `role`.
    pub fn new(
        model: impl Into<String>,
        role: impl Into<String>,
        operations: impl IntoIterator<Item = Operation>,
    ) -> Self {
        Self {
            model: model.into(),
            role: role.into(),
            operations: operations.into_iter().collect(),
            field_restrictions: Vec::new(),
        }
    }

    /// Exclude `fields` from the grant.
    pub fn with_field_restrictions(
        mut self,
        fields: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.field_restrictions = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Whether this rule grants `operation` on `model` to `role`.
    pub fn matches(&self, role: &str, model: &str, operation: Operation) -> bool {
        self.role == role && self.model == model && self.operations.contains(&operation)
    }

    /// Whether `field` is excluded from this grant.
    pub fn restricts_field(&self, field: &str) -> bool {
        self.field_restrictions.iter().any(|f| f == field)
    }
}

/// The outcome of an access check.
///
/// Not an error: denial is the default and an entirely ordinary result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessDecision {
    Allow,
    Deny,
}

impl Default for AccessDecision {
    fn default() -> Self {
        Self::Deny
    }
}

impl fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => write!(f, "allow"),
            Self::Deny => write!(f, "deny"),
        }
    }
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Deny)
    }
}
