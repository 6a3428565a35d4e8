//! Per-addon lifecycle states.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of one addon.
///
/// The lifecycle manager is the only writer:
/// `discovered → resolving → installed | failed`,
/// `installed → upgrading → installed | failed`,
/// `installed → uninstalled`. Install may be retried from `failed` or
/// `uninstalled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddonState {
    /// Manifest loaded; nothing applied yet.
    Discovered,
    /// Dependency check / contribution in progress.
    Resolving,
    /// Contribution fully applied.
    Installed,
    /// Re-applying contribution.
    Upgrading,
    /// Contribution retracted.
    Uninstalled,
    /// A transaction failed and was rolled back.
    Failed,
}

impl AddonState {
    /// Whether the addon's contribution is currently applied.
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed | Self::Upgrading)
    }

    /// Whether `install` may be attempted from this state.
    pub fn is_installable(&self) -> bool {
        matches!(self, Self::Discovered | Self::Uninstalled | Self::Failed)
    }
}

impl fmt::Display for AddonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Discovered => "discovered",
            Self::Resolving => "resolving",
            Self::Installed => "installed",
            Self::Upgrading => "upgrading",
            Self::Uninstalled => "uninstalled",
            Self::Failed => "failed",
        };
        write!(f, "{label}")
    }
}
