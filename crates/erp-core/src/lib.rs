//! Addon lifecycle orchestration.
//!
//! The [`LifecycleManager`] drives install, uninstall, and upgrade
//! transitions per addon: it checks preconditions against the dependency
//! graph, applies each addon's declarative contribution to the model
//! registry and the security framework as one transaction (snapshot before,
//! restore on failure), and is the only writer of addon state. Batch
//! installs follow the resolver's deterministic order and isolate per-addon
//! failures.

pub mod error;
pub mod lifecycle;
pub mod state;
pub mod statefile;

pub use error::{Error, Result};
pub use lifecycle::{AddonStatus, BatchFailure, BatchReport, LifecycleManager};
pub use state::AddonState;
pub use statefile::StateFile;
