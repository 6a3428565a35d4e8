//! Access control framework for the ERP addon platform.
//!
//! Addons grant [`AccessRule`]s as part of their contribution; the
//! [`SecurityFramework`] evaluates every registry access against the union
//! of granted rules with default-deny semantics. Denial is an expected,
//! frequent outcome, so [`SecurityFramework::check`] returns an
//! [`AccessDecision`] value rather than an error.

pub mod framework;
pub mod rule;

pub use framework::{RulesSnapshot, SecurityFramework};
pub use rule::{AccessDecision, AccessRule, Operation};
