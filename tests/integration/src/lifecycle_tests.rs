//! End-to-end lifecycle scenarios over on-disk addon packages: discovery,
//! resolution, install/extend/uninstall/upgrade, and state-file replay.

use std::sync::Arc;

use erp_core::{AddonState, Error, LifecycleManager, StateFile};
use erp_registry::ModelRegistry;
use erp_security::SecurityFramework;
use erp_test_utils::TestAddons;
use pretty_assertions::assert_eq;

fn manager_for(addons: &TestAddons) -> LifecycleManager {
    let registry = Arc::new(ModelRegistry::new());
    let security = Arc::new(SecurityFramework::new(Arc::clone(&registry)));
    let mut manager = LifecycleManager::new(registry, security);
    manager.discover(addons.root()).unwrap();
    manager
}

/// Addon `base` defines res.partner with field `name`; addon `account`
/// extends it with `credit_limit`.
fn scaffold_base_account() -> TestAddons {
    let addons = TestAddons::new();
    addons.add_addon("base", "1.0.0", &[], &["res.partner"]);
    addons.add_data(
        "base",
        r#"
[[models]]
name = "res.partner"

[models.fields.name]
type = "char"
required = true
"#,
    );
    addons.add_addon("account", "1.0.0", &["base"], &["res.partner"]);
    addons.add_data(
        "account",
        r#"
[[extend]]
model = "res.partner"

[extend.fields.credit_limit]
type = "float"
"#,
    );
    addons
}

#[test]
fn test_extension_lifecycle_across_addons() {
    let addons = scaffold_base_account();
    let mut manager = manager_for(&addons);

    manager.install("base").unwrap();
    manager.install("account").unwrap();

    // Both contributions visible in the merged view.
    let def = manager.registry().get("res.partner").unwrap();
    assert!(def.fields.contains_key("name"));
    assert!(def.fields.contains_key("credit_limit"));
    assert_eq!(def.owners, vec!["base", "account"]);

    // Uninstalling the extender leaves only the base field.
    manager.uninstall("account").unwrap();
    let def = manager.registry().get("res.partner").unwrap();
    assert!(def.fields.contains_key("name"));
    assert!(!def.fields.contains_key("credit_limit"));

    // Reinstall, then try to pull the base out from under the extender.
    manager.install("account").unwrap();
    let err = manager.uninstall("base").unwrap_err();
    assert!(matches!(
        err,
        Error::DependentsExist { ref dependents, .. } if dependents == &["account"]
    ));
    assert_eq!(manager.state("base"), Some(AddonState::Installed));
}

#[test]
fn test_resolved_order_is_deterministic_across_managers() {
    let addons = TestAddons::new();
    addons.add_addon("base", "1.0.0", &[], &[]);
    addons.add_addon("sale", "1.0.0", &["base"], &[]);
    addons.add_addon("purchase", "1.0.0", &["base"], &[]);
    addons.add_addon("stock", "1.0.0", &["base"], &[]);
    addons.add_addon("mrp", "1.0.0", &["stock", "purchase"], &[]);

    let manager = manager_for(&addons);
    let order = manager.resolved_order().unwrap();
    assert_eq!(order, vec!["base", "purchase", "sale", "stock", "mrp"]);

    // Same tree, fresh discovery: identical order.
    let other = manager_for(&addons);
    assert_eq!(other.resolved_order().unwrap(), order);
}

#[test]
fn test_sibling_extension_conflict_leaves_pre_install_state() {
    let addons = TestAddons::new();
    addons.add_addon("base", "1.0.0", &[], &["res.partner"]);
    addons.add_data("base", "[[models]]\nname = \"res.partner\"\n");
    let extend_rank = r#"
[[extend]]
model = "res.partner"

[extend.fields.rank]
type = "integer"
"#;
    addons.add_addon("sale", "1.0.0", &["base"], &["res.partner"]);
    addons.add_data("sale", extend_rank);
    addons.add_addon("purchase", "1.0.0", &["base"], &["res.partner"]);
    addons.add_data("purchase", extend_rank);

    let mut manager = manager_for(&addons);
    let report = manager.install_all().unwrap();

    // The lexicographically-first sibling wins its pass; the other rolls
    // back with a conflict and the model shows no trace of it.
    assert_eq!(report.installed, vec!["base", "purchase"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].addon, "sale");
    assert_eq!(manager.state("sale"), Some(AddonState::Failed));

    let def = manager.registry().get("res.partner").unwrap();
    assert_eq!(def.owners, vec!["base", "purchase"]);
}

#[test]
fn test_cycle_keeps_every_addon_discovered() {
    let addons = TestAddons::new();
    addons.add_addon("a", "1.0.0", &["b"], &[]);
    addons.add_addon("b", "1.0.0", &["a"], &[]);

    let mut manager = manager_for(&addons);
    let err = manager.install_all().unwrap_err();
    match err.root_cause() {
        Error::Addons(erp_addons::Error::DependencyCycle { participants }) => {
            assert_eq!(participants, &["a", "b"]);
        }
        other => panic!("expected DependencyCycle, got: {other:?}"),
    }

    assert_eq!(manager.state("a"), Some(AddonState::Discovered));
    assert_eq!(manager.state("b"), Some(AddonState::Discovered));
    assert!(manager.registry().is_empty());
}

#[test]
fn test_upgrade_twice_equals_upgrade_once() {
    let addons = scaffold_base_account();
    let mut manager = manager_for(&addons);
    manager.install("base").unwrap();
    manager.install("account").unwrap();

    manager.upgrade("account").unwrap();
    let once = manager.registry().get("res.partner").unwrap();

    manager.upgrade("account").unwrap();
    let twice = manager.registry().get("res.partner").unwrap();

    assert_eq!(once, twice);
    assert_eq!(manager.state("account"), Some(AddonState::Installed));
}

#[test]
fn test_state_file_replay_rebuilds_registry() {
    let addons = scaffold_base_account();
    let tmp = tempfile::TempDir::new().unwrap();
    let state_path = tmp.path().join("installed.toml");

    // First run: install and record.
    let mut manager = manager_for(&addons);
    manager.install("base").unwrap();
    manager.install("account").unwrap();

    let mut state = StateFile::new();
    for name in ["base", "account"] {
        state.upsert(name, manager.version_of(name).unwrap());
    }
    state.save(&state_path).unwrap();

    // Second run: a fresh manager replays the recorded installs.
    let state = StateFile::load(&state_path).unwrap();
    let mut fresh = manager_for(&addons);
    let replayed = fresh.replay(&state).unwrap();

    assert_eq!(replayed, vec!["base", "account"]);
    assert_eq!(fresh.state("account"), Some(AddonState::Installed));
    let def = fresh.registry().get("res.partner").unwrap();
    assert!(def.fields.contains_key("credit_limit"));
}

#[test]
fn test_duplicate_addon_name_fails_discovery() {
    let addons = TestAddons::new();
    addons.add_manifest_raw("first", "[addon]\nname = \"base\"\nversion = \"1.0.0\"\n");
    addons.add_manifest_raw("second", "[addon]\nname = \"base\"\nversion = \"1.0.0\"\n");

    let registry = Arc::new(ModelRegistry::new());
    let security = Arc::new(SecurityFramework::new(Arc::clone(&registry)));
    let mut manager = LifecycleManager::new(registry, security);

    let err = manager.discover(addons.root()).unwrap_err();
    assert!(matches!(
        err.root_cause(),
        Error::Addons(erp_addons::Error::DuplicateAddon { name, .. }) if name == "base"
    ));
}
