//! End-to-end access-control scenarios: rules granted through addon
//! payloads, evaluated against the live registry.

use std::sync::Arc;

use erp_core::LifecycleManager;
use erp_registry::ModelRegistry;
use erp_security::{Operation, SecurityFramework};
use erp_test_utils::TestAddons;

fn manager_for(addons: &TestAddons) -> LifecycleManager {
    let registry = Arc::new(ModelRegistry::new());
    let security = Arc::new(SecurityFramework::new(Arc::clone(&registry)));
    let mut manager = LifecycleManager::new(registry, security);
    manager.discover(addons.root()).unwrap();
    manager
}

fn scaffold_sales_platform() -> TestAddons {
    let addons = TestAddons::new();
    addons.add_addon("base", "1.0.0", &[], &["res.partner"]);
    addons.add_data("base", "[[models]]\nname = \"res.partner\"\n");
    addons.add_addon("sale", "1.0.0", &["base"], &["sale.order"]);
    addons.add_data(
        "sale",
        r#"
[[models]]
name = "sale.order"

[models.fields.amount_total]
type = "float"

[models.fields.margin]
type = "float"

[[access]]
model = "sale.order"
role = "sales_user"
operations = ["create", "read", "update"]
field_restrictions = ["margin"]

[[access]]
model = "sale.order"
role = "sales_manager"
operations = ["create", "read", "update", "delete"]
"#,
    );
    addons
}

#[test]
fn test_grant_revoke_cycle_through_lifecycle() {
    let addons = scaffold_sales_platform();
    let mut manager = manager_for(&addons);

    // Before install: nothing exists, everything denies.
    assert!(manager
        .security()
        .check("sales_user", "sale.order", Operation::Read, None)
        .is_denied());

    manager.install_all().unwrap();
    assert!(manager
        .security()
        .check("sales_user", "sale.order", Operation::Read, None)
        .is_allowed());

    // Uninstall revokes the addon's rules: back to deny.
    manager.uninstall("sale").unwrap();
    assert!(manager
        .security()
        .check("sales_user", "sale.order", Operation::Read, None)
        .is_denied());
}

#[test]
fn test_operation_grants_are_exact() {
    let addons = scaffold_sales_platform();
    let mut manager = manager_for(&addons);
    manager.install_all().unwrap();

    let security = manager.security();
    assert!(security
        .check("sales_user", "sale.order", Operation::Update, None)
        .is_allowed());
    assert!(security
        .check("sales_user", "sale.order", Operation::Delete, None)
        .is_denied());
    assert!(security
        .check("sales_manager", "sale.order", Operation::Delete, None)
        .is_allowed());
    // Unknown role has no grants at all.
    assert!(security
        .check("intern", "sale.order", Operation::Read, None)
        .is_denied());
}

#[test]
fn test_field_restrictions_from_payload() {
    let addons = scaffold_sales_platform();
    let mut manager = manager_for(&addons);
    manager.install_all().unwrap();

    let security = manager.security();
    assert!(security
        .check("sales_user", "sale.order", Operation::Read, Some("amount_total"))
        .is_allowed());
    assert!(security
        .check("sales_user", "sale.order", Operation::Read, Some("margin"))
        .is_denied());
    // The manager's rule carries no restriction.
    assert!(security
        .check("sales_manager", "sale.order", Operation::Read, Some("margin"))
        .is_allowed());
}

#[test]
fn test_check_consults_live_registry() {
    let addons = scaffold_sales_platform();
    let mut manager = manager_for(&addons);
    manager.install_all().unwrap();

    assert!(manager
        .security()
        .check("sales_manager", "sale.order", Operation::Read, None)
        .is_allowed());

    // Retraction makes the model unknown: previously-allowed checks must
    // deny immediately, with no cached decision surviving.
    manager.uninstall("sale").unwrap();
    assert!(!manager.registry().contains("sale.order"));
    assert!(manager
        .security()
        .check("sales_manager", "sale.order", Operation::Read, None)
        .is_denied());
}
