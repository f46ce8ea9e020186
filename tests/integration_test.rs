use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn vbms_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_vbms"))
}

fn run(dir: &Path, args: &[&str]) -> Output {
    vbms_cmd().current_dir(dir).args(args).output().unwrap()
}

fn init_workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["init"]);
    assert!(output.status.success());
    tmp
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_init_creates_vbms_directory() {
    let tmp = init_workspace();
    assert!(tmp.path().join(".vbms").exists());
    assert!(tmp.path().join(".vbms/vbms.db").exists());
    assert!(tmp.path().join(".vbms/config.yaml").exists());
}

#[test]
fn test_init_twice_fails() {
    let tmp = init_workspace();

    let output = run(tmp.path(), &["init"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Already initialized"));
}

#[test]
fn test_order_without_init_fails() {
    let tmp = TempDir::new().unwrap();

    let output = run(tmp.path(), &["order", "add", "--item", "Pizza:1:10"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Not in a vbms workspace"));
}

#[test]
fn test_order_ids_count_up() {
    let tmp = init_workspace();

    let output = run(
        tmp.path(),
        &["order", "add", "--item", "Pizza:2:12.5", "--total", "25"],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("VBMS-"));
    assert!(stdout.contains("-000001"));

    let output = run(
        tmp.path(),
        &["order", "add", "--source", "online", "--type", "delivery", "--json"],
    );
    let parsed = stdout_json(&output);
    let order_id = parsed["order_info"]["order_id"].as_str().unwrap();
    assert!(order_id.starts_with("VBMS-"));
    assert!(order_id.ends_with("-000002"));
    assert_eq!(parsed["order_info"]["type"], "delivery");
    assert_eq!(parsed["status"], "pending");
}

#[test]
fn test_order_status_workflow() {
    let tmp = init_workspace();

    let parsed = stdout_json(&run(tmp.path(), &["order", "add", "--json"]));
    let order_id = parsed["order_info"]["order_id"].as_str().unwrap().to_string();

    let output = run(tmp.path(), &["order", "status", &order_id, "confirmed"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("is now confirmed"));

    // Skipping ahead is rejected
    let output = run(tmp.path(), &["order", "status", &order_id, "delivered"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid status transition"));

    let parsed = stdout_json(&run(
        tmp.path(),
        &["order", "status", &order_id, "cancelled", "--note", "customer called", "--json"],
    ));
    assert_eq!(parsed["status"], "cancelled");
    let history = parsed["status_history"].as_array().unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[2]["note"], "customer called");
}

#[test]
fn test_invalid_enum_value_fails() {
    let tmp = init_workspace();

    let output = run(tmp.path(), &["order", "add", "--source", "fax"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid order source"));
}

#[test]
fn test_call_ids_share_a_day() {
    let tmp = init_workspace();

    let first = stdout_json(&run(
        tmp.path(),
        &["call", "add", "--name", "Ana", "--detail", "sentiment=positive", "--json"],
    ));
    let second = stdout_json(&run(tmp.path(), &["call", "add", "--json"]));

    let first_id = first["call_info"]["call_id"].as_str().unwrap();
    let second_id = second["call_info"]["call_id"].as_str().unwrap();
    assert!(first_id.starts_with("CALL-"));
    assert!(first_id.ends_with("-0001"));
    assert!(second_id.ends_with("-0002"));
    assert_eq!(first["details"]["sentiment"], "positive");
}

#[test]
fn test_inventory_derived_fields() {
    let tmp = init_workspace();

    let parsed = stdout_json(&run(
        tmp.path(),
        &[
            "inventory", "add", "Tomatoes", "--sku", "TOM-1", "--current", "10", "--reserved",
            "2", "--minimum", "5", "--maximum", "100", "--cost", "4", "--price", "10", "--json",
        ],
    ));
    assert_eq!(parsed["stock"]["available"], 8);
    assert_eq!(parsed["pricing"]["margin"], 150.0);
    assert_eq!(parsed["alerts"]["low_stock"], false);
    assert_eq!(parsed["alerts"]["out_of_stock"], false);
    assert_eq!(parsed["alerts"]["overstock"], false);

    let parsed = stdout_json(&run(
        tmp.path(),
        &["inventory", "update", "TOM-1", "--reserved", "10", "--json"],
    ));
    assert_eq!(parsed["stock"]["available"], 0);
    assert_eq!(parsed["alerts"]["out_of_stock"], true);

    let output = run(tmp.path(), &["inventory", "alerts"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("TOM-1 is out of stock"));
}

#[test]
fn test_inventory_uses_config_defaults() {
    let tmp = init_workspace();

    let parsed = stdout_json(&run(
        tmp.path(),
        &["inventory", "add", "Salt", "--sku", "SALT", "--current", "3", "--json"],
    ));
    assert_eq!(parsed["stock"]["minimum"], 10);
    assert_eq!(parsed["stock"]["maximum"], 1000);
    assert_eq!(parsed["alerts"]["low_stock"], true);
    assert!(parsed["pricing"]["margin"].is_null());
}

#[test]
fn test_duplicate_sku_fails() {
    let tmp = init_workspace();

    let output = run(tmp.path(), &["inventory", "add", "A", "--sku", "DUP"]);
    assert!(output.status.success());

    let output = run(tmp.path(), &["inventory", "add", "B", "--sku", "DUP"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Duplicate display id: DUP"));
}

#[test]
fn test_file_access_counter() {
    let tmp = init_workspace();

    let output = run(
        tmp.path(),
        &[
            "file", "add", "menus/spring.pdf", "--owner", "u-1", "--role", "admin", "--size",
            "2048", "--category", "document",
        ],
    );
    assert!(output.status.success());

    run(tmp.path(), &["file", "access", "menus/spring.pdf"]);
    let parsed = stdout_json(&run(
        tmp.path(),
        &["file", "access", "menus/spring.pdf", "--json"],
    ));
    assert_eq!(parsed["download_count"], 2);
    assert_eq!(parsed["owner"]["role"], "admin");
    assert!(parsed["last_accessed"].is_string());
}

#[test]
fn test_list_and_get() {
    let tmp = init_workspace();

    run(tmp.path(), &["order", "add", "--item", "Soup:1:6"]);
    run(tmp.path(), &["order", "add", "--item", "Salad:1:8"]);

    let parsed = stdout_json(&run(tmp.path(), &["list", "orders", "--json"]));
    let orders = parsed.as_array().unwrap();
    assert_eq!(orders.len(), 2);

    let first_id = orders[0]["order_info"]["order_id"].as_str().unwrap();
    let output = run(tmp.path(), &["get", "order", first_id]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Soup"));
    assert!(stdout.contains("pending"));

    let output = run(tmp.path(), &["list", "calls"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No calls found."));
}

#[test]
fn test_get_nonexistent_fails() {
    let tmp = init_workspace();

    let output = run(tmp.path(), &["get", "order", "VBMS-1999-000042"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Entity not found"));
}

#[test]
fn test_non_finite_cost_is_rejected() {
    let tmp = init_workspace();
    run(tmp.path(), &["inventory", "add", "Rice", "--sku", "RICE", "--current", "4"]);

    let output = run(
        tmp.path(),
        &["inventory", "add", "Oil", "--sku", "OIL", "--cost", "NaN"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("must be a finite number"));

    let output = run(tmp.path(), &["order", "add", "--total", "inf"]);
    assert!(!output.status.success());

    let parsed = stdout_json(&run(tmp.path(), &["list", "inventory", "--json"]));
    assert_eq!(parsed.as_array().unwrap().len(), 1);
    let output = run(tmp.path(), &["inventory", "alerts"]);
    assert!(output.status.success());
}

#[test]
fn test_empty_key_matches_nothing() {
    let tmp = init_workspace();
    run(
        tmp.path(),
        &["file", "add", "a.pdf", "--owner", "u-1", "--role", "admin"],
    );

    let output = run(tmp.path(), &["file", "access", ""]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Entity not found"));

    let parsed = stdout_json(&run(tmp.path(), &["get", "file", "a.pdf", "--json"]));
    assert_eq!(parsed["download_count"], 0);
}

#[test]
fn test_expires_and_clear_expiration_conflict() {
    let tmp = init_workspace();
    run(tmp.path(), &["inventory", "add", "Milk", "--sku", "MILK"]);

    let output = run(
        tmp.path(),
        &["inventory", "update", "MILK", "--expires", "2030-01-01", "--clear-expiration"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot be used with"));
}
