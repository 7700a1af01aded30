//! Smoke tests to verify command module wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_top_level_help() {
    let mut cmd = Command::cargo_bin("homie").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("init-db"))
        .stdout(predicate::str::contains("categories"))
        .stdout(predicate::str::contains("devices"));
}

// === Serve Command Tests ===

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("homie").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Address to bind to"));
}

// === Catalog Command Tests ===

#[test]
fn test_categories_list_help() {
    let mut cmd = Command::cargo_bin("homie").unwrap();
    cmd.arg("categories").arg("list").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Catalog API endpoint"));
}

#[test]
fn test_devices_add_help() {
    let mut cmd = Command::cargo_bin("homie").unwrap();
    cmd.arg("devices").arg("add").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Category id"))
        .stdout(predicate::str::contains("Power draw in watts"));
}

#[test]
fn test_devices_add_requires_category() {
    let mut cmd = Command::cargo_bin("homie").unwrap();
    cmd.args([
        "devices", "add", "--name", "Lampe", "--type", "Licht", "--power", "60", "--room", "Küche",
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--category"));
}

#[test]
fn test_devices_list_degrades_when_unreachable() {
    let mut cmd = Command::cargo_bin("homie").unwrap();
    cmd.env_remove("HOMIE_ENDPOINT")
        .args(["devices", "list", "--endpoint", "http://127.0.0.1:9"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(no devices)"));
}

#[test]
fn test_categories_list_json_when_unreachable() {
    let mut cmd = Command::cargo_bin("homie").unwrap();
    cmd.env_remove("HOMIE_ENDPOINT")
        .args(["categories", "list", "--json", "--endpoint", "http://127.0.0.1:9"]);

    cmd.assert().success().stdout(predicate::str::contains("[]"));
}

#[test]
fn test_category_add_fails_when_unreachable() {
    let mut cmd = Command::cargo_bin("homie").unwrap();
    cmd.env_remove("HOMIE_ENDPOINT")
        .args(["categories", "add", "Küche", "--endpoint", "http://127.0.0.1:9"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to connect"));
}
