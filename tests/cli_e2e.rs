#![allow(deprecated)]
use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn contactbook_cmd(data: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("contactbook"));
    cmd.env("CONTACTBOOK_DATA", data.path())
        .env("NO_COLOR", "1")
        .env_remove("CONTACTBOOK_LOG");
    cmd
}

fn add(data: &TempDir, email: &str, name: &str, position: &str) {
    contactbook_cmd(data)
        .args(["save", "-e", email, "-n", name, "-p", position])
        .assert()
        .success();
}

#[test]
fn save_then_list() {
    let data = TempDir::new().unwrap();

    contactbook_cmd(&data)
        .args(["save", "-e", "ann@corp.com", "-n", "Ann Lee", "-p", "CTO"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added Ann Lee <ann@corp.com>"));

    contactbook_cmd(&data)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ann Lee · CTO"))
        .stdout(predicate::str::contains("ann@corp.com"));

    assert!(data.path().join("contacts.json").exists());
}

#[test]
fn empty_book_lists_nothing() {
    let data = TempDir::new().unwrap();
    contactbook_cmd(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("No contacts found."));
}

#[test]
fn saving_same_email_updates() {
    let data = TempDir::new().unwrap();
    add(&data, "ann@corp.com", "Ann Lee", "CTO");

    contactbook_cmd(&data)
        .args(["add", "-e", "ANN@corp.com", "-n", "Ann Lee", "-p", "CEO"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated Ann Lee <ann@corp.com>"));

    contactbook_cmd(&data)
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("CEO"))
        .stdout(predicate::str::contains("CTO").not());
}

#[test]
fn invalid_contact_fails_with_message() {
    let data = TempDir::new().unwrap();

    contactbook_cmd(&data)
        .args(["save", "-e", "not-an-email", "-n", "Ann", "-p", "CTO"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid email address"));

    contactbook_cmd(&data)
        .args(["save", "-e", "a@b.com", "-n", "  ", "-p", "CTO"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("full name cannot be empty"));

    contactbook_cmd(&data)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No contacts found."));
}

#[test]
fn search_respects_minimum_length() {
    let data = TempDir::new().unwrap();
    add(&data, "ann@corp.com", "Ann Lee", "CTO");
    add(&data, "ben@corp.com", "Ben Ode", "iOS Developer");

    contactbook_cmd(&data)
        .args(["search", "io"])
        .assert()
        .success()
        .stdout(predicate::str::contains("at least 3 characters"));

    contactbook_cmd(&data)
        .args(["search", "ios"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 match for 'ios'"))
        .stdout(predicate::str::contains("ben@corp.com"))
        .stdout(predicate::str::contains("ann@corp.com").not());

    contactbook_cmd(&data)
        .arg("search")
        .assert()
        .success()
        .stdout(predicate::str::contains("ann@corp.com"))
        .stdout(predicate::str::contains("ben@corp.com"));
}

#[test]
fn search_threshold_follows_config() {
    let data = TempDir::new().unwrap();
    add(&data, "ann@corp.com", "Ann Lee", "CTO");

    contactbook_cmd(&data)
        .args(["config", "min-search-len", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("min-search-len set to 1"));

    contactbook_cmd(&data)
        .args(["search", "c"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 match for 'c'"));
}

#[test]
fn show_and_missing_contact() {
    let data = TempDir::new().unwrap();
    add(&data, "ann@corp.com", "Ann Lee", "CTO");

    contactbook_cmd(&data)
        .args(["show", "Ann@Corp.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ann Lee"))
        .stdout(predicate::str::contains("position: CTO"));

    contactbook_cmd(&data)
        .args(["show", "nobody@corp.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Contact not found: nobody@corp.com"));
}

#[test]
fn edit_changes_only_given_fields() {
    let data = TempDir::new().unwrap();
    add(&data, "ann@corp.com", "Ann Lee", "CTO");
    let photo = data.path().join("ann.png");
    fs::write(&photo, [1u8, 2, 3]).unwrap();

    contactbook_cmd(&data)
        .args(["edit", "ann@corp.com", "-p", "CEO", "--photo"])
        .arg(&photo)
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated Ann Lee <ann@corp.com>"));

    contactbook_cmd(&data)
        .args(["show", "ann@corp.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("position: CEO"))
        .stdout(predicate::str::contains("3 bytes"));

    contactbook_cmd(&data)
        .args(["edit", "ann@corp.com", "--clear-photo"])
        .assert()
        .success();

    contactbook_cmd(&data)
        .args(["show", "ann@corp.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("photo:    none"));
}

#[test]
fn edit_missing_contact_fails() {
    let data = TempDir::new().unwrap();
    contactbook_cmd(&data)
        .args(["edit", "ghost@corp.com", "-n", "Ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Contact not found"));
}

#[test]
fn delete_reports_each_email() {
    let data = TempDir::new().unwrap();
    add(&data, "ann@corp.com", "Ann Lee", "CTO");
    add(&data, "ben@corp.com", "Ben Ode", "CFO");

    contactbook_cmd(&data)
        .args(["rm", "ann@corp.com", "ghost@corp.com"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Deleted Ann Lee <ann@corp.com>"))
        .stderr(predicate::str::contains("Contact not found: ghost@corp.com"));

    contactbook_cmd(&data)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("ben@corp.com"))
        .stdout(predicate::str::contains("ann@corp.com").not());
}

#[test]
fn clear_requires_confirmation() {
    let data = TempDir::new().unwrap();
    add(&data, "ann@corp.com", "Ann Lee", "CTO");

    contactbook_cmd(&data)
        .arg("clear")
        .assert()
        .failure()
        .stdout(predicate::str::contains("--yes"));

    contactbook_cmd(&data)
        .args(["clear", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 contact"));

    contactbook_cmd(&data)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No contacts found."));
}

#[test]
fn config_show_and_reject() {
    let data = TempDir::new().unwrap();

    contactbook_cmd(&data)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("min-search-len = 3"))
        .stdout(predicate::str::contains("list-width = 100"));

    contactbook_cmd(&data)
        .args(["config", "colour", "red"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config error"));

    contactbook_cmd(&data)
        .args(["config", "list-width", "wide"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be a number"));
}

#[test]
fn doctor_on_clean_directory() {
    let data = TempDir::new().unwrap();
    add(&data, "ann@corp.com", "Ann Lee", "CTO");

    contactbook_cmd(&data)
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("consistent"));
}

#[test]
fn data_dir_flag_overrides_env() {
    let env_dir = TempDir::new().unwrap();
    let flag_dir = TempDir::new().unwrap();

    contactbook_cmd(&env_dir)
        .args(["save", "-e", "ann@corp.com", "-n", "Ann", "-p", "CTO", "--data-dir"])
        .arg(flag_dir.path())
        .assert()
        .success();

    assert!(flag_dir.path().join("contacts.json").exists());
    assert!(!env_dir.path().join("contacts.json").exists());
}

#[test]
fn corrupt_store_is_reported() {
    let data = TempDir::new().unwrap();
    fs::write(data.path().join("contacts.json"), "{oops").unwrap();

    contactbook_cmd(&data)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Serialization error"));
}
