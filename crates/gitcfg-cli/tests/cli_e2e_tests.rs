//! CLI end-to-end tests that invoke the compiled `gitcfg` binary.

use assert_cmd::Command;
use gitcfg_test_utils::repo::{CONFIG_REF, TestRepo};
use predicates::prelude::*;

/// `gitcfg` pointed at `repo`, with logging and settings isolated from the host.
fn gitcfg(repo: &TestRepo) -> Command {
    let mut cmd = Command::cargo_bin("gitcfg").unwrap();
    cmd.arg("-C")
        .arg(repo.path())
        .env_remove("RUST_LOG")
        .env("GITCFG_SETTINGS", repo.path().join("no-settings.toml").as_os_str())
        .env("NO_COLOR", "1");
    cmd
}

/// Settings file pointing at the default layout, so a host-level settings
/// file never leaks into the tests.
fn with_default_settings(repo: &TestRepo) -> Command {
    let settings = repo.path().join("gitcfg-settings.toml");
    std::fs::write(&settings, "").unwrap();
    let mut cmd = gitcfg(repo);
    cmd.env("GITCFG_SETTINGS", settings.as_os_str());
    cmd
}

#[test]
fn test_help_exits_zero() {
    Command::cargo_bin("gitcfg")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("apply"));
}

#[test]
fn test_missing_settings_file_is_an_error() {
    let repo = TestRepo::new();
    gitcfg(&repo)
        .arg("version")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_version_of_empty_repository_is_blank() {
    let repo = TestRepo::new();
    with_default_settings(&repo)
        .arg("version")
        .assert()
        .success()
        .stdout("\n");
}

#[test]
fn test_set_then_get() {
    let repo = TestRepo::new();
    with_default_settings(&repo)
        .args(["set", "remote.mirror.url", "git@mirror:${name}.git"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Committed"));

    with_default_settings(&repo)
        .arg("get")
        .assert()
        .success()
        .stdout(predicate::str::contains("[remote \"mirror\"]"))
        .stdout(predicate::str::contains("url = git@mirror:${name}.git"));

    repo.assert_file_exists(CONFIG_REF, "replication/mirror.config");
}

#[test]
fn test_set_keeps_other_keys_of_the_remote() {
    let repo = TestRepo::new();
    with_default_settings(&repo)
        .args(["set", "remote.mirror.url", "u"])
        .assert()
        .success();
    with_default_settings(&repo)
        .args(["set", "remote.mirror.threads", "4"])
        .assert()
        .success();

    repo.assert_file_contains(CONFIG_REF, "replication/mirror.config", "url = u");
    repo.assert_file_contains(CONFIG_REF, "replication/mirror.config", "threads = 4");
}

#[test]
fn test_repeated_set_reports_no_changes() {
    let repo = TestRepo::new();
    for expected in ["Committed", "No changes"] {
        with_default_settings(&repo)
            .args(["set", "gerrit.autoReload", "true"])
            .assert()
            .success()
            .stdout(predicate::str::contains(expected));
    }
    assert_eq!(repo.commit_count(CONFIG_REF), 1);
}

#[test]
fn test_get_json() {
    let repo = TestRepo::new();
    with_default_settings(&repo)
        .args(["set", "remote.m.push", "a", "b"])
        .assert()
        .success();

    let output = with_default_settings(&repo)
        .args(["get", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json, serde_json::json!({ "remote.m.push": ["a", "b"] }));
}

#[test]
fn test_apply_file() {
    let repo = TestRepo::new();
    let file = repo.path().join("change.config");
    std::fs::write(
        &file,
        "[replication]\n\tmaxRetries = 3\n[remote \"a\"]\n\turl = ua\n[remote \"b\"]\n\turl = ub\n",
    )
    .unwrap();

    with_default_settings(&repo)
        .arg("apply")
        .arg(&file)
        .assert()
        .success();

    assert_eq!(repo.list(CONFIG_REF, "replication"), vec!["a.config", "b.config"]);
    repo.assert_file_contains(CONFIG_REF, "replication.config", "maxretries = 3");
}

#[test]
fn test_apply_malformed_file_fails() {
    let repo = TestRepo::new();
    let file = repo.path().join("bad.config");
    std::fs::write(&file, "[remote \"unterminated\n").unwrap();

    with_default_settings(&repo)
        .arg("apply")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
    assert_eq!(repo.commit_count(CONFIG_REF), 0);
}

#[test]
fn test_set_invalid_key_fails() {
    let repo = TestRepo::new();
    with_default_settings(&repo)
        .args(["set", "nodot", "v"])
        .assert()
        .failure();
}

#[test]
fn test_log_lists_commits() {
    let repo = TestRepo::new();
    for value in ["1", "2"] {
        with_default_settings(&repo)
            .args(["set", "a.k", value])
            .assert()
            .success();
    }

    let output = with_default_settings(&repo)
        .args(["log", "--json"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let commits = json.as_array().unwrap();
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0]["message"], "Update configuration");
    assert_eq!(commits[0]["parents"][0], commits[1]["id"]);
}

#[test]
fn test_log_on_empty_repository() {
    let repo = TestRepo::new();
    with_default_settings(&repo)
        .arg("log")
        .assert()
        .success()
        .stdout(predicate::str::contains("No configuration history"));
}

#[test]
fn test_custom_ref_from_settings() {
    let repo = TestRepo::new();
    let settings = repo.path().join("custom.toml");
    std::fs::write(&settings, "[layout]\nref-name = \"refs/meta/custom\"\n").unwrap();

    gitcfg(&repo)
        .arg("--settings")
        .arg(&settings)
        .args(["set", "a.k", "v"])
        .assert()
        .success();

    repo.assert_file_exists("refs/meta/custom", "replication.config");
    assert_eq!(repo.commit_count(CONFIG_REF), 0);
}
