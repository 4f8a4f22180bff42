//! End-to-end tests for the `skaffold-beam completions` command.

mod common;
use common::prelude::*;

#[test]
fn test_completions_help() {
    let mut cmd = cargo_bin_cmd!("skaffold-beam");
    cmd.arg("completions")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Generate shell completion scripts",
        ))
        .stdout(predicate::str::contains("bash"))
        .stdout(predicate::str::contains("zsh"));
}

#[test]
fn test_completions_bash() {
    let mut cmd = cargo_bin_cmd!("skaffold-beam");
    cmd.arg("completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("_skaffold-beam()"))
        .stdout(predicate::str::contains("local"))
        .stdout(predicate::str::contains("remote"));
}

#[test]
fn test_completions_zsh() {
    let mut cmd = cargo_bin_cmd!("skaffold-beam");
    cmd.arg("completions")
        .arg("zsh")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("#compdef skaffold-beam"));
}

#[test]
fn test_completions_invalid_shell() {
    let mut cmd = cargo_bin_cmd!("skaffold-beam");
    cmd.arg("completions")
        .arg("tcsh")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
