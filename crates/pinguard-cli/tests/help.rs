use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to get a Command for the pinguard binary.
#[allow(deprecated)]
fn pinguard_cmd() -> Command {
    Command::cargo_bin("pinguard").unwrap()
}

#[test]
fn help_works() {
    pinguard_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("--tree"));
}

#[test]
fn check_help_lists_report_options() {
    pinguard_cmd()
        .args(["check", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--report-out"))
        .stdout(predicate::str::contains("--write-markdown"));
}

#[test]
fn explain_known_check_id() {
    pinguard_cmd()
        .args(["explain", "deps.ban_dynamic_versions"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Remediation"));
}

#[test]
fn explain_known_code() {
    pinguard_cmd()
        .args(["explain", "null_file"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Examples"));
}

#[test]
fn explain_unknown_lists_identifiers() {
    pinguard_cmd()
        .args(["explain", "deps.no_wildcards"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown check_id or code: deps.no_wildcards"))
        .stderr(predicate::str::contains("files.require_absent"));
}
