//! End-to-end CLI tests: the push (apply) and pull-request (plan) legs.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

const STACK_YML: &str = r#"
stack: site-test
account: "123456789012"
region: eu-west-1
primary_hostname: example.com
alias_hostname: www.example.com
redirect_policy: redirect-alias-to-primary
hosted_zone: example.com
assets:
  dir: dist
  exclude:
    - "*.map"
"#;

fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("stack.yml"), STACK_YML).expect("stack.yml");
    std::fs::create_dir_all(dir.path().join("dist")).expect("dist");
    std::fs::write(dir.path().join("dist/index.html"), "<html></html>").expect("asset");
    std::fs::write(dir.path().join("dist/app.js.map"), "{}").expect("asset");
    dir
}

fn sitestack(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sitestack").expect("binary builds");
    cmd.current_dir(dir);
    cmd
}

#[test]
fn validate_accepts_a_good_definition() {
    let dir = project();
    sitestack(dir.path())
        .args(["validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
}

#[test]
fn validate_rejects_a_bad_account_id() {
    let dir = project();
    std::fs::write(
        dir.path().join("stack.yml"),
        STACK_YML.replace("123456789012", "1234"),
    )
    .unwrap();
    sitestack(dir.path())
        .args(["validate"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("twelve-digit"));
}

#[test]
fn synth_renders_the_document() {
    let dir = project();
    sitestack(dir.path()).args(["synth"]).assert().success();

    let rendered = dir.path().join(".sitestack/out/site-test.json");
    assert!(rendered.exists());
    let content = std::fs::read_to_string(rendered).unwrap();
    assert!(content.contains("ContentDistribution"));
    assert!(content.contains("AliasDistribution"));
}

#[test]
fn plan_flags_drift_and_apply_clears_it() {
    let dir = project();

    // Fresh stack: everything pending.
    sitestack(dir.path()).args(["plan"]).assert().code(2);

    sitestack(dir.path())
        .args(["apply"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cache invalidation on /*"));

    // Unchanged definition and assets: clean plan, clean sync.
    sitestack(dir.path()).args(["plan"]).assert().code(0);
    sitestack(dir.path())
        .args(["apply"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no cache invalidation needed"));
}

#[test]
fn outputs_are_redacted_by_default() {
    let dir = project();
    sitestack(dir.path()).args(["apply"]).assert().success();

    sitestack(dir.path())
        .args(["outputs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[REDACTED]"))
        .stdout(predicate::str::contains("https://example.com"));

    sitestack(dir.path())
        .args(["outputs", "--show-sensitive"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "secretsmanager/site-test/deployer-credentials",
        ));
}

#[test]
fn destroy_requires_confirmation() {
    let dir = project();
    sitestack(dir.path()).args(["apply"]).assert().success();

    sitestack(dir.path()).args(["destroy"]).assert().code(1);

    sitestack(dir.path())
        .args(["destroy", "--yes"])
        .assert()
        .success();

    // State is gone: the next plan is a full create again.
    sitestack(dir.path()).args(["plan"]).assert().code(2);
}
