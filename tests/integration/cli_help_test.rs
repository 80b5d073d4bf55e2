use assert_cmd::Command;
use predicates::prelude::*;

fn wixforge() -> Command {
    Command::cargo_bin("wixforge").expect("binary builds")
}

#[test]
fn help_lists_both_commands() {
    wixforge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn version_prints_crate_version() {
    wixforge()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn build_requires_source_arguments() {
    wixforge().arg("build").assert().failure();
}

#[test]
fn build_help_documents_tool_flags() {
    wixforge()
        .args(["build", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--compile-only"))
        .stdout(predicate::str::contains("--mark-unstable"))
        .stdout(predicate::str::contains("--env-as-params"));
}

#[test]
fn check_fails_without_installation_directory() {
    let dir = tempfile::tempdir().unwrap();
    wixforge()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .failure()
        .code(1);
}

#[test]
fn check_fails_when_directory_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    wixforge()
        .current_dir(dir.path())
        .args(["check", "--install-dir", "/nonexistent/wix/bin"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn check_succeeds_when_toolchain_is_present() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("candle.exe"), b"").unwrap();
    std::fs::write(dir.path().join("light.exe"), b"").unwrap();
    wixforge()
        .args(["check", "--install-dir", dir.path().to_str().unwrap()])
        .assert()
        .success();
}

#[test]
fn invalid_architecture_is_rejected_at_parse_time() {
    wixforge()
        .args(["build", "product.wxs", "--arch", "sparc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid architecture"));
}

#[test]
fn build_with_missing_sources_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    wixforge()
        .current_dir(dir.path())
        .args(["build", "missing.wxs", "--no-log-file"])
        .assert()
        .failure()
        .code(1);
}
