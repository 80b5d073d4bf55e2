#![cfg(unix)]

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use wixforge::core::types::ErrorCategory;
use wixforge::logging::BuildLog;
use wixforge::tools::execution::TokioProcessRunner;

fn sh_args(script: &str) -> Vec<String> {
    vec!["-c".to_string(), script.to_string()]
}

#[tokio::test(flavor = "current_thread")]
async fn clean_exit_is_a_success() {
    let runner = TokioProcessRunner::new();
    let log = BuildLog::new(false);
    let result = runner
        .run_process(
            Path::new("/bin/sh"),
            &sh_args("echo compiling; echo done"),
            None,
            &HashMap::new(),
            &log,
        )
        .await
        .unwrap();
    assert_eq!(result.exit_code, 0);
    assert_eq!(result.error_lines, 0);
    assert!(!result.failed());
    assert!(result.lines.contains(&"compiling".to_string()));
}

#[tokio::test(flavor = "current_thread")]
async fn nonzero_exit_is_a_failure() {
    let runner = TokioProcessRunner::new();
    let log = BuildLog::new(false);
    let result = runner
        .run_process(
            Path::new("/bin/sh"),
            &sh_args("exit 3"),
            None,
            &HashMap::new(),
            &log,
        )
        .await
        .unwrap();
    assert_eq!(result.exit_code, 3);
    assert!(result.failed());
}

#[tokio::test(flavor = "current_thread")]
async fn error_line_with_clean_exit_is_a_failure() {
    let runner = TokioProcessRunner::new();
    let log = BuildLog::new(false);
    let result = runner
        .run_process(
            Path::new("/bin/sh"),
            &sh_args("echo 'product.wxs(3): error CNDL0104 : bad element'; exit 0"),
            None,
            &HashMap::new(),
            &log,
        )
        .await
        .unwrap();
    assert_eq!(result.exit_code, 0);
    assert_eq!(result.error_lines, 1);
    assert!(result.failed());
}

#[tokio::test(flavor = "current_thread")]
async fn stderr_lines_are_captured_and_scanned() {
    let runner = TokioProcessRunner::new();
    let log = BuildLog::new(false);
    let result = runner
        .run_process(
            Path::new("/bin/sh"),
            &sh_args("echo 'error LGHT0001 : unresolved' 1>&2"),
            None,
            &HashMap::new(),
            &log,
        )
        .await
        .unwrap();
    assert_eq!(result.error_lines, 1);
    assert!(result
        .lines
        .contains(&"error LGHT0001 : unresolved".to_string()));
}

#[tokio::test(flavor = "current_thread")]
async fn missing_executable_is_a_launch_error() {
    let runner = TokioProcessRunner::new();
    let log = BuildLog::new(false);
    let err = runner
        .run_process(
            Path::new("/definitely/not/here/candle.exe"),
            &sh_args("echo hi"),
            None,
            &HashMap::new(),
            &log,
        )
        .await
        .unwrap_err();
    assert_eq!(err.category, ErrorCategory::ToolExecutionError);
}

#[tokio::test(flavor = "current_thread")]
async fn environment_overlay_reaches_the_child() {
    let runner = TokioProcessRunner::new();
    let log = BuildLog::new(false);
    let mut env = HashMap::new();
    env.insert("WIXFORGE_PROBE".to_string(), "overlay-works".to_string());
    let result = runner
        .run_process(
            Path::new("/bin/sh"),
            &sh_args("echo $WIXFORGE_PROBE"),
            None,
            &env,
            &log,
        )
        .await
        .unwrap();
    assert!(result.lines.contains(&"overlay-works".to_string()));
}

#[tokio::test(flavor = "current_thread")]
async fn hung_process_is_killed_on_timeout() {
    let runner = TokioProcessRunner::with_timeout(Duration::from_millis(200));
    let log = BuildLog::new(false);
    let err = runner
        .run_process(
            Path::new("/bin/sh"),
            &sh_args("sleep 30"),
            None,
            &HashMap::new(),
            &log,
        )
        .await
        .unwrap_err();
    assert_eq!(err.category, ErrorCategory::TimeoutError);
}

#[tokio::test(flavor = "current_thread")]
async fn working_directory_is_honored() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("marker.txt"), "here").unwrap();
    let runner = TokioProcessRunner::new();
    let log = BuildLog::new(false);
    let result = runner
        .run_process(
            Path::new("/bin/sh"),
            &sh_args("cat marker.txt"),
            Some(dir.path()),
            &HashMap::new(),
            &log,
        )
        .await
        .unwrap();
    assert!(result.lines.contains(&"here".to_string()));
}
