//! Real child processes: exit codes, timeouts and captured output.
#![cfg(unix)]

use std::time::Duration;
use subscription_console::constants::{EXIT_SPAWN_FAILED, EXIT_TIMEOUT};
use subscription_console::services::commands::{CommandRunner, ProcessRunner, monitor_timeout};

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

#[tokio::test]
async fn slow_command_times_out() {
    let started = std::time::Instant::now();
    let outcome = ProcessRunner
        .run(&argv(&["sleep", "5"]), Duration::from_millis(500))
        .await;
    assert_eq!(outcome.code, EXIT_TIMEOUT);
    assert!(outcome.output.starts_with("timeout after"), "{}", outcome.output);
    assert!(!outcome.success());
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn missing_binary_fails_to_spawn() {
    let outcome = ProcessRunner
        .run(&argv(&["/nonexistent/add-user-cmd", "--name", "x"]), Duration::from_secs(5))
        .await;
    assert_eq!(outcome.code, EXIT_SPAWN_FAILED);
    assert!(outcome.output.contains("/nonexistent/add-user-cmd"));

    let empty = ProcessRunner.run(&[], Duration::from_secs(5)).await;
    assert_eq!(empty.code, EXIT_SPAWN_FAILED);
}

#[tokio::test]
async fn exit_code_and_both_streams_are_kept() {
    let outcome = ProcessRunner
        .run(&argv(&["sh", "-c", "echo out; echo err >&2; exit 3"]), Duration::from_secs(5))
        .await;
    assert_eq!(outcome.code, 3);
    assert_eq!(outcome.output, "out\nerr");

    let quiet = ProcessRunner.run(&argv(&["true"]), Duration::from_secs(5)).await;
    assert!(quiet.success());
    assert_eq!(quiet.describe(100), "rc=0");

    let stderr_only = ProcessRunner
        .run(&argv(&["sh", "-c", "echo nope >&2; exit 1"]), Duration::from_secs(5))
        .await;
    assert_eq!(stderr_only.output, "nope");
}

#[test]
fn health_check_timeout_fits_inside_the_poll_interval() {
    assert_eq!(monitor_timeout(Duration::from_secs(5)), Duration::from_secs(30));
    assert_eq!(monitor_timeout(Duration::from_secs(45)), Duration::from_secs(45));
    assert_eq!(monitor_timeout(Duration::from_secs(90)), Duration::from_secs(90));
    assert_eq!(monitor_timeout(Duration::from_secs(300)), Duration::from_secs(180));
}
