//! External command invocation.
//!
//! Every collaborator command (provisioning, deletion, sync, health, metrics)
//! is an opaque subprocess run with an explicit timeout. A timeout or a spawn
//! failure is folded into a synthetic non-zero exit code so callers only ever
//! see `CommandOutcome`.

use crate::config::Config;
use crate::constants::{
    ALREADY_EXISTS_MARKER, DELETE_TIMEOUT_SECS, EXIT_SPAWN_FAILED, EXIT_TIMEOUT, MAX_DIAG_TAIL_CHARS,
    METRICS_TIMEOUT_SECS, MONITOR_MIN_INTERVAL_SECS, MONITOR_TIMEOUT_CEIL_SECS, MONITOR_TIMEOUT_FLOOR_SECS,
    PROVISION_TIMEOUT_SECS, SYNC_TIMEOUT_SECS,
};
use crate::services::registry::Registry;
use crate::util::truncate_chars;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub code: i32,
    /// stdout and stderr joined by a newline, trimmed.
    pub output: String,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// Output for display, or `rc=<code>` when the command printed nothing.
    pub fn describe(&self, max_chars: usize) -> String {
        if self.output.is_empty() {
            format!("rc={}", self.code)
        } else {
            truncate_chars(&self.output, max_chars).to_string()
        }
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, args: &[String], timeout: Duration) -> CommandOutcome;
}

/// Runs commands as real child processes.
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, args: &[String], timeout: Duration) -> CommandOutcome {
        let started = Instant::now();
        let outcome = spawn_and_wait(args, timeout).await;
        if !outcome.success() {
            tracing::warn!(
                target = "cmd",
                rc = outcome.code,
                secs = started.elapsed().as_secs_f32(),
                cmd = %args.join(" "),
                output = %truncate_chars(&outcome.output, MAX_DIAG_TAIL_CHARS),
                "command failed"
            );
        }
        outcome
    }
}

async fn spawn_and_wait(args: &[String], timeout: Duration) -> CommandOutcome {
    let Some((program, rest)) = args.split_first() else {
        return CommandOutcome {
            code: EXIT_SPAWN_FAILED,
            output: "empty command line".into(),
        };
    };
    let child = tokio::process::Command::new(program)
        .args(rest)
        .kill_on_drop(true)
        .output();
    match tokio::time::timeout(timeout, child).await {
        Err(_) => CommandOutcome {
            code: EXIT_TIMEOUT,
            output: format!("timeout after {}s", timeout.as_secs()),
        },
        Ok(Err(e)) => CommandOutcome {
            code: EXIT_SPAWN_FAILED,
            output: format!("failed to start {program}: {e}"),
        },
        Ok(Ok(out)) => {
            let stdout = String::from_utf8_lossy(&out.stdout);
            let stderr = String::from_utf8_lossy(&out.stderr);
            CommandOutcome {
                // Killed by a signal: no exit code, still a failure.
                code: out.status.code().unwrap_or(-1),
                output: join_streams(&stdout, &stderr),
            }
        }
    }
}

fn join_streams(stdout: &str, stderr: &str) -> String {
    [stdout.trim(), stderr.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Typed wrappers over the configured command lines.
#[derive(Clone)]
pub struct ExternalCommands {
    runner: Arc<dyn CommandRunner>,
    config: Arc<Config>,
}

impl ExternalCommands {
    pub fn new(runner: Arc<dyn CommandRunner>, config: Arc<Config>) -> Self {
        Self { runner, config }
    }

    /// Raw provisioning call used by the synchronous admin "add" flow.
    pub async fn add_account(&self, name: &str, days: i64) -> CommandOutcome {
        let args = vec![
            self.config.add_user_cmd.clone(),
            "--name".into(),
            name.to_string(),
            "--days".into(),
            days.to_string(),
        ];
        self.runner.run(&args, Duration::from_secs(PROVISION_TIMEOUT_SECS)).await
    }

    /// Provisioning with the idempotent success rule: a non-zero exit whose
    /// output says the account already exists still counts as success when
    /// the registry confirms the account is present.
    pub async fn provision(&self, name: &str, days: i64, registry: &Registry) -> (bool, CommandOutcome) {
        let outcome = self.add_account(name, days).await;
        if outcome.success() {
            return (true, outcome);
        }
        if is_already_exists(&outcome.output) {
            match registry.contains(name).await {
                Ok(true) => {
                    tracing::info!(target = "cmd.provision", account = %name, "account already existed; treating as provisioned");
                    return (true, outcome);
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(target = "cmd.provision", account = %name, error = %e, "registry check after 'already exists' failed");
                }
            }
        }
        (false, outcome)
    }

    pub async fn delete_account(&self, name: &str) -> CommandOutcome {
        let args = vec![self.config.del_user_cmd.clone(), "--name".into(), name.to_string()];
        self.runner.run(&args, Duration::from_secs(DELETE_TIMEOUT_SECS)).await
    }

    pub async fn sync_expiry(&self) -> CommandOutcome {
        let args = vec![
            self.config.sync_expire_cmd.clone(),
            "--apply".into(),
            "--grace-days".into(),
            self.config.sync_grace_days.to_string(),
        ];
        self.runner.run(&args, Duration::from_secs(SYNC_TIMEOUT_SECS)).await
    }

    pub async fn health_check(&self) -> CommandOutcome {
        let mut args = vec![self.config.monitor_cmd.clone()];
        if let Some(user) = &self.config.monitor_check_user {
            args.push("--user".into());
            args.push(user.clone());
        }
        self.runner.run(&args, monitor_timeout(self.config.monitor_interval)).await
    }

    pub async fn metrics(&self) -> CommandOutcome {
        let args = vec![self.config.metrics_cmd.clone()];
        self.runner.run(&args, Duration::from_secs(METRICS_TIMEOUT_SECS)).await
    }
}

pub fn is_already_exists(output: &str) -> bool {
    output.to_lowercase().contains(ALREADY_EXISTS_MARKER)
}

/// Health-check timeout: the configured interval clamped into [60s, 180s],
/// never longer than the effective polling interval.
pub fn monitor_timeout(configured_interval: Duration) -> Duration {
    let poll_secs = configured_interval.as_secs().max(MONITOR_MIN_INTERVAL_SECS);
    let secs = poll_secs
        .clamp(MONITOR_TIMEOUT_FLOOR_SECS, MONITOR_TIMEOUT_CEIL_SECS)
        .min(poll_secs);
    Duration::from_secs(secs)
}
