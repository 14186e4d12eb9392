//! 命令执行器
//!
//! 调用外部 CLI 的唯一入口：
//! - 工作目录与环境变量直接传给子进程，不修改本进程状态
//! - 超时后杀死子进程
//! - 捕获 stdout/stderr
//! - 启动失败记入结果，不向外抛错

use std::process::{Output, Stdio};
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::config::env::constants::VERSION_PROBE_TIMEOUT_SECS;
use crate::domain::command::{CommandInvocation, CommandResult};

/// 命令执行器
pub struct CommandRunner;

/// 命令执行错误
#[derive(Debug)]
pub enum CommandError {
    /// argv 为空
    EmptyCommand,
    /// 命令启动失败
    SpawnFailed(String, std::io::Error),
    /// 命令超时
    Timeout,
    /// 等待命令完成失败
    WaitFailed(std::io::Error),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::EmptyCommand => write!(f, "Empty command"),
            CommandError::SpawnFailed(program, e) => {
                write!(f, "Failed to spawn '{}': {}", program, e)
            }
            CommandError::Timeout => write!(f, "Command timed out"),
            CommandError::WaitFailed(e) => write!(f, "Failed to wait for command: {}", e),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::SpawnFailed(_, e) | CommandError::WaitFailed(e) => Some(e),
            _ => None,
        }
    }
}

impl CommandRunner {
    /// 执行一次外部命令
    ///
    /// 所有失败（超时、启动失败）都折叠进 `CommandResult`
    pub async fn run(invocation: &CommandInvocation) -> CommandResult {
        let started = Instant::now();
        let command_line = invocation.command_line();

        debug!(
            command = %command_line,
            working_dir = %invocation.working_dir.display(),
            timeout_secs = invocation.timeout.as_secs_f64(),
            "Running command"
        );

        match Self::execute(invocation).await {
            Ok(output) => {
                let elapsed = started.elapsed();
                let exit_code = output.status.code().unwrap_or(-1);
                let result = CommandResult {
                    exit_code,
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    elapsed,
                    timed_out: false,
                    spawn_error: None,
                };
                info!(
                    command = %command_line,
                    exit_code,
                    elapsed_ms = elapsed.as_millis() as u64,
                    stdout_len = result.stdout.len(),
                    stderr_len = result.stderr.len(),
                    "Command finished"
                );
                result
            }
            Err(CommandError::Timeout) => {
                error!(command = %command_line, "Command timed out after {:?}", invocation.timeout);
                CommandResult::timeout(started.elapsed())
            }
            Err(e) => {
                warn!(command = %command_line, error = %e, "Command failed to run");
                CommandResult::spawn_failed(e.to_string(), started.elapsed())
            }
        }
    }

    async fn execute(invocation: &CommandInvocation) -> Result<Output, CommandError> {
        let (program, args) = invocation
            .argv
            .split_first()
            .ok_or(CommandError::EmptyCommand)?;

        let mut command = Command::new(program);
        command
            .args(args)
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if invocation.working_dir.is_dir() {
            command.current_dir(&invocation.working_dir);
        } else {
            warn!(
                working_dir = %invocation.working_dir.display(),
                "Working directory does not exist, using current directory"
            );
        }

        let child = command
            .spawn()
            .map_err(|e| CommandError::SpawnFailed(program.clone(), e))?;

        // 超时分支丢弃 wait_with_output，kill_on_drop 负责杀死子进程
        tokio::select! {
            output = child.wait_with_output() => output.map_err(CommandError::WaitFailed),
            _ = tokio::time::sleep(invocation.timeout) => Err(CommandError::Timeout),
        }
    }

    /// 探测 CLI 版本（`<cli> --version`）
    ///
    /// CLI 不可用时返回 None
    pub async fn probe_version(cli: &str) -> Option<String> {
        let invocation = CommandInvocation::new(
            vec![cli.to_string(), "--version".to_string()],
            ".",
            Duration::from_secs(VERSION_PROBE_TIMEOUT_SECS),
        );

        match Self::execute(&invocation).await {
            Ok(output) if output.status.success() => {
                let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
                Some(version).filter(|v| !v.is_empty())
            }
            Ok(output) => {
                debug!(cli, exit_code = ?output.status.code(), "CLI version probe failed");
                None
            }
            Err(e) => {
                debug!(cli, error = %e, "CLI version probe failed");
                None
            }
        }
    }
}
