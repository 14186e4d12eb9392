//! 外部命令调用与结果
//!
//! 报告格式：
//!
//! ```text
//! [YYYY-MM-DD HH:MM:SS] Command: <argv>
//! Exit Code: <code>
//!
//! Output:
//! <stdout>
//! Error:
//! <stderr>
//! ```

use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;

use crate::config::env::constants::TOKEN_ENV;

use super::bundle::Credential;

/// 报告时间戳格式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 当前本地时间，按报告格式输出
pub fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// 一次外部命令调用
#[derive(Clone, Debug)]
pub struct CommandInvocation {
    /// argv[0] 为可执行文件
    pub argv: Vec<String>,
    /// 工作目录；不存在时在当前目录执行
    pub working_dir: PathBuf,
    /// 叠加到继承环境上的变量
    pub env: Vec<(String, String)>,
    pub timeout: Duration,
}

impl CommandInvocation {
    pub fn new(argv: Vec<String>, working_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            argv,
            working_dir: working_dir.into(),
            env: Vec::new(),
            timeout,
        }
    }

    /// 注入凭据和非交互执行所需的环境变量
    pub fn with_credential(mut self, credential: &Credential) -> Self {
        self.env = vec![
            (TOKEN_ENV.to_string(), credential.expose().to_string()),
            ("DATABRICKS_CLI_DO_NOT_TRACK".to_string(), "1".to_string()),
            ("DATABRICKS_CLI_SKIP_VERIFY".to_string(), "1".to_string()),
            ("TERM".to_string(), "dumb".to_string()),
            ("PYTHONUNBUFFERED".to_string(), "1".to_string()),
        ];
        self
    }

    /// 空格拼接的命令行，用于报告和日志
    pub fn command_line(&self) -> String {
        self.argv.join(" ")
    }
}

/// 命令执行结果
#[derive(Clone, Debug, PartialEq)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
    pub timed_out: bool,
    /// 启动失败（找不到可执行文件、权限、I/O）
    pub spawn_error: Option<String>,
}

impl CommandResult {
    pub fn timeout(elapsed: Duration) -> Self {
        Self {
            exit_code: -1,
            stdout: String::new(),
            stderr: String::new(),
            elapsed,
            timed_out: true,
            spawn_error: None,
        }
    }

    pub fn spawn_failed(message: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            exit_code: -1,
            stdout: String::new(),
            stderr: String::new(),
            elapsed,
            timed_out: false,
            spawn_error: Some(message.into()),
        }
    }

    pub fn success(&self) -> bool {
        !self.timed_out && self.spawn_error.is_none() && self.exit_code == 0
    }

    /// 简短的失败原因，写入阶段信息
    pub fn failure_summary(&self) -> Option<String> {
        if self.timed_out {
            Some("command timed out".to_string())
        } else if let Some(ref e) = self.spawn_error {
            Some(e.clone())
        } else if self.exit_code != 0 {
            Some(format!("exit code {}", self.exit_code))
        } else {
            None
        }
    }

    /// 生成文本报告
    pub fn render(&self, command_line: &str, timestamp: &str) -> String {
        if self.timed_out {
            return format!("[{}] Command timed out\n", timestamp);
        }
        if let Some(ref e) = self.spawn_error {
            return format!("[{}] Error: {}\n", timestamp, e);
        }

        let mut output = format!(
            "[{}] Command: {}\nExit Code: {}\n\n",
            timestamp, command_line, self.exit_code
        );
        if !self.stdout.is_empty() {
            output.push_str("Output:\n");
            output.push_str(&self.stdout);
            output.push('\n');
        }
        if !self.stderr.is_empty() {
            output.push_str("Error:\n");
            output.push_str(&self.stderr);
            output.push('\n');
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: &str = "2024-05-01 12:00:00";

    fn finished(exit_code: i32, stdout: &str, stderr: &str) -> CommandResult {
        CommandResult {
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            elapsed: Duration::from_millis(12),
            timed_out: false,
            spawn_error: None,
        }
    }

    #[test]
    fn test_render_with_both_streams() {
        let report = finished(1, "hello", "boom").render("databricks bundle validate", TS);
        assert_eq!(
            report,
            "[2024-05-01 12:00:00] Command: databricks bundle validate\n\
             Exit Code: 1\n\n\
             Output:\nhello\n\
             Error:\nboom\n"
        );
    }

    #[test]
    fn test_render_skips_empty_streams() {
        let report = finished(0, "", "").render("databricks bundle deploy --target dev", TS);
        assert_eq!(
            report,
            "[2024-05-01 12:00:00] Command: databricks bundle deploy --target dev\nExit Code: 0\n\n"
        );
    }

    #[test]
    fn test_render_timeout_and_spawn_error() {
        let timed_out = CommandResult::timeout(Duration::from_secs(1));
        assert_eq!(timed_out.render("x", TS), "[2024-05-01 12:00:00] Command timed out\n");
        assert!(!timed_out.success());

        let failed = CommandResult::spawn_failed("No such file or directory", Duration::ZERO);
        assert_eq!(
            failed.render("x", TS),
            "[2024-05-01 12:00:00] Error: No such file or directory\n"
        );
        assert_eq!(failed.failure_summary().as_deref(), Some("No such file or directory"));
    }

    #[test]
    fn test_with_credential_sets_overlay() {
        let inv = CommandInvocation::new(
            vec!["databricks".into(), "bundle".into(), "validate".into()],
            "/tmp",
            Duration::from_secs(1),
        )
        .with_credential(&Credential::new("tok"));

        assert_eq!(inv.command_line(), "databricks bundle validate");
        assert!(inv.env.contains(&("DATABRICKS_TOKEN".to_string(), "tok".to_string())));
        assert!(inv.env.contains(&("TERM".to_string(), "dumb".to_string())));
        assert!(inv
            .env
            .contains(&("DATABRICKS_CLI_DO_NOT_TRACK".to_string(), "1".to_string())));
    }

    #[test]
    fn test_timestamp_format() {
        let ts = timestamp();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
    }
}
