//! 动作相关领域模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::bundle::{Credential, JobBinding};

/// 面板可触发的动作
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Create,
    Validate,
    Bind,
    Deploy,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Create => "create",
            ActionKind::Validate => "validate",
            ActionKind::Bind => "bind",
            ActionKind::Deploy => "deploy",
        }
    }
}

/// 动作在执行外部命令前被拒绝的原因
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Please enter your PAT token")]
    MissingCredential,

    #[error("Please enter bundle path")]
    MissingBundlePath,

    #[error("Please enter Job ID for binding")]
    MissingJobId,

    #[error("Please enter Job Key for binding")]
    MissingJobKey,

    #[error("{detail} at {path}")]
    Workspace { detail: String, path: String },

    #[error("failed to create directory {path}: {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// 面板提交的动作输入
///
/// 空字符串视为未填写
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ActionRequest {
    #[serde(default)]
    pub token: Option<Credential>,
    #[serde(default)]
    pub bundle_path: Option<String>,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub job_key: Option<String>,
}

impl ActionRequest {
    pub fn credential(&self) -> Result<&Credential, ActionError> {
        self.token
            .as_ref()
            .filter(|t| !t.is_empty())
            .ok_or(ActionError::MissingCredential)
    }

    /// bundle 路径；相对路径按进程工作目录解析为绝对路径
    ///
    /// create 在父目录中执行 init，相对的 `--output-dir` 会被重复拼接
    pub fn bundle_path(&self) -> Result<PathBuf, ActionError> {
        let path = non_blank(&self.bundle_path)
            .map(Path::new)
            .ok_or(ActionError::MissingBundlePath)?;
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        Ok(env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf()))
    }

    /// job_id 与 job_key 分别校验
    pub fn job_binding(&self) -> Result<JobBinding, ActionError> {
        let job_id = non_blank(&self.job_id).ok_or(ActionError::MissingJobId)?;
        let job_key = non_blank(&self.job_key).ok_or(ActionError::MissingJobKey)?;
        Ok(JobBinding {
            job_id: job_id.to_string(),
            job_key: job_key.to_string(),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// 阶段状态
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Pending,
    Running,
    Success,
    Failed,
    Skipped,
}

/// 动作中的一个外部命令阶段
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionStage {
    /// 阶段标识 (e.g., "generate_job", "deployment_bind")
    pub name: String,
    /// 显示名称
    pub display_name: String,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    /// 持续时间（毫秒）
    pub duration_ms: Option<i64>,
    pub status: StageStatus,
    pub message: Option<String>,
}

impl ActionStage {
    /// 创建新的待执行阶段
    pub fn new(name: &str, display_name: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            started_at: None,
            finished_at: None,
            duration_ms: None,
            status: StageStatus::Pending,
            message: None,
        }
    }

    /// 开始执行阶段
    pub fn start(&mut self) {
        self.started_at = Some(Utc::now());
        self.status = StageStatus::Running;
    }

    /// 完成阶段
    pub fn finish(&mut self, success: bool, message: Option<String>) {
        let now = Utc::now();
        self.finished_at = Some(now);
        self.status = if success {
            StageStatus::Success
        } else {
            StageStatus::Failed
        };
        self.message = message;
        if let Some(started) = self.started_at {
            self.duration_ms = Some((now - started).num_milliseconds());
        }
    }

    /// 跳过阶段
    pub fn skip(&mut self, reason: Option<String>) {
        self.status = StageStatus::Skipped;
        self.message = reason;
    }
}

/// 动作的文本报告与阶段明细
#[derive(Clone, Debug, Serialize)]
pub struct ActionReport {
    pub run_id: String,
    pub action: ActionKind,
    pub success: bool,
    /// 面板输出区域显示的文本
    pub output: String,
    pub stages: Vec<ActionStage>,
}

impl ActionReport {
    pub fn new(action: ActionKind) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            action,
            success: false,
            output: String::new(),
            stages: Vec::new(),
        }
    }

    /// 未执行任何命令即被拒绝
    pub fn rejected(action: ActionKind, error: &ActionError, timestamp: &str) -> Self {
        let mut report = Self::new(action);
        report.output = format!("[{}] Error: {}", timestamp, error);
        report
    }
}
