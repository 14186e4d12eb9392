//! 动作服务模块
//!
//! 把面板上的四个动作（create / validate / bind / deploy）映射为
//! 一个或多个 databricks CLI 调用。每个动作先校验输入与工作区，
//! 校验失败时不启动任何外部进程。

pub mod bind;
pub mod context;
pub mod create;

use std::path::{Path, PathBuf};
use tracing::warn;

use crate::config::BundleSettings;
use crate::domain::action::{ActionError, ActionKind, ActionReport, ActionRequest};
use crate::domain::bundle::Credential;
use crate::domain::command::timestamp;
use crate::infra::BundleLocator;

pub use context::ActionContext;

/// 动作控制器
pub struct ActionController {
    settings: BundleSettings,
}

impl ActionController {
    pub fn new(settings: BundleSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &BundleSettings {
        &self.settings
    }

    /// 按动作类型分发
    pub async fn execute(&self, action: ActionKind, request: &ActionRequest) -> ActionReport {
        match action {
            ActionKind::Create => self.create(request).await,
            ActionKind::Validate => self.validate(request).await,
            ActionKind::Bind => self.bind(request).await,
            ActionKind::Deploy => self.deploy(request).await,
        }
    }

    /// 初始化 bundle；工作区已存在时不执行命令
    pub async fn create(&self, request: &ActionRequest) -> ActionReport {
        let ts = timestamp();
        let result = self.try_create(request, &ts).await;
        into_report(ActionKind::Create, result, &ts)
    }

    /// `bundle validate`
    pub async fn validate(&self, request: &ActionRequest) -> ActionReport {
        let ts = timestamp();
        let result = self
            .single_stage(
                ActionKind::Validate,
                request,
                ("validate", "Validate"),
                &["bundle", "validate"],
            )
            .await;
        into_report(ActionKind::Validate, result, &ts)
    }

    /// generate job + deployment bind
    pub async fn bind(&self, request: &ActionRequest) -> ActionReport {
        let ts = timestamp();
        let result = self.try_bind(request).await;
        into_report(ActionKind::Bind, result, &ts)
    }

    /// `bundle deploy --target <target>`
    pub async fn deploy(&self, request: &ActionRequest) -> ActionReport {
        let ts = timestamp();
        let target = self.settings.target.clone();
        let result = self
            .single_stage(
                ActionKind::Deploy,
                request,
                ("deploy", "Deploy"),
                &["bundle", "deploy", "--target", target.as_str()],
            )
            .await;
        into_report(ActionKind::Deploy, result, &ts)
    }

    /// 在有效工作区内执行单条命令
    async fn single_stage(
        &self,
        action: ActionKind,
        request: &ActionRequest,
        (name, display_name): (&str, &str),
        args: &[&str],
    ) -> Result<ActionReport, ActionError> {
        let (credential, path) = required_inputs(request)?;
        require_workspace(&path)?;

        let mut ctx = ActionContext::new(action, credential, self.settings.command_timeout);
        ctx.run_stage(name, display_name, self.cli_argv(args), &path)
            .await;
        Ok(ctx.finish())
    }

    /// `<cli> <args...>`
    fn cli_argv(&self, args: &[&str]) -> Vec<String> {
        std::iter::once(self.settings.cli.clone())
            .chain(args.iter().map(|s| s.to_string()))
            .collect()
    }
}

/// 所有动作共同的必填项：令牌、bundle 路径
fn required_inputs(request: &ActionRequest) -> Result<(&Credential, PathBuf), ActionError> {
    let credential = request.credential()?;
    let path = request.bundle_path()?;
    Ok((credential, path))
}

/// 要求路径是有效的 bundle 工作区
fn require_workspace(path: &Path) -> Result<(), ActionError> {
    let status = BundleLocator::locate(path);
    if status.is_valid() {
        Ok(())
    } else {
        Err(ActionError::Workspace {
            detail: status.detail,
            path: path.display().to_string(),
        })
    }
}

fn into_report(
    action: ActionKind,
    result: Result<ActionReport, ActionError>,
    timestamp: &str,
) -> ActionReport {
    result.unwrap_or_else(|e| {
        warn!(action = action.as_str(), error = %e, "Action rejected");
        ActionReport::rejected(action, &e, timestamp)
    })
}
