//! 作业绑定
//!
//! 两个阶段严格顺序执行：
//! 1. `bundle generate job` 从已有作业生成定义
//! 2. `bundle deployment bind` 把生成的资源绑定到该作业
//!
//! 第一阶段失败时不执行第二阶段

use crate::domain::action::{ActionError, ActionKind, ActionReport, ActionRequest};

use super::context::ActionContext;
use super::{require_workspace, required_inputs, ActionController};

impl ActionController {
    pub(super) async fn try_bind(
        &self,
        request: &ActionRequest,
    ) -> Result<ActionReport, ActionError> {
        let (credential, path) = required_inputs(request)?;
        let binding = request.job_binding()?;
        require_workspace(&path)?;

        let mut ctx =
            ActionContext::new(ActionKind::Bind, credential, self.settings.command_timeout);

        let generate = self.cli_argv(&[
            "bundle",
            "generate",
            "job",
            "--existing-job-id",
            binding.job_id.as_str(),
            "--key",
            binding.job_key.as_str(),
            "--force",
        ]);
        if !ctx.run_stage("generate_job", "Generate Job", generate, &path).await {
            ctx.skip_stage("deployment_bind", "Deployment Bind", "generate job failed");
            return Ok(ctx.finish());
        }

        ctx.separator();

        let bind = self.cli_argv(&[
            "bundle",
            "deployment",
            "bind",
            binding.job_key.as_str(),
            binding.job_id.as_str(),
            "--auto-approve",
            "--target",
            self.settings.target.as_str(),
        ]);
        ctx.run_stage("deployment_bind", "Deployment Bind", bind, &path)
            .await;

        Ok(ctx.finish())
    }
}
