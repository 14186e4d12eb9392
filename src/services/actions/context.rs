//! 动作执行上下文
//!
//! 逐个执行外部命令阶段，累积文本报告和阶段明细

use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use crate::domain::action::{ActionKind, ActionReport, ActionStage, StageStatus};
use crate::domain::bundle::Credential;
use crate::domain::command::{timestamp, CommandInvocation};
use crate::infra::CommandRunner;

/// bind 两段报告之间的分隔线
pub const STAGE_SEPARATOR_WIDTH: usize = 50;

/// 动作执行上下文
pub struct ActionContext<'a> {
    report: ActionReport,
    credential: &'a Credential,
    timeout: Duration,
}

impl<'a> ActionContext<'a> {
    pub fn new(action: ActionKind, credential: &'a Credential, timeout: Duration) -> Self {
        let report = ActionReport::new(action);
        info!(
            run_id = %report.run_id,
            action = action.as_str(),
            token_len = credential.len(),
            "Action started"
        );
        Self {
            report,
            credential,
            timeout,
        }
    }

    /// 追加一段说明文字
    pub fn note(&mut self, text: &str) {
        self.report.output.push_str(text);
    }

    /// 追加分隔线
    pub fn separator(&mut self) {
        self.report.output.push('\n');
        self.report.output.push_str(&"=".repeat(STAGE_SEPARATOR_WIDTH));
        self.report.output.push('\n');
    }

    /// 执行一个命令阶段，返回是否成功
    pub async fn run_stage(
        &mut self,
        name: &str,
        display_name: &str,
        argv: Vec<String>,
        working_dir: &Path,
    ) -> bool {
        let mut stage = ActionStage::new(name, display_name);
        stage.start();

        let invocation =
            CommandInvocation::new(argv, working_dir, self.timeout).with_credential(self.credential);
        let result = CommandRunner::run(&invocation).await;

        let success = result.success();
        stage.finish(success, result.failure_summary());
        if !success {
            warn!(
                run_id = %self.report.run_id,
                stage = name,
                reason = stage.message.as_deref().unwrap_or_default(),
                "Stage failed"
            );
        }

        self.report
            .output
            .push_str(&result.render(&invocation.command_line(), &timestamp()));
        self.report.stages.push(stage);
        success
    }

    /// 记录未执行的阶段
    pub fn skip_stage(&mut self, name: &str, display_name: &str, reason: &str) {
        let mut stage = ActionStage::new(name, display_name);
        stage.skip(Some(reason.to_string()));
        self.report.stages.push(stage);
    }

    /// 结束动作；所有执行过的阶段成功即为成功
    pub fn finish(mut self) -> ActionReport {
        self.report.success = self
            .report
            .stages
            .iter()
            .all(|s| s.status == StageStatus::Success);

        info!(
            run_id = %self.report.run_id,
            action = self.report.action.as_str(),
            success = self.report.success,
            stages = self.report.stages.len(),
            "Action finished"
        );
        self.report
    }
}
