//! 健康检查 API
//!
//! 包含 /health, /status 端点

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::config::env::constants::VERSION;
use crate::domain::action::ActionKind;
use crate::infra::CommandRunner;
use crate::state::AppState;

/// 运行中的动作摘要
#[derive(Debug, Serialize)]
struct RunningActionSummary {
    action: ActionKind,
    started_at: String,
}

/// 健康检查响应
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    timestamp: String,
    uptime_secs: i64,
    /// 配置的 CLI 可执行文件
    cli: String,
    /// `<cli> --version` 输出，CLI 不可用时为 null
    cli_version: Option<String>,
    target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    action_running: Option<RunningActionSummary>,
}

/// 创建健康检查路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/status", get(health_check))
}

/// 健康检查 - 返回版本、CLI 可用性和当前动作
///
/// GET /health, GET /status
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let settings = state.controller.settings();
    let cli_version = CommandRunner::probe_version(&settings.cli).await;

    let action_running = state
        .running_action
        .read()
        .await
        .as_ref()
        .map(|running| RunningActionSummary {
            action: running.action,
            started_at: running.started_at.to_rfc3339(),
        });

    let now = chrono::Utc::now();
    Json(HealthResponse {
        status: "ok",
        service: "bundle-panel",
        version: VERSION,
        timestamp: now.to_rfc3339(),
        uptime_secs: (now - state.started_at).num_seconds(),
        cli: settings.cli.clone(),
        cli_version,
        target: settings.target.clone(),
        action_running,
    })
}
