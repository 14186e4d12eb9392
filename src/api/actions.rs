//! 动作 API
//!
//! 包含 /actions/{create,validate,bind,deploy} 端点。
//! 动作失败时仍返回 200，失败原因写在报告文本里。

use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;
use tracing::warn;

use crate::domain::action::{ActionKind, ActionReport, ActionRequest};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// 创建动作路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/actions/create", post(create_bundle))
        .route("/actions/validate", post(validate_bundle))
        .route("/actions/bind", post(bind_job))
        .route("/actions/deploy", post(deploy_bundle))
}

/// POST /actions/create
async fn create_bundle(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Json<ActionReport>> {
    run_action(state, ActionKind::Create, request).await
}

/// POST /actions/validate
async fn validate_bundle(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Json<ActionReport>> {
    run_action(state, ActionKind::Validate, request).await
}

/// POST /actions/bind
async fn bind_job(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Json<ActionReport>> {
    run_action(state, ActionKind::Bind, request).await
}

/// POST /actions/deploy
async fn deploy_bundle(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Json<ActionReport>> {
    run_action(state, ActionKind::Deploy, request).await
}

/// 占用执行权后在后台任务中执行动作
///
/// 客户端断开不会中断正在执行的命令序列；已有动作时返回 409
async fn run_action(
    state: Arc<AppState>,
    action: ActionKind,
    request: ActionRequest,
) -> ApiResult<Json<ActionReport>> {
    let guard = state.try_begin_action().ok_or_else(|| {
        warn!(action = action.as_str(), "Rejected action, another action is running");
        ApiError::conflict("Another action is already running, try again when it finishes")
    })?;

    state.register_running_action(action).await;

    let task_state = state.clone();
    let handle = tokio::spawn(async move {
        let _guard = guard;
        let report = task_state.controller.execute(action, &request).await;
        task_state.unregister_running_action().await;
        report
    });

    match handle.await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            tracing::error!(action = action.as_str(), error = %e, "Action task failed");
            state.unregister_running_action().await;
            Err(ApiError::internal(format!("Action task failed: {}", e)))
        }
    }
}
