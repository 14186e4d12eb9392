//! Bundle Panel - Databricks asset bundle 控制面板
//!
//! 浏览器页面收集令牌、bundle 路径和作业信息，
//! 每个动作转换为 databricks CLI 调用并返回文本报告。

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod services;
pub mod state;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

pub use config::EnvConfig;
pub use state::AppState;

/// 默认日志过滤规则，可用 RUST_LOG 覆盖
const DEFAULT_LOG_FILTER: &str = "bundle_panel=info,tower_http=info";

/// 初始化日志
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// 启动 HTTP 服务，直到收到关闭信号
pub async fn run(config: EnvConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config));

    match infra::CommandRunner::probe_version(&state.config.bundle.cli).await {
        Some(version) => tracing::info!(version = %version, "Databricks CLI available"),
        None => tracing::warn!(
            cli = %state.config.bundle.cli,
            "Databricks CLI not reachable, actions will fail until it is installed"
        ),
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Bundle panel listening");

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Bundle panel stopped");
    Ok(())
}

/// 等待 Ctrl-C 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
