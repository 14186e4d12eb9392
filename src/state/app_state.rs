//! 应用状态

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::config::EnvConfig;
use crate::domain::action::ActionKind;
use crate::services::ActionController;

/// 运行中的动作信息
#[derive(Clone, Debug)]
pub struct RunningAction {
    pub action: ActionKind,
    pub started_at: DateTime<Utc>,
}

/// 应用状态
pub struct AppState {
    /// 环境配置
    pub config: EnvConfig,
    /// 服务启动时间
    pub started_at: DateTime<Utc>,
    /// 动作控制器
    pub controller: Arc<ActionController>,
    /// 同一时间只允许一个动作执行
    action_gate: Arc<Mutex<()>>,
    /// 当前运行中的动作
    pub running_action: RwLock<Option<RunningAction>>,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(config: EnvConfig) -> Self {
        tracing::info!(
            host = %config.host,
            port = config.port,
            cli = %config.bundle.cli,
            template = %config.bundle.template_path.display(),
            target = %config.bundle.target,
            timeout_secs = config.bundle.command_timeout.as_secs(),
            "Loaded configuration"
        );

        Self {
            controller: Arc::new(ActionController::new(config.bundle.clone())),
            config,
            started_at: Utc::now(),
            action_gate: Arc::new(Mutex::new(())),
            running_action: RwLock::new(None),
        }
    }

    /// 尝试占用动作执行权；已有动作运行时返回 None
    pub fn try_begin_action(&self) -> Option<OwnedMutexGuard<()>> {
        self.action_gate.clone().try_lock_owned().ok()
    }

    /// 是否有动作正在执行
    pub async fn has_running_action(&self) -> bool {
        self.running_action.read().await.is_some()
    }

    /// 注册运行中的动作
    pub async fn register_running_action(&self, action: ActionKind) {
        let mut running = self.running_action.write().await;
        *running = Some(RunningAction {
            action,
            started_at: Utc::now(),
        });
    }

    /// 取消注册运行中的动作
    pub async fn unregister_running_action(&self) {
        let mut running = self.running_action.write().await;
        *running = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BundleSettings;

    fn state() -> AppState {
        AppState::new(EnvConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            bundle: BundleSettings::default(),
        })
    }

    #[tokio::test]
    async fn test_action_gate_is_exclusive() {
        let state = state();

        let guard = state.try_begin_action();
        assert!(guard.is_some());
        assert!(state.try_begin_action().is_none());

        drop(guard);
        assert!(state.try_begin_action().is_some());
    }

    #[tokio::test]
    async fn test_register_running_action() {
        let state = state();
        assert!(!state.has_running_action().await);

        state.register_running_action(ActionKind::Deploy).await;
        assert!(state.has_running_action().await);
        let running = state.running_action.read().await.clone().unwrap();
        assert_eq!(running.action, ActionKind::Deploy);

        state.unregister_running_action().await;
        assert!(!state.has_running_action().await);
    }
}
