//! Bundle 工作区相关领域模型

use serde::Deserialize;
use std::fmt;

/// 工作区状态，每次动作前按文件系统重新计算
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkspaceState {
    /// 路径不存在
    Missing,
    /// 路径存在但缺少清单文件
    ExistsNoManifest,
    /// 有效的 bundle 工作区
    Valid,
}

/// 工作区定位结果
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BundleStatus {
    pub state: WorkspaceState,
    pub detail: String,
}

impl BundleStatus {
    pub fn new(state: WorkspaceState, detail: impl Into<String>) -> Self {
        Self {
            state,
            detail: detail.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.state == WorkspaceState::Valid
    }
}

/// 访问令牌
///
/// Debug 输出只暴露长度
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// 取出明文，仅用于注入子进程环境
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(len={})", self.0.len())
    }
}

/// bind 动作的作业绑定：已有作业 ID + 生成资源的 key
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobBinding {
    pub job_id: String,
    pub job_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_debug_hides_secret() {
        let token = Credential::new("dapi-secret-value");
        let debug = format!("{:?}", token);
        assert_eq!(debug, "Credential(len=17)");
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_credential_deserialize_transparent() {
        let token: Credential = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(token.expose(), "abc");
        assert_eq!(token.len(), 3);
    }

    #[test]
    fn test_bundle_status_is_valid() {
        assert!(BundleStatus::new(WorkspaceState::Valid, "Bundle exists").is_valid());
        assert!(!BundleStatus::new(WorkspaceState::Missing, "Path does not exist").is_valid());
    }
}
