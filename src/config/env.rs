//! 环境变量配置加载

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use self::constants::{
    DEFAULT_CLI, DEFAULT_COMMAND_TIMEOUT_SECS, DEFAULT_PORT, DEFAULT_TARGET,
    DEFAULT_TEMPLATE_CONFIG, DEFAULT_TEMPLATE_PATH,
};

/// 环境配置
#[derive(Clone, Debug)]
pub struct EnvConfig {
    /// 监听地址
    pub host: String,
    /// 服务监听端口
    pub port: u16,
    /// Bundle 命令配置
    pub bundle: BundleSettings,
}

/// Bundle 相关配置：外部 CLI、模板和部署目标
#[derive(Clone, Debug)]
pub struct BundleSettings {
    /// databricks CLI 可执行文件
    pub cli: String,
    /// `bundle init` 使用的模板目录（绝对路径）
    pub template_path: PathBuf,
    /// `bundle init --config-file` 的配置文件（绝对路径）
    pub template_config: PathBuf,
    /// 部署目标环境
    pub target: String,
    /// 单条命令超时
    pub command_timeout: Duration,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        let host = env::var("BUNDLE_PANEL_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = load_with_fallback("BUNDLE_PANEL_PORT", "PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            host,
            port,
            bundle: BundleSettings::from_env(),
        }
    }
}

impl BundleSettings {
    /// 从环境变量加载 bundle 配置
    pub fn from_env() -> Self {
        let cli = env::var("DATABRICKS_CLI_PATH")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CLI.to_string());

        let template_path = env::var("BUNDLE_TEMPLATE_PATH")
            .unwrap_or_else(|_| DEFAULT_TEMPLATE_PATH.to_string());
        let template_config = env::var("BUNDLE_TEMPLATE_CONFIG")
            .unwrap_or_else(|_| DEFAULT_TEMPLATE_CONFIG.to_string());

        let target = env::var("BUNDLE_TARGET")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_TARGET.to_string());

        let timeout_secs = env::var("BUNDLE_COMMAND_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_COMMAND_TIMEOUT_SECS);

        Self {
            cli,
            template_path: resolve_from_cwd(Path::new(&template_path)),
            template_config: resolve_from_cwd(Path::new(&template_config)),
            target,
            command_timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl Default for BundleSettings {
    fn default() -> Self {
        Self {
            cli: DEFAULT_CLI.to_string(),
            template_path: resolve_from_cwd(Path::new(DEFAULT_TEMPLATE_PATH)),
            template_config: resolve_from_cwd(Path::new(DEFAULT_TEMPLATE_CONFIG)),
            target: DEFAULT_TARGET.to_string(),
            command_timeout: Duration::from_secs(DEFAULT_COMMAND_TIMEOUT_SECS),
        }
    }
}

/// 加载环境变量，支持 fallback
fn load_with_fallback(primary: &str, fallback: &str) -> Option<String> {
    env::var(primary).ok().or_else(|| env::var(fallback).ok())
}

/// 相对路径按进程启动目录解析
///
/// init 命令在 bundle 的父目录中执行，模板路径必须在此之前固定下来
fn resolve_from_cwd(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(e) => {
            warn!(error = %e, path = %path.display(), "Cannot read current directory, keeping relative path");
            path.to_path_buf()
        }
    }
}

/// 常量
pub mod constants {
    /// 默认监听端口
    pub const DEFAULT_PORT: u16 = 8050;

    /// 默认 CLI 可执行文件
    pub const DEFAULT_CLI: &str = "databricks";

    /// 默认模板目录
    pub const DEFAULT_TEMPLATE_PATH: &str = "./dab-container-template";

    /// 默认模板配置文件
    pub const DEFAULT_TEMPLATE_CONFIG: &str = "./dab-container-template/config.json";

    /// 默认部署目标
    pub const DEFAULT_TARGET: &str = "dev";

    /// 单条命令默认超时（秒）
    pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 300;

    /// `--version` 探测超时（秒）
    pub const VERSION_PROBE_TIMEOUT_SECS: u64 = 5;

    /// 标识 bundle 工作区的清单文件
    pub const MANIFEST_FILE: &str = "databricks.yml";

    /// 传递凭据的环境变量
    pub const TOKEN_ENV: &str = "DATABRICKS_TOKEN";

    /// 版本号
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_with_fallback() {
        // 设置测试环境变量
        env::set_var("BP_TEST_PRIMARY", "primary_value");
        env::set_var("BP_TEST_FALLBACK", "fallback_value");

        assert_eq!(
            load_with_fallback("BP_TEST_PRIMARY", "BP_TEST_FALLBACK"),
            Some("primary_value".to_string())
        );

        env::remove_var("BP_TEST_PRIMARY");
        assert_eq!(
            load_with_fallback("BP_TEST_PRIMARY", "BP_TEST_FALLBACK"),
            Some("fallback_value".to_string())
        );

        env::remove_var("BP_TEST_FALLBACK");
        assert_eq!(load_with_fallback("BP_TEST_PRIMARY", "BP_TEST_FALLBACK"), None);
    }

    #[test]
    fn test_resolve_from_cwd() {
        let abs = resolve_from_cwd(Path::new("/opt/template"));
        assert_eq!(abs, PathBuf::from("/opt/template"));

        let rel = resolve_from_cwd(Path::new("./dab-container-template"));
        assert!(rel.is_absolute());
        assert!(rel.ends_with("dab-container-template"));
    }

    #[test]
    fn test_bundle_settings_default() {
        let settings = BundleSettings::default();
        assert_eq!(settings.cli, "databricks");
        assert_eq!(settings.target, "dev");
        assert_eq!(settings.command_timeout, Duration::from_secs(300));
        assert!(settings.template_config.ends_with("config.json"));
    }
}
