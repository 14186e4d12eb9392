//! Bundle 初始化
//!
//! `bundle init` 把目标路径当作输出目录，所以在父目录中执行

use std::env;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::action::{ActionError, ActionKind, ActionReport, ActionRequest};
use crate::domain::bundle::WorkspaceState;
use crate::infra::BundleLocator;

use super::context::ActionContext;
use super::{required_inputs, ActionController};

impl ActionController {
    pub(super) async fn try_create(
        &self,
        request: &ActionRequest,
        timestamp: &str,
    ) -> Result<ActionReport, ActionError> {
        let (credential, path) = required_inputs(request)?;
        let status = BundleLocator::locate(&path);
        let mut ctx =
            ActionContext::new(ActionKind::Create, credential, self.settings.command_timeout);

        match status.state {
            WorkspaceState::Valid => {
                ctx.note(&format!(
                    "[{}] Bundle already exists at: {}\n{}",
                    timestamp,
                    path.display(),
                    status.detail
                ));
                return Ok(ctx.finish());
            }
            WorkspaceState::Missing => {
                tokio::fs::create_dir_all(&path)
                    .await
                    .map_err(|source| ActionError::CreateDirectory {
                        path: path.display().to_string(),
                        source,
                    })?;
                info!(path = %path.display(), "Created bundle directory");
                ctx.note(&format!("[{}] Created directory: {}\n", timestamp, path.display()));
            }
            WorkspaceState::ExistsNoManifest => {
                ctx.note(&format!("[{}] Directory exists: {}\n", timestamp, path.display()));
            }
        }

        let template = self.settings.template_path.to_string_lossy();
        let output_dir = path.to_string_lossy();
        let config_file = self.settings.template_config.to_string_lossy();
        let argv = self.cli_argv(&[
            "bundle",
            "init",
            template.as_ref(),
            "--output-dir",
            output_dir.as_ref(),
            "--config-file",
            config_file.as_ref(),
        ]);
        ctx.run_stage("bundle_init", "Bundle Init", argv, &parent_dir(&path))
            .await;

        Ok(ctx.finish())
    }
}

/// bundle 路径的父目录；没有父目录时使用当前目录
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir(Path::new("/tmp/x")), PathBuf::from("/tmp"));
        assert_eq!(parent_dir(Path::new("a/b")), PathBuf::from("a"));
        assert_eq!(parent_dir(Path::new("bundle")), env::current_dir().unwrap());
        assert_eq!(parent_dir(Path::new("/")), env::current_dir().unwrap());
    }
}
