//! Bundle 工作区检查

use std::path::Path;

use crate::config::env::constants::MANIFEST_FILE;
use crate::domain::bundle::{BundleStatus, WorkspaceState};

/// 根据文件系统判断路径是否为 bundle 工作区
///
/// 不缓存，每次调用都重新检查
pub struct BundleLocator;

impl BundleLocator {
    pub fn locate(path: &Path) -> BundleStatus {
        if !path.exists() {
            return BundleStatus::new(WorkspaceState::Missing, "Path does not exist");
        }

        if path.join(MANIFEST_FILE).is_file() {
            return BundleStatus::new(WorkspaceState::Valid, "Bundle exists");
        }

        BundleStatus::new(
            WorkspaceState::ExistsNoManifest,
            format!("Path exists but no {} found", MANIFEST_FILE),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_locate_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let status = BundleLocator::locate(&tmp.path().join("nope"));
        assert_eq!(status.state, WorkspaceState::Missing);
        assert_eq!(status.detail, "Path does not exist");
    }

    #[test]
    fn test_locate_without_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("README.md"), "hi").unwrap();

        let status = BundleLocator::locate(tmp.path());
        assert_eq!(status.state, WorkspaceState::ExistsNoManifest);
        assert_eq!(status.detail, "Path exists but no databricks.yml found");
        assert!(!status.is_valid());
    }

    #[test]
    fn test_locate_manifest_directory_is_not_valid() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join(MANIFEST_FILE)).unwrap();

        assert!(!BundleLocator::locate(tmp.path()).is_valid());
    }

    #[test]
    fn test_locate_valid_and_not_cached() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(!BundleLocator::locate(tmp.path()).is_valid());

        fs::write(tmp.path().join(MANIFEST_FILE), "bundle:\n  name: demo\n").unwrap();
        let status = BundleLocator::locate(tmp.path());
        assert_eq!(status.state, WorkspaceState::Valid);
        assert_eq!(status.detail, "Bundle exists");
    }
}
