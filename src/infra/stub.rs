//! 测试用的 CLI 替身脚本

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// 在 `dir` 下写入可执行的 sh 脚本
pub fn write_stub(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// 记录每次调用（工作目录与参数）到 `log` 的替身，按 `exit_code` 退出
///
/// 日志每行格式：`<pwd>|<args...>`
pub fn write_spy(dir: &Path, name: &str, log: &Path, stdout: &str, exit_code: i32) -> PathBuf {
    let body = format!(
        "echo \"$(pwd -P)|$*\" >> '{}'\necho '{}'\nexit {}",
        log.display(),
        stdout,
        exit_code
    );
    write_stub(dir, name, &body)
}

/// 读取替身记录的调用
pub fn read_calls(log: &Path) -> Vec<(String, String)> {
    fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .filter_map(|line| line.split_once('|'))
        .map(|(pwd, args)| (pwd.to_string(), args.to_string()))
        .collect()
}
