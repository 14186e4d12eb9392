//! 基础设施模块
//!
//! 封装外部依赖（命令执行、文件系统检查）

pub mod command;
pub mod locator;

#[cfg(all(test, unix))]
pub(crate) mod stub;

pub use command::CommandRunner;
pub use locator::BundleLocator;
