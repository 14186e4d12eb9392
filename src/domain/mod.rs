//! 领域模型模块
//!
//! 纯数据结构，不依赖 axum/tokio

pub mod action;
pub mod bundle;
pub mod command;

// Re-exports for convenience
pub use action::{ActionError, ActionKind, ActionReport, ActionRequest, ActionStage, StageStatus};
pub use bundle::{BundleStatus, Credential, JobBinding, WorkspaceState};
pub use command::{CommandInvocation, CommandResult};
