//! 业务服务模块
//!
//! 动作编排：输入校验、工作区检查、CLI 调用

pub mod actions;

pub use actions::ActionController;
